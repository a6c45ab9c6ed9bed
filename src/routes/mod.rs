//! HTTP route handlers

pub mod calculator;
