//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::pricing::{FinanceError, PricingError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Finance(#[from] FinanceError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Pricing(_) | AppError::Finance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name used by the JSON API
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Pricing(PricingError::UnknownCombination { .. }) => "unknown_combination",
            AppError::Pricing(PricingError::AmountOutOfRange { .. }) => "amount_out_of_range",
            AppError::Finance(_) => "finance_error",
            AppError::Template(_) => "template_error",
        }
    }

    /// Message safe to show to the caller. Server-side failures are logged
    /// and replaced by a generic text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound => "Page not found".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Pricing(e) => e.to_string(),
            AppError::Finance(e) => e.to_string(),
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                "Template error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        // Return simple HTML error page
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{} - Калькулятор металла</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 50px;">
    <h1>{}</h1>
    <p>{}</p>
    <a href="/">Вернуться к форме</a>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            escape_html(&message)
        );

        (status, axum::response::Html(html)).into_response()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub type Result<T> = std::result::Result<T, AppError>;
