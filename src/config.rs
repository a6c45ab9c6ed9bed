//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::pricing::PipelineProfile;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `PRICING_TABLES_PATH`; embedded tables when unset
    pub tables_path: Option<PathBuf>,
    /// `PRICING_PROFILE`; overrides a profile named in the tables file
    pub profile: Option<PipelineProfile>,
    /// `STATIC_DIR`
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let profile = get("PRICING_PROFILE")
            .map(|raw| raw.parse::<PipelineProfile>().map_err(|e| anyhow!(e)))
            .transpose()
            .context("PRICING_PROFILE must be 'standard' or 'legacy'")?;

        Ok(Self {
            bind_addr,
            tables_path: get("PRICING_TABLES_PATH").map(PathBuf::from),
            profile,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}
