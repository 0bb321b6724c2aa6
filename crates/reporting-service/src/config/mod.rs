//! Service config loader (strict parsing + environment overrides).
//!
//! Resolution order:
//! 1. `REPORTING_CONFIG` names a YAML file to load, otherwise defaults.
//! 2. `REDIS_HOST`, `REDIS_PORT` and `REPORTING_LISTEN` override the file.
//! 3. The result is validated.

pub mod schema;

use std::fs;

use reporting_core::error::{Result, ReportError};

pub use schema::{ServerSection, ServiceConfig, StoreBackend, StoreSection};

pub const CONFIG_PATH_ENV: &str = "REPORTING_CONFIG";
pub const REDIS_HOST_ENV: &str = "REDIS_HOST";
pub const REDIS_PORT_ENV: &str = "REDIS_PORT";
pub const LISTEN_ENV: &str = "REPORTING_LISTEN";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReportError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| ReportError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config from the process environment.
pub fn load_from_env() -> Result<ServiceConfig> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolve config through an arbitrary variable lookup (process env in
/// production, a map in tests).
pub fn resolve<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cfg = match lookup(CONFIG_PATH_ENV) {
        Some(path) => load_from_file(&path)?,
        None => ServiceConfig::default(),
    };
    let cfg = apply_env_overrides(cfg, &lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn apply_env_overrides<F>(mut cfg: ServiceConfig, lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(REDIS_HOST_ENV) {
        cfg.store.host = host;
    }
    if let Some(port) = lookup(REDIS_PORT_ENV) {
        cfg.store.port = port.trim().parse().map_err(|e| {
            ReportError::Config(format!("{REDIS_PORT_ENV}={port} is not a port: {e}"))
        })?;
    }
    if let Some(listen) = lookup(LISTEN_ENV) {
        cfg.server.listen = listen;
    }
    Ok(cfg)
}
