//! Environment configuration, parsed once at startup.

pub mod engine;
pub mod server;

use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub use engine::EngineConfig;
pub use server::{JournalConfig, ServerConfig};

/// Source of configuration values; the process environment in production.
pub trait VarSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl<F: Fn(&str) -> Option<String>> VarSource for F {
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(source: &dyn VarSource, name: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match source.var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::config(format!("Invalid value '{raw}' for '{name}': {e}"))
        }),
    }
}

fn parse_bool_or(source: &dyn VarSource, name: &str, default: bool) -> Result<bool, AppError> {
    match source.var(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(AppError::config(format!(
            "Invalid boolean '{v}' for '{name}'"
        ))),
    }
}
