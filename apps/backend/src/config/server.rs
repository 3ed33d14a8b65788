use super::{parse_or, ProcessEnv, VarSource};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn VarSource) -> Result<Self, AppError> {
        Ok(Self {
            host: source
                .var("BACKEND_HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(source, "BACKEND_PORT", 3001)?,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Where the journal is stored. No URL keeps it in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    pub database_url: Option<String>,
}

impl JournalConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn VarSource) -> Result<Self, AppError> {
        let database_url = source.var("DATABASE_URL");
        if let Some(url) = &database_url {
            if !(url.starts_with("postgres") || url.starts_with("sqlite:")) {
                return Err(AppError::config(format!(
                    "DATABASE_URL must be a postgres or sqlite URL, got '{url}'"
                )));
            }
        }
        Ok(Self { database_url })
    }
}
