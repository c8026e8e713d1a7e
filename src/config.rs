use std::env;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub source_base_url: String,
    pub max_connections: u32,
    pub refresh_interval_secs: Option<u64>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://course_info.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let source_base_url = env::var("SOURCE_BASE_URL")
            .map_err(|_| AppError::BadRequest("SOURCE_BASE_URL is not set".to_string()))?;

        let max_connections = match env::var("MAX_CONNECTIONS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest(format!("MAX_CONNECTIONS is invalid: {}", v)))?,
            Err(_) => 5,
        };

        let refresh_interval_secs = match env::var("REFRESH_INTERVAL_SECS") {
            Ok(v) => Some(v.parse::<u64>().map_err(|_| {
                AppError::BadRequest(format!("REFRESH_INTERVAL_SECS is invalid: {}", v))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            source_base_url,
            max_connections,
            refresh_interval_secs,
        })
    }
}
