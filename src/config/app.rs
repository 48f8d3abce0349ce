use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub seed_database: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5328,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            seed_database: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = match env::var("PORT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.port,
        };
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or(defaults.allowed_origins);
        let seed_database = env::var("SEED_DATABASE")
            .map(|value| parse_flag(&value))
            .unwrap_or(defaults.seed_database);

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            allowed_origins,
            seed_database,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
