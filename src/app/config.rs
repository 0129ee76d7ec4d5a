use std::env;

use dotenv::dotenv;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Enviroment variable '{name}' is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Credentialed connection string, the in-memory store is used without one
    pub database_url: Option<String>,
    pub pool_size: u32,
}

impl Config {
    /// Reads the configuration from the enviroment, loading a `.env` file first if present.
    ///
    /// # Example
    /// ```
    /// let config = Config::from_env()?;
    /// println!("listening on {}:{}", config.host, config.port);
    /// ```
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => parse_number("PORT", value)?,
            None => DEFAULT_PORT,
        };
        let pool_size = match non_empty("DATABASE_POOL_SIZE") {
            Some(value) => parse_number("DATABASE_POOL_SIZE", value)?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            host: non_empty("HOST").unwrap_or_else(|| String::from(DEFAULT_HOST)),
            port,
            database_url: non_empty("DATABASE_URL"),
            pool_size,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
