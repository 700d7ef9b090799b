use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/health_tracker";
const DEFAULT_LOG_FILE: &str = "health-tracker.log";
const DEFAULT_TYPING_DELAY_MS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
#[error("{variable} has an invalid value \"{value}\", expected {expected}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub log_file: PathBuf,
    pub intro: bool,
    pub typing_delay: Duration,
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env` if there is one
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("HEALTH_TRACKER_DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let log_file = lookup("HEALTH_TRACKER_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let intro = match lookup("HEALTH_TRACKER_INTRO") {
            Some(value) => parse_flag("HEALTH_TRACKER_INTRO", &value)?,
            None => true,
        };

        let typing_delay = match lookup("HEALTH_TRACKER_TYPING_DELAY_MS") {
            Some(value) => parse_number("HEALTH_TRACKER_TYPING_DELAY_MS", &value)?,
            None => DEFAULT_TYPING_DELAY_MS,
        };

        Ok(Self {
            database_url,
            log_file,
            intro,
            typing_delay: Duration::from_millis(typing_delay),
        })
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            variable,
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

fn parse_number<T: FromStr>(variable: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        variable,
        value: value.to_string(),
        expected: "a whole number",
    })
}
