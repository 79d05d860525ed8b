use derive_more::Display;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display(fmt = "{} must be set", _0)]
    Missing(&'static str),
    #[display(fmt = "{} has an invalid value: {}", name, value)]
    Invalid { name: &'static str, value: String },
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the HR backend, e.g. `https://hr.example.com`
    pub api_base_url: String,
    pub api_timeout_secs: u64,

    // Local state
    pub session_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("API_BASE_URL"))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            // default 10 sec
            api_timeout_secs: parse_var("API_TIMEOUT_SECS", "10")?,
            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| ".hrm-session.json".to_string())
                .into(),
            log_dir: env::var("LOG_DIR")
                .unwrap_or_else(|_| "logs".to_string())
                .into(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_value(name, &raw)
}

fn parse_value<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_values() {
        let secs: u64 = parse_value("API_TIMEOUT_SECS", " 30 ").unwrap();
        assert_eq!(secs, 30);
    }

    #[test]
    fn rejects_garbage_with_the_variable_name() {
        let err = parse_value::<u64>("API_TIMEOUT_SECS", "ten").unwrap_err();
        assert_eq!(err.to_string(), "API_TIMEOUT_SECS has an invalid value: ten");
    }
}
