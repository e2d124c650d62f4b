use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use crate::constants::{DEFAULT_GAUGE_MAX, DEFAULT_GAUGE_MIN, SAMPLE_DATASET};
use crate::error::{Error, Result};
use crate::models::SampleRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Internal error detail is only exposed to callers in development.
    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("Invalid VO2_ENV value: {}", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub dataset_path: Option<PathBuf>,
    pub gauge_min: f64,
    pub gauge_max: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50001,
            environment: Environment::Production,
            dataset_path: None,
            gauge_min: DEFAULT_GAUGE_MIN,
            gauge_max: DEFAULT_GAUGE_MAX,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("VO2_HOST").unwrap_or(defaults.host),
            port: match env::var("VO2_PORT") {
                Ok(port) => port
                    .parse()
                    .map_err(|_| Error::Config("Invalid VO2_PORT format".to_string()))?,
                Err(_) => defaults.port,
            },
            environment: match env::var("VO2_ENV") {
                Ok(environment) => environment.parse()?,
                Err(_) => defaults.environment,
            },
            dataset_path: env::var("VO2_DATASET_PATH").ok().map(PathBuf::from),
            gauge_min: env::var("VO2_GAUGE_MIN")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.gauge_min),
            gauge_max: env::var("VO2_GAUGE_MAX")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.gauge_max),
        })
    }

    /// The configured JSON dataset, or the built-in sample when none is set.
    pub fn load_dataset(&self) -> Result<Vec<SampleRow>> {
        match &self.dataset_path {
            Some(path) => {
                let rows = load_dataset_file(path)?;
                info!("Loaded {} sample rows from {:?}", rows.len(), path);
                Ok(rows)
            }
            None => Ok(SAMPLE_DATASET.clone()),
        }
    }
}

pub fn load_dataset_file(path: &Path) -> Result<Vec<SampleRow>> {
    let contents = std::fs::read_to_string(path)?;
    let rows: Vec<SampleRow> = serde_json::from_str(&contents)?;
    Ok(rows)
}
