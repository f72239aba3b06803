//! Configuration management for HashPDF

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::hashing::{HashOptions, DEFAULT_CHUNK_SIZE};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Page that receives verification links
    pub base_url: String,

    /// Slice size for chunked hashing
    pub chunk_size: usize,

    /// Optional per-file hashing deadline in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("HASHPDF_CHUNK_SIZE must be positive")]
    ZeroChunkSize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Read configuration from `HASHPDF_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            base_url: env::var("HASHPDF_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            chunk_size: parse_var("HASHPDF_CHUNK_SIZE")?.unwrap_or(DEFAULT_CHUNK_SIZE),
            timeout_secs: parse_var("HASHPDF_TIMEOUT_SECS")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Hashing options derived from this configuration
    pub fn hash_options(&self) -> HashOptions {
        let options = HashOptions::default().with_chunk_size(self.chunk_size);
        match self.timeout() {
            Some(timeout) => options.with_timeout(timeout),
            None => options,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}
