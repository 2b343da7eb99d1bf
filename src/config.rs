use crate::infrastructure::yahoo;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Service configuration, loaded from the environment. The binaries load a
/// `.env` file first, so local overrides work without exporting anything.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub data_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("Failed to parse PORT")?;

        let model_path = env::var("MODEL_PATH")
            .unwrap_or_else(|_| "data/model/stock_dense_model.json".to_string())
            .into();

        let data_base_url =
            env::var("DATA_BASE_URL").unwrap_or_else(|_| yahoo::DEFAULT_BASE_URL.to_string());

        Ok(Self {
            host,
            port,
            model_path,
            data_base_url,
        })
    }
}
