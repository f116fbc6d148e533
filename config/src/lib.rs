use std::fs::File;

use anyhow::{Context, Result};
use serde::Deserialize;

use self::{api::ApiConfig, app::AppConfig, db::DbConfig, log::LogConfig, upload::UploadConfig};

pub mod api;
pub mod app;
pub mod db;
pub mod log;
pub mod upload;

#[derive(Deserialize)]
pub struct Config {
    app: AppConfig,
    log: LogConfig,
    db: DbConfig,
    upload: UploadConfig,
    api: ApiConfig,
}

impl Config {
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn db(&self) -> &DbConfig {
        &self.db
    }

    pub fn upload(&self) -> &UploadConfig {
        &self.upload
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open config file {path}"))?;
    serde_yaml::from_reader(file).with_context(|| format!("Failed to parse config file {path}"))
}

pub fn from_str(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(yaml)?)
}
