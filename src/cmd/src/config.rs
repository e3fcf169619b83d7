use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use serde_derive::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub data: Data,
    pub log: Log,
}

impl TryFrom<Config> for common::config::Config {
    type Error = Error;

    fn try_from(cfg: Config) -> Result<Self> {
        if cfg.data.path.as_os_str().is_empty() {
            return Err(Error::BadRequest("data.path must not be empty".to_string()));
        }

        Ok(common::config::Config {
            data: common::config::Data {
                path: cfg.data.path,
            },
            log: common::config::Log {
                level: cfg.log.level.into(),
            },
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

fn load_from<S>(source: S) -> Result<common::config::Config>
where S: config::Source + Send + Sync + 'static {
    let cfg: Config = config::Config::builder()
        .set_default("data.path", "data")?
        .set_default("log.level", "info")?
        .add_source(source)
        .build()?
        .try_deserialize()?;

    cfg.try_into()
}

/// Loads the config file. Missing keys fall back to the defaults.
pub fn load(path: &Path) -> Result<common::config::Config> {
    load_from(config::File::from(path))
}

pub fn from_toml(s: &str) -> Result<common::config::Config> {
    load_from(config::File::from_str(s, config::FileFormat::Toml))
}
