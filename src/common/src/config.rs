use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data: Data,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: Data {
                path: PathBuf::from("data"),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}
