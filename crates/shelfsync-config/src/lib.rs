pub mod config;
pub mod paths;

pub use config::{
    CatalogAuth, CatalogConfig, Config, SyncMode, SyncOptions, TrackerConfig,
};
pub use paths::PathManager;
