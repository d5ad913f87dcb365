//! Process-level plumbing shared by every Sunshine binary: layered
//! configuration, the per-module configuration bag, and logging setup.

pub mod config;
pub mod logging;
pub mod paths;
pub mod provider;

pub use config::{default_logging_config, AppConfig, AppSettings, CliArgs, LoggingConfig, Section};
pub use provider::{module_config, AppConfigProvider, ConfigProvider};
