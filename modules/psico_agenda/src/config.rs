use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::dashboard::{DashboardConfig, StalePolicy};
use crate::domain::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::domain::view::DEFAULT_UPCOMING_LIMIT;

/// Configuration for the psico_agenda module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PsicoAgendaConfig {
    #[serde(default = "default_refresh_interval", with = "humantime_serde")]
    pub refresh_interval: Duration,
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
    #[serde(default)]
    pub stale_policy: StalePolicy,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    #[serde(default)]
    pub api: MockApiConfig,
}

/// Settings of the in-memory scheduling API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockApiConfig {
    #[serde(default, with = "humantime_serde")]
    pub latency: Duration,
    /// YAML/JSON fixture; relative paths resolve against the app home_dir.
    #[serde(default)]
    pub seed_file: Option<String>,
    /// Use the built-in demo data when no seed file is given.
    #[serde(default = "default_demo_seed")]
    pub demo_seed: bool,
}

impl Default for PsicoAgendaConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            upcoming_limit: default_upcoming_limit(),
            stale_policy: StalePolicy::default(),
            event_capacity: default_event_capacity(),
            api: MockApiConfig::default(),
        }
    }
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            seed_file: None,
            demo_seed: default_demo_seed(),
        }
    }
}

impl PsicoAgendaConfig {
    pub fn dashboard(&self) -> DashboardConfig {
        DashboardConfig {
            upcoming_limit: self.upcoming_limit,
            stale_policy: self.stale_policy,
        }
    }
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

fn default_event_capacity() -> usize {
    64
}

fn default_demo_seed() -> bool {
    true
}
