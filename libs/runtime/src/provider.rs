use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;

/// Read access to the per-module configuration bag.
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// `ConfigProvider` backed by a loaded `AppConfig`.
#[derive(Debug, Clone)]
pub struct AppConfigProvider {
    config: AppConfig,
}

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.config
    }
}

impl ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.config.modules.get(module_name)
    }
}

/// Deserialize a module's section into `T`; an absent section yields `T::default()`.
pub fn module_config<T>(provider: &dyn ConfigProvider, module_name: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match provider.get_module_config(module_name) {
        Some(raw) => serde_json::from_value(raw.clone())
            .with_context(|| format!("invalid configuration for module '{module_name}'")),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[serde(default)]
        limit: u32,
    }

    #[test]
    fn absent_section_falls_back_to_default() {
        let provider = AppConfigProvider::new(AppConfig::default());
        let cfg: Sample = module_config(&provider, "missing").unwrap();
        assert_eq!(cfg, Sample::default());
    }

    #[test]
    fn present_section_is_deserialized() {
        let mut config = AppConfig::default();
        config
            .modules
            .insert("sample".into(), serde_json::json!({ "limit": 7 }));
        let provider = AppConfigProvider::new(config);
        let cfg: Sample = module_config(&provider, "sample").unwrap();
        assert_eq!(cfg.limit, 7);
    }

    #[test]
    fn malformed_section_names_the_module() {
        let mut config = AppConfig::default();
        config
            .modules
            .insert("sample".into(), serde_json::json!({ "bogus": true }));
        let provider = AppConfigProvider::new(config);
        let err = module_config::<Sample>(&provider, "sample").unwrap_err();
        assert!(err.to_string().contains("sample"));
    }
}
