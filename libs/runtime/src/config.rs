use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::resolve_home_dir;

/// Environment prefix for overrides, e.g. `SUNSHINE__APP__HOME_DIR=/srv/sunshine`.
pub const ENV_PREFIX: &str = "SUNSHINE__";

/// Top-level configuration: a typed `app` section, logging, and a free-form
/// per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub app: AppSettings,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppSettings {
    /// Normalized to an absolute path on load. Empty means platform default.
    #[serde(default)]
    pub home_dir: String,
    /// Display name used in greetings and log lines.
    #[serde(default = "default_app_name")]
    pub name: String,
}

/// Logging configuration: subsystem name → settings.
/// Key "default" is the catch-all for targets without an explicit section.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/sunshine.log", empty disables the file sink
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_app_name() -> String {
    "Sunshine".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            name: default_app_name(),
        }
    }
}

pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/sunshine.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Layered loading: defaults → YAML file → `SUNSHINE__*` environment.
    /// Normalizes `app.home_dir` and merges `modules_dir` files into the bag.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        // Optional sections stay None unless the file or env provide them.
        let base = AppConfig {
            app: AppSettings::default(),
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("failed to parse yaml config '{}'", path.display()))?;

        normalize_home_dir_inplace(&mut config.app).context("failed to resolve app.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load from file when given, otherwise use defaults. `home_dir` is normalized either way.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.app)
                    .context("failed to resolve app.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }

    /// `-v` raises the default console level to debug, `-vv` and above to trace.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            match args.verbose {
                0 => {}
                1 => default_section.console_level = "debug".to_string(),
                _ => default_section.console_level = "trace".to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub verbose: u8,
}

const DEFAULT_SUBDIR: &str = ".sunshine";

fn normalize_home_dir_inplace(app: &mut AppSettings) -> Result<()> {
    let configured = if app.home_dir.trim().is_empty() {
        None
    } else {
        Some(app.home_dir.clone())
    };

    let resolved: PathBuf = resolve_home_dir(configured, DEFAULT_SUBDIR, true)?;
    app.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("cannot read module config '{}'", path.display()))?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid yaml in '{}'", path.display()))?;
        bag.insert(name, serde_json::to_value(val)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        assert_eq!(config.app.home_dir, "");
        assert_eq!(config.app.name, "Sunshine");

        let logging = config.logging.as_ref().unwrap();
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "info");
        assert_eq!(default_section.file, "logs/sunshine.log");

        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_load_layered_parses_sections_and_normalizes_home_dir() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("home");
        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            r#"
app:
  home_dir: "{}"
  name: "Consultorio"

logging:
  default:
    console_level: debug
    file: "logs/default.log"

modules:
  psico_agenda:
    refresh_interval: "2s"
"#,
            home.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(is_normalized_path(&config.app.home_dir));
        assert!(home.is_dir(), "home_dir must be created on load");
        assert_eq!(config.app.name, "Consultorio");

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file, "logs/default.log");

        assert_eq!(config.modules["psico_agenda"]["refresh_interval"], "2s");
    }

    #[test]
    fn test_minimal_yaml_leaves_optional_sections_empty() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            "app:\n  home_dir: \"{}\"\n",
            tmp.path().join("h").to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert!(config.logging.is_none());
        assert!(config.modules.is_empty());
        assert_eq!(config.app.name, "Sunshine");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load_layered("/nonexistent/sunshine.yaml").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        fs::write(&cfg_path, "app:\n  home_dir: \"\"\nserver:\n  port: 1\n").unwrap();
        assert!(AppConfig::load_layered(&cfg_path).is_err());
    }

    #[test]
    fn test_cli_verbose_levels_matrix() {
        for (verbose, expected) in [(0, "info"), (1, "debug"), (2, "trace"), (3, "trace")] {
            let mut config = AppConfig::default();
            let args = CliArgs { verbose };
            config.apply_cli_overrides(&args);
            let logging = config.logging.as_ref().unwrap();
            assert_eq!(logging["default"].console_level, expected);
        }
    }

    #[test]
    fn test_cli_overrides_create_logging_when_absent() {
        let mut config = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        config.apply_cli_overrides(&CliArgs { verbose: 1 });
        assert_eq!(
            config.logging.as_ref().unwrap()["default"].console_level,
            "debug"
        );
    }

    #[test]
    fn test_modules_dir_files_are_merged() {
        let tmp = tempdir().unwrap();
        let modules_dir = tmp.path().join("modules");
        fs::create_dir_all(&modules_dir).unwrap();
        fs::write(
            modules_dir.join("psico_agenda.yaml"),
            "upcoming_limit: 3\nstale_policy: discard_stale\n",
        )
        .unwrap();
        fs::write(modules_dir.join("notes.txt"), "ignored").unwrap();

        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            r#"
app:
  home_dir: "{}"
modules_dir: "{}"
modules:
  other:
    key: "value"
"#,
            tmp.path().join("h").to_string_lossy().replace('\\', "/"),
            modules_dir.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();
        assert!(config.modules.contains_key("other"));
        assert_eq!(config.modules["psico_agenda"]["upcoming_limit"], 3);
        assert_eq!(config.modules["psico_agenda"]["stale_policy"], "discard_stale");
        assert!(!config.modules.contains_key("notes"));
    }

    #[test]
    fn test_to_yaml_roundtrip_basic() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("app:"));
        assert!(yaml.contains("logging:"));

        let roundtrip: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(roundtrip.app.name, config.app.name);
    }
}
