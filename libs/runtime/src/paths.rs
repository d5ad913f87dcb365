use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Platform base directory for per-user application data.
/// Windows: `%APPDATA%`, everything else: `$HOME`.
fn platform_base_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

/// Expand a leading `~` against the platform base directory.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_base_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve the application home directory.
///
/// - `None` => `<platform base>/<default_subdir>`
/// - `~/x` => `<platform base>/x`
/// - relative paths are made absolute against the current working directory
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base_dir()?.join(default_subdir),
    };

    let path = if path.is_absolute() {
        path
    } else {
        env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        ensure_dir(&path)?;
    }
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("cannot create directory '{}'", path.display()))
}
