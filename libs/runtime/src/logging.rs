use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_MAX_SIZE_MB: u64 = 100;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `prefix` itself or one of its submodules.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

type CatchAllFilter = FilterFn<Box<dyn Fn(&Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Filter for the "default" section: everything not claimed by an explicit subsystem.
fn catch_all_filter(claimed: &[String], max_level: Level) -> CatchAllFilter {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &Metadata<'_>| {
        !claimed.iter().any(|p| matches_target_prefix(meta.target(), p))
            && meta.level() <= &max_level
    }))
}

// -------- rotating file sinks --------

type SharedRotate = Arc<Mutex<FileRotate<AppendTimestamp>>>;

struct SinkHandle(Option<SharedRotate>);

impl Write for SinkHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(rot) => rot.lock().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(rot) => rot.lock().flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to the file of the subsystem that owns its target,
/// falling back to the default file. Records with no destination are dropped.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<SharedRotate>,
    by_prefix: HashMap<String, SharedRotate>,
}

impl FileRouter {
    fn resolve(&self, target: &str) -> Option<SharedRotate> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = SinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SinkHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SinkHandle(self.resolve(meta.target()))
    }
}

/// Relative paths are resolved against `base_dir` (the app home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(
    log_path: &Path,
    section: &Section,
) -> Result<SharedRotate, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let limit = match section.max_backups {
        Some(n) => FileLimit::MaxFiles(n),
        None => FileLimit::Age(chrono::Duration::days(1)),
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(Arc::new(Mutex::new(rot)))
}

fn sink_for(name: &str, section: &Section, base_dir: &Path) -> Option<SharedRotate> {
    if section.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&section.file, base_dir);
    match open_rotating_file(&log_path, section) {
        Ok(sink) => Some(sink),
        Err(e) => {
            eprintln!(
                "failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber from `cfg`.
///
/// `base_dir` resolves relative log file paths (normally `app.home_dir`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let ansi = atty::is(atty::Stream::Stdout);
    let default_section = cfg.get("default");
    let subsystems: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != "default").collect();
    let claimed: Vec<String> = subsystems.iter().map(|(k, _)| (*k).clone()).collect();

    let mut router = FileRouter {
        default: default_section.and_then(|s| sink_for("default", s, base_dir)),
        ..Default::default()
    };
    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    let mut file_targets = Targets::new().with_default(LevelFilter::OFF);

    for (name, section) in &subsystems {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            console_targets = console_targets.with_target(name.as_str(), LevelFilter::from_level(level));
        }
        if let Some(sink) = sink_for(name, section, base_dir) {
            router.by_prefix.insert((*name).clone(), sink);
            if let Some(level) = parse_tracing_level(&section.file_level) {
                file_targets = file_targets.with_target(name.as_str(), LevelFilter::from_level(level));
            }
        }
    }

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets)
        .boxed()];

    if !router.by_prefix.is_empty() {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(file_targets)
                .boxed(),
        );
    }

    if let Some(section) = default_section {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_filter(catch_all_filter(&claimed, level))
                    .boxed(),
            );
        }
        if router.default.is_some() {
            if let Some(level) = parse_tracing_level(&section.file_level) {
                layers.push(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_writer(router.clone())
                        .with_filter(catch_all_filter(&claimed, level))
                        .boxed(),
                );
            }
        }
    }

    if router.is_empty() {
        tracing::trace!("no log files configured, console only");
    }
    layers
}
