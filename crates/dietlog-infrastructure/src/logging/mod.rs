//! Logging setup
//!
//! Two sinks:
//! - one-line JSON to a daily rolling file (always)
//! - human readable stderr (debug builds only)
//!
//! `log` records from dependencies are forwarded into `tracing`.

use log::LevelFilter;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Initialize file + stderr logging. Safe to call more than once.
pub fn init_logger(log_dir: PathBuf) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(&log_dir)?;
    let _ = LOG_DIR.set(log_dir.clone());

    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(&log_dir, "dietlog.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    if let Ok(mut slot) = FILE_GUARD.lock() {
        *slot = Some(guard);
    }

    let json_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(JsonFormatter::new())
        .with_filter(default_filter());

    let console_layer = if cfg!(debug_assertions) {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                ))
                .with_filter(default_filter()),
        )
    } else {
        None
    };

    let subscriber = Registry::default().with(json_layer).with(console_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = LOGGER_READY.set(());

    tracing::info!(
        target: "dietlog::logging",
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "Debug" } else { "Release" },
        "Logger initialized"
    );

    Ok(())
}

/// Console-only fallback when the log directory is unusable
pub fn init_console_logger() {
    if LOGGER_READY.get().is_some() {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();

    let _ = LOGGER_READY.set(());
}

/// `RUST_LOG` wins; otherwise debug builds log more of our own crates
fn default_filter() -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        "info,dietlog=debug,dietlog_lib=debug,dietlog_infrastructure=debug"
    } else {
        "info"
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Flush buffered file events. Later events only reach the console layer.
pub fn shutdown_logger() {
    let guard = match FILE_GUARD.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    drop(guard);
}

pub fn get_log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// One-line JSON event format
struct JsonFormatter {
    pid: u32,
}

impl JsonFormatter {
    fn new() -> Self {
        Self {
            pid: std::process::id(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        let mut visitor = JsonVisitor::new();
        event.record(&mut visitor);

        let mut json = serde_json::json!({
            "timestamp": chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            "level": metadata.level().to_string(),
            "pid": self.pid,
            "tid": format!("{:?}", std::thread::current().id()),
            "target": metadata.target(),
            "version": env!("CARGO_PKG_VERSION"),
        });

        if let Some(file) = metadata.file() {
            json["file"] = serde_json::json!(file);
        }
        if let Some(line) = metadata.line() {
            json["line"] = serde_json::json!(line);
        }
        if let Some(message) = visitor.fields.remove("message") {
            json["message"] = message;
        }
        if !visitor.fields.is_empty() {
            json["fields"] = serde_json::Value::Object(visitor.fields);
        }

        writeln!(
            writer,
            "{}",
            serde_json::to_string(&json).unwrap_or_default()
        )
    }
}

/// Collects event fields into a JSON map
struct JsonVisitor {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonVisitor {
    fn new() -> Self {
        Self {
            fields: serde_json::Map::new(),
        }
    }
}

impl tracing::field::Visit for JsonVisitor {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_builds() {
        let filter = default_filter();
        assert!(!filter.to_string().is_empty());
    }

    // Single test: the global subscriber can only be installed once per process.
    #[test]
    fn test_init_logger_is_idempotent_and_flushes_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        init_logger(log_dir.clone()).unwrap();
        init_logger(log_dir.clone()).unwrap();

        assert!(log_dir.is_dir());
        assert_eq!(get_log_dir(), Some(log_dir.clone()));

        tracing::error!(target: "dietlog::logging", code = 4002, "last event before exit");
        shutdown_logger();
        shutdown_logger();

        let written: String = std::fs::read_dir(&log_dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| std::fs::read_to_string(entry.path()).ok())
            .collect();

        let line = written
            .lines()
            .find(|line| line.contains("last event before exit"))
            .expect("event flushed to the log file");
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["code"], 4002);
    }
}
