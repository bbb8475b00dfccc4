use std::path::Path;
use std::sync::{Once, OnceLock};

use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn env_filter(base_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e))
}

/// Installs the global subscriber: console output, plus a daily rolling file
/// under `log_dir` when one is given. `RUST_LOG` overrides `base_level`.
pub fn setup_logging(base_level: &str, log_dir: Option<&Path>) {
    let (subscriber, guard) = build_subscriber(base_level, log_dir);
    if let Some(guard) = guard {
        LOG_GUARD.set(guard).expect("Logging already initialized");
    }
    subscriber
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

/// The subscriber installed by [`setup_logging`]. File output is flushed when
/// the returned guard is dropped.
fn build_subscriber(
    base_level: &str,
    log_dir: Option<&Path>,
) -> (impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>) {
    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let mut guard = None;
    let file_layer = log_dir.map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create logs directory: {}", e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("recognition")
            .filename_suffix("log")
            .max_log_files(5)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
            .boxed()
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(base_level))
        .with(console_layer)
        .with(file_layer);

    (subscriber, guard)
}

/// Routes log output through the libtest capture. Safe to call from every test.
pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter("debug"))
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_layer_writes_to_log_dir() {
        let dir = std::env::temp_dir().join(format!("recognition_logs_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let (subscriber, guard) = build_subscriber("info", Some(&dir));
        assert!(guard.is_some());
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("written to the log file");
        });
        drop(guard);

        let contents: String = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("recognition"))
            })
            .map(|path| std::fs::read_to_string(path).unwrap())
            .collect();
        let _ = std::fs::remove_dir_all(&dir);

        assert!(contents.contains("written to the log file"));
    }

    #[test]
    fn test_console_only_has_no_guard() {
        let (_subscriber, guard) = build_subscriber("warn", None);
        assert!(guard.is_none());
    }
}
