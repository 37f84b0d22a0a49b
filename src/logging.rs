//! Tracing subscriber setup.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;

/// Log file name prefix; the appender adds the date.
const LOG_FILE_PREFIX: &str = "warehouse-scan.log";

/// Directory for rolling log files, if the platform has one.
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "Warehouse", "warehouse-scan").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Build the filter: `RUST_LOG` wins, the config level is the default.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(
            config
                .level
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
        .from_env_lossy()
}

/// Initialize logging to stderr and, when enabled, a daily log file.
///
/// The returned guard must be kept alive to flush the file writer.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir().filter(|_| config.file_enabled) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir().filter(|_| config.file_enabled) {
        tracing::info!("Log directory: {:?}", dir);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_config_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let config = LogConfig {
                level: level.to_string(),
                file_enabled: false,
            };
            let filter = env_filter(&config);
            assert!(!filter.to_string().is_empty());
        }
    }
}
