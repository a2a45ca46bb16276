use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the non-blocking file writer alive; dropping it flushes and stops
/// the background writer thread.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber from `Config`: stdout always, plus a
/// daily-rolling file layer under `config.log_dir` when `config.file_logs`
/// is set. Returns the guard for the file writer, `None` when logging goes
/// to stdout only.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    if config.file_logs {
        match file_writer(&config.log_dir) {
            Ok((file_writer, guard)) => {
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);
                registry.with(file_layer).init();
                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => {
                eprintln!(
                    "failed to prepare log directory {}: {err}",
                    config.log_dir
                );
            }
        }
    }

    registry.init();
    None
}

fn file_writer(
    log_dir: &str,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "elearn-engine.log");
    Ok(tracing_appender::non_blocking(appender))
}
