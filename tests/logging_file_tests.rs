use tempfile::TempDir;

use elearn_engine::config::Config;
use elearn_engine::logging;

// In its own binary: installing the global subscriber is once-per-process.
#[test]
fn file_logging_writes_into_the_configured_directory() {
    let dir = TempDir::new().expect("temp dir");
    let config = Config {
        database_url: None,
        log_level: "info".to_string(),
        file_logs: true,
        log_dir: dir.path().display().to_string(),
    };

    let guard = logging::init_tracing(&config);
    assert!(guard.is_some());

    tracing::info!("engine log line");
    // Dropping the guard flushes the non-blocking writer.
    drop(guard);

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read log dir")
        .collect::<Result<_, _>>()
        .expect("dir entries");
    assert!(!entries.is_empty());
}
