/// Runtime settings for an embedding process. Everything the engine reads
/// from the environment is funneled through here; `Database` and
/// `logging::init_tracing` consume it rather than probing env vars
/// themselves.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = flag_enabled(std::env::var("ELEARN_FILE_LOGS").ok().as_deref());

        let log_dir =
            std::env::var("ELEARN_LOG_DIR").unwrap_or_else(|_| "./logs".to_string());

        Self {
            database_url,
            log_level,
            file_logs,
            log_dir,
        }
    }
}

fn flag_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some("1"))
}
