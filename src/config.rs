use std::path::PathBuf;
use std::time::Duration;

const CACHE_DIR: &str = "squad_compare";
const DB_FILE: &str = "squad_compare.sqlite";
const LOG_FILE: &str = "squad_compare.log";

const DEFAULT_BUSY_MS: u64 = 5_000;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub busy_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env.local` / `.env`, then reads `SQUAD_COMPARE_*` variables.
    /// A `--db` argument wins over the environment.
    pub fn load() -> Option<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let db_path = db_path_from_args(std::env::args().skip(1))
            .or_else(|| env_path("SQUAD_COMPARE_DB"))
            .or_else(default_db_path)?;
        let log_filter = std::env::var("SQUAD_COMPARE_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_file = env_path("SQUAD_COMPARE_LOG_FILE")
            .or_else(|| app_cache_dir().map(|dir| dir.join(LOG_FILE)));
        let busy_ms = std::env::var("SQUAD_COMPARE_BUSY_MS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_BUSY_MS)
            .clamp(100, 60_000);

        Some(Self {
            db_path,
            log_filter,
            log_file,
            busy_timeout: Duration::from_millis(busy_ms),
        })
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

/// Accepts `--db <path>` and `--db=<path>`.
pub fn db_path_from_args<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let args = args.into_iter().collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--db=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--db" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
