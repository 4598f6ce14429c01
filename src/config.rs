use std::path::PathBuf;

pub const DEFAULT_SEASON_FILE: &str = "data/season_overview.xlsx";
pub const DEFAULT_MATCH_FOLDER: &str = "data/match_logs/";
pub const DEFAULT_EXPORT_PATH: &str = "ratings_export.xlsx";

const APP_DIR: &str = "scout_ratings";
const LOG_FILE: &str = "scout_ratings.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub season_file: PathBuf,
    pub match_folder: PathBuf,
    pub log_level: String,
    /// `None` when no cache directory can be resolved; logging then goes nowhere in the UI.
    pub log_file: Option<PathBuf>,
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let cache_dir = non_empty("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".cache")));

        Self {
            season_file: non_empty("SEASON_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SEASON_FILE)),
            match_folder: non_empty("MATCH_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MATCH_FOLDER)),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: non_empty("LOG_FILE")
                .map(PathBuf::from)
                .or_else(|| cache_dir.map(|dir| dir.join(APP_DIR).join(LOG_FILE))),
            export_path: non_empty("EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
        }
    }

    /// Applies `--season=`, `--matches=`, `--export=` overrides (either `--key=value` or `--key value`).
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = arg_value(args, "--season") {
            self.season_file = PathBuf::from(path);
        }
        if let Some(path) = arg_value(args, "--matches") {
            self.match_folder = PathBuf::from(path);
        }
        if let Some(path) = arg_value(args, "--export") {
            self.export_path = PathBuf::from(path);
        }
        self
    }
}

pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}
