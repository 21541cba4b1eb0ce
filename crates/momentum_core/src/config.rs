//! Application constants and default locations.

use std::path::PathBuf;

/// Storage key for the serialized reminder collection.
pub const REMINDERS_KEY: &str = "momentum-reminders";

/// Storage key for the total points mirror.
pub const POINTS_KEY: &str = "momentum-points";

/// Storage key for the dark-mode preference.
pub const DARK_MODE_KEY: &str = "momentum-dark-mode";

/// Points awarded for each completed reminder.
pub const POINTS_PER_COMPLETION: u64 = 10;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: u64 = 100;

/// Number of entries in the recent-activity feed.
pub const RECENT_COMPLETIONS_LIMIT: usize = 5;

/// File name of the state database inside the data directory.
pub const DB_FILE_NAME: &str = "momentum.sqlite3";

/// Sub-directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "Momentum";

/// Environment variable read by the CLI for the log level.
pub const LOG_LEVEL_ENV: &str = "MOMENTUM_LOG";

/// Platform-local data directory for Momentum, if the platform has one.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Path of the state database inside `data_dir`.
pub fn db_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

/// Log directory inside `data_dir`.
pub fn log_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}
