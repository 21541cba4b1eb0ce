//! Core domain logic for Momentum.
//! This crate is the single source of truth for reminder and progression rules.

pub mod config;
pub mod db;
pub mod filter;
pub mod gamification;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use filter::{filter_reminders, FilterCounts, FilterMode, FilterModeParseError};
pub use gamification::{
    level, points_to_next_level, streak, Achievement, AchievementStatus, ProgressSummary,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::reminder::{
    Category, Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderValidationError,
};
pub use repo::state_repo::{PersistedState, StateRepository};
pub use service::reminder_service::{ReminderService, ServiceError, ServiceResult};
pub use storage::{
    InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
