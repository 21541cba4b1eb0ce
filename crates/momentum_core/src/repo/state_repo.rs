//! State repository over a `KeyValueStore`.
//!
//! # Invariants
//! - Each persisted value lives under its own key and is written independently.
//! - Reminder elements that fail to decode or validate are dropped one by one;
//!   the rest of the collection survives.
//! - Duplicate ids keep their first occurrence only.
//! - A malformed `dueTime` is cleared instead of dropping its record.

use crate::config::{DARK_MODE_KEY, POINTS_KEY, REMINDERS_KEY};
use crate::model::reminder::{Reminder, ReminderValidationError};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Everything read at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub reminders: Vec<Reminder>,
    /// `None` when the key is absent or unreadable.
    pub points: Option<u64>,
    pub dark_mode: bool,
}

/// Typed JSON persistence for reminders, points and preferences.
pub struct StateRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StateRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying key-value port.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads all persisted values.
    pub fn load_all(&self) -> StorageResult<PersistedState> {
        let state = PersistedState {
            reminders: self.load_reminders()?,
            points: self.load_points()?,
            dark_mode: self.load_dark_mode()?,
        };
        info!(
            "event=state_load module=repo status=ok reminders={} points_present={} dark_mode={}",
            state.reminders.len(),
            state.points.is_some(),
            state.dark_mode
        );
        Ok(state)
    }

    pub fn load_reminders(&self) -> StorageResult<Vec<Reminder>> {
        Ok(self
            .store
            .get(REMINDERS_KEY)?
            .map(|raw| decode_reminders(&raw))
            .unwrap_or_default())
    }

    pub fn load_points(&self) -> StorageResult<Option<u64>> {
        Ok(self
            .store
            .get(POINTS_KEY)?
            .and_then(|raw| decode_scalar::<u64>(POINTS_KEY, &raw)))
    }

    pub fn load_dark_mode(&self) -> StorageResult<bool> {
        Ok(self
            .store
            .get(DARK_MODE_KEY)?
            .and_then(|raw| decode_scalar::<bool>(DARK_MODE_KEY, &raw))
            .unwrap_or(false))
    }

    /// Writes the full collection; no diffing.
    pub fn save_reminders(&self, reminders: &[Reminder]) -> StorageResult<()> {
        let encoded = serde_json::to_string(reminders)
            .map_err(|err| StorageError::WriteRejected(format!("{REMINDERS_KEY}: {err}")))?;
        self.store.set(REMINDERS_KEY, &encoded)
    }

    pub fn save_points(&self, points: u64) -> StorageResult<()> {
        self.store.set(POINTS_KEY, &points.to_string())
    }

    pub fn save_dark_mode(&self, enabled: bool) -> StorageResult<()> {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }
}

fn decode_scalar<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str::<T>(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("event=state_decode module=repo status=fallback key={key} error={err}");
            None
        }
    }
}

/// Decodes a stored reminder array, skipping unusable elements.
pub fn decode_reminders(raw: &str) -> Vec<Reminder> {
    let elements = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(elements)) => elements,
        Ok(_) => {
            warn!("event=state_decode module=repo status=fallback key={REMINDERS_KEY} error=not_an_array");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=state_decode module=repo status=fallback key={REMINDERS_KEY} error={err}");
            return Vec::new();
        }
    };

    let total = elements.len();
    let mut seen = HashSet::with_capacity(total);
    let reminders: Vec<Reminder> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value::<Reminder>(element).ok())
        .filter_map(repair_or_drop)
        .filter(|reminder| seen.insert(reminder.id))
        .collect();

    let skipped = total - reminders.len();
    if skipped > 0 {
        warn!(
            "event=state_decode module=repo status=degraded key={REMINDERS_KEY} kept={} skipped={skipped}",
            reminders.len()
        );
    }
    reminders
}

fn repair_or_drop(mut reminder: Reminder) -> Option<Reminder> {
    match reminder.validate() {
        Ok(()) => Some(reminder),
        Err(ReminderValidationError::InvalidDueTime(_)) => {
            reminder.due_time = None;
            warn!(
                "event=state_decode module=repo status=degraded key={REMINDERS_KEY} id={} reason=invalid_due_time",
                reminder.id
            );
            reminder.validate().is_ok().then_some(reminder)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    const VALID: &str = r#"{"id":"6f1c1c55-8d1a-4a59-9d1f-0d7f5b3d6a01","title":"Water plants","category":"Personal","completed":false,"createdAt":"2024-06-01T08:00:00Z"}"#;

    #[test]
    fn missing_keys_load_defaults() {
        let repo = StateRepository::new(InMemoryKeyValueStore::new());
        assert_eq!(repo.load_all().unwrap(), PersistedState::default());
    }

    #[test]
    fn non_array_reminders_fall_back_to_empty() {
        assert!(decode_reminders(r#"{"id":1}"#).is_empty());
        assert!(decode_reminders("not json").is_empty());
    }

    #[test]
    fn bad_elements_and_duplicate_ids_are_dropped() {
        let raw = format!(r#"[{VALID}, {{"title":"no id"}}, {VALID}, 42]"#);
        let reminders = decode_reminders(&raw);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].title, "Water plants");
    }

    #[test]
    fn blank_title_elements_are_dropped() {
        let raw = VALID.replace("Water plants", "  ");
        assert!(decode_reminders(&format!("[{raw}]")).is_empty());
    }

    #[test]
    fn unpadded_due_time_is_cleared_but_record_kept() {
        let raw = VALID.replace(
            r#""completed":false"#,
            r#""dueDate":"2024-06-05","dueTime":"9:05","completed":false"#,
        );
        let reminders = decode_reminders(&format!("[{raw}]"));
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].title, "Water plants");
        assert_eq!(reminders[0].due_time, None);
        assert_eq!(reminders[0].due_date.unwrap().to_string(), "2024-06-05");
    }

    #[test]
    fn bad_due_time_with_blank_title_is_still_dropped() {
        let raw = VALID
            .replace("Water plants", " ")
            .replace(r#""completed":false"#, r#""dueTime":"25:00","completed":false"#);
        assert!(decode_reminders(&format!("[{raw}]")).is_empty());
    }

    #[test]
    fn corrupt_scalars_fall_back() {
        let store = InMemoryKeyValueStore::with_entries([
            (POINTS_KEY, "-5"),
            (DARK_MODE_KEY, "\"yes\""),
        ]);
        let repo = StateRepository::new(store);
        assert_eq!(repo.load_points().unwrap(), None);
        assert!(!repo.load_dark_mode().unwrap());
    }

    #[test]
    fn scalars_round_trip() {
        let repo = StateRepository::new(InMemoryKeyValueStore::new());
        repo.save_points(240).unwrap();
        repo.save_dark_mode(true).unwrap();
        assert_eq!(repo.load_points().unwrap(), Some(240));
        assert!(repo.load_dark_mode().unwrap());
    }
}
