//! Reminder store use-case service.
//!
//! # Responsibility
//! - Own the single in-memory snapshot of reminders, points and preferences.
//! - Persist the affected keys after every mutation.
//!
//! # Invariants
//! - Mutations build the next snapshot, persist the reminders key, and only
//!   then swap it in memory. A failed reminders write leaves the snapshot
//!   untouched.
//! - The points key is a mirror; a failed mirror write is logged and
//!   repaired by the next `load`.
//! - Unknown ids are no-ops and write nothing.
//! - `points` always equals `gamification::points_for(reminders)`.

use crate::filter::{filter_reminders, FilterCounts, FilterMode};
use crate::gamification::{self, ProgressSummary};
use crate::model::reminder::{
    Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderValidationError,
};
use crate::repo::state_repo::StateRepository;
use crate::storage::{KeyValueStore, StorageError};
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for reminder use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input refused before any mutation.
    Validation(ReminderValidationError),
    /// Persistence failed; in-memory state was not changed.
    Storage(StorageError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ReminderValidationError> for ServiceError {
    fn from(value: ReminderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Application-state controller over an injected key-value store.
pub struct ReminderService<S: KeyValueStore> {
    repo: StateRepository<S>,
    reminders: Vec<Reminder>,
    points: u64,
    dark_mode: bool,
}

impl<S: KeyValueStore> ReminderService<S> {
    /// Reads all persisted state and reconciles the points mirror.
    ///
    /// Absent or corrupt values start from defaults. When the stored points
    /// disagree with the collection, the derived value wins and is written back.
    pub fn load(store: S) -> ServiceResult<Self> {
        let repo = StateRepository::new(store);
        let state = repo.load_all()?;
        let derived = gamification::points_for(&state.reminders);

        if state.points != Some(derived) {
            match state.points {
                Some(stored) => warn!(
                    "event=points_reconcile module=service status=drift stored={stored} derived={derived}"
                ),
                None => info!(
                    "event=points_reconcile module=service status=initialized derived={derived}"
                ),
            }
            repo.save_points(derived)?;
        }

        Ok(Self {
            repo,
            reminders: state.reminders,
            points: derived,
            dark_mode: state.dark_mode,
        })
    }

    /// Reminders in store order (most recently added first).
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|reminder| reminder.id == id)
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Underlying key-value port.
    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// Creates a reminder and inserts it at the front.
    pub fn add(&mut self, draft: ReminderDraft) -> ServiceResult<Reminder> {
        let reminder = Reminder::from_draft(draft, Utc::now()).inspect_err(|err| {
            info!("event=reminder_add module=service status=rejected reason={err}");
        })?;

        let mut next = Vec::with_capacity(self.reminders.len() + 1);
        next.push(reminder.clone());
        next.extend(self.reminders.iter().cloned());

        self.commit("reminder_add", next)?;
        info!(
            "event=reminder_add module=service status=ok id={} category={}",
            reminder.id, reminder.category
        );
        Ok(reminder)
    }

    /// Flips completion for `id`. Returns the updated record, or `None` when unknown.
    pub fn toggle_complete(&mut self, id: ReminderId) -> ServiceResult<Option<Reminder>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut next = self.reminders.clone();
        next[index].toggle_completed(Utc::now());
        let updated = next[index].clone();
        debug_assert_eq!(
            gamification::points_for(&next),
            gamification::adjust_points(self.points, updated.completed)
        );

        self.commit("reminder_toggle", next)?;
        info!(
            "event=reminder_toggle module=service status=ok id={id} completed={} points={}",
            updated.completed, self.points
        );
        Ok(Some(updated))
    }

    /// Removes `id`. Returns `false` when no reminder matched.
    pub fn delete(&mut self, id: ReminderId) -> ServiceResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let mut next = self.reminders.clone();
        next.remove(index);

        self.commit("reminder_delete", next)?;
        info!("event=reminder_delete module=service status=ok id={id}");
        Ok(true)
    }

    /// Shallow-merges `patch` into `id`. Returns `None` when unknown.
    ///
    /// A patch that would blank the title is refused like an empty add.
    pub fn edit(
        &mut self,
        id: ReminderId,
        patch: ReminderPatch,
    ) -> ServiceResult<Option<Reminder>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(self.reminders[index].clone()));
        }

        let updated = self.reminders[index].merged(patch).inspect_err(|err| {
            info!("event=reminder_edit module=service status=rejected id={id} reason={err}");
        })?;

        let mut next = self.reminders.clone();
        next[index] = updated.clone();

        self.commit("reminder_edit", next)?;
        info!("event=reminder_edit module=service status=ok id={id}");
        Ok(Some(updated))
    }

    /// Stores the dark-mode preference.
    pub fn set_dark_mode(&mut self, enabled: bool) -> ServiceResult<()> {
        self.repo.save_dark_mode(enabled).inspect_err(|err| {
            error!("event=dark_mode_save module=service status=error error={err}");
        })?;
        self.dark_mode = enabled;
        Ok(())
    }

    /// Flips the dark-mode preference and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> ServiceResult<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    pub fn filtered(&self, mode: FilterMode, today: NaiveDate) -> Vec<&Reminder> {
        filter_reminders(&self.reminders, mode, today)
    }

    pub fn filter_counts(&self, today: NaiveDate) -> FilterCounts {
        FilterCounts::from_reminders(&self.reminders, today)
    }

    pub fn progress(&self, today: NaiveDate) -> ProgressSummary {
        ProgressSummary::compute(&self.reminders, self.points, today)
    }

    fn position(&self, id: ReminderId) -> Option<usize> {
        self.reminders.iter().position(|reminder| reminder.id == id)
    }

    /// Persists `next` and swaps it in.
    ///
    /// The reminders write is the commit point. The points mirror is written
    /// afterwards and its failure does not fail the mutation.
    fn commit(&mut self, event: &str, next: Vec<Reminder>) -> ServiceResult<()> {
        self.repo.save_reminders(&next).inspect_err(|err| {
            error!("event={event} module=service status=error error_code=persist_failed error={err}");
        })?;

        let points = gamification::points_for(&next);
        let mirror_changed = points != self.points;
        self.reminders = next;
        self.points = points;

        if mirror_changed {
            if let Err(err) = self.repo.save_points(points) {
                warn!("event={event} module=service status=mirror_stale points={points} error={err}");
            }
        }
        Ok(())
    }
}
