//! Reminder domain model.
//!
//! # Responsibility
//! - Define the canonical reminder record and its persisted JSON shape.
//! - Normalize user input (drafts and patches) before it reaches the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another reminder.
//! - `title` is non-empty after trimming.
//! - `completed_at` is `Some` only while `completed` is `true`.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

static DUE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid due time regex"));

/// Stable identifier for a reminder.
pub type ReminderId = Uuid;

/// Fixed set of reminder categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Personal,
    Work,
    Health,
    Shopping,
    Finance,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Self::Personal,
        Self::Work,
        Self::Health,
        Self::Shopping,
        Self::Finance,
        Self::Other,
    ];

    /// Stable name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
            Self::Health => "Health",
            Self::Shopping => "Shopping",
            Self::Finance => "Finance",
            Self::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ReminderValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ReminderValidationError::UnknownCategory(normalized.to_string()))
    }
}

/// Validation failures for reminder input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Due time is not a 24h `HH:MM` value.
    InvalidDueTime(String),
    /// Category name is not one of the fixed set.
    UnknownCategory(String),
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "reminder title cannot be empty"),
            Self::InvalidDueTime(value) => {
                write!(f, "invalid due time `{value}`; expected HH:MM")
            }
            Self::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
        }
    }
}

impl Error for ReminderValidationError {}

/// One task/reminder entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date without time zone, serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// 24h `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Missing in records written before completion tracking existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Builds a new, not-yet-completed reminder from a draft.
    ///
    /// The draft is normalized and validated first; `id` is a fresh v4 UUID
    /// and `created_at` is the supplied instant.
    pub fn from_draft(
        draft: ReminderDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReminderValidationError> {
        let reminder = Self {
            id: Uuid::new_v4(),
            title: normalize_title(&draft.title)?,
            description: normalize_optional_text(draft.description),
            due_date: draft.due_date,
            due_time: normalize_optional_text(draft.due_time),
            category: draft.category,
            completed: false,
            created_at,
            completed_at: None,
        };
        reminder.validate()?;
        Ok(reminder)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ReminderValidationError> {
        if self.title.trim().is_empty() {
            return Err(ReminderValidationError::EmptyTitle);
        }
        if let Some(due_time) = self.due_time.as_deref() {
            validate_due_time(due_time)?;
        }
        Ok(())
    }

    /// Flips completion state and keeps `completed_at` in step.
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }

    /// Instant a completion counts toward for streaks and activity.
    ///
    /// Legacy records without `completed_at` fall back to `created_at`.
    pub fn attributed_at(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.created_at)
    }

    /// Applies a partial update. Returns the merged copy without touching `self`.
    pub fn merged(&self, patch: ReminderPatch) -> Result<Self, ReminderValidationError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = normalize_title(&title)?;
        }
        if let Some(description) = patch.description {
            next.description = normalize_optional_text(description);
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(due_time) = patch.due_time {
            next.due_time = normalize_optional_text(due_time);
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        next.validate()?;
        Ok(next)
    }
}

/// User-supplied fields for a new reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<String>,
    pub category: Category,
}

impl ReminderDraft {
    /// Draft with only a title; everything else defaults.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing reminder.
///
/// Outer `None` leaves a field untouched. For optional fields the inner
/// `None` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<String>>,
    pub category: Option<Category>,
}

impl ReminderPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn normalize_title(title: &str) -> Result<String, ReminderValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ReminderValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn validate_due_time(value: &str) -> Result<(), ReminderValidationError> {
    if DUE_TIME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ReminderValidationError::InvalidDueTime(value.to_string()))
    }
}
