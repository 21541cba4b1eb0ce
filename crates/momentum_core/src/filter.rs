//! Reminder list filtering.
//!
//! Pure functions over a borrowed collection; store order is preserved.

use crate::model::reminder::Reminder;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// List view selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
    /// Due exactly on the reference day.
    Today,
    /// Due strictly after the reference day.
    Upcoming,
}

impl FilterMode {
    pub const ALL: [FilterMode; 5] = [
        Self::All,
        Self::Active,
        Self::Completed,
        Self::Today,
        Self::Upcoming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
        }
    }

    /// Whether `reminder` belongs to this view on `today`.
    pub fn matches(self, reminder: &Reminder, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Active => !reminder.completed,
            Self::Completed => reminder.completed,
            Self::Today => reminder.due_date == Some(today),
            Self::Upcoming => reminder.due_date.is_some_and(|due| due > today),
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterModeParseError(pub String);

impl Display for FilterModeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|active|completed|today|upcoming",
            self.0
        )
    }
}

impl Error for FilterModeParseError {}

impl FromStr for FilterMode {
    type Err = FilterModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or(FilterModeParseError(normalized))
    }
}

/// Returns the reminders visible under `mode`, in store order.
pub fn filter_reminders(reminders: &[Reminder], mode: FilterMode, today: NaiveDate) -> Vec<&Reminder> {
    reminders
        .iter()
        .filter(|reminder| mode.matches(reminder, today))
        .collect()
}

/// Per-view badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
    pub today: usize,
    pub upcoming: usize,
}

impl FilterCounts {
    pub fn from_reminders(reminders: &[Reminder], today: NaiveDate) -> Self {
        reminders.iter().fold(Self::default(), |mut counts, reminder| {
            counts.all += 1;
            if reminder.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            if FilterMode::Today.matches(reminder, today) {
                counts.today += 1;
            }
            if FilterMode::Upcoming.matches(reminder, today) {
                counts.upcoming += 1;
            }
            counts
        })
    }

    pub fn count(&self, mode: FilterMode) -> usize {
        match mode {
            FilterMode::All => self.all,
            FilterMode::Active => self.active,
            FilterMode::Completed => self.completed,
            FilterMode::Today => self.today,
            FilterMode::Upcoming => self.upcoming,
        }
    }
}
