//! Points, levels, streaks and achievements.
//!
//! # Responsibility
//! - Derive every progression value from the reminder collection.
//! - Keep the achievement table static; unlock state is recomputed on demand.
//!
//! # Invariants
//! - Points equal `POINTS_PER_COMPLETION * completed_count`.
//! - Achievement nominal points are descriptive and never feed the total.
//! - Calendar days are UTC days.

use crate::config::{POINTS_PER_COMPLETION, POINTS_PER_LEVEL, RECENT_COMPLETIONS_LIMIT};
use crate::model::reminder::Reminder;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Number of completed reminders.
pub fn completed_count(reminders: &[Reminder]) -> usize {
    reminders.iter().filter(|reminder| reminder.completed).count()
}

/// Total points derived from the collection.
pub fn points_for(reminders: &[Reminder]) -> u64 {
    completed_count(reminders) as u64 * POINTS_PER_COMPLETION
}

/// Incremental rule for one completion transition.
///
/// `+POINTS_PER_COMPLETION` when a reminder becomes completed, otherwise
/// `-POINTS_PER_COMPLETION` floored at zero.
pub fn adjust_points(points: u64, now_completed: bool) -> u64 {
    if now_completed {
        points.saturating_add(POINTS_PER_COMPLETION)
    } else {
        points.saturating_sub(POINTS_PER_COMPLETION)
    }
}

/// Progression tier, starting at 1.
pub fn level(points: u64) -> u64 {
    points / POINTS_PER_LEVEL + 1
}

/// Points still missing for the next level; never zero.
pub fn points_to_next_level(points: u64) -> u64 {
    POINTS_PER_LEVEL - points % POINTS_PER_LEVEL
}

/// Progress through the current level, 0..=99.
pub fn level_progress_percent(points: u64) -> u8 {
    ((points % POINTS_PER_LEVEL) * 100 / POINTS_PER_LEVEL) as u8
}

/// Consecutive days, ending on `today`, with at least one attributed completion.
///
/// A day without completions ends the walk, so a streak is 0 unless
/// something was completed today.
pub fn streak(reminders: &[Reminder], today: NaiveDate) -> u32 {
    let active_days: HashSet<NaiveDate> = reminders
        .iter()
        .filter(|reminder| reminder.completed)
        .map(|reminder| reminder.attributed_at().date_naive())
        .collect();

    let mut count = 0;
    let mut day = today;
    while active_days.contains(&day) {
        count += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

/// What an achievement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    CompletedAtLeast(usize),
    StreakAtLeast(u32),
}

impl AchievementRule {
    pub fn is_met(self, completed: usize, streak: u32) -> bool {
        match self {
            Self::CompletedAtLeast(threshold) => completed >= threshold,
            Self::StreakAtLeast(threshold) => streak >= threshold,
        }
    }
}

/// Static milestone definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Shown next to the badge only.
    pub nominal_points: u64,
    pub rule: AchievementRule,
}

pub const ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: "first-step",
        name: "First Step",
        description: "Complete your first task",
        nominal_points: 10,
        rule: AchievementRule::CompletedAtLeast(1),
    },
    Achievement {
        id: "on-fire",
        name: "On Fire",
        description: "Complete 5 tasks",
        nominal_points: 50,
        rule: AchievementRule::CompletedAtLeast(5),
    },
    Achievement {
        id: "champion",
        name: "Champion",
        description: "Complete 10 tasks",
        nominal_points: 100,
        rule: AchievementRule::CompletedAtLeast(10),
    },
    Achievement {
        id: "streak-master",
        name: "Streak Master",
        description: "3 day streak",
        nominal_points: 75,
        rule: AchievementRule::StreakAtLeast(3),
    },
    Achievement {
        id: "productivity-pro",
        name: "Productivity Pro",
        description: "Complete 20 tasks",
        nominal_points: 200,
        rule: AchievementRule::CompletedAtLeast(20),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
}

/// Evaluates every achievement against the given aggregates.
pub fn achievements(completed: usize, streak: u32) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|achievement| AchievementStatus {
            achievement: *achievement,
            unlocked: achievement.rule.is_met(completed, streak),
        })
        .collect()
}

/// Latest completed reminders, newest attribution first.
pub fn recent_completions(reminders: &[Reminder], limit: usize) -> Vec<&Reminder> {
    let mut completed: Vec<&Reminder> = reminders
        .iter()
        .filter(|reminder| reminder.completed)
        .collect();
    completed.sort_by(|a, b| b.attributed_at().cmp(&a.attributed_at()));
    completed.truncate(limit);
    completed
}

/// Aggregate progression view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub points: u64,
    pub level: u64,
    pub points_to_next_level: u64,
    pub level_progress_percent: u8,
    pub streak: u32,
    pub achievements: Vec<AchievementStatus>,
    pub recent: Vec<Reminder>,
}

impl ProgressSummary {
    pub fn compute(reminders: &[Reminder], points: u64, today: NaiveDate) -> Self {
        let completed = completed_count(reminders);
        let streak = streak(reminders, today);
        Self {
            total: reminders.len(),
            active: reminders.len() - completed,
            completed,
            points,
            level: level(points),
            points_to_next_level: points_to_next_level(points),
            level_progress_percent: level_progress_percent(points),
            streak,
            achievements: achievements(completed, streak),
            recent: recent_completions(reminders, RECENT_COMPLETIONS_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|status| status.unlocked).count()
    }
}
