use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use momentum_core::gamification::{
    achievements, points_for, recent_completions, ProgressSummary, ACHIEVEMENTS,
};
use momentum_core::{level, points_to_next_level, streak, Reminder, ReminderDraft};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn noon(days_ago: u64) -> DateTime<Utc> {
    let day = today().checked_sub_days(Days::new(days_ago)).unwrap();
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

/// Completed reminder without a completion timestamp, as older data stores it.
fn legacy_completed(created_days_ago: u64) -> Reminder {
    let mut reminder =
        Reminder::from_draft(ReminderDraft::titled("legacy"), noon(created_days_ago)).unwrap();
    reminder.completed = true;
    reminder
}

fn completed_on(created_days_ago: u64, completed_days_ago: u64) -> Reminder {
    let mut reminder =
        Reminder::from_draft(ReminderDraft::titled("tracked"), noon(created_days_ago)).unwrap();
    reminder.toggle_completed(noon(completed_days_ago));
    reminder
}

#[test]
fn level_boundaries() {
    assert_eq!(level(0), 1);
    assert_eq!(level(99), 1);
    assert_eq!(level(100), 2);
    assert_eq!(points_to_next_level(150), 50);
    assert_eq!(points_to_next_level(0), 100);
    assert_eq!(points_to_next_level(100), 100);
}

#[test]
fn streak_is_zero_without_completions() {
    let open = Reminder::from_draft(ReminderDraft::titled("open"), noon(0)).unwrap();
    assert_eq!(streak(&[], today()), 0);
    assert_eq!(streak(&[open], today()), 0);
}

#[test]
fn streak_counts_consecutive_days() {
    let reminders = vec![legacy_completed(0), legacy_completed(1), legacy_completed(2)];
    assert_eq!(streak(&reminders, today()), 3);
}

#[test]
fn streak_stops_at_first_gap() {
    let reminders = vec![legacy_completed(0), legacy_completed(3)];
    assert_eq!(streak(&reminders, today()), 1);
}

#[test]
fn streak_requires_activity_today() {
    let reminders = vec![legacy_completed(1), legacy_completed(2)];
    assert_eq!(streak(&reminders, today()), 0);
}

#[test]
fn streak_uses_completion_day_over_creation_day() {
    // Created a week ago, completed over the last three days.
    let reminders = vec![completed_on(7, 0), completed_on(7, 1), completed_on(7, 2)];
    assert_eq!(streak(&reminders, today()), 3);

    // Created on consecutive days but completed only today.
    let reminders = vec![completed_on(0, 0), completed_on(1, 0), completed_on(2, 0)];
    assert_eq!(streak(&reminders, today()), 1);
}

#[test]
fn points_follow_completed_count() {
    let mut reminders = vec![legacy_completed(0), legacy_completed(1)];
    reminders.push(Reminder::from_draft(ReminderDraft::titled("open"), noon(0)).unwrap());
    assert_eq!(points_for(&reminders), 20);
}

#[test]
fn achievements_unlock_at_thresholds() {
    let unlocked = |completed, streak| -> Vec<&'static str> {
        achievements(completed, streak)
            .into_iter()
            .filter(|status| status.unlocked)
            .map(|status| status.achievement.name)
            .collect()
    };

    assert!(unlocked(0, 0).is_empty());
    assert_eq!(unlocked(1, 0), vec!["First Step"]);
    assert_eq!(unlocked(5, 2), vec!["First Step", "On Fire"]);
    assert_eq!(
        unlocked(10, 3),
        vec!["First Step", "On Fire", "Champion", "Streak Master"]
    );
    assert_eq!(unlocked(20, 3).len(), ACHIEVEMENTS.len());
}

#[test]
fn nominal_achievement_points_do_not_change_total() {
    let reminders: Vec<Reminder> = (0..5).map(|_| legacy_completed(0)).collect();
    let points = points_for(&reminders);
    let summary = ProgressSummary::compute(&reminders, points, today());

    assert_eq!(summary.unlocked_count(), 2);
    assert_eq!(summary.points, 50);
    assert_eq!(summary.level, 1);
    assert_eq!(summary.points_to_next_level, 50);
    assert_eq!(summary.level_progress_percent, 50);
}

#[test]
fn recent_completions_are_newest_first_and_capped() {
    let reminders: Vec<Reminder> = (0..7).map(|days_ago| completed_on(10, days_ago)).collect();
    let recent = recent_completions(&reminders, 5);

    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].completed_at, Some(noon(0)));
    assert_eq!(recent[4].completed_at, Some(noon(4)));
}

#[test]
fn summary_counts_active_and_completed() {
    let reminders = vec![
        legacy_completed(0),
        Reminder::from_draft(ReminderDraft::titled("open"), noon(0)).unwrap(),
    ];
    let summary = ProgressSummary::compute(&reminders, points_for(&reminders), today());
    assert_eq!(summary.total, 2);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.streak, 1);
}
