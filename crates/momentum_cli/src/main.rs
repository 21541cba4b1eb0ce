//! Command-line driver for the Momentum core.
//!
//! # Responsibility
//! - Open the default (or `--data-dir`) state database and run one command.
//! - Keep output line-oriented and deterministic for local sanity checks.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use momentum_core::config::{db_path, default_data_dir, log_dir, LOG_LEVEL_ENV};
use momentum_core::db::open_db;
use momentum_core::{
    core_version, default_log_level, init_logging, Category, FilterMode, Reminder, ReminderDraft,
    ReminderService, SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

/// momentum - personal reminders with points and streaks
#[derive(Parser, Debug)]
#[command(name = "momentum")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the state database and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List reminders in store order
    #[command(alias = "ls")]
    List {
        /// all, active, completed, today or upcoming
        #[arg(default_value = "all")]
        mode: FilterMode,
    },

    /// Add a reminder
    Add {
        /// Reminder title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Personal, Work, Health, Shopping, Finance or Other
        #[arg(short, long, default_value = "Personal")]
        category: Category,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Due time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Free-form description
        #[arg(long)]
        note: Option<String>,
    },

    /// Flip completion of a reminder
    Toggle {
        /// Reminder id
        id: Uuid,
    },

    /// Delete a reminder
    Delete {
        /// Reminder id
        id: Uuid,
    },

    /// Show points, level, streak and achievements
    Summary,

    /// Flip the dark-mode preference
    DarkMode,

    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if matches!(cli.command, Commands::Version) {
        print_version();
        return Ok(());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir().ok_or("no platform data directory; pass --data-dir")?,
    };
    let data_dir = std::path::absolute(&data_dir).map_err(|err| err.to_string())?;
    std::fs::create_dir_all(&data_dir)
        .map_err(|err| format!("cannot create `{}`: {err}", data_dir.display()))?;

    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    init_logging(&level, log_dir(&data_dir))?;

    let conn = open_db(db_path(&data_dir)).map_err(|err| err.to_string())?;
    let mut service =
        ReminderService::load(SqliteKeyValueStore::new(&conn)).map_err(|err| err.to_string())?;
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::List { mode } => {
            for reminder in service.filtered(mode, today) {
                println!("{}", format_reminder(reminder));
            }
        }
        Commands::Add {
            title,
            category,
            due,
            time,
            note,
        } => {
            let draft = ReminderDraft {
                title: title.join(" "),
                description: note,
                due_date: due,
                due_time: time,
                category,
            };
            let reminder = service.add(draft).map_err(|err| err.to_string())?;
            println!("added {}", reminder.id);
        }
        Commands::Toggle { id } => {
            let toggled = service
                .toggle_complete(id)
                .map_err(|err| err.to_string())?;
            match toggled {
                Some(reminder) => println!(
                    "{} completed={} points={}",
                    reminder.id,
                    reminder.completed,
                    service.points()
                ),
                None => println!("no reminder {id}"),
            }
        }
        Commands::Delete { id } => {
            let removed = service.delete(id).map_err(|err| err.to_string())?;
            println!("deleted={removed}");
        }
        Commands::Summary => print_summary(&service, today),
        Commands::DarkMode => {
            let enabled = service.toggle_dark_mode().map_err(|err| err.to_string())?;
            println!("dark_mode={enabled}");
        }
        Commands::Version => print_version(),
    }

    Ok(())
}

fn print_version() {
    println!("momentum_core version={}", core_version());
}

fn format_reminder(reminder: &Reminder) -> String {
    let mark = if reminder.completed { 'x' } else { ' ' };
    let due = match (reminder.due_date, reminder.due_time.as_deref()) {
        (Some(date), Some(time)) => format!(" due={date} {time}"),
        (Some(date), None) => format!(" due={date}"),
        (None, _) => String::new(),
    };
    format!(
        "[{mark}] {} {} ({}){due}",
        reminder.id, reminder.title, reminder.category
    )
}

fn print_summary(service: &ReminderService<SqliteKeyValueStore<'_>>, today: NaiveDate) {
    let summary = service.progress(today);
    println!(
        "total={} active={} completed={}",
        summary.total, summary.active, summary.completed
    );
    println!(
        "points={} level={} next_level_in={} streak={}",
        summary.points, summary.level, summary.points_to_next_level, summary.streak
    );
    for status in &summary.achievements {
        let achievement = status.achievement;
        let mark = if status.unlocked { 'x' } else { ' ' };
        println!(
            "[{mark}] {} - {} (+{} pts)",
            achievement.name, achievement.description, achievement.nominal_points
        );
    }
    for reminder in &summary.recent {
        let at = reminder.attributed_at().format("%Y-%m-%d %H:%M");
        println!("recent {at} {}", reminder.title);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};
    use momentum_core::{Category, FilterMode};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_typed_options() {
        let cli = Cli::try_parse_from([
            "momentum",
            "add",
            "pay",
            "rent",
            "--category",
            "finance",
            "--due",
            "2024-06-05",
            "--time",
            "08:15",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                title,
                category,
                due,
                time,
                note,
            } => {
                assert_eq!(title.join(" "), "pay rent");
                assert_eq!(category, Category::Finance);
                assert_eq!(due.unwrap().to_string(), "2024-06-05");
                assert_eq!(time.as_deref(), Some("08:15"));
                assert_eq!(note, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn misspelled_flag_is_rejected_instead_of_joined_into_title() {
        let err =
            Cli::try_parse_from(["momentum", "add", "milk", "--catgory", "Work"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn list_defaults_to_all_and_rejects_unknown_modes() {
        let cli = Cli::try_parse_from(["momentum", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List { mode: FilterMode::All }));

        let cli =
            Cli::try_parse_from(["momentum", "--data-dir", "/tmp/m", "ls", "today"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                mode: FilterMode::Today
            }
        ));

        assert!(Cli::try_parse_from(["momentum", "list", "later"]).is_err());
    }

    #[test]
    fn toggle_requires_a_valid_uuid() {
        assert!(Cli::try_parse_from(["momentum", "toggle", "not-an-id"]).is_err());
    }
}
