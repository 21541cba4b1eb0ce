//! Domain model for reminders.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input normalization so services never persist raw user text.
//!
//! # Invariants
//! - Every reminder is identified by a stable `ReminderId`.
//! - Deletion is a hard removal; no tombstones are kept.

pub mod reminder;
