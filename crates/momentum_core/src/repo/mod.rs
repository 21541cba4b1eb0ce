//! Typed access to persisted application state.
//!
//! # Responsibility
//! - Encode/decode the reminder collection, points mirror and preferences.
//! - Isolate JSON details from the service layer.
//!
//! # Invariants
//! - Corrupt or absent values decode to defaults; decoding never errors.
//! - Transport failures from the key-value port are returned unchanged.

pub mod state_repo;
