//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state mutations and persistence into use-case level APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod reminder_service;
