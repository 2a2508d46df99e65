//! Core data models for the file-sharing service.
//!
//! Stored objects map onto the `objects` table via `sqlx::FromRow` and
//! serialize as JSON via `serde`; upload results are plain JSON payloads.

pub mod object;
pub mod upload;
