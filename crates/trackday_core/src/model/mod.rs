//! Domain model for track-day events.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep one aggregate draft shape shared by all wizard steps.
//!
//! # Invariants
//! - Every persisted event is identified by a stable `EventId`.
//! - The draft aggregate is the unit of storage; no sub-record is
//!   independently persisted.

pub mod event;
