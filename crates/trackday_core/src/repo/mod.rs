//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for events.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `EventRecord::validate()` before SQL.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod event_repo;
