//! In-memory dashboard stores with explicit load/save lifecycles.
//!
//! # Responsibility
//! - Hold session identity and domain state between caller events.
//! - Apply mutations and notification fan-out as single read-modify-write steps.
//! - Derive per-user views without touching storage.
//!
//! # Invariants
//! - Mutations never persist implicitly; the owner calls `save`.
//! - Missing ids are a normal outcome (`false`/`None`), never an error.

pub mod calendar;
pub mod data_store;
pub mod derive;
mod fanout;
pub mod session_store;
