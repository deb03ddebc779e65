//! Repository layer over local key-value storage.
//!
//! # Responsibility
//! - Define the storage contract the dashboard persists through.
//! - Isolate SQLite details from store/service orchestration.

pub mod kv_repo;
