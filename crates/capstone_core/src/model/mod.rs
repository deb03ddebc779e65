//! Dashboard domain model.
//!
//! # Responsibility
//! - Define projects, tasks, team members, notifications and session identity.
//! - Own the persisted JSON shape (camelCase fields, ISO-8601 dates).
//!
//! # Invariants
//! - A task belongs to exactly one project and never moves between projects.
//! - Ids are generated client-side; uniqueness is probabilistic.

pub mod notification;
pub mod project;
pub mod session;
pub mod task;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

pub type ProjectId = String;
pub type TaskId = String;
pub type MemberId = String;
pub type NotificationId = String;

/// Generates a fresh entity id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current UTC time truncated to milliseconds.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Returns the part of an email address before the first `@`.
///
/// An input without `@` is returned whole.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{email_local_part, generate_id};

    #[test]
    fn local_part_stops_at_first_at_sign() {
        assert_eq!(email_local_part("bob@x.com"), "bob");
        assert_eq!(email_local_part("a@b@c"), "a");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_id(), generate_id());
    }
}
