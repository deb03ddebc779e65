//! Task model.
//!
//! # Invariants
//! - `id` is unique within the owning project's task list.
//! - `assigned_to` should reference members of the owning project; the store
//!   does not enforce it.
//! - `id` and `created_at` are assigned once by the store and never patched.

use crate::model::notification::Notification;
use crate::model::project::TeamMember;
use crate::model::TaskId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub assigned_to: Vec<TeamMember>,
    pub priority: TaskPriority,
    /// Email of whoever created the task.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Vec<Notification>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// A task is past due when its due date is before `today` and it is not
    /// completed.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_completed()
    }

    /// Whether any assignee resolves to the given account email.
    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to.iter().any(|member| member.resolves_to(email))
    }

    /// Whether the task was created by exactly this email.
    pub fn is_created_by(&self, email: &str) -> bool {
        self.created_by == email
    }
}

/// A task before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub assigned_to: Vec<TeamMember>,
    pub priority: TaskPriority,
    pub created_by: String,
    pub notifications: Option<Vec<Notification>>,
}

impl TaskDraft {
    /// Pending, medium-priority draft with no assignees.
    pub fn new(title: impl Into<String>, due_date: NaiveDate, created_by: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date,
            assigned_to: Vec::new(),
            priority: TaskPriority::Medium,
            created_by: created_by.into(),
            notifications: None,
        }
    }

    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
            priority: self.priority,
            created_by: self.created_by,
            created_at,
            notifications: self.notifications,
        }
    }
}

/// Partial task update: only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<Vec<TeamMember>>,
    pub priority: Option<TaskPriority>,
    pub created_by: Option<String>,
    pub notifications: Option<Vec<Notification>>,
}

impl TaskPatch {
    /// Patch that only moves the task to `status`.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Merges the provided fields into `task`.
    pub fn apply_to(self, task: &mut Task) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = self.$field {
                        task.$field = value;
                    }
                )+
            };
        }

        merge!(
            title,
            description,
            status,
            due_date,
            assigned_to,
            priority,
            created_by,
        );
        if self.notifications.is_some() {
            task.notifications = self.notifications;
        }
    }
}
