//! Notification records produced by task lifecycle events.
//!
//! # Invariants
//! - `id` is unique within the global notification collection.
//! - `recipient_id`, when set, names the team member the notification is
//!   addressed to. `None` means broadcast.
//! - Member ids are only unique within one project, so an addressed
//!   notification carries the `project_id` whose roster the recipient
//!   belongs to.

use crate::model::{MemberId, NotificationId, ProjectId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    /// Serialized as `type` to match the stored shape.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl Notification {
    /// Whether this notification targets no specific member.
    pub fn is_broadcast(&self) -> bool {
        self.recipient_id.is_none()
    }
}

/// A notification before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub task_id: Option<TaskId>,
    pub recipient_id: Option<MemberId>,
    pub project_id: Option<ProjectId>,
}

impl NotificationDraft {
    /// Unread broadcast draft stamped with the given time.
    pub fn new(
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            timestamp,
            is_read: false,
            task_id: None,
            recipient_id: None,
            project_id: None,
        }
    }

    pub fn for_task(mut self, task_id: impl Into<TaskId>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Addresses the draft to `member_id` on the roster of `project_id`.
    pub fn addressed_to(
        mut self,
        project_id: impl Into<ProjectId>,
        member_id: impl Into<MemberId>,
    ) -> Self {
        self.project_id = Some(project_id.into());
        self.recipient_id = Some(member_id.into());
        self
    }

    pub fn into_notification(self, id: NotificationId) -> Notification {
        Notification {
            id,
            title: self.title,
            message: self.message,
            kind: self.kind,
            timestamp: self.timestamp,
            is_read: self.is_read,
            task_id: self.task_id,
            recipient_id: self.recipient_id,
            project_id: self.project_id,
        }
    }
}
