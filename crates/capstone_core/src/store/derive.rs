//! Pure per-user views over dashboard state.
//!
//! # Invariants
//! - Functions here never mutate state or touch storage.
//! - Output preserves project order, then task order within a project.

use crate::model::notification::Notification;
use crate::model::project::Project;
use crate::model::session::SessionIdentity;
use crate::model::task::{Task, TaskStatus};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Tasks across all projects assigned to `email` or created by it.
///
/// Full scan of every project; there is no index.
pub fn tasks_for_user<'a>(projects: &'a [Project], email: &str) -> Vec<&'a Task> {
    projects
        .iter()
        .flat_map(|project| project.tasks.iter())
        .filter(|task| task.is_assigned_to(email) || task.is_created_by(email))
        .collect()
}

/// `(project id, member id)` of every roster entry and task assignee that
/// resolves to `email`.
pub fn member_keys_for_user<'a>(
    projects: &'a [Project],
    email: &str,
) -> HashSet<(&'a str, &'a str)> {
    projects
        .iter()
        .flat_map(move |project| {
            project
                .team_members
                .iter()
                .chain(project.tasks.iter().flat_map(|task| task.assigned_to.iter()))
                .filter(move |member| member.resolves_to(email))
                .map(move |member| (project.id.as_str(), member.id.as_str()))
        })
        .collect()
}

/// Notifications `email` should see: broadcasts plus those addressed to a
/// member of the notification's project that resolves to `email`.
/// Collection order (newest first) is kept.
///
/// An addressed notification stored without a project id predates project
/// scoping and matches the member id in any project.
pub fn notifications_for_user<'a>(
    projects: &[Project],
    notifications: &'a [Notification],
    email: &str,
) -> Vec<&'a Notification> {
    let member_keys = member_keys_for_user(projects, email);
    notifications
        .iter()
        .filter(|notification| {
            let Some(recipient_id) = notification.recipient_id.as_deref() else {
                return true;
            };
            match notification.project_id.as_deref() {
                Some(project_id) => member_keys.contains(&(project_id, recipient_id)),
                None => member_keys.iter().any(|(_, member_id)| *member_id == recipient_id),
            }
        })
        .collect()
}

/// Tasks of one project the identity may see on the task board.
///
/// Team members only see tasks assigned to them; managers and leaders see
/// every task.
pub fn visible_project_tasks<'a>(project: &'a Project, identity: &SessionIdentity) -> Vec<&'a Task> {
    if identity.role.can_manage_tasks() {
        return project.tasks.iter().collect();
    }
    project
        .tasks
        .iter()
        .filter(|task| task.is_assigned_to(&identity.email))
        .collect()
}

/// Tasks grouped into status columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard<'a> {
    pub pending: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> TaskBoard<'a> {
    pub fn from_tasks(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => board.pending.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Completed => board.completed.push(task),
            }
        }
        board
    }

    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tasks past their due date that are not completed.
pub fn overdue_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    today: NaiveDate,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.is_past_due(today))
        .collect()
}

pub fn unread_count<'a>(notifications: impl IntoIterator<Item = &'a Notification>) -> usize {
    notifications
        .into_iter()
        .filter(|notification| !notification.is_read)
        .count()
}
