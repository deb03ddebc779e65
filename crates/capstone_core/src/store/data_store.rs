//! Domain store: projects (with embedded tasks) and the notification feed.
//!
//! # Responsibility
//! - Apply create/update/delete operations with merge semantics.
//! - Fan task lifecycle events out into notifications in the same step.
//! - Load and save both collections through versioned payloads.
//!
//! # Invariants
//! - Notifications are ordered newest first.
//! - Task ids are unique within their project; notification ids are unique
//!   within the feed.
//! - A completion notice fires only on a transition into `completed`, judged
//!   against the task's state at the moment of the update.

use crate::config::StorageKeys;
use crate::model::notification::{Notification, NotificationDraft};
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::task::{Task, TaskDraft, TaskPatch, TaskStatus};
use crate::model::{generate_id, now_utc, NotificationId, ProjectId, TaskId};
use crate::persist::{read_payload, write_payload, PayloadKind, PersistError, PersistResult};
use crate::repo::kv_repo::KvRepository;
use crate::seed::sample_data;
use crate::store::derive;
use crate::store::fanout::{assignment_notice, completion_notice, newly_assigned};
use log::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DirtyCollections {
    projects: bool,
    notifications: bool,
}

/// In-memory dashboard state.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    projects: Vec<Project>,
    notifications: Vec<Notification>,
    dirty: DirtyCollections,
}

impl DataStore {
    /// Empty store with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads both collections from storage.
    ///
    /// A collection with no stored value starts from the sample program data
    /// when `seed_when_empty` is set, or empty otherwise. Seeded collections
    /// are written by the next `save`.
    pub fn load<R: KvRepository + ?Sized>(
        repo: &R,
        keys: &StorageKeys,
        seed_when_empty: bool,
    ) -> PersistResult<Self> {
        let stored_projects: Option<Vec<Project>> =
            read_payload(repo, &keys.projects, PayloadKind::Projects)?;
        let stored_notifications: Option<Vec<Notification>> =
            read_payload(repo, &keys.notifications, PayloadKind::Notifications)?;

        let needs_seed =
            seed_when_empty && (stored_projects.is_none() || stored_notifications.is_none());
        let mut seed = if needs_seed {
            Some(sample_data().map_err(|source| PersistError::Decode {
                key: "sample_data".to_string(),
                source,
            })?)
        } else {
            None
        };

        let mut dirty = DirtyCollections::default();
        let projects = match stored_projects {
            Some(projects) => projects,
            None => match seed.as_mut() {
                Some(seed) => {
                    dirty.projects = true;
                    std::mem::take(&mut seed.projects)
                }
                None => Vec::new(),
            },
        };
        let notifications = match stored_notifications {
            Some(notifications) => notifications,
            None => match seed.as_mut() {
                Some(seed) => {
                    dirty.notifications = true;
                    std::mem::take(&mut seed.notifications)
                }
                None => Vec::new(),
            },
        };

        info!(
            "event=store_load module=store status=ok projects={} notifications={} seeded_projects={} seeded_notifications={}",
            projects.len(),
            notifications.len(),
            dirty.projects,
            dirty.notifications
        );
        Ok(Self {
            projects,
            notifications,
            dirty,
        })
    }

    /// Writes every collection changed since the last load/save.
    ///
    /// A collection is marked clean only after its write succeeds, so a
    /// failed save can be retried.
    pub fn save<R: KvRepository + ?Sized>(
        &mut self,
        repo: &R,
        keys: &StorageKeys,
    ) -> PersistResult<()> {
        if self.dirty.projects {
            write_payload(repo, &keys.projects, &self.projects)?;
            self.dirty.projects = false;
            debug!(
                "event=store_save module=store status=ok collection=projects count={}",
                self.projects.len()
            );
        }
        if self.dirty.notifications {
            write_payload(repo, &keys.notifications, &self.notifications)?;
            self.dirty.notifications = false;
            debug!(
                "event=store_save module=store status=ok collection=notifications count={}",
                self.notifications.len()
            );
        }
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.projects || self.dirty.notifications
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn get_project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn task(&self, project_id: &str, task_id: &str) -> Option<&Task> {
        self.get_project_by_id(project_id)
            .and_then(|project| project.task(task_id))
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> ProjectId {
        let id = unique_id(|candidate| self.projects.iter().any(|p| p.id == candidate));
        self.projects.push(draft.into_project(id.clone()));
        self.dirty.projects = true;
        id
    }

    /// Merges `patch` into the project. Returns `false` when it does not exist.
    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> bool {
        let Some(project) = self.project_mut(id) else {
            return false;
        };
        patch.apply_to(project);
        self.dirty.projects = true;
        true
    }

    pub fn delete_project(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| project.id != id);
        let removed = self.projects.len() != before;
        self.dirty.projects |= removed;
        removed
    }

    /// Appends a task to the project and notifies each assignee.
    ///
    /// Returns `None`, with no notifications, when the project does not exist.
    pub fn add_task(&mut self, project_id: &str, draft: TaskDraft) -> Option<TaskId> {
        let now = now_utc();
        let project = self.project_mut(project_id)?;
        let task_id = unique_id(|candidate| project.tasks.iter().any(|t| t.id == candidate));
        let task = draft.into_task(task_id.clone(), now);
        let notices: Vec<NotificationDraft> = task
            .assigned_to
            .iter()
            .map(|member| assignment_notice(project_id, &task, member, now))
            .collect();
        project.tasks.push(task);
        self.dirty.projects = true;

        info!(
            "event=task_add module=store status=ok assignees={}",
            notices.len()
        );
        for notice in notices {
            self.add_notification(notice);
        }
        Some(task_id)
    }

    /// Merges `patch` into the task and emits the resulting notifications.
    ///
    /// - Each newly added assignee gets an assignment notice.
    /// - A transition from any other status into `completed` emits one
    ///   completion notice. Re-saving a completed task emits nothing.
    ///
    /// Returns `false` when the project or task does not exist.
    pub fn update_task(&mut self, project_id: &str, task_id: &str, patch: TaskPatch) -> bool {
        let now = now_utc();
        let Some(task) = self
            .project_mut(project_id)
            .and_then(|project| project.task_mut(task_id))
        else {
            return false;
        };

        let previous_status = task.status;
        let previous_assignees = task.assigned_to.clone();
        patch.apply_to(task);

        let mut notices: Vec<NotificationDraft> =
            newly_assigned(&previous_assignees, &task.assigned_to)
                .into_iter()
                .map(|member| assignment_notice(project_id, task, member, now))
                .collect();
        if previous_status != TaskStatus::Completed && task.is_completed() {
            notices.push(completion_notice(task, now));
        }
        let current_status = task.status;
        self.dirty.projects = true;

        info!(
            "event=task_update module=store status=ok from_status={} to_status={} notices={}",
            previous_status.as_str(),
            current_status.as_str(),
            notices.len()
        );
        for notice in notices {
            self.add_notification(notice);
        }
        true
    }

    pub fn delete_task(&mut self, project_id: &str, task_id: &str) -> bool {
        let Some(project) = self.project_mut(project_id) else {
            return false;
        };
        let before = project.tasks.len();
        project.tasks.retain(|task| task.id != task_id);
        let removed = project.tasks.len() != before;
        self.dirty.projects |= removed;
        removed
    }

    /// Prepends a notification and returns its new id.
    pub fn add_notification(&mut self, draft: NotificationDraft) -> NotificationId {
        let id = unique_id(|candidate| self.notifications.iter().any(|n| n.id == candidate));
        self.notifications.insert(0, draft.into_notification(id.clone()));
        self.dirty.notifications = true;
        id
    }

    pub fn mark_notification_as_read(&mut self, id: &str) -> bool {
        let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        notification.is_read = true;
        self.dirty.notifications = true;
        true
    }

    /// Marks every notification read. Returns how many were unread.
    pub fn mark_all_notifications_as_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            changed += 1;
        }
        self.dirty.notifications |= changed > 0;
        changed
    }

    pub fn dismiss_notification(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|notification| notification.id != id);
        let removed = self.notifications.len() != before;
        self.dirty.notifications |= removed;
        removed
    }

    /// See [`derive::tasks_for_user`].
    pub fn get_tasks_for_user(&self, email: &str) -> Vec<&Task> {
        derive::tasks_for_user(&self.projects, email)
    }

    /// See [`derive::notifications_for_user`].
    pub fn get_notifications_for_user(&self, email: &str) -> Vec<&Notification> {
        derive::notifications_for_user(&self.projects, &self.notifications, email)
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }
}

fn unique_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = generate_id();
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DataStore;
    use crate::model::notification::{NotificationDraft, NotificationType};
    use chrono::Utc;

    #[test]
    fn add_notification_prepends() {
        let mut store = DataStore::new();
        let first = store.add_notification(NotificationDraft::new(
            NotificationType::Info,
            "first",
            "",
            Utc::now(),
        ));
        let second = store.add_notification(NotificationDraft::new(
            NotificationType::Warning,
            "second",
            "",
            Utc::now(),
        ));

        let ids: Vec<_> = store.notifications().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec![second, first]);
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let mut store = DataStore::new();
        assert!(!store.delete_project("nope"));
        assert!(!store.delete_task("nope", "nope"));
        assert!(!store.mark_notification_as_read("nope"));
        assert!(!store.dismiss_notification("nope"));
        assert_eq!(store.mark_all_notifications_as_read(), 0);
        assert!(!store.has_unsaved_changes());
    }
}
