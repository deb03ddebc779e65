//! Dashboard use-case service.
//!
//! # Responsibility
//! - Own the session and domain stores and drive their load/save lifecycle.
//! - Validate form input and enforce role policy before any mutation.
//! - Persist after every successful mutation.
//!
//! # Invariants
//! - Stores are only mutated after validation and permission checks pass.
//! - Log lines carry roles and counts, never emails or free text.

use crate::config::{CoreConfig, StorageKeys};
use crate::model::notification::Notification;
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::session::{Role, SessionIdentity};
use crate::model::task::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
use crate::model::{MemberId, ProjectId, TaskId};
use crate::persist::PersistError;
use crate::repo::kv_repo::KvRepository;
use crate::service::validation::{validate_login, validate_task_title, ValidationError};
use crate::store::calendar::{self, DayStatus};
use crate::store::data_store::DataStore;
use crate::store::derive::{self, TaskBoard};
use crate::store::session_store::SessionStore;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Form input rejected; `Display` is the user-facing message.
    Validation(ValidationError),
    /// Operation needs a signed-in user.
    NotAuthenticated,
    PermissionDenied { role: Role, action: &'static str },
    Persist(PersistError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotAuthenticated => write!(f, "sign in required"),
            Self::PermissionDenied { role, action } => {
                write!(f, "role `{role}` may not {action}")
            }
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persist(err) => Some(err),
            Self::NotAuthenticated | Self::PermissionDenied { .. } => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistError> for ServiceError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Task creation form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    /// Ids of project team members to assign.
    pub assignee_ids: Vec<MemberId>,
    pub priority: TaskPriority,
}

impl NewTaskRequest {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            assignee_ids: Vec::new(),
            priority: TaskPriority::Medium,
        }
    }
}

/// Use-case facade over session + domain stores and their storage.
pub struct DashboardService<R: KvRepository> {
    repo: R,
    keys: StorageKeys,
    session: SessionStore,
    data: DataStore,
}

impl<R: KvRepository> DashboardService<R> {
    /// Loads session and domain state from `repo`.
    ///
    /// Seeded sample data (see [`CoreConfig::seed_sample_data`]) is written
    /// back immediately so the next start reads it from storage.
    pub fn open(repo: R, config: &CoreConfig) -> ServiceResult<Self> {
        let keys = config.storage_keys.clone();
        let session = SessionStore::load(&repo, &keys.session)?;
        let mut data = DataStore::load(&repo, &keys, config.seed_sample_data)?;
        data.save(&repo, &keys)?;
        Ok(Self {
            repo,
            keys,
            session,
            data,
        })
    }

    pub fn store(&self) -> &DataStore {
        &self.data
    }

    pub fn current_user(&self) -> Option<&SessionIdentity> {
        self.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Validates login form input, then signs in and persists the session.
    pub fn login(&mut self, email: &str, role: Option<&str>) -> ServiceResult<SessionIdentity> {
        let (email, role) = validate_login(email, role).map_err(|err| {
            warn!("event=session_login module=service status=rejected reason={err:?}");
            err
        })?;
        self.session.login(email, role);
        self.session.save(&self.repo, &self.keys.session)?;
        info!("event=session_login module=service status=ok role={role}");
        Ok(SessionIdentity::clone(self.require_identity()?))
    }

    pub fn logout(&mut self) -> ServiceResult<()> {
        self.session.logout();
        self.session.save(&self.repo, &self.keys.session)?;
        info!("event=session_logout module=service status=ok");
        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        self.data.projects()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.data.get_project_by_id(id)
    }

    /// Tasks assigned to or created by the signed-in user.
    ///
    /// Empty when nobody is signed in.
    pub fn my_tasks(&self) -> Vec<&Task> {
        match self.session.identity() {
            Some(identity) => self.data.get_tasks_for_user(&identity.email),
            None => Vec::new(),
        }
    }

    /// Notifications visible to the signed-in user, newest first.
    pub fn my_notifications(&self) -> Vec<&Notification> {
        match self.session.identity() {
            Some(identity) => self.data.get_notifications_for_user(&identity.email),
            None => Vec::new(),
        }
    }

    pub fn unread_count(&self) -> usize {
        derive::unread_count(self.my_notifications())
    }

    /// The signed-in user's tasks that are past due on `today`.
    pub fn my_overdue_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        derive::overdue_tasks(self.my_tasks(), today)
    }

    /// Calendar highlight for `day` over the signed-in user's tasks.
    pub fn my_day_status(&self, day: NaiveDate) -> Option<DayStatus> {
        calendar::day_status(&self.my_tasks(), day)
    }

    /// Days in `year`/`month` on which one of the signed-in user's tasks is due.
    pub fn my_due_days(&self, year: i32, month: u32) -> BTreeSet<NaiveDate> {
        calendar::due_days_in_month(&self.my_tasks(), year, month)
    }

    /// Status columns of one project's tasks, filtered by role policy.
    ///
    /// `Ok(None)` when the project does not exist.
    pub fn task_board(&self, project_id: &str) -> ServiceResult<Option<TaskBoard<'_>>> {
        let identity = self.require_identity()?;
        Ok(self
            .data
            .get_project_by_id(project_id)
            .map(|project| TaskBoard::from_tasks(derive::visible_project_tasks(project, identity))))
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> ServiceResult<ProjectId> {
        self.require_role("manage projects", |role| role == Role::Manager)?;
        let id = self.data.add_project(draft);
        self.persist()?;
        info!("event=project_add module=service status=ok");
        Ok(id)
    }

    pub fn update_project(&mut self, id: &str, patch: ProjectPatch) -> ServiceResult<bool> {
        self.require_role("manage projects", |role| role == Role::Manager)?;
        let updated = self.data.update_project(id, patch);
        self.persist()?;
        Ok(updated)
    }

    pub fn delete_project(&mut self, id: &str) -> ServiceResult<bool> {
        self.require_role("manage projects", |role| role == Role::Manager)?;
        let deleted = self.data.delete_project(id);
        self.persist()?;
        Ok(deleted)
    }

    /// Creates a task from form input on behalf of the signed-in user.
    ///
    /// Assignee ids are resolved against the project roster; unknown ids are
    /// skipped. `Ok(None)` when the project does not exist.
    pub fn create_task(
        &mut self,
        project_id: &str,
        request: NewTaskRequest,
    ) -> ServiceResult<Option<TaskId>> {
        self.require_role("manage tasks", Role::can_manage_tasks)?;
        let title = validate_task_title(&request.title)?;
        let created_by = self.require_identity()?.email.clone();

        let Some(project) = self.data.get_project_by_id(project_id) else {
            return Ok(None);
        };
        let assigned_to: Vec<_> = request
            .assignee_ids
            .iter()
            .filter_map(|member_id| project.member(member_id).cloned())
            .collect();
        let skipped = request.assignee_ids.len() - assigned_to.len();
        if skipped > 0 {
            warn!("event=task_create module=service status=partial skipped_assignees={skipped}");
        }

        let mut draft = TaskDraft::new(title, request.due_date, created_by);
        draft.description = request.description;
        draft.priority = request.priority;
        draft.assigned_to = assigned_to;

        let task_id = self.data.add_task(project_id, draft);
        self.persist()?;
        Ok(task_id)
    }

    /// Applies an edit-dialog patch. Managers and leaders only.
    pub fn edit_task(
        &mut self,
        project_id: &str,
        task_id: &str,
        mut patch: TaskPatch,
    ) -> ServiceResult<bool> {
        self.require_role("manage tasks", Role::can_manage_tasks)?;
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(validate_task_title(title)?);
        }
        let updated = self.data.update_task(project_id, task_id, patch);
        self.persist()?;
        Ok(updated)
    }

    /// Moves a task between status columns.
    ///
    /// Team members may only move tasks assigned to them.
    pub fn change_task_status(
        &mut self,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> ServiceResult<bool> {
        let identity = self.require_identity()?;
        let Some(task) = self.data.task(project_id, task_id) else {
            return Ok(false);
        };
        if !identity.role.can_manage_tasks() && !task.is_assigned_to(&identity.email) {
            warn!(
                "event=task_status module=service status=denied role={}",
                identity.role
            );
            return Err(ServiceError::PermissionDenied {
                role: identity.role,
                action: "change status of tasks assigned to others",
            });
        }

        let updated = self
            .data
            .update_task(project_id, task_id, TaskPatch::status(status));
        self.persist()?;
        Ok(updated)
    }

    pub fn delete_task(&mut self, project_id: &str, task_id: &str) -> ServiceResult<bool> {
        self.require_role("manage tasks", Role::can_manage_tasks)?;
        let deleted = self.data.delete_task(project_id, task_id);
        self.persist()?;
        Ok(deleted)
    }

    pub fn mark_notification_as_read(&mut self, id: &str) -> ServiceResult<bool> {
        self.require_identity()?;
        let marked = self.data.mark_notification_as_read(id);
        self.persist()?;
        Ok(marked)
    }

    pub fn mark_all_notifications_as_read(&mut self) -> ServiceResult<usize> {
        self.require_identity()?;
        let marked = self.data.mark_all_notifications_as_read();
        self.persist()?;
        Ok(marked)
    }

    pub fn dismiss_notification(&mut self, id: &str) -> ServiceResult<bool> {
        self.require_identity()?;
        let dismissed = self.data.dismiss_notification(id);
        self.persist()?;
        Ok(dismissed)
    }

    fn persist(&mut self) -> ServiceResult<()> {
        self.data.save(&self.repo, &self.keys)?;
        Ok(())
    }

    fn require_identity(&self) -> ServiceResult<&SessionIdentity> {
        self.session
            .identity()
            .ok_or(ServiceError::NotAuthenticated)
    }

    fn require_role(&self, action: &'static str, allowed: fn(Role) -> bool) -> ServiceResult<Role> {
        let role = self.require_identity()?.role;
        if !allowed(role) {
            warn!("event=permission_check module=service status=denied role={role} action={action:?}");
            return Err(ServiceError::PermissionDenied { role, action });
        }
        Ok(role)
    }
}
