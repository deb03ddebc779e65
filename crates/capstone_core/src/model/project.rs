//! Project aggregate and its team.
//!
//! # Invariants
//! - A project owns its tasks by composition.
//! - `progress` is an integer percentage; the store does not clamp it.
//! - `TeamMember::user_email` is the account key for identity resolution.
//!   Members without it are matched by name against the email local part.

use crate::model::task::Task;
use crate::model::{email_local_part, MemberId, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    /// Free-text role label, e.g. "Team Leader".
    pub role: String,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl TeamMember {
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        role: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            avatar_url: avatar_url.into(),
            user_email: None,
        }
    }

    /// Links this member to an account email.
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    /// Whether this member is the person signed in as `email`.
    ///
    /// Provisioned members compare `user_email` case-insensitively. Members
    /// stored before provisioning fall back to comparing `name` with the
    /// email local part.
    pub fn resolves_to(&self, email: &str) -> bool {
        match self.user_email.as_deref() {
            Some(user_email) => user_email.trim().to_lowercase() == email.trim().to_lowercase(),
            None => self.name.to_lowercase() == email_local_part(email).to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_color: String,
    pub tags: Vec<String>,
    pub team_name: String,
    pub team_members: Vec<TeamMember>,
    pub image_url: String,
    pub project_description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u32,
    pub objectives: Vec<String>,
    pub resources: Vec<Resource>,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&TeamMember> {
        self.team_members.iter().find(|member| member.id == member_id)
    }
}

/// A project before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_color: String,
    pub tags: Vec<String>,
    pub team_name: String,
    pub team_members: Vec<TeamMember>,
    pub image_url: String,
    pub project_description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u32,
    pub objectives: Vec<String>,
    pub resources: Vec<Resource>,
    pub tasks: Vec<Task>,
}

impl ProjectDraft {
    /// Empty project spanning `start_date..=end_date`.
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: String::new(),
            category_color: String::new(),
            tags: Vec::new(),
            team_name: String::new(),
            team_members: Vec::new(),
            image_url: String::new(),
            project_description: String::new(),
            start_date,
            end_date,
            progress: 0,
            objectives: Vec::new(),
            resources: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            category_color: self.category_color,
            tags: self.tags,
            team_name: self.team_name,
            team_members: self.team_members,
            image_url: self.image_url,
            project_description: self.project_description,
            start_date: self.start_date,
            end_date: self.end_date,
            progress: self.progress,
            objectives: self.objectives,
            resources: self.resources,
            tasks: self.tasks,
        }
    }
}

/// Partial project update: only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub category_color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub team_name: Option<String>,
    pub team_members: Option<Vec<TeamMember>>,
    pub image_url: Option<String>,
    pub project_description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: Option<u32>,
    pub objectives: Option<Vec<String>>,
    pub resources: Option<Vec<Resource>>,
    pub tasks: Option<Vec<Task>>,
}

impl ProjectPatch {
    pub fn apply_to(self, project: &mut Project) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = self.$field {
                        project.$field = value;
                    }
                )+
            };
        }

        merge!(
            title,
            description,
            category,
            category_color,
            tags,
            team_name,
            team_members,
            image_url,
            project_description,
            start_date,
            end_date,
            progress,
            objectives,
            resources,
            tasks,
        );
    }
}
