//! Data layer for the capstone project dashboard.
//! Session identity, projects with their tasks and teams, the notification
//! feed, and their persistence to local key-value storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{CoreConfig, StorageKeys};
pub use logging::{default_log_level, init_logging, logging_status, LogInitError};
pub use model::notification::{Notification, NotificationDraft, NotificationType};
pub use model::project::{Project, ProjectDraft, ProjectPatch, Resource, TeamMember};
pub use model::session::{Role, SessionIdentity};
pub use model::task::{Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
pub use repo::kv_repo::{
    InMemoryKvRepository, KvRepository, RepoError, RepoResult, SqliteKvRepository,
};
pub use service::dashboard_service::{
    DashboardService, NewTaskRequest, ServiceError, ServiceResult,
};
pub use service::validation::ValidationError;
pub use store::data_store::DataStore;
pub use store::derive::TaskBoard;
pub use store::session_store::SessionStore;

/// Minimal health-check API for host wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
