//! Notification drafts emitted by task lifecycle events.

use crate::model::notification::{NotificationDraft, NotificationType};
use crate::model::project::TeamMember;
use crate::model::task::Task;
use chrono::{DateTime, Utc};

const ASSIGNED_TITLE: &str = "New Task Assigned";
const COMPLETED_TITLE: &str = "Task Completed";

/// Notice addressed to `member` of project `project_id` about being
/// assigned to `task`.
pub(crate) fn assignment_notice(
    project_id: &str,
    task: &Task,
    member: &TeamMember,
    now: DateTime<Utc>,
) -> NotificationDraft {
    NotificationDraft::new(
        NotificationType::Info,
        ASSIGNED_TITLE,
        format!("You have been assigned to the task \"{}\"", task.title),
        now,
    )
    .for_task(&task.id)
    .addressed_to(project_id, &member.id)
}

/// Broadcast notice that `task` reached `completed`.
pub(crate) fn completion_notice(task: &Task, now: DateTime<Utc>) -> NotificationDraft {
    NotificationDraft::new(
        NotificationType::Success,
        COMPLETED_TITLE,
        format!("The task \"{}\" has been marked as completed", task.title),
        now,
    )
    .for_task(&task.id)
}

/// Members present in `after` whose id was not in `before`, in `after` order.
pub(crate) fn newly_assigned<'a>(
    before: &[TeamMember],
    after: &'a [TeamMember],
) -> Vec<&'a TeamMember> {
    after
        .iter()
        .filter(|member| !before.iter().any(|existing| existing.id == member.id))
        .collect()
}
