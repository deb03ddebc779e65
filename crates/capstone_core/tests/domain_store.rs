use capstone_core::store::derive::{overdue_tasks, unread_count, visible_project_tasks};
use capstone_core::{
    DataStore, InMemoryKvRepository, NotificationDraft, NotificationType, ProjectDraft,
    ProjectPatch, Role, SessionIdentity, StorageKeys, TaskBoard, TaskDraft, TaskPatch,
    TaskStatus, TeamMember,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

const LEAD: &str = "lead@school.edu";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn alice() -> TeamMember {
    TeamMember::new("m1", "Alice Chen", "Developer", "").with_user_email("alice@school.edu")
}

fn bob() -> TeamMember {
    TeamMember::new("m2", "Bob", "Designer", "")
}

fn store_with_project() -> (DataStore, String) {
    let mut store = DataStore::new();
    let mut draft = ProjectDraft::new("Smart Campus", date(2025, 4, 1), date(2025, 7, 31));
    draft.team_members = vec![alice(), bob()];
    let project_id = store.add_project(draft);
    (store, project_id)
}

fn task_draft(title: &str, assignees: Vec<TeamMember>) -> TaskDraft {
    let mut draft = TaskDraft::new(title, date(2025, 5, 1), LEAD);
    draft.assigned_to = assignees;
    draft
}

#[test]
fn add_task_notifies_each_assignee() {
    let (mut store, project_id) = store_with_project();

    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", vec![alice(), bob()]))
        .unwrap();

    let notifications = store.notifications();
    assert_eq!(notifications.len(), 2);
    for notification in notifications {
        assert_eq!(notification.kind, NotificationType::Info);
        assert_eq!(notification.title, "New Task Assigned");
        assert_eq!(
            notification.message,
            "You have been assigned to the task \"Wire sensors\""
        );
        assert_eq!(notification.task_id.as_deref(), Some(task_id.as_str()));
        assert!(!notification.is_read);
    }
    let recipients: HashSet<_> = notifications
        .iter()
        .filter_map(|n| n.recipient_id.as_deref())
        .collect();
    assert_eq!(recipients, HashSet::from(["m1", "m2"]));

    let task = store.task(&project_id, &task_id).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.created_by, LEAD);
}

#[test]
fn add_task_without_assignees_is_silent() {
    let (mut store, project_id) = store_with_project();

    store
        .add_task(&project_id, task_draft("Write report", Vec::new()))
        .unwrap();

    assert!(store.notifications().is_empty());
}

#[test]
fn add_task_to_missing_project_returns_none_without_notices() {
    let (mut store, _) = store_with_project();

    assert!(store
        .add_task("missing", task_draft("Orphan", vec![alice()]))
        .is_none());
    assert!(store.notifications().is_empty());
}

#[test]
fn completing_a_task_emits_one_success_notice() {
    let (mut store, project_id) = store_with_project();
    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", vec![alice()]))
        .unwrap();

    assert!(store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed)));

    let newest = &store.notifications()[0];
    assert_eq!(store.notifications().len(), 2);
    assert_eq!(newest.kind, NotificationType::Success);
    assert_eq!(newest.title, "Task Completed");
    assert_eq!(
        newest.message,
        "The task \"Wire sensors\" has been marked as completed"
    );
    assert!(newest.is_broadcast());
    assert_eq!(newest.task_id.as_deref(), Some(task_id.as_str()));
}

#[test]
fn resaving_a_completed_task_emits_nothing() {
    let (mut store, project_id) = store_with_project();
    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", Vec::new()))
        .unwrap();
    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed));
    assert_eq!(store.notifications().len(), 1);

    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed));
    let rename = TaskPatch {
        title: Some("Wire all sensors".to_string()),
        ..TaskPatch::default()
    };
    store.update_task(&project_id, &task_id, rename);

    assert_eq!(store.notifications().len(), 1);
    assert_eq!(
        store.task(&project_id, &task_id).unwrap().title,
        "Wire all sensors"
    );
}

#[test]
fn reopened_task_completes_again() {
    let (mut store, project_id) = store_with_project();
    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", Vec::new()))
        .unwrap();

    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed));
    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::InProgress));
    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed));

    let completions = store
        .notifications()
        .iter()
        .filter(|n| n.kind == NotificationType::Success)
        .count();
    assert_eq!(completions, 2);
}

#[test]
fn update_task_notifies_only_new_assignees() {
    let (mut store, project_id) = store_with_project();
    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", vec![alice()]))
        .unwrap();

    let reassign = TaskPatch {
        assigned_to: Some(vec![alice(), bob()]),
        ..TaskPatch::default()
    };
    assert!(store.update_task(&project_id, &task_id, reassign));

    assert_eq!(store.notifications().len(), 2);
    assert_eq!(store.notifications()[0].recipient_id.as_deref(), Some("m2"));
}

#[test]
fn update_and_delete_report_missing_targets() {
    let (mut store, project_id) = store_with_project();

    assert!(!store.update_task(&project_id, "missing", TaskPatch::status(TaskStatus::Completed)));
    assert!(!store.update_task("missing", "missing", TaskPatch::default()));
    assert!(!store.update_project("missing", ProjectPatch::default()));
    assert!(!store.delete_task(&project_id, "missing"));
    assert!(store.notifications().is_empty());
}

#[test]
fn update_project_merges_only_provided_fields() {
    let (mut store, project_id) = store_with_project();

    let patch = ProjectPatch {
        progress: Some(60),
        tags: Some(vec!["IoT".to_string()]),
        ..ProjectPatch::default()
    };
    assert!(store.update_project(&project_id, patch));

    let project = store.get_project_by_id(&project_id).unwrap();
    assert_eq!(project.progress, 60);
    assert_eq!(project.tags, vec!["IoT".to_string()]);
    assert_eq!(project.title, "Smart Campus");
    assert_eq!(project.team_members.len(), 2);
}

#[test]
fn delete_project_drops_its_tasks() {
    let (mut store, project_id) = store_with_project();
    store
        .add_task(&project_id, task_draft("Wire sensors", vec![alice()]))
        .unwrap();

    assert!(store.delete_project(&project_id));
    assert!(store.get_project_by_id(&project_id).is_none());
    assert!(store.get_tasks_for_user("alice@school.edu").is_empty());
}

#[test]
fn notification_feed_operations() {
    let mut store = DataStore::new();
    let first = store.add_notification(NotificationDraft::new(
        NotificationType::Warning,
        "Upcoming Deadline",
        "due soon",
        Utc::now(),
    ));
    let second = store.add_notification(NotificationDraft::new(
        NotificationType::Info,
        "Heads up",
        "",
        Utc::now(),
    ));

    assert!(store.mark_notification_as_read(&first));
    assert_eq!(unread_count(store.notifications()), 1);
    assert_eq!(store.mark_all_notifications_as_read(), 1);
    assert_eq!(unread_count(store.notifications()), 0);

    assert!(store.dismiss_notification(&second));
    assert_eq!(store.notifications().len(), 1);
    assert_eq!(store.notifications()[0].id, first);
}

#[test]
fn tasks_for_user_covers_assignees_creators_and_legacy_names() {
    let (mut store, project_id) = store_with_project();
    store
        .add_task(&project_id, task_draft("For Alice", vec![alice()]))
        .unwrap();
    store
        .add_task(&project_id, task_draft("For Bob", vec![bob()]))
        .unwrap();

    let titles = |email: &str| -> Vec<String> {
        store
            .get_tasks_for_user(email)
            .into_iter()
            .map(|task| task.title.clone())
            .collect()
    };
    assert_eq!(titles("alice@school.edu"), vec!["For Alice"]);
    assert_eq!(titles("BOB@elsewhere.org"), vec!["For Bob"]);
    assert_eq!(titles(LEAD), vec!["For Alice", "For Bob"]);
    assert!(titles("alice.chen@school.edu").is_empty());
}

#[test]
fn notifications_for_user_are_broadcasts_plus_addressed() {
    let (mut store, project_id) = store_with_project();
    let task_id = store
        .add_task(&project_id, task_draft("Wire sensors", vec![alice(), bob()]))
        .unwrap();
    store.update_task(&project_id, &task_id, TaskPatch::status(TaskStatus::Completed));

    let for_alice = store.get_notifications_for_user("alice@school.edu");
    assert_eq!(for_alice.len(), 2);
    assert!(for_alice[0].is_broadcast());
    assert_eq!(for_alice[1].recipient_id.as_deref(), Some("m1"));

    let for_stranger = store.get_notifications_for_user("nobody@school.edu");
    assert_eq!(for_stranger.len(), 1);
    assert!(for_stranger[0].is_broadcast());
}

#[test]
fn task_board_respects_role_visibility() {
    let (mut store, project_id) = store_with_project();
    let done = store
        .add_task(&project_id, task_draft("Done", vec![alice()]))
        .unwrap();
    store
        .add_task(&project_id, task_draft("Bob's", vec![bob()]))
        .unwrap();
    store.update_task(&project_id, &done, TaskPatch::status(TaskStatus::Completed));

    let project = store.get_project_by_id(&project_id).unwrap();
    let leader = SessionIdentity::new(LEAD, Role::Leader);
    let member = SessionIdentity::new("alice@school.edu", Role::Team);

    let full = TaskBoard::from_tasks(visible_project_tasks(project, &leader));
    assert_eq!(full.len(), 2);
    assert_eq!(full.column(TaskStatus::Pending).len(), 1);
    assert_eq!(full.column(TaskStatus::Completed).len(), 1);

    let own = TaskBoard::from_tasks(visible_project_tasks(project, &member));
    assert_eq!(own.len(), 1);
    assert_eq!(own.completed[0].title, "Done");
    assert!(own.pending.is_empty());
}

#[test]
fn overdue_excludes_completed_and_future_tasks() {
    let (mut store, project_id) = store_with_project();
    let late = store
        .add_task(&project_id, task_draft("Late", Vec::new()))
        .unwrap();
    let finished = store
        .add_task(&project_id, task_draft("Finished", Vec::new()))
        .unwrap();
    let mut future = task_draft("Future", Vec::new());
    future.due_date = date(2025, 6, 1);
    store.add_task(&project_id, future).unwrap();
    store.update_task(&project_id, &finished, TaskPatch::status(TaskStatus::Completed));

    let project = store.get_project_by_id(&project_id).unwrap();
    let overdue = overdue_tasks(&project.tasks, date(2025, 5, 2));
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, late);
}

#[test]
fn load_seeds_sample_data_once() {
    let repo = InMemoryKvRepository::new();
    let keys = StorageKeys::default();

    let mut store = DataStore::load(&repo, &keys, true).unwrap();
    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.notifications().len(), 3);
    assert!(store.has_unsaved_changes());

    store.save(&repo, &keys).unwrap();
    assert!(!store.has_unsaved_changes());
    assert_eq!(repo.len(), 2);

    let reloaded = DataStore::load(&repo, &keys, true).unwrap();
    assert!(!reloaded.has_unsaved_changes());
    assert_eq!(reloaded.projects(), store.projects());
}

#[test]
fn load_without_seeding_starts_empty() {
    let repo = InMemoryKvRepository::new();

    let store = DataStore::load(&repo, &StorageKeys::default(), false).unwrap();
    assert!(store.projects().is_empty());
    assert!(store.notifications().is_empty());
    assert!(!store.has_unsaved_changes());
}

fn two_projects_sharing_member_id() -> (DataStore, String, String) {
    let mut store = DataStore::new();
    let mut first = ProjectDraft::new("Smart Campus", date(2025, 4, 1), date(2025, 7, 31));
    first.team_members = vec![shared_id_alice()];
    let first_id = store.add_project(first);
    let mut second = ProjectDraft::new("Learning Assistant", date(2025, 4, 1), date(2025, 7, 31));
    second.team_members = vec![shared_id_bob()];
    let second_id = store.add_project(second);
    (store, first_id, second_id)
}

fn shared_id_alice() -> TeamMember {
    TeamMember::new("1", "Alice", "Developer", "").with_user_email("alice@x.com")
}

fn shared_id_bob() -> TeamMember {
    TeamMember::new("1", "Bob", "Developer", "").with_user_email("bob@x.com")
}

#[test]
fn addressed_notices_stay_within_their_project() {
    let (mut store, first_id, second_id) = two_projects_sharing_member_id();

    store
        .add_task(&second_id, task_draft("Bob only", vec![shared_id_bob()]))
        .unwrap();
    assert!(store.get_notifications_for_user("alice@x.com").is_empty());
    let for_bob = store.get_notifications_for_user("bob@x.com");
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].project_id.as_deref(), Some(second_id.as_str()));
    assert_eq!(for_bob[0].recipient_id.as_deref(), Some("1"));

    store
        .add_task(&first_id, task_draft("Alice only", vec![shared_id_alice()]))
        .unwrap();
    let for_alice = store.get_notifications_for_user("alice@x.com");
    assert_eq!(for_alice.len(), 1);
    assert_eq!(
        for_alice[0].message,
        "You have been assigned to the task \"Alice only\""
    );
    assert_eq!(store.get_notifications_for_user("bob@x.com").len(), 1);
}

#[test]
fn notice_without_project_matches_member_id_in_any_project() {
    let (mut store, _, _) = two_projects_sharing_member_id();
    let mut draft = NotificationDraft::new(NotificationType::Info, "Heads up", "", Utc::now());
    draft.recipient_id = Some("1".to_string());
    store.add_notification(draft);

    assert_eq!(store.get_notifications_for_user("alice@x.com").len(), 1);
    assert_eq!(store.get_notifications_for_user("bob@x.com").len(), 1);
    assert!(store.get_notifications_for_user("carol@x.com").is_empty());
}
