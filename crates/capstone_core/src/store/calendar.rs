//! Team calendar views over a user's tasks.

use crate::model::task::{Task, TaskStatus};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Highlight state of a calendar day that has tasks due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// Every task due that day is completed.
    AllCompleted,
    /// At least one task due that day is in progress.
    InProgress,
    Upcoming,
}

pub fn tasks_due_on<'a>(tasks: &[&'a Task], day: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|task| task.due_date == day)
        .collect()
}

/// Status of `day`, or `None` when nothing is due.
pub fn day_status(tasks: &[&Task], day: NaiveDate) -> Option<DayStatus> {
    let due = tasks_due_on(tasks, day);
    if due.is_empty() {
        return None;
    }
    if due.iter().all(|task| task.is_completed()) {
        return Some(DayStatus::AllCompleted);
    }
    if due.iter().any(|task| task.status == TaskStatus::InProgress) {
        return Some(DayStatus::InProgress);
    }
    Some(DayStatus::Upcoming)
}

/// Distinct due dates falling in `year`/`month`, ascending.
pub fn due_days_in_month(tasks: &[&Task], year: i32, month: u32) -> BTreeSet<NaiveDate> {
    tasks
        .iter()
        .map(|task| task.due_date)
        .filter(|due| due.year() == year && due.month() == month)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{day_status, due_days_in_month, tasks_due_on, DayStatus};
    use crate::model::task::{Task, TaskDraft, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, due: NaiveDate, status: TaskStatus) -> Task {
        let mut draft = TaskDraft::new(id, due, "leader@example.com");
        draft.status = status;
        draft.into_task(id.to_string(), Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn day_status_prefers_completed_then_in_progress() {
        let done = task("a", date(2025, 5, 1), TaskStatus::Completed);
        let doing = task("b", date(2025, 5, 2), TaskStatus::InProgress);
        let todo = task("c", date(2025, 5, 2), TaskStatus::Pending);
        let later = task("d", date(2025, 5, 3), TaskStatus::Pending);
        let tasks = vec![&done, &doing, &todo, &later];

        assert_eq!(day_status(&tasks, date(2025, 5, 1)), Some(DayStatus::AllCompleted));
        assert_eq!(day_status(&tasks, date(2025, 5, 2)), Some(DayStatus::InProgress));
        assert_eq!(day_status(&tasks, date(2025, 5, 3)), Some(DayStatus::Upcoming));
        assert_eq!(day_status(&tasks, date(2025, 5, 4)), None);
        assert_eq!(tasks_due_on(&tasks, date(2025, 5, 2)).len(), 2);
    }

    #[test]
    fn due_days_are_limited_to_the_month() {
        let april = task("a", date(2025, 4, 29), TaskStatus::Pending);
        let may = task("b", date(2025, 5, 10), TaskStatus::Pending);
        let may_again = task("c", date(2025, 5, 10), TaskStatus::Completed);
        let tasks = vec![&april, &may, &may_again];

        let days = due_days_in_month(&tasks, 2025, 5);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![date(2025, 5, 10)]);
    }
}
