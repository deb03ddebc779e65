//! Sample capstone program data used to seed an empty store.

use crate::model::notification::Notification;
use crate::model::project::Project;
use serde::Deserialize;

const SAMPLE_DATA_JSON: &str = include_str!("sample_data.json");

/// Projects and notifications a fresh dashboard starts with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleData {
    pub projects: Vec<Project>,
    pub notifications: Vec<Notification>,
}

/// Parses the bundled sample data.
pub fn sample_data() -> Result<SampleData, serde_json::Error> {
    serde_json::from_str(SAMPLE_DATA_JSON)
}
