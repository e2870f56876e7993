use crate::types::repository::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted data file shared by the `collect` and `render` stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub organisation_name: String,
    pub collected_at: DateTime<Utc>,
    pub repos: Vec<Record>,
}
