use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartmentRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One manifest entry during setup. Never persisted as its own record:
/// it produces one department row plus the courses listed in `csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentImport {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub csv: String,
}
