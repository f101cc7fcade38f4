use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Teaching semester. The serialized values are the ones used by the
/// historical catalog exports and stored in the database, so they stay
/// Icelandic on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "Vor")]
    Spring,
    #[serde(rename = "Sumar")]
    Summer,
    #[serde(rename = "Haust")]
    Fall,
    #[serde(rename = "Heilsárs")]
    YearRound,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Spring => "Vor",
            Semester::Summer => "Sumar",
            Semester::Fall => "Haust",
            Semester::YearRound => "Heilsárs",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "Vor" => Some(Semester::Spring),
            "Sumar" => Some(Semester::Summer),
            "Haust" => Some(Semester::Fall),
            "Heilsárs" => Some(Semester::YearRound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub course_id: String,
    pub department_id: i64,
    pub title: String,
    pub units: Option<f64>,
    pub semester: Semester,
    pub level: Option<String>,
    pub url: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_id: String,
    pub title: String,
    pub units: Option<f64>,
    pub semester: Semester,
    pub level: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub units: Option<f64>,
    pub semester: Option<Semester>,
    pub level: Option<String>,
    pub url: Option<String>,
}
