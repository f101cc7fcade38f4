use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use tracing::{debug, error};

use crate::error::AppError;

/// Tables that accept conditional updates, each with the fixed set of
/// columns a partial update may touch. Column names are interpolated into
/// the statement text, so nothing outside these lists may ever reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTable {
    Department,
    Course,
}

impl UpdateTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            UpdateTable::Department => "departments",
            UpdateTable::Course => "courses",
        }
    }

    pub fn allowed_columns(&self) -> &'static [&'static str] {
        match self {
            // slug stays stable once assigned, so it is not listed
            UpdateTable::Department => &["title", "description", "updated"],
            UpdateTable::Course => &["title", "units", "semester", "level", "url", "updated"],
        }
    }
}

/// Outcome of a conditional update, keeping "nothing to update" distinct
/// from "no such row".
#[derive(Debug)]
pub enum UpdateOutcome<T> {
    Updated(T),
    NothingToUpdate,
    NotFound,
}

impl<T> UpdateOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> Option<U>) -> UpdateOutcome<U> {
        match self {
            UpdateOutcome::Updated(value) => match f(value) {
                Some(mapped) => UpdateOutcome::Updated(mapped),
                None => UpdateOutcome::NotFound,
            },
            UpdateOutcome::NothingToUpdate => UpdateOutcome::NothingToUpdate,
            UpdateOutcome::NotFound => UpdateOutcome::NotFound,
        }
    }
}

enum SqlValue {
    Text(String),
    Int(i64),
    Real(f64),
    Null,
}

fn scalar(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(SqlValue::Int(i)),
            None => n.as_f64().map(SqlValue::Real),
        },
        Value::Null => Some(SqlValue::Null),
        _ => None,
    }
}

/// Update only the supplied fields of one row. The id is always bound as
/// the first parameter; every surviving value is bound positionally after
/// it and the full updated row is returned. Pairs naming a column outside
/// the table's allow-list, or carrying a value that is not a JSON string,
/// number or null, are dropped silently to tolerate sparse partial-update
/// payloads. Mismatched input lengths are a caller bug, not a runtime
/// condition.
pub async fn conditional_update(
    db: &SqlitePool,
    table: UpdateTable,
    id: i64,
    fields: &[&str],
    values: &[Value],
) -> Result<UpdateOutcome<SqliteRow>, AppError> {
    if fields.len() != values.len() {
        return Err(AppError::Validation(
            "fields and values must be the same length".to_string(),
        ));
    }

    let pairs: Vec<(&str, SqlValue)> = fields
        .iter()
        .zip(values)
        .filter(|(field, _)| table.allowed_columns().contains(*field))
        .filter_map(|(field, value)| scalar(value).map(|v| (*field, v)))
        .collect();

    if pairs.is_empty() {
        return Ok(UpdateOutcome::NothingToUpdate);
    }

    let assignments: Vec<String> = pairs
        .iter()
        .enumerate()
        .map(|(i, (field, _))| format!("{} = ?{}", field, i + 2))
        .collect();

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?1 RETURNING *",
        table.table_name(),
        assignments.join(", ")
    );
    debug!(query = %sql, id, "conditional update");

    let mut query = sqlx::query(&sql).bind(id);
    for (_, value) in &pairs {
        query = match value {
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Real(r) => query.bind(*r),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    match query.fetch_optional(db).await {
        Ok(Some(row)) => Ok(UpdateOutcome::Updated(row)),
        Ok(None) => Ok(UpdateOutcome::NotFound),
        Err(e) => {
            error!(query = %sql, id, "unable to execute conditional update: {}", e);
            Err(e.into())
        }
    }
}
