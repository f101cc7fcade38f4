use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::mapper;
use crate::db::update::{UpdateOutcome, UpdateTable, conditional_update};
use crate::error::AppError;
use crate::models::{
    Course, Department, NewCourseRequest, UpdateCourseRequest, UpdateDepartmentRequest,
};

pub async fn fetch_departments(db: &SqlitePool) -> Result<Vec<Department>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM departments ORDER BY id")
        .fetch_all(db)
        .await?;

    Ok(mapper::departments(&rows))
}

pub async fn find_department_by_id(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<Department>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM departments WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().and_then(mapper::department))
}

pub async fn find_department_by_slug(
    db: &SqlitePool,
    slug: &str,
) -> Result<Option<Department>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM departments WHERE slug = ?1")
        .bind(slug)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().and_then(mapper::department))
}

pub async fn insert_department(
    db: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Option<Department>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    let row = sqlx::query(
        "INSERT INTO departments (title, slug, description, created, updated) \
         VALUES (?1, ?2, ?3, ?4, ?5) RETURNING *",
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .bind(&now)
    .bind(&now)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().and_then(mapper::department))
}

pub async fn update_department(
    db: &SqlitePool,
    id: i64,
    req: UpdateDepartmentRequest,
) -> Result<UpdateOutcome<Department>, AppError> {
    let mut fields: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(title) = req.title {
        fields.push("title");
        values.push(Value::String(title));
    }
    if let Some(description) = req.description {
        fields.push("description");
        values.push(Value::String(description));
    }
    // only touch the updated stamp when something else actually changes,
    // so an empty patch stays a true no-op
    if !fields.is_empty() {
        fields.push("updated");
        values.push(Value::String(Utc::now().to_rfc3339()));
    }

    let outcome = conditional_update(db, UpdateTable::Department, id, &fields, &values).await?;
    Ok(outcome.map(|row| mapper::department(&row)))
}

pub async fn delete_department_by_slug(
    db: &SqlitePool,
    slug: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM departments WHERE slug = ?1")
        .bind(slug)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn fetch_courses_by_department(
    db: &SqlitePool,
    department_id: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM courses WHERE department_id = ?1 ORDER BY id")
        .bind(department_id)
        .fetch_all(db)
        .await?;

    Ok(mapper::courses(&rows))
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM courses WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().and_then(mapper::course))
}

/// Look a course up by its external catalog code within one department.
pub async fn find_course_by_code(
    db: &SqlitePool,
    department_id: i64,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM courses WHERE department_id = ?1 AND course_id = ?2")
        .bind(department_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;

    Ok(row.as_ref().and_then(mapper::course))
}

pub async fn insert_course(
    db: &SqlitePool,
    department_id: i64,
    req: NewCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    let row = sqlx::query(
        "INSERT INTO courses \
         (course_id, department_id, title, units, semester, level, url, created, updated) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING *",
    )
    .bind(&req.course_id)
    .bind(department_id)
    .bind(&req.title)
    .bind(req.units)
    .bind(req.semester.as_str())
    .bind(&req.level)
    .bind(&req.url)
    .bind(&now)
    .bind(&now)
    .fetch_optional(db)
    .await?;

    Ok(row.as_ref().and_then(mapper::course))
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<UpdateOutcome<Course>, AppError> {
    let mut fields: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(title) = req.title {
        fields.push("title");
        values.push(Value::String(title));
    }
    if let Some(units) = req.units {
        fields.push("units");
        values.push(Value::from(units));
    }
    if let Some(semester) = req.semester {
        fields.push("semester");
        values.push(Value::String(semester.as_str().to_string()));
    }
    if let Some(level) = req.level {
        fields.push("level");
        values.push(Value::String(level));
    }
    if let Some(url) = req.url {
        fields.push("url");
        values.push(Value::String(url));
    }
    if !fields.is_empty() {
        fields.push("updated");
        values.push(Value::String(Utc::now().to_rfc3339()));
    }

    let outcome = conditional_update(db, UpdateTable::Course, id, &fields, &values).await?;
    Ok(outcome.map(|row| mapper::course(&row)))
}

pub async fn delete_course_by_code(
    db: &SqlitePool,
    department_id: i64,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE department_id = ?1 AND course_id = ?2")
        .bind(department_id)
        .bind(course_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
