use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::models::{Course, Department, Semester};

/// Map a single row to a department. A row missing any required column, or
/// whose timestamps fail to parse, maps to `None` — never to a partially
/// filled record.
pub fn department(row: &SqliteRow) -> Option<Department> {
    Some(Department {
        id: row.try_get("id").ok()?,
        title: row.try_get("title").ok()?,
        slug: row.try_get("slug").ok()?,
        description: row.try_get("description").ok()?,
        created: timestamp(row, "created")?,
        updated: timestamp(row, "updated")?,
    })
}

/// Map a result set, dropping rows that fail to map and preserving the
/// order of the rest.
pub fn departments(rows: &[SqliteRow]) -> Vec<Department> {
    rows.iter().filter_map(department).collect()
}

/// Map a single row to a course. Every column must be present; `units`,
/// `level` and `url` may hold NULL, which maps to `None` in the record
/// itself. An unknown semester value invalidates the whole row.
pub fn course(row: &SqliteRow) -> Option<Course> {
    let semester: String = row.try_get("semester").ok()?;

    Some(Course {
        id: row.try_get("id").ok()?,
        course_id: row.try_get("course_id").ok()?,
        department_id: row.try_get("department_id").ok()?,
        title: row.try_get("title").ok()?,
        units: row.try_get("units").ok()?,
        semester: Semester::from_value(&semester)?,
        level: row.try_get("level").ok()?,
        url: row.try_get("url").ok()?,
        created: timestamp(row, "created")?,
        updated: timestamp(row, "updated")?,
    })
}

pub fn courses(rows: &[SqliteRow]) -> Vec<Course> {
    rows.iter().filter_map(course).collect()
}

fn timestamp(row: &SqliteRow, column: &str) -> Option<DateTime<Utc>> {
    let raw: String = row.try_get(column).ok()?;
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn single_row(sql: &str) -> SqliteRow {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");
        sqlx::query(sql)
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn maps_complete_department_row() {
        let row = single_row(
            "SELECT 1 AS id, 'Efnafræði' AS title, 'efnafraedi' AS slug, \
             'Deild efnafræði' AS description, \
             '2024-01-02T03:04:05+00:00' AS created, \
             '2024-01-02T03:04:05+00:00' AS updated",
        )
        .await;

        let department = department(&row).expect("should map");
        assert_eq!(department.id, 1);
        assert_eq!(department.title, "Efnafræði");
        assert_eq!(department.slug, "efnafraedi");
        assert_eq!(department.created.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }

    #[tokio::test]
    async fn department_row_missing_description_maps_to_none() {
        let row = single_row(
            "SELECT 1 AS id, 'Efnafræði' AS title, 'efnafraedi' AS slug, \
             '2024-01-02T03:04:05+00:00' AS created, \
             '2024-01-02T03:04:05+00:00' AS updated",
        )
        .await;

        assert!(department(&row).is_none());
    }

    #[tokio::test]
    async fn department_row_with_bad_timestamp_maps_to_none() {
        let row = single_row(
            "SELECT 1 AS id, 'Efnafræði' AS title, 'efnafraedi' AS slug, \
             'Deild efnafræði' AS description, \
             'not a timestamp' AS created, \
             '2024-01-02T03:04:05+00:00' AS updated",
        )
        .await;

        assert!(department(&row).is_none());
    }

    #[tokio::test]
    async fn course_row_with_unknown_semester_maps_to_none() {
        let row = single_row(
            "SELECT 1 AS id, 'TÖL101G' AS course_id, 1 AS department_id, \
             'Tölvunarfræði 1' AS title, 6.0 AS units, 'Winter' AS semester, \
             NULL AS level, NULL AS url, \
             '2024-01-02T03:04:05+00:00' AS created, \
             '2024-01-02T03:04:05+00:00' AS updated",
        )
        .await;

        assert!(course(&row).is_none());
    }

    #[tokio::test]
    async fn course_row_with_null_optionals_maps() {
        let row = single_row(
            "SELECT 1 AS id, 'TÖL101G' AS course_id, 1 AS department_id, \
             'Tölvunarfræði 1' AS title, NULL AS units, 'Haust' AS semester, \
             NULL AS level, NULL AS url, \
             '2024-01-02T03:04:05+00:00' AS created, \
             '2024-01-02T03:04:05+00:00' AS updated",
        )
        .await;

        let course = course(&row).expect("should map");
        assert_eq!(course.units, None);
        assert_eq!(course.semester, Semester::Fall);
        assert_eq!(course.level, None);
    }

    #[tokio::test]
    async fn collection_variant_drops_bad_rows_and_keeps_order() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");
        let rows = sqlx::query(
            "SELECT 1 AS id, 'A' AS title, 'a' AS slug, 'first' AS description, \
             '2024-01-01T00:00:00+00:00' AS created, '2024-01-01T00:00:00+00:00' AS updated \
             UNION ALL \
             SELECT 2, 'B', 'b', 'second', 'garbage', '2024-01-01T00:00:00+00:00' \
             UNION ALL \
             SELECT 3, 'C', 'c', 'third', \
             '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00'",
        )
        .fetch_all(&pool)
        .await
        .expect("Failed to fetch rows");

        let mapped = departments(&rows);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].id, 1);
        assert_eq!(mapped[1].id, 3);
    }
}
