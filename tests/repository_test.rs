use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use catalog::db::repository;
use catalog::db::update::UpdateOutcome;
use catalog::models::{NewCourseRequest, Semester, UpdateCourseRequest, UpdateDepartmentRequest};

async fn setup_test_db() -> SqlitePool {
    // one connection keeps the in-memory database alive across queries
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse connection string")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test db");

    sqlx::raw_sql(include_str!("../sql/schema.sql"))
        .execute(&pool)
        .await
        .expect("Failed to create schema");

    pool
}

#[tokio::test]
async fn insert_and_fetch_department() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(
        &pool,
        "Tölvunarfræði",
        "tolvunarfraedi",
        "Deild tölvunarfræði",
    )
    .await
    .expect("Failed to insert department")
    .expect("Insert should return the created row");

    assert_eq!(department.title, "Tölvunarfræði");
    assert_eq!(department.slug, "tolvunarfraedi");
    assert_eq!(department.created, department.updated);

    let by_slug = repository::find_department_by_slug(&pool, "tolvunarfraedi")
        .await
        .expect("Failed to fetch department")
        .expect("Department should exist");
    assert_eq!(by_slug.id, department.id);

    let all = repository::fetch_departments(&pool)
        .await
        .expect("Failed to list departments");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn missing_department_is_absent_not_an_error() {
    let pool = setup_test_db().await;

    let department = repository::find_department_by_slug(&pool, "unknown")
        .await
        .expect("A missing row is not a storage failure");
    assert!(department.is_none());
}

#[tokio::test]
async fn course_round_trips_through_insert_and_fetch() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(&pool, "Tölvunarfræði", "tolvunarfraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let created = repository::insert_course(
        &pool,
        department.id,
        NewCourseRequest {
            course_id: "TOL101".to_string(),
            title: "Intro".to_string(),
            units: Some(6.0),
            semester: Semester::Fall,
            level: None,
            url: None,
        },
    )
    .await
    .expect("Failed to insert course")
    .expect("Insert should return the created row");

    let by_id = repository::find_course_by_id(&pool, created.id)
        .await
        .expect("Failed to fetch course")
        .expect("Course should exist");
    assert_eq!(by_id.course_id, "TOL101");
    assert_eq!(by_id.title, "Intro");
    assert_eq!(by_id.units, Some(6.0));
    assert_eq!(by_id.semester, Semester::Fall);

    let by_code = repository::find_course_by_code(&pool, department.id, "TOL101")
        .await
        .expect("Failed to fetch course")
        .expect("Course should exist");
    assert_eq!(by_code.id, created.id);
    assert_eq!(by_code.department_id, department.id);
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(
        &pool,
        "Efnafræði",
        "efnafraedi",
        "Deild efnafræði",
    )
    .await
    .expect("Failed to insert department")
    .expect("Insert should return the created row");

    let outcome = repository::update_department(
        &pool,
        department.id,
        UpdateDepartmentRequest {
            title: Some("Lífefnafræði".to_string()),
            description: None,
        },
    )
    .await
    .expect("Failed to update department");

    let UpdateOutcome::Updated(updated) = outcome else {
        panic!("expected an updated department");
    };
    assert_eq!(updated.title, "Lífefnafræði");
    assert_eq!(updated.description, "Deild efnafræði");
    assert_eq!(updated.slug, "efnafraedi");
    assert!(updated.updated >= updated.created);
}

#[tokio::test]
async fn empty_update_is_a_noop() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(&pool, "Efnafræði", "efnafraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let outcome =
        repository::update_department(&pool, department.id, UpdateDepartmentRequest::default())
            .await
            .expect("A no-op update should not fail");
    assert!(matches!(outcome, UpdateOutcome::NothingToUpdate));
}

#[tokio::test]
async fn update_missing_department_reports_not_found() {
    let pool = setup_test_db().await;

    let outcome = repository::update_department(
        &pool,
        999,
        UpdateDepartmentRequest {
            title: Some("Enginn".to_string()),
            description: None,
        },
    )
    .await
    .expect("Failed to run update");
    assert!(matches!(outcome, UpdateOutcome::NotFound));
}

#[tokio::test]
async fn update_course_units_and_semester() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(&pool, "Efnafræði", "efnafraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let course = repository::insert_course(
        &pool,
        department.id,
        NewCourseRequest {
            course_id: "EFN101G".to_string(),
            title: "Almenn efnafræði".to_string(),
            units: Some(6.0),
            semester: Semester::Fall,
            level: Some("Grunnnám".to_string()),
            url: None,
        },
    )
    .await
    .expect("Failed to insert course")
    .expect("Insert should return the created row");

    let outcome = repository::update_course(
        &pool,
        course.id,
        UpdateCourseRequest {
            units: Some(7.5),
            semester: Some(Semester::Spring),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update course");

    let UpdateOutcome::Updated(updated) = outcome else {
        panic!("expected an updated course");
    };
    assert_eq!(updated.units, Some(7.5));
    assert_eq!(updated.semester, Semester::Spring);
    assert_eq!(updated.title, "Almenn efnafræði");
    assert_eq!(updated.level.as_deref(), Some("Grunnnám"));
}

#[tokio::test]
async fn delete_returns_whether_a_row_was_removed() {
    let pool = setup_test_db().await;

    let removed = repository::delete_department_by_slug(&pool, "does-not-exist")
        .await
        .expect("Deleting a missing row is not an error");
    assert!(!removed);

    repository::insert_department(&pool, "Efnafræði", "efnafraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let removed = repository::delete_department_by_slug(&pool, "efnafraedi")
        .await
        .expect("Failed to delete department");
    assert!(removed);

    let removed = repository::delete_department_by_slug(&pool, "efnafraedi")
        .await
        .expect("Failed to delete department");
    assert!(!removed);
}

#[tokio::test]
async fn deleting_a_department_cascades_to_its_courses() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(&pool, "Efnafræði", "efnafraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let course = repository::insert_course(
        &pool,
        department.id,
        NewCourseRequest {
            course_id: "EFN101G".to_string(),
            title: "Almenn efnafræði".to_string(),
            units: Some(6.0),
            semester: Semester::Fall,
            level: None,
            url: None,
        },
    )
    .await
    .expect("Failed to insert course")
    .expect("Insert should return the created row");

    repository::delete_department_by_slug(&pool, "efnafraedi")
        .await
        .expect("Failed to delete department");

    let gone = repository::find_course_by_id(&pool, course.id)
        .await
        .expect("Failed to fetch course");
    assert!(gone.is_none());
}

#[tokio::test]
async fn delete_course_boundary() {
    let pool = setup_test_db().await;

    let department = repository::insert_department(&pool, "Efnafræði", "efnafraedi", "")
        .await
        .expect("Failed to insert department")
        .expect("Insert should return the created row");

    let removed = repository::delete_course_by_code(&pool, department.id, "EFN101G")
        .await
        .expect("Deleting a missing course is not an error");
    assert!(!removed);
}
