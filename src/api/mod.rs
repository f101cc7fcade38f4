use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{Value, json};

use crate::db::repository;
use crate::db::update::UpdateOutcome;
use crate::error::AppError;
use crate::models::{
    Course, Department, NewCourseRequest, NewDepartmentRequest, UpdateCourseRequest,
    UpdateDepartmentRequest,
};
use crate::slug;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{slug}",
            get(get_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route(
            "/departments/{slug}/courses",
            get(list_courses).post(create_course),
        )
        .route(
            "/departments/{slug}/courses/{course_id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!([
        { "href": "/departments", "methods": ["GET", "POST"] },
        { "href": "/departments/:slug", "methods": ["GET", "PATCH", "DELETE"] },
        { "href": "/departments/:slug/courses", "methods": ["GET", "POST"] },
        { "href": "/departments/:slug/courses/:courseId", "methods": ["GET", "PATCH", "DELETE"] },
    ]))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments = repository::fetch_departments(&state.db).await?;
    Ok(Json(departments))
}

async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<NewDepartmentRequest>,
) -> Result<Json<Department>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    let Some(slug) = slug::slugify(&req.title) else {
        return Err(AppError::Validation(
            "title does not produce a usable slug".to_string(),
        ));
    };

    let department =
        repository::insert_department(&state.db, &req.title, &slug, &req.description)
            .await?
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(department))
}

async fn get_department(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Department>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(department))
}

async fn update_department(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<Json<Department>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    match repository::update_department(&state.db, department.id, req).await? {
        UpdateOutcome::Updated(updated) => Ok(Json(updated)),
        UpdateOutcome::NothingToUpdate => {
            Err(AppError::Validation("no fields to update".to_string()))
        }
        UpdateOutcome::NotFound => Err(AppError::NotFound),
    }
}

async fn delete_department(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = repository::delete_department_by_slug(&state.db, &slug).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_courses(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Course>>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let courses = repository::fetch_courses_by_department(&state.db, department.id).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    if req.course_id.trim().is_empty() || req.title.trim().is_empty() {
        return Err(AppError::Validation(
            "course_id and title must not be empty".to_string(),
        ));
    }
    if req.units.is_some_and(|units| units < 0.0) {
        return Err(AppError::Validation(
            "units must not be negative".to_string(),
        ));
    }

    let course = repository::insert_course(&state.db, department.id, req)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(course))
}

async fn get_course(
    State(state): State<AppState>,
    Path((slug, course_id)): Path<(String, String)>,
) -> Result<Json<Course>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let course = repository::find_course_by_code(&state.db, department.id, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path((slug, course_id)): Path<(String, String)>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let course = repository::find_course_by_code(&state.db, department.id, &course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if req.units.is_some_and(|units| units < 0.0) {
        return Err(AppError::Validation(
            "units must not be negative".to_string(),
        ));
    }

    match repository::update_course(&state.db, course.id, req).await? {
        UpdateOutcome::Updated(updated) => Ok(Json(updated)),
        UpdateOutcome::NothingToUpdate => {
            Err(AppError::Validation("no fields to update".to_string()))
        }
        UpdateOutcome::NotFound => Err(AppError::NotFound),
    }
}

async fn delete_course(
    State(state): State<AppState>,
    Path((slug, course_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let department = repository::find_department_by_slug(&state.db, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let removed = repository::delete_course_by_code(&state.db, department.id, &course_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
