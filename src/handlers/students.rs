//! Student roster endpoints. Roll numbers are unique within a class.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::student;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Roll number must be positive"))]
    pub roll_no: i32,
    pub class_config_id: i64,
    pub academic_year_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentFilters {
    pub class_config_id: Option<i64>,
    pub academic_year_id: Option<i64>,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<StudentFilters>,
) -> Result<Json<Paginated<student::Model>>, ServiceError> {
    let mut query = student::Entity::find().order_by_asc(student::Column::RollNo);
    if let Some(class_id) = filters.class_config_id {
        query = query.filter(student::Column::ClassConfigId.eq(class_id));
    }
    if let Some(year_id) = filters.academic_year_id {
        query = query.filter(student::Column::AcademicYearId.eq(year_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

async fn ensure_roll_available(
    state: &AppState,
    class_config_id: i64,
    roll_no: i32,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = student::Entity::find()
        .filter(student::Column::ClassConfigId.eq(class_config_id))
        .filter(student::Column::RollNo.eq(roll_no));
    if let Some(id) = exclude_id {
        query = query.filter(student::Column::Id.ne(id));
    }
    if query.one(state.db.as_ref()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Roll number {} is already taken in this class",
            roll_no
        )));
    }
    Ok(())
}

pub async fn create_student(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<StudentPayload>,
) -> Result<(StatusCode, Json<student::Model>), ServiceError> {
    payload.validate()?;
    ensure_roll_available(&state, payload.class_config_id, payload.roll_no, None).await?;

    let created = student::ActiveModel {
        name: Set(payload.name),
        roll_no: Set(payload.roll_no),
        class_config_id: Set(payload.class_config_id),
        academic_year_id: Set(payload.academic_year_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, student_id = created.id, "student created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<student::Model>, ServiceError> {
    let found = student::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Student {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_student(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<student::Model>, ServiceError> {
    payload.validate()?;
    ensure_roll_available(&state, payload.class_config_id, payload.roll_no, Some(id)).await?;

    let existing = student::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Student {} not found", id)))?;

    let mut active: student::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.roll_no = Set(payload.roll_no);
    active.class_config_id = Set(payload.class_config_id);
    active.academic_year_id = Set(payload.academic_year_id);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, student_id = updated.id, "student updated");
    Ok(Json(updated))
}

pub async fn delete_student(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = student::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Student {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, student_id = id, "student deleted");
    Ok(StatusCode::NO_CONTENT)
}
