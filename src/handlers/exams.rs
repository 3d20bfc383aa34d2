//! Exam endpoints. Exams parameterize every report query.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::exam;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exams", get(list_exams).post(create_exam))
        .route(
            "/exams/:id",
            get(get_exam).put(update_exam).delete(delete_exam),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExamPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub academic_year_id: i64,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExamFilters {
    pub academic_year_id: Option<i64>,
}

pub async fn list_exams(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<ExamFilters>,
) -> Result<Json<Paginated<exam::Model>>, ServiceError> {
    let mut query = exam::Entity::find().order_by_asc(exam::Column::Id);
    if let Some(year_id) = filters.academic_year_id {
        query = query.filter(exam::Column::AcademicYearId.eq(year_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_exam(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ExamPayload>,
) -> Result<(StatusCode, Json<exam::Model>), ServiceError> {
    payload.validate()?;
    let created = exam::ActiveModel {
        name: Set(payload.name),
        academic_year_id: Set(payload.academic_year_id),
        start_date: Set(payload.start_date),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, exam_id = created.id, "exam created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<exam::Model>, ServiceError> {
    let found = exam::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Exam {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_exam(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ExamPayload>,
) -> Result<Json<exam::Model>, ServiceError> {
    payload.validate()?;
    let existing = exam::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Exam {} not found", id)))?;

    let mut active: exam::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.academic_year_id = Set(payload.academic_year_id);
    active.start_date = Set(payload.start_date);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, exam_id = updated.id, "exam updated");
    Ok(Json(updated))
}

pub async fn delete_exam(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = exam::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Exam {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, exam_id = id, "exam deleted");
    Ok(StatusCode::NO_CONTENT)
}
