//! Behavior mark endpoints. Marks are bounded by their type's maximum.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::entities::{behavior_mark, mark_type};
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/behavior-marks", get(list_marks).post(create_mark))
        .route(
            "/behavior-marks/:id",
            get(get_mark).put(update_mark).delete(delete_mark),
        )
}

#[derive(Debug, Deserialize)]
pub struct BehaviorMarkPayload {
    pub student_id: i64,
    pub exam_id: i64,
    pub mark_type_id: i64,
    pub mark: Decimal,
}

async fn validate_against_type(
    state: &AppState,
    payload: &BehaviorMarkPayload,
) -> Result<(), ServiceError> {
    let mark_type = mark_type::Entity::find_by_id(payload.mark_type_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Mark type {} not found", payload.mark_type_id))
        })?;

    if payload.mark < Decimal::ZERO || payload.mark > mark_type.max_mark {
        return Err(ServiceError::ValidationError(format!(
            "Mark must be between 0 and {} for '{}'",
            mark_type.max_mark, mark_type.name
        )));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct BehaviorFilters {
    pub exam_id: Option<i64>,
    pub student_id: Option<i64>,
}

pub async fn list_marks(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<BehaviorFilters>,
) -> Result<Json<Paginated<behavior_mark::Model>>, ServiceError> {
    let mut query = behavior_mark::Entity::find().order_by_asc(behavior_mark::Column::Id);
    if let Some(exam_id) = filters.exam_id {
        query = query.filter(behavior_mark::Column::ExamId.eq(exam_id));
    }
    if let Some(student_id) = filters.student_id {
        query = query.filter(behavior_mark::Column::StudentId.eq(student_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BehaviorMarkPayload>,
) -> Result<(StatusCode, Json<behavior_mark::Model>), ServiceError> {
    validate_against_type(&state, &payload).await?;

    let created = behavior_mark::ActiveModel {
        student_id: Set(payload.student_id),
        exam_id: Set(payload.exam_id),
        mark_type_id: Set(payload.mark_type_id),
        mark: Set(payload.mark),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, behavior_mark_id = created.id, "behavior mark created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_mark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<behavior_mark::Model>, ServiceError> {
    let found = behavior_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Behavior mark {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<BehaviorMarkPayload>,
) -> Result<Json<behavior_mark::Model>, ServiceError> {
    validate_against_type(&state, &payload).await?;

    let existing = behavior_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Behavior mark {} not found", id)))?;

    let mut active: behavior_mark::ActiveModel = existing.into();
    active.student_id = Set(payload.student_id);
    active.exam_id = Set(payload.exam_id);
    active.mark_type_id = Set(payload.mark_type_id);
    active.mark = Set(payload.mark);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, behavior_mark_id = updated.id, "behavior mark updated");
    Ok(Json(updated))
}

pub async fn delete_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = behavior_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Behavior mark {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, behavior_mark_id = id, "behavior mark deleted");
    Ok(StatusCode::NO_CONTENT)
}
