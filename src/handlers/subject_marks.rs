//! Subject mark entry endpoints. Marks are validated against the subject's
//! configured maximum at write time so downstream percentages stay bounded.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::entities::{subject_mark, subject_mark_config};
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subject-marks", get(list_marks).post(create_mark))
        .route(
            "/subject-marks/:id",
            get(get_mark).put(update_mark).delete(delete_mark),
        )
}

#[derive(Debug, Deserialize)]
pub struct SubjectMarkPayload {
    pub exam_id: i64,
    pub student_id: i64,
    pub subject_config_id: i64,
    pub obtained_mark: Decimal,
    #[serde(default)]
    pub is_absent: bool,
}

/// Reject marks outside [0, config.max_mark].
async fn validate_against_config(
    state: &AppState,
    payload: &SubjectMarkPayload,
) -> Result<(), ServiceError> {
    let config = subject_mark_config::Entity::find_by_id(payload.subject_config_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Subject mark config {} not found",
                payload.subject_config_id
            ))
        })?;

    if payload.obtained_mark < Decimal::ZERO || payload.obtained_mark > config.max_mark {
        return Err(ServiceError::ValidationError(format!(
            "Obtained mark must be between 0 and {}",
            config.max_mark
        )));
    }
    Ok(())
}

/// Reject a second mark for the same (student, subject) pair; updates pass
/// their own id so moving other fields on an existing row stays legal.
async fn ensure_slot_free(
    state: &AppState,
    payload: &SubjectMarkPayload,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = subject_mark::Entity::find()
        .filter(subject_mark::Column::StudentId.eq(payload.student_id))
        .filter(subject_mark::Column::SubjectConfigId.eq(payload.subject_config_id));
    if let Some(id) = exclude_id {
        query = query.filter(subject_mark::Column::Id.ne(id));
    }
    if query.one(state.db.as_ref()).await?.is_some() {
        return Err(ServiceError::Conflict(
            "A mark for this student and subject already exists".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkFilters {
    pub exam_id: Option<i64>,
    pub student_id: Option<i64>,
    pub subject_config_id: Option<i64>,
}

pub async fn list_marks(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<MarkFilters>,
) -> Result<Json<Paginated<subject_mark::Model>>, ServiceError> {
    let mut query = subject_mark::Entity::find().order_by_asc(subject_mark::Column::Id);
    if let Some(exam_id) = filters.exam_id {
        query = query.filter(subject_mark::Column::ExamId.eq(exam_id));
    }
    if let Some(student_id) = filters.student_id {
        query = query.filter(subject_mark::Column::StudentId.eq(student_id));
    }
    if let Some(config_id) = filters.subject_config_id {
        query = query.filter(subject_mark::Column::SubjectConfigId.eq(config_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubjectMarkPayload>,
) -> Result<(StatusCode, Json<subject_mark::Model>), ServiceError> {
    validate_against_config(&state, &payload).await?;
    ensure_slot_free(&state, &payload, None).await?;

    let created = subject_mark::ActiveModel {
        exam_id: Set(payload.exam_id),
        student_id: Set(payload.student_id),
        subject_config_id: Set(payload.subject_config_id),
        obtained_mark: Set(payload.obtained_mark),
        is_absent: Set(payload.is_absent),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, mark_id = created.id, "subject mark created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_mark(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<subject_mark::Model>, ServiceError> {
    let found = subject_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<SubjectMarkPayload>,
) -> Result<Json<subject_mark::Model>, ServiceError> {
    validate_against_config(&state, &payload).await?;
    ensure_slot_free(&state, &payload, Some(id)).await?;

    let existing = subject_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark {} not found", id)))?;

    let mut active: subject_mark::ActiveModel = existing.into();
    active.exam_id = Set(payload.exam_id);
    active.student_id = Set(payload.student_id);
    active.subject_config_id = Set(payload.subject_config_id);
    active.obtained_mark = Set(payload.obtained_mark);
    active.is_absent = Set(payload.is_absent);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, mark_id = updated.id, "subject mark updated");
    Ok(Json(updated))
}

pub async fn delete_mark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = subject_mark::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, mark_id = id, "subject mark deleted");
    Ok(StatusCode::NO_CONTENT)
}
