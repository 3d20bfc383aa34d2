//! Subject mark configuration endpoints: per exam/class subject list with
//! max/pass marks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::subject_mark_config;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subject-mark-configs",
            get(list_configs).post(create_config),
        )
        .route(
            "/subject-mark-configs/:id",
            get(get_config).put(update_config).delete(delete_config),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubjectMarkConfigPayload {
    pub exam_id: i64,
    pub class_config_id: i64,
    #[validate(length(min = 1, message = "Subject name is required"))]
    pub subject_name: String,
    pub max_mark: Decimal,
    pub pass_mark: Decimal,
    #[serde(default)]
    pub is_compulsory: bool,
}

fn validate_marks(payload: &SubjectMarkConfigPayload) -> Result<(), ServiceError> {
    if payload.max_mark <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Maximum mark must be greater than zero".to_string(),
        ));
    }
    if payload.pass_mark < Decimal::ZERO || payload.pass_mark > payload.max_mark {
        return Err(ServiceError::ValidationError(
            "Pass mark must be between zero and the maximum mark".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFilters {
    pub exam_id: Option<i64>,
    pub class_config_id: Option<i64>,
}

pub async fn list_configs(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<ConfigFilters>,
) -> Result<Json<Paginated<subject_mark_config::Model>>, ServiceError> {
    let mut query =
        subject_mark_config::Entity::find().order_by_asc(subject_mark_config::Column::Id);
    if let Some(exam_id) = filters.exam_id {
        query = query.filter(subject_mark_config::Column::ExamId.eq(exam_id));
    }
    if let Some(class_id) = filters.class_config_id {
        query = query.filter(subject_mark_config::Column::ClassConfigId.eq(class_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_config(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubjectMarkConfigPayload>,
) -> Result<(StatusCode, Json<subject_mark_config::Model>), ServiceError> {
    payload.validate()?;
    validate_marks(&payload)?;

    let created = subject_mark_config::ActiveModel {
        exam_id: Set(payload.exam_id),
        class_config_id: Set(payload.class_config_id),
        subject_name: Set(payload.subject_name),
        max_mark: Set(payload.max_mark),
        pass_mark: Set(payload.pass_mark),
        is_compulsory: Set(payload.is_compulsory),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, config_id = created.id, "subject mark config created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<subject_mark_config::Model>, ServiceError> {
    let found = subject_mark_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark config {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_config(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<SubjectMarkConfigPayload>,
) -> Result<Json<subject_mark_config::Model>, ServiceError> {
    payload.validate()?;
    validate_marks(&payload)?;

    let existing = subject_mark_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark config {} not found", id)))?;

    let mut active: subject_mark_config::ActiveModel = existing.into();
    active.exam_id = Set(payload.exam_id);
    active.class_config_id = Set(payload.class_config_id);
    active.subject_name = Set(payload.subject_name);
    active.max_mark = Set(payload.max_mark);
    active.pass_mark = Set(payload.pass_mark);
    active.is_compulsory = Set(payload.is_compulsory);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, config_id = updated.id, "subject mark config updated");
    Ok(Json(updated))
}

pub async fn delete_config(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = subject_mark_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Subject mark config {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, config_id = id, "subject mark config deleted");
    Ok(StatusCode::NO_CONTENT)
}
