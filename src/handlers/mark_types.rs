//! Behavior mark type endpoints.

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
use crate::entities::mark_type;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/mark-types", get(list_mark_types).post(create_mark_type))
        .route(
            "/mark-types/:id",
            get(get_mark_type)
                .put(update_mark_type)
                .delete(delete_mark_type),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkTypePayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub max_mark: Decimal,
}

fn validate_max_mark(max_mark: Decimal) -> Result<(), ServiceError> {
    if max_mark <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Maximum mark must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_name_available(
    state: &AppState,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = mark_type::Entity::find().filter(mark_type::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(mark_type::Column::Id.ne(id));
    }
    if query.one(state.db.as_ref()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Mark type '{}' already exists",
            name
        )));
    }
    Ok(())
}

pub async fn list_mark_types(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<mark_type::Model>>, ServiceError> {
    let query = mark_type::Entity::find().order_by_asc(mark_type::Column::Id);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_mark_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MarkTypePayload>,
) -> Result<(StatusCode, Json<mark_type::Model>), ServiceError> {
    payload.validate()?;
    validate_max_mark(payload.max_mark)?;
    ensure_name_available(&state, &payload.name, None).await?;

    let created = mark_type::ActiveModel {
        name: Set(payload.name),
        max_mark: Set(payload.max_mark),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, mark_type_id = created.id, "mark type created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_mark_type(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<mark_type::Model>, ServiceError> {
    let found = mark_type::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Mark type {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_mark_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<MarkTypePayload>,
) -> Result<Json<mark_type::Model>, ServiceError> {
    payload.validate()?;
    validate_max_mark(payload.max_mark)?;
    ensure_name_available(&state, &payload.name, Some(id)).await?;

    let existing = mark_type::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Mark type {} not found", id)))?;

    let mut active: mark_type::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.max_mark = Set(payload.max_mark);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, mark_type_id = updated.id, "mark type updated");
    Ok(Json(updated))
}

pub async fn delete_mark_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = mark_type::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Mark type {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, mark_type_id = id, "mark type deleted");
    Ok(StatusCode::NO_CONTENT)
}
