//! Class/section configuration endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::class_config;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/class-configs", get(list_classes).post(create_class))
        .route(
            "/class-configs/:id",
            get(get_class).put(update_class).delete(delete_class),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassConfigPayload {
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
    pub section: Option<String>,
    pub academic_year_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassFilters {
    pub academic_year_id: Option<i64>,
}

pub async fn list_classes(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filters): Query<ClassFilters>,
) -> Result<Json<Paginated<class_config::Model>>, ServiceError> {
    let mut query = class_config::Entity::find().order_by_asc(class_config::Column::ClassName);
    if let Some(year_id) = filters.academic_year_id {
        query = query.filter(class_config::Column::AcademicYearId.eq(year_id));
    }
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_class(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ClassConfigPayload>,
) -> Result<(StatusCode, Json<class_config::Model>), ServiceError> {
    payload.validate()?;
    let created = class_config::ActiveModel {
        class_name: Set(payload.class_name),
        section: Set(payload.section),
        academic_year_id: Set(payload.academic_year_id),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, class_config_id = created.id, "class config created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<class_config::Model>, ServiceError> {
    let found = class_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Class config {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ClassConfigPayload>,
) -> Result<Json<class_config::Model>, ServiceError> {
    payload.validate()?;
    let existing = class_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Class config {} not found", id)))?;

    let mut active: class_config::ActiveModel = existing.into();
    active.class_name = Set(payload.class_name);
    active.section = Set(payload.section);
    active.academic_year_id = Set(payload.academic_year_id);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, class_config_id = updated.id, "class config updated");
    Ok(Json(updated))
}

pub async fn delete_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = class_config::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Class config {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, class_config_id = id, "class config deleted");
    Ok(StatusCode::NO_CONTENT)
}
