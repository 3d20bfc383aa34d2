//! Academic year lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::academic_year;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/academic-years", get(list_years).post(create_year))
        .route(
            "/academic-years/:id",
            get(get_year).put(update_year).delete(delete_year),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct AcademicYearPayload {
    #[validate(length(min = 1, message = "Year label is required"))]
    pub year: String,
    #[serde(default)]
    pub is_active: bool,
}

pub async fn list_years(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<academic_year::Model>>, ServiceError> {
    let query = academic_year::Entity::find().order_by_desc(academic_year::Column::Year);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_year(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AcademicYearPayload>,
) -> Result<(StatusCode, Json<academic_year::Model>), ServiceError> {
    payload.validate()?;
    if academic_year::Entity::find()
        .filter(academic_year::Column::Year.eq(payload.year.as_str()))
        .one(state.db.as_ref())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "Academic year '{}' already exists",
            payload.year
        )));
    }

    let created = academic_year::ActiveModel {
        year: Set(payload.year),
        is_active: Set(payload.is_active),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, year_id = created.id, "academic year created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_year(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<academic_year::Model>, ServiceError> {
    let found = academic_year::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Academic year {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_year(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<AcademicYearPayload>,
) -> Result<Json<academic_year::Model>, ServiceError> {
    payload.validate()?;
    let existing = academic_year::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Academic year {} not found", id)))?;

    let mut active: academic_year::ActiveModel = existing.into();
    active.year = Set(payload.year);
    active.is_active = Set(payload.is_active);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, year_id = updated.id, "academic year updated");
    Ok(Json(updated))
}

pub async fn delete_year(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = academic_year::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Academic year {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, year_id = id, "academic year deleted");
    Ok(StatusCode::NO_CONTENT)
}
