//! Grade rule endpoints. Percentage bands are kept non-overlapping; gaps
//! between bands are allowed and surface as a null grade in results.

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
use crate::entities::grade_rule;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/graderules", get(list_rules).post(create_rule))
        .route(
            "/graderules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeRulePayload {
    #[validate(length(min = 1, message = "Grade name is required"))]
    pub grade_name: String,
    pub min_mark: Decimal,
    pub max_mark: Decimal,
    pub grade_point: Option<Decimal>,
    pub remarks: Option<String>,
}

fn validate_band(payload: &GradeRulePayload) -> Result<(), ServiceError> {
    if payload.min_mark < Decimal::ZERO || payload.max_mark > Decimal::ONE_HUNDRED {
        return Err(ServiceError::ValidationError(
            "Grade band must lie within 0 to 100".to_string(),
        ));
    }
    if payload.min_mark > payload.max_mark {
        return Err(ServiceError::ValidationError(
            "Minimum mark must not exceed maximum mark".to_string(),
        ));
    }
    Ok(())
}

/// Two inclusive bands overlap unless one ends before the other starts.
async fn ensure_no_overlap(
    state: &AppState,
    payload: &GradeRulePayload,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = grade_rule::Entity::find()
        .filter(grade_rule::Column::MinMark.lte(payload.max_mark))
        .filter(grade_rule::Column::MaxMark.gte(payload.min_mark));
    if let Some(id) = exclude_id {
        query = query.filter(grade_rule::Column::Id.ne(id));
    }
    if let Some(existing) = query.one(state.db.as_ref()).await? {
        return Err(ServiceError::ValidationError(format!(
            "Band overlaps existing grade '{}' ({} to {})",
            existing.grade_name, existing.min_mark, existing.max_mark
        )));
    }
    Ok(())
}

pub async fn list_rules(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<grade_rule::Model>>, ServiceError> {
    let query = grade_rule::Entity::find().order_by_desc(grade_rule::Column::MinMark);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GradeRulePayload>,
) -> Result<(StatusCode, Json<grade_rule::Model>), ServiceError> {
    payload.validate()?;
    validate_band(&payload)?;
    ensure_no_overlap(&state, &payload, None).await?;

    let created = grade_rule::ActiveModel {
        grade_name: Set(payload.grade_name),
        min_mark: Set(payload.min_mark),
        max_mark: Set(payload.max_mark),
        grade_point: Set(payload.grade_point),
        remarks: Set(payload.remarks),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, rule_id = created.id, grade = %created.grade_name, "grade rule created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<grade_rule::Model>, ServiceError> {
    let found = grade_rule::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Grade rule {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<GradeRulePayload>,
) -> Result<Json<grade_rule::Model>, ServiceError> {
    payload.validate()?;
    validate_band(&payload)?;
    ensure_no_overlap(&state, &payload, Some(id)).await?;

    let existing = grade_rule::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Grade rule {} not found", id)))?;

    let mut active: grade_rule::ActiveModel = existing.into();
    active.grade_name = Set(payload.grade_name);
    active.min_mark = Set(payload.min_mark);
    active.max_mark = Set(payload.max_mark);
    active.grade_point = Set(payload.grade_point);
    active.remarks = Set(payload.remarks);
    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, rule_id = updated.id, "grade rule updated");
    Ok(Json(updated))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = grade_rule::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Grade rule {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, rule_id = id, "grade rule deleted");
    Ok(StatusCode::NO_CONTENT)
}
