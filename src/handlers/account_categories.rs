//! Lookup tables behind the ledger form's dropdowns.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::{account_group_category, account_subcategory};
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account-subcategories",
            get(list_subcategories).post(create_subcategory),
        )
        .route(
            "/account-group-categories",
            get(list_group_categories).post(create_group_category),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubcategoryPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

pub async fn list_subcategories(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<account_subcategory::Model>>, ServiceError> {
    let query = account_subcategory::Entity::find()
        .order_by_asc(account_subcategory::Column::Name);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubcategoryPayload>,
) -> Result<(StatusCode, Json<account_subcategory::Model>), ServiceError> {
    payload.validate()?;
    let created = account_subcategory::ActiveModel {
        name: Set(payload.name),
        category: Set(payload.category),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, subcategory_id = created.id, "account subcategory created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct GroupCategoryPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

pub async fn list_group_categories(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<account_group_category::Model>>, ServiceError> {
    let query = account_group_category::Entity::find()
        .order_by_asc(account_group_category::Column::Name);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_group_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GroupCategoryPayload>,
) -> Result<(StatusCode, Json<account_group_category::Model>), ServiceError> {
    payload.validate()?;
    let created = account_group_category::ActiveModel {
        name: Set(payload.name),
        ..Default::default()
    }
    .insert(state.db.as_ref())
    .await?;
    info!(user_id = user.user_id, group_category_id = created.id, "account group category created");
    Ok((StatusCode::CREATED, Json(created)))
}
