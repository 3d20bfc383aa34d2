//! Contra voucher endpoints (cash/bank transfers between two ledgers).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::entities::contra;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::services::vouchers::{self, NewContra};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contras", get(list_contras).post(create_contra))
        .route(
            "/contras/:id",
            get(get_contra).put(update_contra).delete(delete_contra),
        )
}

#[derive(Debug, Deserialize)]
pub struct ContraPayload {
    pub date: NaiveDate,
    pub from_ledger_id: i64,
    pub to_ledger_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl From<ContraPayload> for NewContra {
    fn from(p: ContraPayload) -> Self {
        NewContra {
            date: p.date,
            from_ledger_id: p.from_ledger_id,
            to_ledger_id: p.to_ledger_id,
            amount: p.amount,
            description: p.description,
        }
    }
}

pub async fn list_contras(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<contra::Model>>, ServiceError> {
    let query = contra::Entity::find().order_by_desc(contra::Column::Id);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_contra(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ContraPayload>,
) -> Result<(StatusCode, Json<contra::Model>), ServiceError> {
    let created = vouchers::create_contra(state.db.as_ref(), payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %created.voucher_no, "contra created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_contra(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<contra::Model>, ServiceError> {
    let found = contra::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Contra {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_contra(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ContraPayload>,
) -> Result<Json<contra::Model>, ServiceError> {
    let updated = vouchers::update_contra(state.db.as_ref(), id, payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %updated.voucher_no, "contra updated");
    Ok(Json(updated))
}

pub async fn delete_contra(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    vouchers::delete_contra(state.db.as_ref(), id).await?;
    info!(user_id = user.user_id, contra_id = id, "contra deleted");
    Ok(StatusCode::NO_CONTENT)
}
