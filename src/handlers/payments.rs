//! Payment voucher endpoints (outflows from a cash/bank ledger).

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
use crate::entities::payment;
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::services::vouchers::{self, NewPayment};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

#[derive(Debug, Deserialize)]
pub struct PaymentPayload {
    pub date: NaiveDate,
    pub paid_from_ledger_id: i64,
    pub paid_to_ledger_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl From<PaymentPayload> for NewPayment {
    fn from(p: PaymentPayload) -> Self {
        NewPayment {
            date: p.date,
            paid_from_ledger_id: p.paid_from_ledger_id,
            paid_to_ledger_id: p.paid_to_ledger_id,
            amount: p.amount,
            description: p.description,
        }
    }
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<payment::Model>>, ServiceError> {
    let query = payment::Entity::find().order_by_desc(payment::Column::Id);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PaymentPayload>,
) -> Result<(StatusCode, Json<payment::Model>), ServiceError> {
    let created = vouchers::create_payment(state.db.as_ref(), payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %created.voucher_no, "payment created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<payment::Model>, ServiceError> {
    let found = payment::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Payment {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentPayload>,
) -> Result<Json<payment::Model>, ServiceError> {
    let updated = vouchers::update_payment(state.db.as_ref(), id, payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %updated.voucher_no, "payment updated");
    Ok(Json(updated))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    vouchers::delete_payment(state.db.as_ref(), id).await?;
    info!(user_id = user.user_id, payment_id = id, "payment deleted");
    Ok(StatusCode::NO_CONTENT)
}
