//! Journal voucher endpoints. Creation and update enforce the double-entry
//! balance invariant before anything is persisted.

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
use crate::entities::{journal, BalanceSide};
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams};
use crate::services::vouchers::{self, JournalWithLines, NewJournal, NewJournalLine};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journals", get(list_journals).post(create_journal))
        .route(
            "/journals/:id",
            get(get_journal).put(update_journal).delete(delete_journal),
        )
}

#[derive(Debug, Deserialize)]
pub struct JournalLinePayload {
    pub ledger_id: i64,
    pub entry_type: BalanceSide,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct JournalPayload {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub lines: Vec<JournalLinePayload>,
}

impl From<JournalPayload> for NewJournal {
    fn from(p: JournalPayload) -> Self {
        NewJournal {
            date: p.date,
            description: p.description,
            lines: p
                .lines
                .into_iter()
                .map(|l| NewJournalLine {
                    ledger_id: l.ledger_id,
                    entry_type: l.entry_type,
                    amount: l.amount,
                })
                .collect(),
        }
    }
}

pub async fn list_journals(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Paginated<journal::Model>>, ServiceError> {
    let query = journal::Entity::find().order_by_desc(journal::Column::Id);
    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_journal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<JournalPayload>,
) -> Result<(StatusCode, Json<JournalWithLines>), ServiceError> {
    let created = vouchers::create_journal(state.db.as_ref(), payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %created.journal.voucher_no, "journal created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_journal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JournalWithLines>, ServiceError> {
    let found = vouchers::load_journal(state.db.as_ref(), id).await?;
    Ok(Json(found))
}

pub async fn update_journal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<JournalPayload>,
) -> Result<Json<JournalWithLines>, ServiceError> {
    let updated = vouchers::update_journal(state.db.as_ref(), id, payload.into()).await?;
    info!(user_id = user.user_id, voucher_no = %updated.journal.voucher_no, "journal updated");
    Ok(Json(updated))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    vouchers::delete_journal(state.db.as_ref(), id).await?;
    info!(user_id = user.user_id, journal_id = id, "journal deleted");
    Ok(StatusCode::NO_CONTENT)
}
