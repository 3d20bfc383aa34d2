//! Chart-of-accounts endpoints: ledger CRUD plus the filter/sort/paginate
//! list the console's account table drives.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::{account_group_category, account_subcategory, ledger, BalanceSide};
use crate::errors::ServiceError;
use crate::handlers::common::{paginate, Paginated, PaginationParams, SortParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledgers", get(list_ledgers).post(create_ledger))
        .route("/ledgers/options", get(ledger_options))
        .route(
            "/ledgers/:id",
            get(get_ledger).put(update_ledger).delete(delete_ledger),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct LedgerPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    pub subcategory_id: i64,
    pub group_category_id: i64,
    pub balance_type: BalanceSide,
    pub opening_balance: Decimal,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Table filters. Every present predicate is ANDed into the query.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerFilters {
    /// Case-insensitive substring over name, code, and description.
    pub search: Option<String>,
    /// Substring over the subcategory's category label.
    pub category: Option<String>,
    /// Substring over the group category name.
    pub group: Option<String>,
    pub is_active: Option<bool>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
}

fn lower_contains<C>(column: C, term: &str) -> sea_orm::sea_query::SimpleExpr
where
    C: sea_orm::sea_query::IntoColumnRef,
{
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", term.to_lowercase()))
}

/// Build the filtered ledger select shared by the list endpoint and tests.
pub fn filtered_query(filters: &LedgerFilters) -> Select<ledger::Entity> {
    let mut query = ledger::Entity::find();

    if filters.category.is_some() {
        query = query.join(JoinType::LeftJoin, ledger::Relation::Subcategory.def());
    }
    if filters.group.is_some() {
        query = query.join(JoinType::LeftJoin, ledger::Relation::GroupCategory.def());
    }

    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(lower_contains((ledger::Entity, ledger::Column::Name), search))
                .add(lower_contains((ledger::Entity, ledger::Column::Code), search))
                .add(lower_contains(
                    (ledger::Entity, ledger::Column::Description),
                    search,
                )),
        );
    }
    if let Some(category) = filters.category.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(lower_contains(
            (
                account_subcategory::Entity,
                account_subcategory::Column::Category,
            ),
            category,
        ));
    }
    if let Some(group) = filters.group.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(lower_contains(
            (
                account_group_category::Entity,
                account_group_category::Column::Name,
            ),
            group,
        ));
    }
    if let Some(active) = filters.is_active {
        query = query.filter(ledger::Column::IsActive.eq(active));
    }
    if let Some(from) = filters.created_from {
        let start = Utc.from_utc_datetime(&from.and_hms_opt(0, 0, 0).unwrap_or_default());
        query = query.filter(ledger::Column::CreatedAt.gte(start));
    }
    if let Some(to) = filters.created_to {
        let end = Utc.from_utc_datetime(&to.and_hms_opt(23, 59, 59).unwrap_or_default());
        query = query.filter(ledger::Column::CreatedAt.lte(end));
    }

    query
}

fn sort_column(key: &str) -> Option<ledger::Column> {
    match key {
        "name" => Some(ledger::Column::Name),
        "code" => Some(ledger::Column::Code),
        "opening_balance" => Some(ledger::Column::OpeningBalance),
        "current_balance" => Some(ledger::Column::CurrentBalance),
        "is_active" => Some(ledger::Column::IsActive),
        "created_at" => Some(ledger::Column::CreatedAt),
        _ => None,
    }
}

pub async fn list_ledgers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(sort): Query<SortParams>,
    Query(filters): Query<LedgerFilters>,
) -> Result<Json<Paginated<ledger::Model>>, ServiceError> {
    let mut query = filtered_query(&filters);

    match sort.sort_by.as_deref().and_then(sort_column) {
        Some(column) if sort.is_descending() => query = query.order_by_desc(column),
        Some(column) => query = query.order_by_asc(column),
        None => query = query.order_by_asc(ledger::Column::Id),
    }

    let page = paginate(state.db.as_ref(), query, pagination).await?;
    Ok(Json(page))
}

pub async fn create_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LedgerPayload>,
) -> Result<(StatusCode, Json<ledger::Model>), ServiceError> {
    payload.validate()?;
    ensure_code_available(&state, &payload.code, None).await?;

    let now = Utc::now();
    let model = ledger::ActiveModel {
        name: Set(payload.name),
        code: Set(payload.code),
        subcategory_id: Set(payload.subcategory_id),
        group_category_id: Set(payload.group_category_id),
        balance_type: Set(payload.balance_type),
        opening_balance: Set(payload.opening_balance),
        current_balance: Set(payload.opening_balance),
        description: Set(payload.description),
        is_active: Set(payload.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(state.db.as_ref()).await?;
    info!(user_id = user.user_id, ledger_id = created.id, code = %created.code, "ledger created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_ledger(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ledger::Model>, ServiceError> {
    let found = ledger::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Ledger {} not found", id)))?;
    Ok(Json(found))
}

pub async fn update_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<LedgerPayload>,
) -> Result<Json<ledger::Model>, ServiceError> {
    payload.validate()?;
    ensure_code_available(&state, &payload.code, Some(id)).await?;

    let existing = ledger::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Ledger {} not found", id)))?;

    // Re-base the running balance when the opening balance moves.
    let adjusted_current =
        existing.current_balance + (payload.opening_balance - existing.opening_balance);

    let mut active: ledger::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.code = Set(payload.code);
    active.subcategory_id = Set(payload.subcategory_id);
    active.group_category_id = Set(payload.group_category_id);
    active.balance_type = Set(payload.balance_type);
    active.opening_balance = Set(payload.opening_balance);
    active.current_balance = Set(adjusted_current);
    active.description = Set(payload.description);
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now());

    let updated = active.update(state.db.as_ref()).await?;
    info!(user_id = user.user_id, ledger_id = updated.id, "ledger updated");
    Ok(Json(updated))
}

pub async fn delete_ledger(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let existing = ledger::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Ledger {} not found", id)))?;
    existing.delete(state.db.as_ref()).await?;
    info!(user_id = user.user_id, ledger_id = id, "ledger deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LedgerOption {
    pub id: i64,
    pub name: String,
}

/// Active-ledger id/name pairs for dropdowns.
pub async fn ledger_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<LedgerOption>>, ServiceError> {
    let options = ledger::Entity::find()
        .filter(ledger::Column::IsActive.eq(true))
        .order_by_asc(ledger::Column::Name)
        .all(state.db.as_ref())
        .await?
        .into_iter()
        .map(|l| LedgerOption {
            id: l.id,
            name: l.name,
        })
        .collect();
    Ok(Json(options))
}

async fn ensure_code_available(
    state: &AppState,
    code: &str,
    exclude_id: Option<i64>,
) -> Result<(), ServiceError> {
    let mut query = ledger::Entity::find().filter(ledger::Column::Code.eq(code));
    if let Some(id) = exclude_id {
        query = query.filter(ledger::Column::Id.ne(id));
    }
    if query.one(state.db.as_ref()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Ledger code '{}' is already in use",
            code
        )));
    }
    Ok(())
}
