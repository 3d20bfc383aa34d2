use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment voucher: money leaving a cash/bank ledger toward an expense or
/// payee ledger.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Server-assigned voucher number, e.g. "PV-000001"
    #[sea_orm(unique)]
    pub voucher_no: String,

    pub date: Date,

    /// Cash/bank ledger the money leaves
    pub paid_from_ledger_id: i64,
    /// Expense/payee ledger the money goes to
    pub paid_to_ledger_id: i64,

    pub amount: Decimal,

    pub description: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
