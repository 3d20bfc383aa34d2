use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fund transfer between two cash/bank ledgers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contras")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Server-assigned voucher number, e.g. "CV-000001"
    #[sea_orm(unique)]
    pub voucher_no: String,

    pub date: Date,

    pub from_ledger_id: i64,
    pub to_ledger_id: i64,

    pub amount: Decimal,

    pub description: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
