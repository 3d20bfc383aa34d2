use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Double-entry transaction header; the Debit/Credit line items live in
/// `journal_line`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Server-assigned voucher number, e.g. "JV-000001"
    #[sea_orm(unique)]
    pub voucher_no: String,

    pub date: Date,

    pub description: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_line::Entity")]
    Lines,
}

impl Related<super::journal_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
