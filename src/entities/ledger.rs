use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Side of the books an account naturally sits on. Debit-type ledgers
/// (assets, expenses) grow with debits; Credit-type ledgers (income,
/// liabilities) grow with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BalanceSide {
    #[sea_orm(string_value = "Debit")]
    Debit,
    #[sea_orm(string_value = "Credit")]
    Credit,
}

/// A named account in the chart of accounts (e.g., "Cash in Hand") with a
/// running balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Account code, unique within the chart of accounts
    #[sea_orm(unique)]
    pub code: String,

    pub subcategory_id: i64,
    pub group_category_id: i64,

    pub balance_type: BalanceSide,

    pub opening_balance: Decimal,
    pub current_balance: Decimal,

    pub description: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_subcategory::Entity",
        from = "Column::SubcategoryId",
        to = "super::account_subcategory::Column::Id"
    )]
    Subcategory,
    #[sea_orm(
        belongs_to = "super::account_group_category::Entity",
        from = "Column::GroupCategoryId",
        to = "super::account_group_category::Column::Id"
    )]
    GroupCategory,
}

impl Related<super::account_subcategory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategory.def()
    }
}

impl Related<super::account_group_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
