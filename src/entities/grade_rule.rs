use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mapping from a percentage band [min_mark, max_mark] to a letter grade.
/// Bands are kept non-overlapping at write time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Letter grade, e.g. "A+"
    pub grade_name: String,

    pub min_mark: Decimal,
    pub max_mark: Decimal,

    pub grade_point: Option<Decimal>,

    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether a percentage falls inside this band (inclusive bounds).
    pub fn contains(&self, percentage: Decimal) -> bool {
        percentage >= self.min_mark && percentage <= self.max_mark
    }
}
