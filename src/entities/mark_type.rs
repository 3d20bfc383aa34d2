use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Behavior category a student is scored on (e.g. "Discipline"), with the
/// maximum mark a report may record against it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mark_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub name: String,

    pub max_mark: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::behavior_mark::Entity")]
    BehaviorMark,
}

impl Related<super::behavior_mark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BehaviorMark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
