use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Year label, e.g. "2025-2026"
    #[sea_orm(unique)]
    pub year: String,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam::Entity")]
    Exam,
    #[sea_orm(has_many = "super::class_config::Entity")]
    ClassConfig,
}

impl Related<super::exam::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::class_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassConfig.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
