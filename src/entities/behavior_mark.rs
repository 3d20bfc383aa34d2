use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-student per-behavior-type mark, bounded by the type's configured
/// maximum.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "behavior_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub student_id: i64,
    pub exam_id: i64,
    pub mark_type_id: i64,

    pub mark: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::mark_type::Entity",
        from = "Column::MarkTypeId",
        to = "super::mark_type::Column::Id"
    )]
    MarkType,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::mark_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MarkType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
