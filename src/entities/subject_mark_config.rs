use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-subject marking thresholds for an exam/class cohort.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject_mark_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub exam_id: i64,
    pub class_config_id: i64,

    pub subject_name: String,

    pub max_mark: Decimal,
    pub pass_mark: Decimal,

    /// Failing a compulsory subject fails the student regardless of
    /// percentage.
    pub is_compulsory: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam::Entity",
        from = "Column::ExamId",
        to = "super::exam::Column::Id"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::class_config::Entity",
        from = "Column::ClassConfigId",
        to = "super::class_config::Column::Id"
    )]
    ClassConfig,
    #[sea_orm(has_many = "super::subject_mark::Entity")]
    SubjectMark,
}

impl Related<super::subject_mark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectMark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
