use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's obtained mark for one subject of one exam.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub exam_id: i64,
    pub student_id: i64,
    pub subject_config_id: i64,

    pub obtained_mark: Decimal,

    /// Absent students carry a zero obtained mark
    pub is_absent: bool,
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
        belongs_to = "super::subject_mark_config::Entity",
        from = "Column::SubjectConfigId",
        to = "super::subject_mark_config::Column::Id"
    )]
    SubjectConfig,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subject_mark_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectConfig.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
