use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Roll number, unique within a class
    pub roll_no: i32,

    pub class_config_id: i64,

    pub academic_year_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_config::Entity",
        from = "Column::ClassConfigId",
        to = "super::class_config::Column::Id"
    )]
    ClassConfig,
    #[sea_orm(has_many = "super::subject_mark::Entity")]
    SubjectMark,
}

impl Related<super::class_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassConfig.def()
    }
}

impl Related<super::subject_mark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectMark.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
