use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A class/section pairing for an academic year, e.g. "Class Five / A".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub class_name: String,

    pub section: Option<String>,

    pub academic_year_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_year::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_year::Column::Id"
    )]
    AcademicYear,
    #[sea_orm(has_many = "super::student::Entity")]
    Student,
}

impl Related<super::academic_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
