//! SeaORM Entity for the report header table.
//!
//! Every report, regardless of kind, owns exactly one row here. The matching
//! detail row lives in the table named by `report_type` and shares
//! `report_id` as its primary key.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub report_id: i32,
    pub create_by: i32,
    /// One of "msp", "error", "log". See [`crate::report::ReportKind`].
    pub report_type: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreateBy",
        to = "super::users::Column::UserId"
    )]
    Creator,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
