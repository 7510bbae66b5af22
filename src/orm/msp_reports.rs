//! SeaORM Entity for managed-service request reports.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "msp_reports")]
pub struct Model {
    /// Shares its value with the report header; the detail row has no
    /// identity of its own.
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: i32,
    pub request_date: chrono::NaiveDateTime,
    pub completed_date: Option<chrono::NaiveDateTime>,
    pub client_name: String,
    pub system_name: String,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub requester: String,
    pub request_type: String,
    pub request_content: Option<String>,
    pub purpose: Option<String>,
    pub manager: String,
    pub status: Option<String>,
    pub response: Option<String>,
    pub etc: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reports::Entity",
        from = "Column::ReportId",
        to = "super::reports::Column::ReportId"
    )]
    Report,
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
