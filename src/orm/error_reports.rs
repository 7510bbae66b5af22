//! SeaORM Entity for incident/error reports.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "error_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: i32,
    pub error_start_date: chrono::NaiveDateTime,
    pub error_end_date: Option<chrono::NaiveDateTime>,
    pub client_name: String,
    pub system_name: String,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub target_component: Option<String>,
    pub customer_impact: Option<String>,
    pub error_info: String,
    pub error_reason: Option<String>,
    pub action_taken: Option<String>,
    pub manager: String,
    pub status: Option<String>,
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
