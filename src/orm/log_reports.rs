//! SeaORM Entity for system log reports.
//!
//! `log_type` is free text. Two sub-features piggyback on it as a
//! discriminator: "SOLIDEO" fixed-time-slot entries and "LEAVE" leave
//! requests are stored as ordinary log rows tagged with those values.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "log_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub report_id: i32,
    pub log_date: chrono::NaiveDateTime,
    pub completed_date: Option<chrono::NaiveDateTime>,
    pub client_name: Option<String>,
    pub system_name: Option<String>,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub log_type: Option<String>,
    pub content: Option<String>,
    pub action: Option<String>,
    pub manager: String,
    pub status: Option<String>,
    pub summary: Option<String>,
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
