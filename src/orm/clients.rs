//! SeaORM Entity for the client registry.
//!
//! A manually curated lookup list, distinct from the client names that
//! appear on report rows. Feeds the submission form dropdowns.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub client_id: i32,
    pub client_name: String,
    pub system_name: Option<String>,
    pub target_env: Option<String>,
    pub target_component: Option<String>,
    pub cloud_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
