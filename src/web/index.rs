//! Dashboard: the five most recent reports of each type.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{error_reports, log_reports, msp_reports};
use actix_web::{error, get, Error, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index);
}

pub struct RecentRow {
    pub report_id: i32,
    pub date: String,
    pub client_name: String,
    pub system_name: String,
    pub manager: String,
    pub status: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    client: ClientCtx,
    msp_reports: Vec<RecentRow>,
    error_reports: Vec<RecentRow>,
    log_reports: Vec<RecentRow>,
}

#[get("/")]
pub async fn view_index(client: ClientCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();

    let msp = msp_reports::Entity::find()
        .order_by_desc(msp_reports::Column::RequestDate)
        .limit(5)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    let errors = error_reports::Entity::find()
        .order_by_desc(error_reports::Column::ErrorStartDate)
        .limit(5)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    let logs = log_reports::Entity::find()
        .order_by_desc(log_reports::Column::LogDate)
        .limit(5)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(IndexTemplate {
        client,
        msp_reports: msp
            .into_iter()
            .map(|r| RecentRow {
                report_id: r.report_id,
                date: super::fmt_date(Some(r.request_date)),
                client_name: r.client_name,
                system_name: r.system_name,
                manager: r.manager,
                status: r.status.unwrap_or_default(),
            })
            .collect(),
        error_reports: errors
            .into_iter()
            .map(|r| RecentRow {
                report_id: r.report_id,
                date: super::fmt_date(Some(r.error_start_date)),
                client_name: r.client_name,
                system_name: r.system_name,
                manager: r.manager,
                status: r.status.unwrap_or_default(),
            })
            .collect(),
        log_reports: logs
            .into_iter()
            .map(|r| RecentRow {
                report_id: r.report_id,
                date: super::fmt_date(Some(r.log_date)),
                client_name: r.client_name.unwrap_or_default(),
                system_name: r.system_name.unwrap_or_default(),
                manager: r.manager,
                status: r.status.unwrap_or_default(),
            })
            .collect(),
    }
    .to_response())
}
