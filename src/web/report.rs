//! Single-report pages: detail view, edit form, edit save, and delete.
//!
//! The edit save endpoint takes the whole form as a key/value map because the
//! field set depends on the stored report type.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{error_reports, log_reports, msp_reports};
use crate::report::{
    self, ErrorFields, LogFields, MspFields, ReportDetail, ReportError, ReportKind,
};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::NaiveDateTime;
use sea_orm::EntityTrait;
use std::collections::HashMap;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_report)
        .service(view_edit_form)
        .service(save_edit)
        .service(delete_report);
}

fn map_report_err(err: ReportError) -> Error {
    match err {
        ReportError::NotFound => error::ErrorNotFound("존재하지 않는 리포트ID입니다."),
        ReportError::InvalidType(_) => error::ErrorBadRequest("알 수 없는 리포트 유형입니다."),
        ReportError::Db(e) => error::ErrorInternalServerError(e),
    }
}

fn split_date(value: Option<NaiveDateTime>) -> (String, String) {
    match value {
        Some(dt) => (
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

/// Stringified MSP detail, dates split into date and time parts so the edit
/// form can prefill its paired inputs.
pub struct MspDetail {
    pub request_date: String,
    pub request_time: String,
    pub completed_date: String,
    pub completed_time: String,
    pub client_name: String,
    pub system_name: String,
    pub target_env: String,
    pub cloud_type: String,
    pub requester: String,
    pub request_type: String,
    pub request_content: String,
    pub purpose: String,
    pub manager: String,
    pub status: String,
    pub response: String,
    pub etc: String,
}

impl From<msp_reports::Model> for MspDetail {
    fn from(r: msp_reports::Model) -> Self {
        let (request_date, request_time) = split_date(Some(r.request_date));
        let (completed_date, completed_time) = split_date(r.completed_date);
        Self {
            request_date,
            request_time,
            completed_date,
            completed_time,
            client_name: r.client_name,
            system_name: r.system_name,
            target_env: r.target_env.unwrap_or_default(),
            cloud_type: r.cloud_type.unwrap_or_default(),
            requester: r.requester,
            request_type: r.request_type,
            request_content: r.request_content.unwrap_or_default(),
            purpose: r.purpose.unwrap_or_default(),
            manager: r.manager,
            status: r.status.unwrap_or_default(),
            response: r.response.unwrap_or_default(),
            etc: r.etc.unwrap_or_default(),
        }
    }
}

pub struct ErrorDetail {
    pub error_start_date: String,
    pub error_start_time: String,
    pub error_end_date: String,
    pub error_end_time: String,
    pub client_name: String,
    pub system_name: String,
    pub target_env: String,
    pub cloud_type: String,
    pub target_component: String,
    pub customer_impact: String,
    pub error_info: String,
    pub error_reason: String,
    pub action_taken: String,
    pub manager: String,
    pub status: String,
    pub etc: String,
}

impl From<error_reports::Model> for ErrorDetail {
    fn from(r: error_reports::Model) -> Self {
        let (error_start_date, error_start_time) = split_date(Some(r.error_start_date));
        let (error_end_date, error_end_time) = split_date(r.error_end_date);
        Self {
            error_start_date,
            error_start_time,
            error_end_date,
            error_end_time,
            client_name: r.client_name,
            system_name: r.system_name,
            target_env: r.target_env.unwrap_or_default(),
            cloud_type: r.cloud_type.unwrap_or_default(),
            target_component: r.target_component.unwrap_or_default(),
            customer_impact: r.customer_impact.unwrap_or_default(),
            error_info: r.error_info,
            error_reason: r.error_reason.unwrap_or_default(),
            action_taken: r.action_taken.unwrap_or_default(),
            manager: r.manager,
            status: r.status.unwrap_or_default(),
            etc: r.etc.unwrap_or_default(),
        }
    }
}

pub struct LogDetail {
    pub log_date: String,
    pub log_time: String,
    pub completed_date: String,
    pub completed_time: String,
    pub client_name: String,
    pub system_name: String,
    pub target_env: String,
    pub cloud_type: String,
    pub log_type: String,
    pub content: String,
    pub action: String,
    pub manager: String,
    pub status: String,
    pub summary: String,
    pub etc: String,
}

impl From<log_reports::Model> for LogDetail {
    fn from(r: log_reports::Model) -> Self {
        let (log_date, log_time) = split_date(Some(r.log_date));
        let (completed_date, completed_time) = split_date(r.completed_date);
        Self {
            log_date,
            log_time,
            completed_date,
            completed_time,
            client_name: r.client_name.unwrap_or_default(),
            system_name: r.system_name.unwrap_or_default(),
            target_env: r.target_env.unwrap_or_default(),
            cloud_type: r.cloud_type.unwrap_or_default(),
            log_type: r.log_type.unwrap_or_default(),
            content: r.content.unwrap_or_default(),
            action: r.action.unwrap_or_default(),
            manager: r.manager,
            status: r.status.unwrap_or_default(),
            summary: r.summary.unwrap_or_default(),
            etc: r.etc.unwrap_or_default(),
        }
    }
}

/// The detail row for one report, tagged by type. Both the detail and edit
/// templates match on this.
pub enum DetailView {
    Msp(MspDetail),
    Error(ErrorDetail),
    Log(LogDetail),
}

async fn load_detail(report_id: i32) -> Result<DetailView, Error> {
    let db = get_db_pool();
    let kind = report::find_kind(db, report_id)
        .await
        .map_err(map_report_err)?;

    let view = match kind {
        ReportKind::Msp => msp_reports::Entity::find_by_id(report_id)
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?
            .map(|r| DetailView::Msp(r.into())),
        ReportKind::Error => error_reports::Entity::find_by_id(report_id)
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?
            .map(|r| DetailView::Error(r.into())),
        ReportKind::Log => log_reports::Entity::find_by_id(report_id)
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?
            .map(|r| DetailView::Log(r.into())),
    };
    view.ok_or_else(|| error::ErrorNotFound("상세 리포트를 찾을 수 없습니다."))
}

#[derive(Template)]
#[template(path = "report/detail.html")]
struct DetailTemplate {
    client: ClientCtx,
    report_id: i32,
    report: DetailView,
}

#[get("/report/{report_id}")]
pub async fn view_report(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let report_id = path.into_inner();
    Ok(DetailTemplate {
        client,
        report_id,
        report: load_detail(report_id).await?,
    }
    .to_response())
}

#[derive(Template)]
#[template(path = "report/edit.html")]
struct EditTemplate {
    client: ClientCtx,
    report_id: i32,
    report: DetailView,
}

#[get("/report/{report_id}/edit")]
pub async fn view_edit_form(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let report_id = path.into_inner();
    Ok(EditTemplate {
        client,
        report_id,
        report: load_detail(report_id).await?,
    }
    .to_response())
}

fn field(form: &HashMap<String, String>, name: &str) -> String {
    form.get(name).cloned().unwrap_or_default()
}

fn opt_field(form: &HashMap<String, String>, name: &str) -> Option<String> {
    super::none_if_empty(field(form, name))
}

fn fields_from_form(
    kind: ReportKind,
    form: &HashMap<String, String>,
) -> Result<ReportDetail, Error> {
    let detail = match kind {
        ReportKind::Msp => ReportDetail::Msp(MspFields {
            request_date: report::parse_date_time(
                "request_date",
                &field(form, "request_date"),
                &field(form, "request_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            completed_date: report::parse_optional_date_time(
                "completed_date",
                &field(form, "completed_date"),
                &field(form, "completed_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            client_name: field(form, "client_name"),
            system_name: field(form, "system_name"),
            target_env: opt_field(form, "target_env"),
            cloud_type: opt_field(form, "cloud_type"),
            requester: field(form, "requester"),
            request_type: field(form, "request_type"),
            request_content: opt_field(form, "request_content"),
            purpose: opt_field(form, "purpose"),
            manager: field(form, "manager"),
            status: opt_field(form, "status"),
            response: opt_field(form, "response"),
            etc: opt_field(form, "etc"),
        }),
        ReportKind::Error => ReportDetail::Error(ErrorFields {
            error_start_date: report::parse_date_time(
                "error_start_date",
                &field(form, "error_start_date"),
                &field(form, "error_start_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            error_end_date: report::parse_optional_date_time(
                "error_end_date",
                &field(form, "error_end_date"),
                &field(form, "error_end_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            client_name: field(form, "client_name"),
            system_name: field(form, "system_name"),
            target_env: opt_field(form, "target_env"),
            cloud_type: opt_field(form, "cloud_type"),
            target_component: opt_field(form, "target_component"),
            customer_impact: opt_field(form, "customer_impact"),
            error_info: field(form, "error_info"),
            error_reason: opt_field(form, "error_reason"),
            action_taken: opt_field(form, "action_taken"),
            manager: field(form, "manager"),
            status: opt_field(form, "status"),
            etc: opt_field(form, "etc"),
        }),
        ReportKind::Log => ReportDetail::Log(LogFields {
            log_date: report::parse_date_time(
                "log_date",
                &field(form, "log_date"),
                &field(form, "log_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            completed_date: report::parse_optional_date_time(
                "completed_date",
                &field(form, "completed_date"),
                &field(form, "completed_time"),
            )
            .map_err(error::ErrorBadRequest)?,
            client_name: opt_field(form, "client_name"),
            system_name: opt_field(form, "system_name"),
            target_env: opt_field(form, "target_env"),
            cloud_type: opt_field(form, "cloud_type"),
            log_type: opt_field(form, "log_type"),
            content: opt_field(form, "content"),
            action: opt_field(form, "action"),
            manager: field(form, "manager"),
            status: opt_field(form, "status"),
            summary: opt_field(form, "summary"),
            etc: opt_field(form, "etc"),
        }),
    };
    Ok(detail)
}

#[post("/report/{report_id}/edit")]
pub async fn save_edit(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Form<HashMap<String, String>>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let report_id = path.into_inner();
    let db = get_db_pool();

    let kind = report::find_kind(db, report_id)
        .await
        .map_err(map_report_err)?;
    let detail = fields_from_form(kind, &form)?;
    report::edit(db, report_id, detail)
        .await
        .map_err(map_report_err)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", format!("/report/{report_id}")))
        .finish())
}

#[post("/report/{report_id}/delete")]
pub async fn delete_report(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let report_id = path.into_inner();

    let kind = report::delete(get_db_pool(), report_id)
        .await
        .map_err(map_report_err)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", kind.list_url()))
        .finish())
}
