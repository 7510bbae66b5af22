//! Compensatory leave requests. Stored as system log rows tagged
//! `log_type = "LEAVE"` rather than in a table of their own.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::report::{self, LogFields, ReportDetail};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::NaiveDateTime;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_leave_form).service(submit_leave);
}

#[derive(Template)]
#[template(path = "leave/form.html")]
struct LeaveFormTemplate {
    client: ClientCtx,
}

#[get("/leave/comp/new")]
pub async fn view_leave_form(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(LeaveFormTemplate { client }.to_response())
}

#[derive(Deserialize)]
pub struct LeaveForm {
    manager: String,
    start_date: String,
    start_time: String,
    end_date: String,
    end_time: String,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    system_name: String,
    #[serde(default)]
    target_env: String,
    reason: String,
    #[serde(default)]
    memo: String,
}

fn parse_stamp(date: &str, time: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(&format!("{} {}", date.trim(), time.trim()), "%Y-%m-%d %H:%M")
        .map_err(|_| error::ErrorBadRequest("날짜/시간 형식이 올바르지 않습니다."))
}

#[post("/leave/comp/submit")]
pub async fn submit_leave(
    client: ClientCtx,
    form: web::Form<LeaveForm>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let form = form.into_inner();

    let required = [
        ("담당자", &form.manager),
        ("시작일자", &form.start_date),
        ("시작시간", &form.start_time),
        ("완료일자", &form.end_date),
        ("완료시간", &form.end_time),
        ("신청 사유", &form.reason),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(error::ErrorBadRequest(format!("{label}은(는) 필수입니다.")));
        }
    }

    let start = parse_stamp(&form.start_date, &form.start_time)?;
    let end = parse_stamp(&form.end_date, &form.end_time)?;
    if end <= start {
        return Err(error::ErrorBadRequest("완료일시가 시작일시 이후여야 합니다."));
    }

    let fields = LogFields {
        log_date: start,
        completed_date: Some(end),
        client_name: super::none_if_empty(form.client_name),
        system_name: super::none_if_empty(form.system_name),
        target_env: super::none_if_empty(form.target_env),
        cloud_type: None,
        log_type: Some("LEAVE".to_owned()),
        content: Some(form.reason.trim().to_owned()),
        action: super::none_if_empty(form.memo.trim().to_owned()),
        manager: form.manager.trim().to_owned(),
        status: Some("신청".to_owned()),
        summary: Some("대체휴가 신청".to_owned()),
        etc: Some(format!(
            "start_time={},end_time={}",
            form.start_time.trim(),
            form.end_time.trim()
        )),
    };

    report::create(get_db_pool(), user_id, ReportDetail::Log(fields))
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/"))
        .finish())
}
