//! Daily duty reports for the SOLIDEO account. Stored as system log rows
//! tagged `log_type = "SOLIDEO"`.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::report::{self, LogFields, ReportDetail};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::{NaiveDate, NaiveTime};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_solideo_form).service(submit_solideo);
}

#[derive(Template)]
#[template(path = "solideo/form.html")]
struct SolideoFormTemplate {
    client: ClientCtx,
}

#[get("/solideo/report")]
pub async fn view_solideo_form(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(SolideoFormTemplate { client }.to_response())
}

/// Parsed duty form. The time_slot checkboxes repeat the same key, which
/// typed form structs cannot express, so the raw pair list is walked instead.
struct SolideoForm {
    manager: String,
    date: String,
    time_slots: Vec<String>,
    client_name: String,
    system_name: String,
    target_env: String,
    content: String,
    summary: String,
    special_note: String,
}

impl SolideoForm {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self {
            manager: String::new(),
            date: String::new(),
            time_slots: Vec::new(),
            client_name: String::new(),
            system_name: String::new(),
            target_env: String::new(),
            content: String::new(),
            summary: String::new(),
            special_note: String::new(),
        };
        for (key, value) in pairs {
            match key.as_str() {
                "manager" => form.manager = value,
                "date" => form.date = value,
                "time_slot" => {
                    let value = value.trim();
                    if !value.is_empty() {
                        form.time_slots.push(value.to_owned());
                    }
                }
                "client_name" => form.client_name = value,
                "system_name" => form.system_name = value,
                "target_env" => form.target_env = value,
                "content" => form.content = value,
                "summary" => form.summary = value,
                "special_note" => form.special_note = value,
                _ => {}
            }
        }
        form
    }
}

#[post("/solideo/report/submit")]
pub async fn submit_solideo(
    client: ClientCtx,
    form: web::Form<Vec<(String, String)>>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let form = SolideoForm::from_pairs(form.into_inner());

    if form.manager.trim().is_empty() {
        return Err(error::ErrorBadRequest("담당자는 필수입니다."));
    }
    if form.date.trim().is_empty() {
        return Err(error::ErrorBadRequest("일자는 필수입니다."));
    }
    if form.time_slots.is_empty() {
        return Err(error::ErrorBadRequest("시간대는 최소 1개 이상 선택하세요."));
    }
    if form.content.trim().is_empty() {
        return Err(error::ErrorBadRequest("업무 내용은 필수입니다."));
    }
    if form.summary.trim().is_empty() {
        return Err(error::ErrorBadRequest("참고사항은 필수입니다."));
    }

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| error::ErrorBadRequest("일자 형식이 잘못되었습니다(YYYY-MM-DD)."))?;
    let log_date = date.and_time(NaiveTime::MIN);

    let fields = LogFields {
        log_date,
        completed_date: None,
        client_name: super::none_if_empty(form.client_name.trim().to_owned()),
        system_name: super::none_if_empty(form.system_name.trim().to_owned()),
        target_env: super::none_if_empty(form.target_env.trim().to_owned()),
        cloud_type: None,
        log_type: Some("SOLIDEO".to_owned()),
        content: Some(form.content.trim().to_owned()),
        action: super::none_if_empty(form.special_note.trim().to_owned()),
        manager: form.manager.trim().to_owned(),
        status: Some("작성".to_owned()),
        summary: Some(form.summary.trim().to_owned()),
        etc: Some(form.time_slots.join(",")),
    };

    report::create(get_db_pool(), user_id, ReportDetail::Log(fields))
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/"))
        .finish())
}
