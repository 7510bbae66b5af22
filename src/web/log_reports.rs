//! System log reports: submission form, create, and the list pipeline page.

use crate::db::get_db_pool;
use crate::filter::{LogFilter, LogParams};
use crate::list::{self, Direction, LOG_DEFAULT_SORT};
use crate::middleware::ClientCtx;
use crate::orm::log_reports;
use crate::report::{self, LogFields, ReportDetail};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::EntityTrait;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_log_form)
        .service(submit_log)
        .service(list_logs);
}

#[derive(Template)]
#[template(path = "report/log_form.html")]
struct LogFormTemplate {
    client: ClientCtx,
    client_names: Vec<String>,
}

#[get("/log")]
pub async fn view_log_form(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(LogFormTemplate {
        client,
        client_names: super::reports::registry_client_names().await?,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct LogSubmitForm {
    manager: String,
    log_date: String,
    log_time: String,
    #[serde(default)]
    completed_date: String,
    #[serde(default)]
    completed_time: String,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    system_name: String,
    #[serde(default)]
    target_env: String,
    #[serde(default)]
    cloud_type: String,
    #[serde(default)]
    log_type: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    etc: String,
}

#[post("/log/submit")]
pub async fn submit_log(
    client: ClientCtx,
    form: web::Form<LogSubmitForm>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let form = form.into_inner();

    let log_date = report::parse_date_time("log_date", &form.log_date, &form.log_time)
        .map_err(error::ErrorBadRequest)?;
    let completed_date = report::parse_optional_date_time(
        "completed_date",
        &form.completed_date,
        &form.completed_time,
    )
    .map_err(error::ErrorBadRequest)?;

    let fields = LogFields {
        log_date,
        completed_date,
        client_name: super::none_if_empty(form.client_name),
        system_name: super::none_if_empty(form.system_name),
        target_env: super::none_if_empty(form.target_env),
        cloud_type: super::none_if_empty(form.cloud_type),
        log_type: super::none_if_empty(form.log_type),
        content: super::none_if_empty(form.content),
        action: super::none_if_empty(form.action),
        manager: form.manager,
        status: super::none_if_empty(form.status),
        summary: super::none_if_empty(form.summary),
        etc: super::none_if_empty(form.etc),
    };

    report::create(get_db_pool(), user_id, ReportDetail::Log(fields))
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/log"))
        .finish())
}

#[derive(Deserialize)]
pub struct LogListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub target_env: String,
    #[serde(default)]
    pub log_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

impl LogListQuery {
    pub fn filter_params(&self) -> LogParams {
        LogParams {
            manager: self.manager.clone(),
            status: self.status.clone(),
            client_name: self.client_name.clone(),
            system_name: self.system_name.clone(),
            target_env: self.target_env.clone(),
            log_type: self.log_type.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            search: self.search.clone(),
        }
    }
}

pub struct LogRow {
    pub report_id: i32,
    pub log_date: String,
    pub client_name: String,
    pub system_name: String,
    pub log_type: String,
    pub summary: String,
    pub manager: String,
    pub status: String,
    pub completed_date: String,
}

impl From<log_reports::Model> for LogRow {
    fn from(r: log_reports::Model) -> Self {
        Self {
            report_id: r.report_id,
            log_date: super::fmt_date(Some(r.log_date)),
            client_name: r.client_name.unwrap_or_default(),
            system_name: r.system_name.unwrap_or_default(),
            log_type: r.log_type.unwrap_or_default(),
            summary: r.summary.unwrap_or_default(),
            manager: r.manager,
            status: r.status.unwrap_or_default(),
            completed_date: super::fmt_date(r.completed_date),
        }
    }
}

#[derive(Template)]
#[template(path = "report/log_list.html")]
struct LogListTemplate {
    client: ClientCtx,
    reports: Vec<LogRow>,
    page: u64,
    total_pages: u64,
    pages: Vec<super::PageLink>,
    query_string: String,
    filter_query: String,
    current_sort: String,
    current_direction: String,
}

#[get("/log_reports")]
pub async fn list_logs(
    client: ClientCtx,
    query: web::Query<LogListQuery>,
) -> Result<impl Responder, Error> {
    let query = query.into_inner();
    let sort = if query.sort.is_empty() {
        LOG_DEFAULT_SORT.to_owned()
    } else {
        query.sort.clone()
    };
    let direction = Direction::from_param(&query.direction);
    let filter = LogFilter::build(query.filter_params()).map_err(error::ErrorBadRequest)?;

    let mut rows = log_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    rows.retain(|r| filter.matches(r));
    list::sort_log(&mut rows, &sort, direction);

    let page = list::paginate(
        rows,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(list::DEFAULT_LIMIT),
    );

    Ok(LogListTemplate {
        client,
        reports: page.rows.into_iter().map(LogRow::from).collect(),
        page: page.window.page,
        total_pages: page.window.total_pages,
        pages: super::page_links(&page.window),
        query_string: filter.query_string(&sort, direction.as_str()),
        filter_query: filter.query_string("", ""),
        current_sort: sort,
        current_direction: direction.as_str().to_owned(),
    }
    .to_response())
}
