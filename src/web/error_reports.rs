//! Error reports: submission form, create, and the list pipeline page.

use crate::db::get_db_pool;
use crate::filter::{ErrorFilter, ErrorParams};
use crate::list::{self, Direction, ERROR_DEFAULT_SORT};
use crate::middleware::ClientCtx;
use crate::orm::error_reports;
use crate::report::{self, ErrorFields, ReportDetail};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::EntityTrait;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_error_form)
        .service(submit_error)
        .service(list_errors);
}

#[derive(Template)]
#[template(path = "report/error_form.html")]
struct ErrorFormTemplate {
    client: ClientCtx,
    client_names: Vec<String>,
}

#[get("/error")]
pub async fn view_error_form(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(ErrorFormTemplate {
        client,
        client_names: super::reports::registry_client_names().await?,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct ErrorSubmitForm {
    manager: String,
    error_start_date: String,
    error_start_time: String,
    #[serde(default)]
    error_end_date: String,
    #[serde(default)]
    error_end_time: String,
    client_name: String,
    system_name: String,
    #[serde(default)]
    target_env: String,
    #[serde(default)]
    cloud_type: String,
    #[serde(default)]
    target_component: String,
    #[serde(default)]
    customer_impact: String,
    error_info: String,
    #[serde(default)]
    error_reason: String,
    #[serde(default)]
    action_taken: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    etc: String,
}

#[post("/error/submit")]
pub async fn submit_error(
    client: ClientCtx,
    form: web::Form<ErrorSubmitForm>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let form = form.into_inner();

    let error_start_date = report::parse_date_time(
        "error_start_date",
        &form.error_start_date,
        &form.error_start_time,
    )
    .map_err(error::ErrorBadRequest)?;
    let error_end_date = report::parse_optional_date_time(
        "error_end_date",
        &form.error_end_date,
        &form.error_end_time,
    )
    .map_err(error::ErrorBadRequest)?;

    let fields = ErrorFields {
        error_start_date,
        error_end_date,
        client_name: form.client_name,
        system_name: form.system_name,
        target_env: super::none_if_empty(form.target_env),
        cloud_type: super::none_if_empty(form.cloud_type),
        target_component: super::none_if_empty(form.target_component),
        customer_impact: super::none_if_empty(form.customer_impact),
        error_info: form.error_info,
        error_reason: super::none_if_empty(form.error_reason),
        action_taken: super::none_if_empty(form.action_taken),
        manager: form.manager,
        status: super::none_if_empty(form.status),
        etc: super::none_if_empty(form.etc),
    };

    report::create(get_db_pool(), user_id, ReportDetail::Error(fields))
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/error"))
        .finish())
}

#[derive(Deserialize)]
pub struct ErrorListQuery {
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
    pub target_component: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

impl ErrorListQuery {
    pub fn filter_params(&self) -> ErrorParams {
        ErrorParams {
            manager: self.manager.clone(),
            status: self.status.clone(),
            client_name: self.client_name.clone(),
            system_name: self.system_name.clone(),
            target_env: self.target_env.clone(),
            target_component: self.target_component.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            search: self.search.clone(),
        }
    }
}

pub struct ErrorRow {
    pub report_id: i32,
    pub error_start_date: String,
    pub error_end_date: String,
    pub client_name: String,
    pub system_name: String,
    pub target_component: String,
    pub error_info: String,
    pub manager: String,
    pub status: String,
}

impl From<error_reports::Model> for ErrorRow {
    fn from(r: error_reports::Model) -> Self {
        Self {
            report_id: r.report_id,
            error_start_date: super::fmt_date(Some(r.error_start_date)),
            error_end_date: super::fmt_date(r.error_end_date),
            client_name: r.client_name,
            system_name: r.system_name,
            target_component: r.target_component.unwrap_or_default(),
            error_info: r.error_info,
            manager: r.manager,
            status: r.status.unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "report/error_list.html")]
struct ErrorListTemplate {
    client: ClientCtx,
    reports: Vec<ErrorRow>,
    page: u64,
    total_pages: u64,
    pages: Vec<super::PageLink>,
    query_string: String,
    filter_query: String,
    current_sort: String,
    current_direction: String,
}

#[get("/error_reports")]
pub async fn list_errors(
    client: ClientCtx,
    query: web::Query<ErrorListQuery>,
) -> Result<impl Responder, Error> {
    let query = query.into_inner();
    let sort = if query.sort.is_empty() {
        ERROR_DEFAULT_SORT.to_owned()
    } else {
        query.sort.clone()
    };
    let direction = Direction::from_param(&query.direction);
    let filter = ErrorFilter::build(query.filter_params()).map_err(error::ErrorBadRequest)?;

    let mut rows = error_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    rows.retain(|r| filter.matches(r));
    list::sort_error(&mut rows, &sort, direction);

    let page = list::paginate(
        rows,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(list::DEFAULT_LIMIT),
    );

    Ok(ErrorListTemplate {
        client,
        reports: page.rows.into_iter().map(ErrorRow::from).collect(),
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
