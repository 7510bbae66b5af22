//! MSP request reports: submission form, create, and the list pipeline page.

use crate::db::get_db_pool;
use crate::filter::{MspFilter, MspParams};
use crate::list::{self, Direction, MSP_DEFAULT_SORT};
use crate::middleware::ClientCtx;
use crate::orm::{clients, msp_reports};
use crate::report::{self, MspFields, ReportDetail};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{EntityTrait, QuerySelect};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_msp_form)
        .service(submit_msp)
        .service(list_msp);
}

/// Distinct client names from the registry, for the form dropdowns.
pub(super) async fn registry_client_names() -> Result<Vec<String>, Error> {
    let mut names: Vec<String> = clients::Entity::find()
        .select_only()
        .column(clients::Column::ClientName)
        .distinct()
        .into_tuple()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    names.sort();
    Ok(names)
}

#[derive(Template)]
#[template(path = "report/msp_form.html")]
struct MspFormTemplate {
    client: ClientCtx,
    client_names: Vec<String>,
}

#[get("/msp")]
pub async fn view_msp_form(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(MspFormTemplate {
        client,
        client_names: registry_client_names().await?,
    }
    .to_response())
}

#[derive(Deserialize)]
pub struct MspSubmitForm {
    manager: String,
    request_date: String,
    request_time: String,
    #[serde(default)]
    completed_date: String,
    #[serde(default)]
    completed_time: String,
    client_name: String,
    system_name: String,
    #[serde(default)]
    target_env: String,
    #[serde(default)]
    cloud_type: String,
    requester: String,
    request_type: String,
    #[serde(default)]
    request_content: String,
    #[serde(default)]
    purpose: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    etc: String,
    #[serde(default)]
    status: String,
}

#[post("/msp/submit")]
pub async fn submit_msp(
    client: ClientCtx,
    form: web::Form<MspSubmitForm>,
) -> Result<impl Responder, Error> {
    let user_id = client.require_login()?;
    let form = form.into_inner();

    let request_date =
        report::parse_date_time("request_date", &form.request_date, &form.request_time)
            .map_err(error::ErrorBadRequest)?;
    let completed_date = report::parse_optional_date_time(
        "completed_date",
        &form.completed_date,
        &form.completed_time,
    )
    .map_err(error::ErrorBadRequest)?;

    let fields = MspFields {
        request_date,
        completed_date,
        client_name: form.client_name,
        system_name: form.system_name,
        target_env: super::none_if_empty(form.target_env),
        cloud_type: super::none_if_empty(form.cloud_type),
        requester: form.requester,
        request_type: form.request_type,
        request_content: super::none_if_empty(form.request_content),
        purpose: super::none_if_empty(form.purpose),
        manager: form.manager,
        status: super::none_if_empty(form.status),
        response: super::none_if_empty(form.response),
        etc: super::none_if_empty(form.etc),
    };

    report::create(get_db_pool(), user_id, ReportDetail::Msp(fields))
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/msp"))
        .finish())
}

#[derive(Deserialize)]
pub struct MspListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub target_env: String,
    #[serde(default)]
    pub request_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

impl MspListQuery {
    pub fn filter_params(&self) -> MspParams {
        MspParams {
            manager: self.manager.clone(),
            requester: self.requester.clone(),
            status: self.status.clone(),
            client_name: self.client_name.clone(),
            system_name: self.system_name.clone(),
            target_env: self.target_env.clone(),
            request_type: self.request_type.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            search: self.search.clone(),
        }
    }
}

pub struct MspRow {
    pub report_id: i32,
    pub request_date: String,
    pub client_name: String,
    pub system_name: String,
    pub target_env: String,
    pub requester: String,
    pub request_type: String,
    pub manager: String,
    pub status: String,
    pub completed_date: String,
}

impl From<msp_reports::Model> for MspRow {
    fn from(r: msp_reports::Model) -> Self {
        Self {
            report_id: r.report_id,
            request_date: super::fmt_date(Some(r.request_date)),
            client_name: r.client_name,
            system_name: r.system_name,
            target_env: r.target_env.unwrap_or_default(),
            requester: r.requester,
            request_type: r.request_type,
            manager: r.manager,
            status: r.status.unwrap_or_default(),
            completed_date: super::fmt_date(r.completed_date),
        }
    }
}

#[derive(Template)]
#[template(path = "report/msp_list.html")]
struct MspListTemplate {
    client: ClientCtx,
    reports: Vec<MspRow>,
    page: u64,
    total_pages: u64,
    pages: Vec<super::PageLink>,
    query_string: String,
    filter_query: String,
    current_sort: String,
    current_direction: String,
}

#[get("/reports")]
pub async fn list_msp(
    client: ClientCtx,
    query: web::Query<MspListQuery>,
) -> Result<impl Responder, Error> {
    let query = query.into_inner();
    let sort = if query.sort.is_empty() {
        MSP_DEFAULT_SORT.to_owned()
    } else {
        query.sort.clone()
    };
    let direction = Direction::from_param(&query.direction);
    let filter = MspFilter::build(query.filter_params()).map_err(error::ErrorBadRequest)?;

    let mut rows = msp_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    rows.retain(|r| filter.matches(r));
    list::sort_msp(&mut rows, &sort, direction);

    let page = list::paginate(
        rows,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(list::DEFAULT_LIMIT),
    );

    Ok(MspListTemplate {
        client,
        reports: page.rows.into_iter().map(MspRow::from).collect(),
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
