//! Admin-only pages: site statistics, per-client statistics, and user
//! management. Every handler here redirects non-admin visitors to /login.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::{error_reports, log_reports, msp_reports, reports, users};
use crate::stats::{client_names, ClientStats, SiteStats};
use actix_web::{error, get, post, web, Either, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_site_stats)
        .service(view_client_stats_list)
        .service(view_client_stats)
        .service(view_users)
        .service(view_user_edit)
        .service(save_user_edit)
        .service(delete_user);
}

fn login_redirect() -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", "/login"))
        .finish()
}

type AdminPage<T> = Either<HttpResponse, T>;

struct ReportRows {
    msp: Vec<msp_reports::Model>,
    errors: Vec<error_reports::Model>,
    logs: Vec<log_reports::Model>,
}

async fn fetch_report_rows() -> Result<ReportRows, Error> {
    let db = get_db_pool();
    Ok(ReportRows {
        msp: msp_reports::Entity::find()
            .all(db)
            .await
            .map_err(error::ErrorInternalServerError)?,
        errors: error_reports::Entity::find()
            .all(db)
            .await
            .map_err(error::ErrorInternalServerError)?,
        logs: log_reports::Entity::find()
            .all(db)
            .await
            .map_err(error::ErrorInternalServerError)?,
    })
}

#[derive(Template)]
#[template(path = "admin/stats.html")]
struct SiteStatsTemplate {
    client: ClientCtx,
    stats: SiteStats,
}

#[get("/admin/stats")]
pub async fn view_site_stats(client: ClientCtx) -> Result<AdminPage<impl Responder>, Error> {
    if !client.is_admin() {
        return Ok(Either::Left(login_redirect()));
    }

    let headers = reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    let rows = fetch_report_rows().await?;
    let stats = SiteStats::collect(
        &headers,
        &rows.msp,
        &rows.errors,
        &rows.logs,
        Utc::now().naive_utc(),
    );

    Ok(Either::Right(
        SiteStatsTemplate { client, stats }.to_response(),
    ))
}

#[derive(Template)]
#[template(path = "admin/client_list.html")]
struct ClientStatsListTemplate {
    client: ClientCtx,
    clients: Vec<String>,
}

#[get("/admin/stats/client")]
pub async fn view_client_stats_list(
    client: ClientCtx,
) -> Result<AdminPage<impl Responder>, Error> {
    if !client.is_admin() {
        return Ok(Either::Left(login_redirect()));
    }

    let rows = fetch_report_rows().await?;
    let clients = client_names(&rows.msp, &rows.errors, &rows.logs);
    Ok(Either::Right(
        ClientStatsListTemplate { client, clients }.to_response(),
    ))
}

#[derive(Template)]
#[template(path = "admin/client_stats.html")]
struct ClientStatsTemplate {
    client: ClientCtx,
    stats: ClientStats,
}

#[get("/admin/stats/client/{client_name}")]
pub async fn view_client_stats(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<AdminPage<impl Responder>, Error> {
    if !client.is_admin() {
        return Ok(Either::Left(login_redirect()));
    }

    let client_name = path.into_inner();
    let rows = fetch_report_rows().await?;
    let stats = ClientStats::collect(&client_name, &rows.msp, &rows.errors, &rows.logs);
    Ok(Either::Right(
        ClientStatsTemplate { client, stats }.to_response(),
    ))
}

#[derive(Template)]
#[template(path = "admin/users.html")]
struct UsersTemplate {
    client: ClientCtx,
    users: Vec<users::Model>,
}

#[get("/admin/users")]
pub async fn view_users(client: ClientCtx) -> Result<AdminPage<impl Responder>, Error> {
    if !client.is_admin() {
        return Ok(Either::Left(login_redirect()));
    }

    let rows = users::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(Either::Right(
        UsersTemplate {
            client,
            users: rows,
        }
        .to_response(),
    ))
}

#[derive(Template)]
#[template(path = "admin/user_edit.html")]
struct UserEditTemplate {
    client: ClientCtx,
    user: users::Model,
}

async fn find_user(user_id: i32) -> Result<users::Model, Error> {
    users::Entity::find_by_id(user_id)
        .one(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("User not found"))
}

#[get("/admin/users/{user_id}/edit")]
pub async fn view_user_edit(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<AdminPage<impl Responder>, Error> {
    if !client.is_admin() {
        return Ok(Either::Left(login_redirect()));
    }

    let user = find_user(path.into_inner()).await?;
    Ok(Either::Right(UserEditTemplate { client, user }.to_response()))
}

#[derive(Deserialize)]
pub struct UserEditForm {
    username: String,
    name: String,
    #[serde(default)]
    email: String,
}

#[post("/admin/users/{user_id}/edit")]
pub async fn save_user_edit(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Form<UserEditForm>,
) -> Result<HttpResponse, Error> {
    if !client.is_admin() {
        return Ok(login_redirect());
    }

    let form = form.into_inner();
    let mut user: users::ActiveModel = find_user(path.into_inner()).await?.into();
    user.username = Set(form.username);
    user.name = Set(form.name);
    user.email = Set(super::none_if_empty(form.email));
    user.update(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/admin/users"))
        .finish())
}

#[post("/admin/users/{user_id}/delete")]
pub async fn delete_user(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    if !client.is_admin() {
        return Ok(login_redirect());
    }

    let user = find_user(path.into_inner()).await?;
    user.delete(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/admin/users"))
        .finish())
}
