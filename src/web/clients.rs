//! Client registry pages: list, create, delete.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::clients;
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_client_list)
        .service(view_client_create)
        .service(create_client)
        .service(delete_client);
}

#[derive(Template)]
#[template(path = "client/list.html")]
struct ClientListTemplate {
    client: ClientCtx,
    clients: Vec<clients::Model>,
}

#[get("/client")]
pub async fn view_client_list(client: ClientCtx) -> Result<impl Responder, Error> {
    let rows = clients::Entity::find()
        .order_by_asc(clients::Column::ClientName)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(ClientListTemplate {
        client,
        clients: rows,
    }
    .to_response())
}

#[derive(Template)]
#[template(path = "client/create.html")]
struct ClientCreateTemplate {
    client: ClientCtx,
}

#[get("/client/create")]
pub async fn view_client_create(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(ClientCreateTemplate { client }.to_response())
}

#[derive(Deserialize)]
pub struct ClientCreateForm {
    client_name: String,
    #[serde(default)]
    system_name: String,
    #[serde(default)]
    target_env: String,
    #[serde(default)]
    cloud_type: String,
    #[serde(default)]
    target_component: String,
}

#[post("/client/create")]
pub async fn create_client(
    client: ClientCtx,
    form: web::Form<ClientCreateForm>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let form = form.into_inner();

    clients::ActiveModel {
        client_name: Set(form.client_name),
        system_name: Set(super::none_if_empty(form.system_name)),
        target_env: Set(super::none_if_empty(form.target_env)),
        cloud_type: Set(super::none_if_empty(form.cloud_type)),
        target_component: Set(super::none_if_empty(form.target_component)),
        ..Default::default()
    }
    .insert(get_db_pool())
    .await
    .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/client"))
        .finish())
}

#[derive(Deserialize)]
pub struct ClientDeleteForm {
    client_id: i32,
}

#[post("/client/delete")]
pub async fn delete_client(
    client: ClientCtx,
    form: web::Form<ClientDeleteForm>,
) -> Result<impl Responder, Error> {
    // Registry rows back the report form dropdowns, so removal is admin only.
    if !client.is_admin() {
        return Ok(HttpResponse::SeeOther()
            .append_header(("Location", "/login"))
            .finish());
    }

    clients::Entity::delete_by_id(form.client_id)
        .exec(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/client"))
        .finish())
}
