use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session::{start_session, verify_password};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_login).service(view_login);
}

#[derive(Template)]
#[template(path = "login/login.html")]
pub struct LoginTemplate {
    pub client: ClientCtx,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct FormData {
    username: String,
    password: String,
}

#[get("/login")]
pub async fn view_login(client: ClientCtx) -> Result<impl Responder, Error> {
    // Already logged in; nothing to do here.
    if client.is_user() {
        return Ok(HttpResponse::SeeOther()
            .append_header(("Location", "/"))
            .finish());
    }

    Ok(LoginTemplate {
        client,
        error: None,
    }
    .to_response())
}

#[post("/login")]
pub async fn post_login(
    client: ClientCtx,
    session: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<impl Responder, Error> {
    let db = get_db_pool();

    let user = users::Entity::find()
        .filter(users::Column::Username.eq(form.username.as_str()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let user = match user {
        Some(user) if verify_password(&form.password, &user.password) => user,
        _ => {
            log::debug!("login failure for {}", form.username);
            // Same message for bad name and bad password, to avoid
            // username enumeration.
            return Ok(LoginTemplate {
                client,
                error: Some("아이디 또는 비밀번호가 일치하지 않습니다.".to_owned()),
            }
            .to_response());
        }
    };

    start_session(&session, user.user_id)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/log"))
        .finish())
}
