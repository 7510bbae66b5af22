//! Registration, profile, and password change.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::session::{hash_password, verify_password};
use actix_web::{error, get, post, web, Error, HttpResponse, Responder};
use askama::Template;
use askama_actix::TemplateToResponse;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_register)
        .service(post_register)
        .service(view_profile)
        .service(view_change_password)
        .service(post_change_password);
}

#[derive(Template)]
#[template(path = "login/register.html")]
struct RegisterTemplate {
    client: ClientCtx,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    username: String,
    password: String,
    name: String,
    #[serde(default)]
    email: String,
}

#[get("/register")]
pub async fn view_register(client: ClientCtx) -> Result<impl Responder, Error> {
    Ok(RegisterTemplate {
        client,
        error: None,
    }
    .to_response())
}

#[post("/register")]
pub async fn post_register(
    client: ClientCtx,
    form: web::Form<RegisterForm>,
) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let form = form.into_inner();

    let existing = users::Entity::find()
        .filter(users::Column::Username.eq(form.username.as_str()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    if existing.is_some() {
        return Ok(RegisterTemplate {
            client,
            error: Some("이미 존재하는 아이디입니다.".to_owned()),
        }
        .to_response());
    }

    let hashed = hash_password(&form.password).map_err(|e| {
        log::error!("post_register: hash_password: {}", e);
        error::ErrorInternalServerError("hashing error")
    })?;

    users::ActiveModel {
        username: Set(form.username),
        password: Set(hashed),
        name: Set(form.name),
        email: Set(super::none_if_empty(form.email)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/login"))
        .finish())
}

#[derive(Template)]
#[template(path = "user/profile.html")]
struct ProfileTemplate {
    client: ClientCtx,
    username: String,
    name: String,
    email: String,
    created_at: String,
}

#[get("/profile")]
pub async fn view_profile(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    let user = client.get_user().unwrap().clone();

    Ok(ProfileTemplate {
        client,
        username: user.username,
        name: user.name,
        email: user.email.unwrap_or_default(),
        created_at: super::fmt_date(Some(user.created_at)),
    }
    .to_response())
}

#[derive(Template)]
#[template(path = "user/change_password.html")]
struct ChangePasswordTemplate {
    client: ClientCtx,
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

#[get("/change_password")]
pub async fn view_change_password(client: ClientCtx) -> Result<impl Responder, Error> {
    client.require_login()?;
    Ok(ChangePasswordTemplate {
        client,
        error: None,
    }
    .to_response())
}

#[post("/change_password")]
pub async fn post_change_password(
    client: ClientCtx,
    form: web::Form<ChangePasswordForm>,
) -> Result<impl Responder, Error> {
    client.require_login()?;
    let user = client.get_user().unwrap().clone();

    if !verify_password(&form.current_password, &user.password) {
        return Ok(ChangePasswordTemplate {
            client,
            error: Some("현재 비밀번호가 일치하지 않습니다.".to_owned()),
        }
        .to_response());
    }
    if form.new_password != form.confirm_password {
        return Ok(ChangePasswordTemplate {
            client,
            error: Some("새 비밀번호가 일치하지 않습니다.".to_owned()),
        }
        .to_response());
    }

    let hashed = hash_password(&form.new_password).map_err(|e| {
        log::error!("post_change_password: hash_password: {}", e);
        error::ErrorInternalServerError("hashing error")
    })?;

    let mut active: users::ActiveModel = user.into();
    active.password = Set(hashed);
    active
        .update(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/"))
        .finish())
}
