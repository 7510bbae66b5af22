use crate::session::end_session;
use actix_web::{get, Error, HttpResponse, Responder};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_logout);
}

#[get("/logout")]
pub async fn view_logout(session: actix_session::Session) -> Result<impl Responder, Error> {
    end_session(&session);
    Ok(HttpResponse::SeeOther()
        .append_header(("Location", "/"))
        .finish())
}
