//! Rendered error pages for the ErrorHandlers middleware in main.

use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::HttpResponse;
use askama::Template;

#[derive(Template)]
#[template(path = "error/error.html")]
struct ErrorTemplate<'a> {
    code: u16,
    message: &'a str,
}

fn render<B>(
    res: ServiceResponse<B>,
    message: &str,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let page = ErrorTemplate {
        code: status.as_u16(),
        message,
    };
    let body = match page.render() {
        Ok(body) => body,
        Err(err) => {
            log::error!("error page failed to render: {}", err);
            message.to_owned()
        }
    };

    let (req, _) = res.into_parts();
    let res = HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body);
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res).map_into_right_body(),
    ))
}

pub fn render_400<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render(res, "잘못된 요청입니다.")
}

pub fn render_401<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render(res, "로그인이 필요합니다.")
}

pub fn render_404<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render(res, "페이지를 찾을 수 없습니다.")
}

pub fn render_500<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    render(res, "서버 오류가 발생했습니다.")
}
