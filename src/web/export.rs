//! CSV downloads for the three report lists.
//!
//! Files are UTF-8 with a BOM so spreadsheet tools pick the right encoding,
//! and carry the same column labels the list pages show. Rows honor the same
//! filters as the list endpoints and come out newest first.

use crate::db::get_db_pool;
use crate::filter::{ErrorFilter, ErrorParams, LogFilter, LogParams, MspFilter, MspParams};
use crate::orm::{error_reports, log_reports, msp_reports};
use actix_web::{error, get, web, Error, HttpResponse};
use sea_orm::EntityTrait;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(download_msp_csv)
        .service(download_error_csv)
        .service(download_log_csv);
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

fn fmt(value: Option<chrono::NaiveDateTime>) -> String {
    super::fmt_date(value)
}

fn csv_response(filename: &str, rows: Vec<Vec<String>>) -> Result<HttpResponse, Error> {
    let mut body = Vec::from(UTF8_BOM);
    {
        let mut writer = csv::Writer::from_writer(&mut body);
        for row in rows {
            writer
                .write_record(&row)
                .map_err(error::ErrorInternalServerError)?;
        }
        writer.flush().map_err(error::ErrorInternalServerError)?;
    }
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .append_header((
            "Content-Disposition",
            format!("attachment; filename={filename}"),
        ))
        .body(body))
}

fn msp_csv_rows(reports: Vec<msp_reports::Model>) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "요청일자".to_owned(),
        "고객사".to_owned(),
        "시스템명".to_owned(),
        "대상 환경".to_owned(),
        "요청자".to_owned(),
        "요청유형".to_owned(),
        "요청내용".to_owned(),
        "참고사항".to_owned(),
        "담당자".to_owned(),
        "상태".to_owned(),
        "완료일자".to_owned(),
        "답변내용".to_owned(),
        "비고".to_owned(),
    ]];
    for r in reports {
        rows.push(vec![
            fmt(Some(r.request_date)),
            r.client_name,
            r.system_name,
            r.target_env.unwrap_or_default(),
            r.requester,
            r.request_type,
            r.request_content.unwrap_or_default(),
            r.purpose.unwrap_or_default(),
            r.manager,
            r.status.unwrap_or_default(),
            fmt(r.completed_date),
            r.response.unwrap_or_default(),
            r.etc.unwrap_or_default(),
        ]);
    }
    rows
}

#[get("/reports/download")]
pub async fn download_msp_csv(query: web::Query<MspParams>) -> Result<HttpResponse, Error> {
    let filter = MspFilter::build(query.into_inner()).map_err(error::ErrorBadRequest)?;
    let mut reports = msp_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    reports.retain(|r| filter.matches(r));
    reports.sort_by(|a, b| b.request_date.cmp(&a.request_date));
    csv_response("msp_reports.csv", msp_csv_rows(reports))
}

fn error_csv_rows(reports: Vec<error_reports::Model>) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "장애일자".to_owned(),
        "고객사".to_owned(),
        "시스템명".to_owned(),
        "대상 환경".to_owned(),
        "장애대상".to_owned(),
        "고객 영향".to_owned(),
        "장애내용".to_owned(),
        "장애원인".to_owned(),
        "조치내용".to_owned(),
        "담당자".to_owned(),
        "상태".to_owned(),
        "장애종료일자".to_owned(),
        "비고".to_owned(),
    ]];
    for r in reports {
        rows.push(vec![
            fmt(Some(r.error_start_date)),
            r.client_name,
            r.system_name,
            r.target_env.unwrap_or_default(),
            r.target_component.unwrap_or_default(),
            r.customer_impact.unwrap_or_default(),
            r.error_info,
            r.error_reason.unwrap_or_default(),
            r.action_taken.unwrap_or_default(),
            r.manager,
            r.status.unwrap_or_default(),
            fmt(r.error_end_date),
            r.etc.unwrap_or_default(),
        ]);
    }
    rows
}

#[get("/error_reports/download")]
pub async fn download_error_csv(query: web::Query<ErrorParams>) -> Result<HttpResponse, Error> {
    let filter = ErrorFilter::build(query.into_inner()).map_err(error::ErrorBadRequest)?;
    let mut reports = error_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    reports.retain(|r| filter.matches(r));
    reports.sort_by(|a, b| b.error_start_date.cmp(&a.error_start_date));
    csv_response("error_reports.csv", error_csv_rows(reports))
}

fn log_csv_rows(reports: Vec<log_reports::Model>) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "일자".to_owned(),
        "고객사".to_owned(),
        "시스템명".to_owned(),
        "대상 환경".to_owned(),
        "유형".to_owned(),
        "내용".to_owned(),
        "조치".to_owned(),
        "담당자".to_owned(),
        "상태".to_owned(),
        "완료일자".to_owned(),
        "요약".to_owned(),
        "비고".to_owned(),
    ]];
    for r in reports {
        rows.push(vec![
            fmt(Some(r.log_date)),
            r.client_name.unwrap_or_default(),
            r.system_name.unwrap_or_default(),
            r.target_env.unwrap_or_default(),
            r.log_type.unwrap_or_default(),
            r.content.unwrap_or_default(),
            r.action.unwrap_or_default(),
            r.manager,
            r.status.unwrap_or_default(),
            fmt(r.completed_date),
            r.summary.unwrap_or_default(),
            r.etc.unwrap_or_default(),
        ]);
    }
    rows
}

#[get("/log_reports/download")]
pub async fn download_log_csv(query: web::Query<LogParams>) -> Result<HttpResponse, Error> {
    let filter = LogFilter::build(query.into_inner()).map_err(error::ErrorBadRequest)?;
    let mut reports = log_reports::Entity::find()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    reports.retain(|r| filter.matches(r));
    reports.sort_by(|a, b| b.log_date.cmp(&a.log_date));
    csv_response("log_reports.csv", log_csv_rows(reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use chrono::NaiveDate;

    fn msp(id: i32, client: &str, day: u32) -> msp_reports::Model {
        msp_reports::Model {
            report_id: id,
            request_date: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            completed_date: None,
            client_name: client.to_owned(),
            system_name: "portal".to_owned(),
            target_env: Some("prod".to_owned()),
            cloud_type: None,
            requester: "hong".to_owned(),
            request_type: "change".to_owned(),
            request_content: Some("방화벽, 규칙 변경".to_owned()),
            purpose: None,
            manager: "kim".to_owned(),
            status: Some("완료".to_owned()),
            response: None,
            etc: None,
        }
    }

    #[test]
    fn test_msp_rows_header_plus_one_per_report() {
        let rows = msp_csv_rows(vec![msp(1, "Acme", 1), msp(2, "Beta", 2)]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "요청일자");
        assert_eq!(rows[0].len(), 13);
        assert_eq!(rows[1][1], "Acme");
        assert_eq!(rows[1][0], "2025-03-01 09:30");
        // Null columns come out as empty cells, not the word "None".
        assert_eq!(rows[1][10], "");
    }

    #[test]
    fn test_body_starts_with_bom_and_quotes_embedded_commas() {
        let res = csv_response("msp_reports.csv", msp_csv_rows(vec![msp(1, "Acme", 1)])).unwrap();
        let body = res.into_body().try_into_bytes().unwrap();
        assert_eq!(&body[..3], UTF8_BOM);
        let text = std::str::from_utf8(&body[3..]).unwrap();
        assert!(text.contains("\"방화벽, 규칙 변경\""));
        assert_eq!(text.lines().count(), 2);
    }
}
