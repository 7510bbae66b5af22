//! Integration tests for report creation, editing, and deletion.

mod common;

use common::{database::*, fixtures::*};
use opstrack::orm::{error_reports, log_reports, msp_reports, reports, users};
use opstrack::report::{self, ReportDetail, ReportError, ReportKind};
use sea_orm::{EntityTrait, ModelTrait};
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn test_create_inserts_header_and_detail() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let detail = ReportDetail::Msp(msp_fields("Acme", "kim", Some("접수"), dt(2025, 3, 1, 9, 30)));
    let report_id = report::create(&db, user.id, detail)
        .await
        .expect("create failed");

    let header = reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .expect("header query failed")
        .expect("header row missing");
    assert_eq!(header.report_type, "msp");
    assert_eq!(header.create_by, user.id);

    let row = msp_reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .expect("detail query failed")
        .expect("detail row missing");
    assert_eq!(row.client_name, "Acme");
    assert_eq!(row.request_date, dt(2025, 3, 1, 9, 30));
}

#[actix_rt::test]
#[serial]
async fn test_create_each_kind_routes_to_its_table() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let msp_id = report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("msp create failed");
    let error_id = report::create(
        &db,
        user.id,
        ReportDetail::Error(error_fields("Acme", Some("WAS"), dt(2025, 3, 2, 9, 0))),
    )
    .await
    .expect("error create failed");
    let log_id = report::create(
        &db,
        user.id,
        ReportDetail::Log(log_fields(Some("Acme"), "kim", dt(2025, 3, 3, 9, 0))),
    )
    .await
    .expect("log create failed");

    assert_eq!(report::find_kind(&db, msp_id).await.unwrap(), ReportKind::Msp);
    assert_eq!(
        report::find_kind(&db, error_id).await.unwrap(),
        ReportKind::Error
    );
    assert_eq!(report::find_kind(&db, log_id).await.unwrap(), ReportKind::Log);

    assert_eq!(reports::Entity::find().all(&db).await.unwrap().len(), 3);
    assert_eq!(msp_reports::Entity::find().all(&db).await.unwrap().len(), 1);
    assert_eq!(
        error_reports::Entity::find().all(&db).await.unwrap().len(),
        1
    );
    assert_eq!(log_reports::Entity::find().all(&db).await.unwrap().len(), 1);
}

#[actix_rt::test]
#[serial]
async fn test_header_links_creator_and_detail() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let report_id = report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("create failed");

    let creator = users::Entity::find_by_id(user.id)
        .one(&db)
        .await
        .expect("user query failed")
        .expect("user row missing");
    let headers = creator
        .find_related(reports::Entity)
        .all(&db)
        .await
        .expect("creator relation query failed");
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].report_id, report_id);

    let row = msp_reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .expect("detail query failed")
        .expect("detail row missing");
    let header = row
        .find_related(reports::Entity)
        .one(&db)
        .await
        .expect("header relation query failed")
        .expect("header row missing");
    assert_eq!(header.create_by, user.id);
}

#[actix_rt::test]
#[serial]
async fn test_edit_updates_detail_fields() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let report_id = report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", Some("접수"), dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("create failed");

    let mut updated = msp_fields("Acme", "lee", Some("완료"), dt(2025, 3, 1, 9, 0));
    updated.completed_date = Some(dt(2025, 3, 2, 18, 0));
    report::edit(&db, report_id, ReportDetail::Msp(updated))
        .await
        .expect("edit failed");

    let row = msp_reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.manager, "lee");
    assert_eq!(row.status.as_deref(), Some("완료"));
    assert_eq!(row.completed_date, Some(dt(2025, 3, 2, 18, 0)));
}

#[actix_rt::test]
#[serial]
async fn test_edit_rejects_wrong_kind_and_missing_id() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let report_id = report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("create failed");

    let wrong = ReportDetail::Error(error_fields("Acme", None, dt(2025, 3, 1, 9, 0)));
    assert!(matches!(
        report::edit(&db, report_id, wrong).await,
        Err(ReportError::InvalidType(_))
    ));

    let detail = ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, 1, 9, 0)));
    assert!(matches!(
        report::edit(&db, 9999, detail).await,
        Err(ReportError::NotFound)
    ));
}

#[actix_rt::test]
#[serial]
async fn test_delete_removes_both_rows() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    let report_id = report::create(
        &db,
        user.id,
        ReportDetail::Log(log_fields(Some("Acme"), "kim", dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("create failed");

    let kind = report::delete(&db, report_id).await.expect("delete failed");
    assert_eq!(kind, ReportKind::Log);
    assert_eq!(kind.list_url(), "/log_reports");

    assert!(reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .is_none());
    assert!(log_reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .is_none());

    assert!(matches!(
        report::delete(&db, report_id).await,
        Err(ReportError::NotFound)
    ));
}
