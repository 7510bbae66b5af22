//! Integration tests for the admin statistics collectors over stored rows.

mod common;

use chrono::Utc;
use common::{database::*, fixtures::*};
use opstrack::orm::{error_reports, log_reports, msp_reports, reports};
use opstrack::report::{self, ReportDetail};
use opstrack::stats::{client_names, ClientStats, SiteStats};
use sea_orm::EntityTrait;
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn test_site_stats_over_stored_reports() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", Some("완료"), dt(2025, 3, 1, 9, 0))),
    )
    .await
    .unwrap();
    report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", Some("처리중"), dt(2025, 4, 2, 9, 0))),
    )
    .await
    .unwrap();
    report::create(
        &db,
        user.id,
        ReportDetail::Error(error_fields("Beta", Some("WAS"), dt(2025, 3, 5, 9, 0))),
    )
    .await
    .unwrap();
    report::create(
        &db,
        user.id,
        ReportDetail::Log(log_fields(Some("Acme"), "lee", dt(2025, 3, 6, 9, 0))),
    )
    .await
    .unwrap();

    let headers = reports::Entity::find().all(&db).await.unwrap();
    let msp = msp_reports::Entity::find().all(&db).await.unwrap();
    let errors = error_reports::Entity::find().all(&db).await.unwrap();
    let logs = log_reports::Entity::find().all(&db).await.unwrap();

    let stats = SiteStats::collect(&headers, &msp, &errors, &logs, Utc::now().naive_utc());

    assert_eq!(stats.total_reports, 4);
    // Headers were created just now, so the recency windows cover all.
    assert_eq!(stats.recent_7, 4);
    assert_eq!(stats.recent_30, 4);

    let acme = stats.client_summary["Acme"];
    assert_eq!((acme.msp, acme.error, acme.log), (2, 0, 1));
    let beta = stats.client_summary["Beta"];
    assert_eq!((beta.msp, beta.error, beta.log), (0, 1, 0));

    assert_eq!(stats.manager_counts["kim"].count, 3);
    assert_eq!(stats.manager_counts["kim"].done, 1);
    assert_eq!(stats.component_counts["WAS"], 1);

    let months: Vec<&str> = stats.monthly_counts.keys().map(String::as_str).collect();
    assert_eq!(months, vec!["2025-03", "2025-04"]);
    assert_eq!(stats.monthly_counts["2025-03"].total(), 3);

    assert_eq!(
        client_names(&msp, &errors, &logs),
        vec!["Acme".to_owned(), "Beta".to_owned()]
    );
}

#[actix_rt::test]
#[serial]
async fn test_client_stats_scoped_to_one_client() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", Some("완료"), dt(2025, 3, 1, 9, 0))),
    )
    .await
    .unwrap();
    report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Beta", "kim", Some("완료"), dt(2025, 3, 2, 9, 0))),
    )
    .await
    .unwrap();
    report::create(
        &db,
        user.id,
        ReportDetail::Error(error_fields("Acme", Some("DB"), dt(2025, 2, 1, 9, 0))),
    )
    .await
    .unwrap();

    let msp = msp_reports::Entity::find().all(&db).await.unwrap();
    let errors = error_reports::Entity::find().all(&db).await.unwrap();
    let logs = log_reports::Entity::find().all(&db).await.unwrap();

    let stats = ClientStats::collect("Acme", &msp, &errors, &logs);
    assert_eq!(stats.counts.msp, 1);
    assert_eq!(stats.counts.error, 1);
    assert_eq!(stats.counts.total(), 2);
    assert_eq!(stats.component_counts["DB"], 1);

    let months: Vec<&str> = stats.monthly_counts.keys().map(String::as_str).collect();
    assert_eq!(months, vec!["2025-02", "2025-03"]);
}
