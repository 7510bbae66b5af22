//! Integration tests for the list pipeline: filter, sort, paginate over
//! stored report rows.

mod common;

use common::{database::*, fixtures::*};
use opstrack::filter::{MspFilter, MspParams};
use opstrack::list::{self, Direction, MSP_DEFAULT_SORT};
use opstrack::orm::msp_reports;
use opstrack::report::{self, ReportDetail};
use sea_orm::EntityTrait;
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn test_pagination_slices_filtered_sorted_rows() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    // 23 rows across two clients; 12 belong to Acme.
    for day in 1..=23 {
        let client = if day % 2 == 1 { "Acme" } else { "Beta" };
        report::create(
            &db,
            user.id,
            ReportDetail::Msp(msp_fields(client, "kim", None, dt(2025, 3, day, 9, 0))),
        )
        .await
        .expect("create failed");
    }

    let filter = MspFilter::build(MspParams {
        client_name: "Acme".to_owned(),
        ..Default::default()
    })
    .expect("filter build failed");

    let mut rows = msp_reports::Entity::find().all(&db).await.unwrap();
    rows.retain(|r| filter.matches(r));
    assert_eq!(rows.len(), 12);

    list::sort_msp(&mut rows, MSP_DEFAULT_SORT, Direction::Desc);
    let page = list::paginate(rows, 2, 10);

    assert_eq!(page.window.total_pages, 2);
    assert_eq!(page.rows.len(), 2);
    // Descending by request_date, page 2 holds the two oldest Acme rows.
    assert_eq!(page.rows[0].request_date, dt(2025, 3, 3, 9, 0));
    assert_eq!(page.rows[1].request_date, dt(2025, 3, 1, 9, 0));
}

#[actix_rt::test]
#[serial]
async fn test_substring_filter_is_case_sensitive_against_store() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    report::create(
        &db,
        user.id,
        ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, 1, 9, 0))),
    )
    .await
    .expect("create failed");

    let rows = msp_reports::Entity::find().all(&db).await.unwrap();

    let exact = MspFilter::build(MspParams {
        client_name: "Acm".to_owned(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(rows.iter().filter(|r| exact.matches(r)).count(), 1);

    let wrong_case = MspFilter::build(MspParams {
        client_name: "acme".to_owned(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(rows.iter().filter(|r| wrong_case.matches(r)).count(), 0);
}

#[actix_rt::test]
#[serial]
async fn test_date_range_filters_primary_date_inclusive() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "writer", "password123")
        .await
        .expect("user fixture failed");

    for day in [1, 10, 20] {
        report::create(
            &db,
            user.id,
            ReportDetail::Msp(msp_fields("Acme", "kim", None, dt(2025, 3, day, 23, 30))),
        )
        .await
        .expect("create failed");
    }

    let filter = MspFilter::build(MspParams {
        start_date: "2025-03-10".to_owned(),
        end_date: "2025-03-20".to_owned(),
        ..Default::default()
    })
    .unwrap();

    let rows = msp_reports::Entity::find().all(&db).await.unwrap();
    let matched: Vec<_> = rows.iter().filter(|r| filter.matches(r)).collect();
    // 2025-03-20 23:30 is inside the ceiled end bound.
    assert_eq!(matched.len(), 2);
}
