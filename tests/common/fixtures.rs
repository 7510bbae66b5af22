//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, Utc};
use opstrack::orm::users;
use opstrack::report::{ErrorFields, LogFields, MspFields};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub password: String, // Plain text password for testing
}

/// Create a test user with known credentials
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    let password_hash = opstrack::session::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    let user = users::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(password_hash),
        name: Set(username.to_owned()),
        email: Set(Some(format!("{}@test.com", username))),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(TestUser {
        id: user.user_id,
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

pub fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Minimal MSP detail with the fields tests care about.
pub fn msp_fields(
    client: &str,
    manager: &str,
    status: Option<&str>,
    request_date: NaiveDateTime,
) -> MspFields {
    MspFields {
        request_date,
        completed_date: None,
        client_name: client.to_owned(),
        system_name: "portal".to_owned(),
        target_env: Some("prod".to_owned()),
        cloud_type: None,
        requester: "hong".to_owned(),
        request_type: "change".to_owned(),
        request_content: None,
        purpose: None,
        manager: manager.to_owned(),
        status: status.map(str::to_owned),
        response: None,
        etc: None,
    }
}

pub fn error_fields(
    client: &str,
    component: Option<&str>,
    error_start_date: NaiveDateTime,
) -> ErrorFields {
    ErrorFields {
        error_start_date,
        error_end_date: None,
        client_name: client.to_owned(),
        system_name: "portal".to_owned(),
        target_env: None,
        cloud_type: None,
        target_component: component.map(str::to_owned),
        customer_impact: None,
        error_info: "disk full".to_owned(),
        error_reason: None,
        action_taken: None,
        manager: "kim".to_owned(),
        status: Some("처리중".to_owned()),
        etc: None,
    }
}

pub fn log_fields(client: Option<&str>, manager: &str, log_date: NaiveDateTime) -> LogFields {
    LogFields {
        log_date,
        completed_date: None,
        client_name: client.map(str::to_owned),
        system_name: client.map(|_| "portal".to_owned()),
        target_env: None,
        cloud_type: None,
        log_type: Some("점검".to_owned()),
        content: Some("daily check".to_owned()),
        action: None,
        manager: manager.to_owned(),
        status: Some("완료".to_owned()),
        summary: None,
        etc: None,
    }
}
