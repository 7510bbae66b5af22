//! Integration tests for account storage and password hashing.

mod common;

use common::{database::*, fixtures::*};
use opstrack::orm::users;
use opstrack::session::{hash_password, verify_password};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn test_password_hash_round_trip() {
    let db = setup_test_database().await.expect("db setup failed");
    let user = create_test_user(&db, "hong", "password123")
        .await
        .expect("user fixture failed");

    let stored = users::Entity::find_by_id(user.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();

    // The stored value is a PHC hash, never the plain text.
    assert_ne!(stored.password, "password123");
    assert!(verify_password("password123", &stored.password));
    assert!(!verify_password("password124", &stored.password));
}

#[actix_rt::test]
#[serial]
async fn test_hashes_are_salted_per_user() {
    // Initializes the hasher global alongside the schema.
    let _db = setup_test_database().await.expect("db setup failed");
    let first = hash_password("password123").expect("hash failed");
    let second = hash_password("password123").expect("hash failed");
    assert_ne!(first, second);
}

#[actix_rt::test]
#[serial]
async fn test_username_lookup_is_exact() {
    let db = setup_test_database().await.expect("db setup failed");
    create_test_user(&db, "hong", "password123")
        .await
        .expect("user fixture failed");

    let found = users::Entity::find()
        .filter(users::Column::Username.eq("hong"))
        .one(&db)
        .await
        .unwrap();
    assert!(found.is_some());

    let missing = users::Entity::find()
        .filter(users::Column::Username.eq("hong2"))
        .one(&db)
        .await
        .unwrap();
    assert!(missing.is_none());
}
