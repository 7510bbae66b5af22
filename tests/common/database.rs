//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::sync::Once;

static INIT_SYNC: Once = Once::new();

/// Initialize synchronous global state (ARGON2)
fn init_sync_globals() {
    INIT_SYNC.call_once(|| {
        opstrack::session::init();
    });
}

/// Fresh in-memory SQLite database with the full schema created from the
/// entity definitions. Each test gets its own connection and tables.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    init_sync_globals();

    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    use opstrack::orm::{clients, error_reports, log_reports, msp_reports, reports, users};

    db.execute(backend.build(&schema.create_table_from_entity(users::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(reports::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(msp_reports::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(error_reports::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(log_reports::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(clients::Entity)))
        .await?;

    Ok(db)
}
