//! Global database pool.
//!
//! The pool is initialized once at startup and shared process-wide, so
//! handlers can reach it without threading a connection through every call.

use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connects to the database and stores the pool. Called once from main.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database.");
    DB_POOL
        .set(pool)
        .expect("init_db() called more than once.");
}

pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("DB pool is not initialized.")
}
