//! Password hashing and cookie-session authentication.
//!
//! Login stores the user id in the signed cookie session; each request
//! resolves it back to a user row. Only the id crosses the wire, so a stale
//! cookie for a deleted account simply fails to resolve.

use crate::db::get_db_pool;
use crate::orm::users;
use actix_session::Session;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use once_cell::sync::OnceCell;
use sea_orm::EntityTrait;

const SESSION_USER_KEY: &str = "user_id";

static ARGON2: OnceCell<Argon2<'static>> = OnceCell::new();

pub fn init() {
    ARGON2
        .set(Argon2::default())
        .expect("session::init() called more than once.");
}

pub fn get_argon2() -> &'static Argon2<'static> {
    ARGON2.get().expect("ARGON2 is not initialized.")
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("verify_password: unparsable stored hash: {}", e);
            false
        }
    }
}

/// Marks the session as belonging to this user.
pub fn start_session(session: &Session, user_id: i32) -> Result<(), actix_web::Error> {
    session
        .insert(SESSION_USER_KEY, user_id)
        .map_err(actix_web::error::ErrorInternalServerError)
}

pub fn end_session(session: &Session) {
    session.purge();
}

/// Resolves the session cookie to a user row, or None for guests.
pub async fn authenticate_by_session(session: &Session) -> Option<users::Model> {
    let user_id = match session.get::<i32>(SESSION_USER_KEY) {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("authenticate_by_session: unreadable session: {}", e);
            return None;
        }
    };

    match users::Entity::find_by_id(user_id).one(get_db_pool()).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("authenticate_by_session: {}", e);
            None
        }
    }
}
