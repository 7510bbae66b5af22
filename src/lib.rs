pub mod db;
pub mod filter;
pub mod list;
pub mod middleware;
pub mod natural;
pub mod orm;
pub mod report;
pub mod session;
pub mod stats;
pub mod web;

/// Initialize all local mods.
/// Panics
pub fn init_our_mods() {
    // This should be a list of simple function calls.
    // Each module should work mostly independent of others.
    // This way, we can unit test individual modules without loading the entire application.
    session::init();
}
