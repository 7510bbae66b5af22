pub mod account;
pub mod admin;
pub mod clients;
pub mod error;
pub mod error_reports;
pub mod export;
pub mod index;
pub mod leave;
pub mod log_reports;
pub mod login;
pub mod logout;
pub mod options;
pub mod report;
pub mod reports;
pub mod solideo;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution will stop at the first match, so the fixed-path
    // /report and /reports routes register before /report/{id}.
    index::configure(conf);
    account::configure(conf);
    admin::configure(conf);
    clients::configure(conf);
    export::configure(conf);
    reports::configure(conf);
    error_reports::configure(conf);
    log_reports::configure(conf);
    login::configure(conf);
    logout::configure(conf);
    options::configure(conf);
    solideo::configure(conf);
    leave::configure(conf);
    report::configure(conf);
}

/// One entry in a list page's numbered pagination strip.
pub(crate) struct PageLink {
    pub number: u64,
    pub current: bool,
}

pub(crate) fn page_links(window: &crate::list::PageWindow) -> Vec<PageLink> {
    window
        .pages()
        .map(|number| PageLink {
            number,
            current: number == window.page,
        })
        .collect()
}

/// Empty or whitespace-only form inputs become NULL columns.
pub(crate) fn none_if_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Formats an optional timestamp the way the pages and CSV exports show it.
pub(crate) fn fmt_date(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
