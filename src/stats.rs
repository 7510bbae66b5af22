//! Admin statistics: read-only group-by-and-count summaries over report
//! rows.
//!
//! Aggregation happens over fully materialized rows and is recomputed on
//! every request. The collectors are pure functions over slices so they can
//! be unit tested without a store; the handlers in `web::admin` feed them
//! freshly fetched rows.

use crate::orm::{error_reports, log_reports, msp_reports, reports};
use chrono::{Datelike, Duration, NaiveDateTime};
use std::collections::BTreeMap;

/// Status literal meaning a report is completed.
pub const STATUS_DONE: &str = "완료";

/// Counts per report kind, used for per-client and per-month breakdowns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeTally {
    pub msp: u64,
    pub error: u64,
    pub log: u64,
}

impl TypeTally {
    pub fn total(&self) -> u64 {
        self.msp + self.error + self.log
    }
}

/// Per-manager workload: everything assigned, and how much of it is done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManagerTally {
    pub count: u64,
    pub done: u64,
}

/// Site-wide aggregation across all three report types.
#[derive(Clone, Debug, Default)]
pub struct SiteStats {
    pub total_reports: u64,
    pub recent_7: u64,
    pub recent_30: u64,
    pub status_counts: BTreeMap<String, u64>,
    pub client_summary: BTreeMap<String, TypeTally>,
    pub manager_counts: BTreeMap<String, ManagerTally>,
    pub system_counts: BTreeMap<String, u64>,
    /// Error reports only; rows without a component are not counted.
    pub component_counts: BTreeMap<String, u64>,
    /// Keyed "YYYY-MM" by each type's primary date column; BTreeMap keeps
    /// the keys in ascending month order.
    pub monthly_counts: BTreeMap<String, TypeTally>,
}

fn month_key(date: NaiveDateTime) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn bump(map: &mut BTreeMap<String, u64>, key: &str) {
    *map.entry(key.to_owned()).or_default() += 1;
}

impl SiteStats {
    pub fn collect(
        headers: &[reports::Model],
        msp: &[msp_reports::Model],
        errors: &[error_reports::Model],
        logs: &[log_reports::Model],
        now: NaiveDateTime,
    ) -> Self {
        let mut stats = Self {
            total_reports: headers.len() as u64,
            ..Default::default()
        };

        // Boundary is inclusive: created exactly N days ago still counts.
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);
        for header in headers {
            if header.created_at >= week_ago {
                stats.recent_7 += 1;
            }
            if header.created_at >= month_ago {
                stats.recent_30 += 1;
            }
        }

        for row in msp {
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            stats.client_summary.entry(row.client_name.clone()).or_default().msp += 1;
            stats.tally_manager(&row.manager, row.status.as_deref());
            bump(&mut stats.system_counts, &row.system_name);
            stats.monthly_counts.entry(month_key(row.request_date)).or_default().msp += 1;
        }

        for row in errors {
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            stats.client_summary.entry(row.client_name.clone()).or_default().error += 1;
            stats.tally_manager(&row.manager, row.status.as_deref());
            bump(&mut stats.system_counts, &row.system_name);
            if let Some(component) = &row.target_component {
                bump(&mut stats.component_counts, component);
            }
            stats
                .monthly_counts
                .entry(month_key(row.error_start_date))
                .or_default()
                .error += 1;
        }

        for row in logs {
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            if let Some(client) = &row.client_name {
                stats.client_summary.entry(client.clone()).or_default().log += 1;
            }
            stats.tally_manager(&row.manager, row.status.as_deref());
            if let Some(system) = &row.system_name {
                bump(&mut stats.system_counts, system);
            }
            stats.monthly_counts.entry(month_key(row.log_date)).or_default().log += 1;
        }

        stats
    }

    fn tally_manager(&mut self, manager: &str, status: Option<&str>) {
        let tally = self.manager_counts.entry(manager.to_owned()).or_default();
        tally.count += 1;
        if status == Some(STATUS_DONE) {
            tally.done += 1;
        }
    }
}

/// The client-scoped variant of [`SiteStats`]: every aggregation restricted
/// to one client name, plus per-type totals and a grand total.
#[derive(Clone, Debug, Default)]
pub struct ClientStats {
    pub client_name: String,
    pub counts: TypeTally,
    pub status_counts: BTreeMap<String, u64>,
    pub system_counts: BTreeMap<String, u64>,
    pub component_counts: BTreeMap<String, u64>,
    pub monthly_counts: BTreeMap<String, TypeTally>,
}

impl ClientStats {
    pub fn collect(
        client_name: &str,
        msp: &[msp_reports::Model],
        errors: &[error_reports::Model],
        logs: &[log_reports::Model],
    ) -> Self {
        let mut stats = Self {
            client_name: client_name.to_owned(),
            ..Default::default()
        };

        for row in msp.iter().filter(|r| r.client_name == client_name) {
            stats.counts.msp += 1;
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            bump(&mut stats.system_counts, &row.system_name);
            stats.monthly_counts.entry(month_key(row.request_date)).or_default().msp += 1;
        }

        for row in errors.iter().filter(|r| r.client_name == client_name) {
            stats.counts.error += 1;
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            bump(&mut stats.system_counts, &row.system_name);
            if let Some(component) = &row.target_component {
                bump(&mut stats.component_counts, component);
            }
            stats
                .monthly_counts
                .entry(month_key(row.error_start_date))
                .or_default()
                .error += 1;
        }

        for row in logs
            .iter()
            .filter(|r| r.client_name.as_deref() == Some(client_name))
        {
            stats.counts.log += 1;
            if let Some(status) = &row.status {
                bump(&mut stats.status_counts, status);
            }
            if let Some(system) = &row.system_name {
                bump(&mut stats.system_counts, system);
            }
            stats.monthly_counts.entry(month_key(row.log_date)).or_default().log += 1;
        }

        stats
    }
}

/// Distinct client names appearing in any of the three report types, sorted.
pub fn client_names(
    msp: &[msp_reports::Model],
    errors: &[error_reports::Model],
    logs: &[log_reports::Model],
) -> Vec<String> {
    let mut names: Vec<String> = msp
        .iter()
        .map(|r| r.client_name.clone())
        .chain(errors.iter().map(|r| r.client_name.clone()))
        .chain(logs.iter().filter_map(|r| r.client_name.clone()))
        .collect();
    names.sort();
    names.dedup();
    names
}
