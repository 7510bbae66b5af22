//! List filters for the three report types.
//!
//! Each type has a fixed set of optional string parameters. Non-empty
//! parameters become predicates: substring containment (case-sensitive) on
//! their column, except `status` which is exact match, a date range against
//! the type's primary date column, and one OR-combined free-text `search`
//! across a per-type column list. All contributed predicates AND together;
//! empty parameters contribute nothing.
//!
//! The filters evaluate in application code against materialized rows; the
//! list pipeline in [`crate::list`] fetches, filters, sorts, and slices in
//! one pass. Keeping the predicate here, behind one narrow seam, is what a
//! later push-down into the store would replace.

use crate::orm::{error_reports, log_reports, msp_reports};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fmt;

/// A present-but-malformed filter parameter. Maps to HTTP 400.
#[derive(Debug)]
pub struct FilterError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.field, self.value)
    }
}

impl std::error::Error for FilterError {}

/// Inclusive range over a report's primary date column, floored to the
/// start of `start_date` and ceiled to the last second of `end_date`.
#[derive(Clone, Copy, Debug)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Both bounds are required together; with only one present the range
    /// filter is skipped entirely.
    pub fn from_params(start_date: &str, end_date: &str) -> Result<Option<Self>, FilterError> {
        if start_date.is_empty() || end_date.is_empty() {
            return Ok(None);
        }
        let start = parse_date("start_date", start_date)?
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = parse_date("end_date", end_date)?
            .and_hms_opt(23, 59, 59)
            .unwrap();
        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError {
        field,
        value: value.to_owned(),
    })
}

// Empty needles are no-ops, not match-nothing predicates.

fn contains(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.contains(needle)
}

fn contains_opt(haystack: Option<&str>, needle: &str) -> bool {
    needle.is_empty() || haystack.is_some_and(|h| h.contains(needle))
}

fn equals_opt(value: Option<&str>, wanted: &str) -> bool {
    wanted.is_empty() || value == Some(wanted)
}

fn any_contains(columns: &[Option<&str>], needle: &str) -> bool {
    columns
        .iter()
        .any(|c| c.is_some_and(|h| h.contains(needle)))
}

fn push_pairs(ser: &mut url::form_urlencoded::Serializer<'_, String>, pairs: &[(&str, &str)]) {
    for (name, value) in pairs {
        if !value.is_empty() {
            ser.append_pair(name, value);
        }
    }
}

/// Filter parameters for MSP request reports, as they arrive on the query
/// string of the list and download endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MspParams {
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub target_env: String,
    #[serde(default)]
    pub request_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Clone, Debug)]
pub struct MspFilter {
    params: MspParams,
    range: Option<DateRange>,
}

impl MspFilter {
    pub fn build(params: MspParams) -> Result<Self, FilterError> {
        let range = DateRange::from_params(&params.start_date, &params.end_date)?;
        Ok(Self { params, range })
    }

    pub fn matches(&self, row: &msp_reports::Model) -> bool {
        let p = &self.params;
        contains(&row.manager, &p.manager)
            && contains(&row.requester, &p.requester)
            && equals_opt(row.status.as_deref(), &p.status)
            && contains(&row.client_name, &p.client_name)
            && contains(&row.system_name, &p.system_name)
            && contains_opt(row.target_env.as_deref(), &p.target_env)
            && contains(&row.request_type, &p.request_type)
            && self.range.is_none_or(|r| r.contains(row.request_date))
            && self.search_matches(row)
    }

    fn search_matches(&self, row: &msp_reports::Model) -> bool {
        let needle = &self.params.search;
        if needle.is_empty() {
            return true;
        }
        any_contains(
            &[
                Some(&row.client_name),
                Some(&row.system_name),
                Some(&row.manager),
                Some(&row.requester),
                Some(&row.request_type),
                row.request_content.as_deref(),
                row.purpose.as_deref(),
                row.response.as_deref(),
                row.etc.as_deref(),
                row.status.as_deref(),
            ],
            needle,
        )
    }

    /// Canonical query string of all non-empty parameters, so paginated
    /// links preserve filter state.
    pub fn query_string(&self, sort: &str, direction: &str) -> String {
        let p = &self.params;
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        push_pairs(
            &mut ser,
            &[
                ("manager", &p.manager),
                ("requester", &p.requester),
                ("status", &p.status),
                ("client_name", &p.client_name),
                ("system_name", &p.system_name),
                ("target_env", &p.target_env),
                ("request_type", &p.request_type),
                ("start_date", &p.start_date),
                ("end_date", &p.end_date),
                ("search", &p.search),
                ("sort", sort),
                ("direction", direction),
            ],
        );
        ser.finish()
    }
}

/// Filter parameters for incident/error reports.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorParams {
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub target_env: String,
    #[serde(default)]
    pub target_component: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Clone, Debug)]
pub struct ErrorFilter {
    params: ErrorParams,
    range: Option<DateRange>,
}

impl ErrorFilter {
    pub fn build(params: ErrorParams) -> Result<Self, FilterError> {
        let range = DateRange::from_params(&params.start_date, &params.end_date)?;
        Ok(Self { params, range })
    }

    pub fn matches(&self, row: &error_reports::Model) -> bool {
        let p = &self.params;
        contains(&row.manager, &p.manager)
            && equals_opt(row.status.as_deref(), &p.status)
            && contains(&row.client_name, &p.client_name)
            && contains(&row.system_name, &p.system_name)
            && contains_opt(row.target_env.as_deref(), &p.target_env)
            && contains_opt(row.target_component.as_deref(), &p.target_component)
            && self.range.is_none_or(|r| r.contains(row.error_start_date))
            && self.search_matches(row)
    }

    fn search_matches(&self, row: &error_reports::Model) -> bool {
        let needle = &self.params.search;
        if needle.is_empty() {
            return true;
        }
        any_contains(
            &[
                Some(&row.client_name),
                Some(&row.system_name),
                Some(&row.manager),
                row.status.as_deref(),
                row.target_env.as_deref(),
                row.target_component.as_deref(),
                row.customer_impact.as_deref(),
                Some(&row.error_info),
                row.error_reason.as_deref(),
                row.action_taken.as_deref(),
                row.etc.as_deref(),
            ],
            needle,
        )
    }

    pub fn query_string(&self, sort: &str, direction: &str) -> String {
        let p = &self.params;
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        push_pairs(
            &mut ser,
            &[
                ("manager", &p.manager),
                ("status", &p.status),
                ("client_name", &p.client_name),
                ("system_name", &p.system_name),
                ("target_env", &p.target_env),
                ("target_component", &p.target_component),
                ("start_date", &p.start_date),
                ("end_date", &p.end_date),
                ("search", &p.search),
                ("sort", sort),
                ("direction", direction),
            ],
        );
        ser.finish()
    }
}

/// Filter parameters for system log reports.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogParams {
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub target_env: String,
    #[serde(default)]
    pub log_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Clone, Debug)]
pub struct LogFilter {
    params: LogParams,
    range: Option<DateRange>,
}

impl LogFilter {
    pub fn build(params: LogParams) -> Result<Self, FilterError> {
        let range = DateRange::from_params(&params.start_date, &params.end_date)?;
        Ok(Self { params, range })
    }

    pub fn matches(&self, row: &log_reports::Model) -> bool {
        let p = &self.params;
        contains(&row.manager, &p.manager)
            && equals_opt(row.status.as_deref(), &p.status)
            && contains_opt(row.client_name.as_deref(), &p.client_name)
            && contains_opt(row.system_name.as_deref(), &p.system_name)
            && contains_opt(row.target_env.as_deref(), &p.target_env)
            && contains_opt(row.log_type.as_deref(), &p.log_type)
            && self.range.is_none_or(|r| r.contains(row.log_date))
            && self.search_matches(row)
    }

    fn search_matches(&self, row: &log_reports::Model) -> bool {
        let needle = &self.params.search;
        if needle.is_empty() {
            return true;
        }
        any_contains(
            &[
                row.client_name.as_deref(),
                row.system_name.as_deref(),
                Some(&row.manager),
                row.status.as_deref(),
                row.target_env.as_deref(),
                row.log_type.as_deref(),
                row.content.as_deref(),
                row.action.as_deref(),
                row.summary.as_deref(),
                row.etc.as_deref(),
            ],
            needle,
        )
    }

    pub fn query_string(&self, sort: &str, direction: &str) -> String {
        let p = &self.params;
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        push_pairs(
            &mut ser,
            &[
                ("manager", &p.manager),
                ("status", &p.status),
                ("client_name", &p.client_name),
                ("system_name", &p.system_name),
                ("target_env", &p.target_env),
                ("log_type", &p.log_type),
                ("start_date", &p.start_date),
                ("end_date", &p.end_date),
                ("search", &p.search),
                ("sort", sort),
                ("direction", direction),
            ],
        );
        ser.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn msp_row(manager: &str, status: Option<&str>, request_date: &str) -> msp_reports::Model {
        msp_reports::Model {
            report_id: 1,
            request_date: request_date.parse().unwrap(),
            completed_date: None,
            client_name: "Acme".to_owned(),
            system_name: "portal".to_owned(),
            target_env: Some("prod".to_owned()),
            cloud_type: None,
            requester: "hong".to_owned(),
            request_type: "change".to_owned(),
            request_content: Some("규칙 변경".to_owned()),
            purpose: None,
            manager: manager.to_owned(),
            status: status.map(str::to_owned),
            response: None,
            etc: None,
        }
    }

    #[test]
    fn test_no_params_pass_all() {
        let filter = MspFilter::build(MspParams::default()).unwrap();
        assert!(filter.matches(&msp_row("kim", Some("완료"), "2025-03-01T10:00:00")));
    }

    #[test]
    fn test_manager_substring_case_sensitive() {
        let filter = MspFilter::build(MspParams {
            manager: "kim".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.matches(&msp_row("kim.cs", None, "2025-03-01T10:00:00")));
        assert!(!filter.matches(&msp_row("KIM", None, "2025-03-01T10:00:00")));
        assert!(!filter.matches(&msp_row("lee", None, "2025-03-01T10:00:00")));
    }

    #[test]
    fn test_status_is_exact_match() {
        let filter = MspFilter::build(MspParams {
            status: "완료".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.matches(&msp_row("kim", Some("완료"), "2025-03-01T10:00:00")));
        assert!(!filter.matches(&msp_row("kim", Some("처리중(완료예정)"), "2025-03-01T10:00:00")));
        assert!(!filter.matches(&msp_row("kim", None, "2025-03-01T10:00:00")));
    }

    #[test]
    fn test_range_end_day_is_inclusive() {
        let filter = MspFilter::build(MspParams {
            start_date: "2025-03-01".to_owned(),
            end_date: "2025-03-02".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.matches(&msp_row("kim", None, "2025-03-02T23:59:59")));
        assert!(!filter.matches(&msp_row("kim", None, "2025-03-03T00:00:00")));
        assert!(filter.matches(&msp_row("kim", None, "2025-03-01T00:00:00")));
        assert!(!filter.matches(&msp_row("kim", None, "2025-02-28T23:59:59")));
    }

    #[test]
    fn test_lone_date_bound_is_skipped() {
        let filter = MspFilter::build(MspParams {
            start_date: "2025-03-01".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.matches(&msp_row("kim", None, "2020-01-01T00:00:00")));
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let err = MspFilter::build(MspParams {
            start_date: "03/01/2025".to_owned(),
            end_date: "2025-03-02".to_owned(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.field, "start_date");
    }

    #[test]
    fn test_search_spans_columns_as_or_group() {
        let filter = MspFilter::build(MspParams {
            search: "규칙".to_owned(),
            ..Default::default()
        })
        .unwrap();
        // Matches request_content even though no other column contains it.
        assert!(filter.matches(&msp_row("kim", None, "2025-03-01T10:00:00")));

        let miss = MspFilter::build(MspParams {
            search: "없는말".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(!miss.matches(&msp_row("kim", None, "2025-03-01T10:00:00")));
    }

    #[test]
    fn test_search_combines_with_other_filters_as_and() {
        let filter = MspFilter::build(MspParams {
            manager: "lee".to_owned(),
            search: "Acme".to_owned(),
            ..Default::default()
        })
        .unwrap();
        // search hits client_name but the manager term still has to hold.
        assert!(!filter.matches(&msp_row("kim", None, "2025-03-01T10:00:00")));
    }

    #[test]
    fn test_query_string_skips_empty_params() {
        let filter = MspFilter::build(MspParams {
            manager: "kim".to_owned(),
            search: "장애 복구".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            filter.query_string("request_date", "desc"),
            "manager=kim&search=%EC%9E%A5%EC%95%A0+%EB%B3%B5%EA%B5%AC&sort=request_date&direction=desc"
        );
    }

    #[test]
    fn test_log_filter_null_columns_do_not_match_needles() {
        let row = log_reports::Model {
            report_id: 1,
            log_date: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            completed_date: None,
            client_name: None,
            system_name: None,
            target_env: None,
            cloud_type: None,
            log_type: None,
            content: None,
            action: None,
            manager: "kim".to_owned(),
            status: None,
            summary: None,
            etc: None,
        };
        let filter = LogFilter::build(LogParams {
            client_name: "Acme".to_owned(),
            ..Default::default()
        })
        .unwrap();
        assert!(!filter.matches(&row));

        let open = LogFilter::build(LogParams::default()).unwrap();
        assert!(open.matches(&row));
    }
}
