//! Report list pipeline: materialize, sort, slice.
//!
//! Filtered rows are fetched in full and sorted in application code, because
//! the sort key may be a natural string key ([`crate::natural`]) that the
//! store cannot produce. Pagination then slices the sorted set and computes
//! a sliding five-wide page-number window for the templates.

use crate::natural::NaturalKey;
use crate::orm::{error_reports, log_reports, msp_reports};
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: u64 = 10;

/// Sort direction, `desc` unless the query says `asc`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn from_param(value: &str) -> Self {
        match value {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Pagination metadata for one rendered page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub total: u64,
    /// `ceil(total / limit)`; 0 when there are no rows at all, in which
    /// case no page exists and the slice is empty.
    pub total_pages: u64,
    pub start_page: u64,
    pub end_page: u64,
}

impl PageWindow {
    /// At most five page numbers, centered on the current page and
    /// re-clamped at both boundaries.
    pub fn compute(total: u64, page: u64, limit: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);

        let start_page = page.saturating_sub(2).max(1);
        let end_page = start_page.saturating_add(4).min(total_pages);
        let start_page = end_page.saturating_sub(4).max(1);

        Self {
            page,
            total,
            total_pages,
            start_page,
            end_page,
        }
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<u64> {
        self.start_page..=self.end_page
    }
}

/// One page of sorted rows plus its pagination metadata.
#[derive(Clone, Debug)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub window: PageWindow,
}

/// Slices the sorted set at `[(page-1)*limit, +limit)`. A page past the end
/// yields an empty slice, never an error.
pub fn paginate<T>(rows: Vec<T>, page: u64, limit: u64) -> ListPage<T> {
    let window = PageWindow::compute(rows.len() as u64, page, limit);
    let limit = limit.max(1);
    // page and limit come straight off the query string; the offset must not
    // overflow no matter what values arrive.
    let offset = window.page.saturating_sub(1).saturating_mul(limit);
    let rows = rows
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();
    ListPage { rows, window }
}

// Per-type sort dispatch. String columns enumerated for natural ordering get
// the NaturalKey comparator; any other known column compares by raw value;
// an unknown sort key feeds rows through in fetch order.

pub const MSP_DEFAULT_SORT: &str = "request_date";
pub const ERROR_DEFAULT_SORT: &str = "error_start_date";
pub const LOG_DEFAULT_SORT: &str = "log_date";

fn sort_by<T>(rows: &mut [T], direction: Direction, cmp: impl Fn(&T, &T) -> Ordering) {
    rows.sort_by(|a, b| direction.apply(cmp(a, b)));
}

pub fn sort_msp(rows: &mut [msp_reports::Model], sort: &str, direction: Direction) {
    match sort {
        "client_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.client_name).cmp(&NaturalKey::new(&b.client_name))
        }),
        "system_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.system_name).cmp(&NaturalKey::new(&b.system_name))
        }),
        "manager" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.manager).cmp(&NaturalKey::new(&b.manager))
        }),
        "request_type" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.request_type).cmp(&NaturalKey::new(&b.request_type))
        }),
        "status" => sort_by(rows, direction, |a, b| {
            NaturalKey::from_opt(a.status.as_deref()).cmp(&NaturalKey::from_opt(b.status.as_deref()))
        }),
        "requester" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.requester).cmp(&NaturalKey::new(&b.requester))
        }),
        "report_id" => sort_by(rows, direction, |a, b| a.report_id.cmp(&b.report_id)),
        "request_date" => sort_by(rows, direction, |a, b| a.request_date.cmp(&b.request_date)),
        "completed_date" => sort_by(rows, direction, |a, b| {
            a.completed_date.cmp(&b.completed_date)
        }),
        "target_env" => sort_by(rows, direction, |a, b| a.target_env.cmp(&b.target_env)),
        "cloud_type" => sort_by(rows, direction, |a, b| a.cloud_type.cmp(&b.cloud_type)),
        "request_content" => sort_by(rows, direction, |a, b| {
            a.request_content.cmp(&b.request_content)
        }),
        "purpose" => sort_by(rows, direction, |a, b| a.purpose.cmp(&b.purpose)),
        "response" => sort_by(rows, direction, |a, b| a.response.cmp(&b.response)),
        "etc" => sort_by(rows, direction, |a, b| a.etc.cmp(&b.etc)),
        _ => {}
    }
}

pub fn sort_error(rows: &mut [error_reports::Model], sort: &str, direction: Direction) {
    match sort {
        "client_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.client_name).cmp(&NaturalKey::new(&b.client_name))
        }),
        "system_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.system_name).cmp(&NaturalKey::new(&b.system_name))
        }),
        "manager" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.manager).cmp(&NaturalKey::new(&b.manager))
        }),
        "report_id" => sort_by(rows, direction, |a, b| a.report_id.cmp(&b.report_id)),
        "error_start_date" => sort_by(rows, direction, |a, b| {
            a.error_start_date.cmp(&b.error_start_date)
        }),
        "error_end_date" => sort_by(rows, direction, |a, b| {
            a.error_end_date.cmp(&b.error_end_date)
        }),
        "target_env" => sort_by(rows, direction, |a, b| a.target_env.cmp(&b.target_env)),
        "target_component" => sort_by(rows, direction, |a, b| {
            a.target_component.cmp(&b.target_component)
        }),
        "customer_impact" => sort_by(rows, direction, |a, b| {
            a.customer_impact.cmp(&b.customer_impact)
        }),
        "error_info" => sort_by(rows, direction, |a, b| a.error_info.cmp(&b.error_info)),
        "error_reason" => sort_by(rows, direction, |a, b| a.error_reason.cmp(&b.error_reason)),
        "action_taken" => sort_by(rows, direction, |a, b| a.action_taken.cmp(&b.action_taken)),
        "status" => sort_by(rows, direction, |a, b| a.status.cmp(&b.status)),
        "cloud_type" => sort_by(rows, direction, |a, b| a.cloud_type.cmp(&b.cloud_type)),
        "etc" => sort_by(rows, direction, |a, b| a.etc.cmp(&b.etc)),
        _ => {}
    }
}

pub fn sort_log(rows: &mut [log_reports::Model], sort: &str, direction: Direction) {
    match sort {
        "client_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::from_opt(a.client_name.as_deref())
                .cmp(&NaturalKey::from_opt(b.client_name.as_deref()))
        }),
        "system_name" => sort_by(rows, direction, |a, b| {
            NaturalKey::from_opt(a.system_name.as_deref())
                .cmp(&NaturalKey::from_opt(b.system_name.as_deref()))
        }),
        "manager" => sort_by(rows, direction, |a, b| {
            NaturalKey::new(&a.manager).cmp(&NaturalKey::new(&b.manager))
        }),
        "report_id" => sort_by(rows, direction, |a, b| a.report_id.cmp(&b.report_id)),
        "log_date" => sort_by(rows, direction, |a, b| a.log_date.cmp(&b.log_date)),
        "completed_date" => sort_by(rows, direction, |a, b| {
            a.completed_date.cmp(&b.completed_date)
        }),
        "target_env" => sort_by(rows, direction, |a, b| a.target_env.cmp(&b.target_env)),
        "cloud_type" => sort_by(rows, direction, |a, b| a.cloud_type.cmp(&b.cloud_type)),
        "log_type" => sort_by(rows, direction, |a, b| a.log_type.cmp(&b.log_type)),
        "content" => sort_by(rows, direction, |a, b| a.content.cmp(&b.content)),
        "action" => sort_by(rows, direction, |a, b| a.action.cmp(&b.action)),
        "status" => sort_by(rows, direction, |a, b| a.status.cmp(&b.status)),
        "summary" => sort_by(rows, direction, |a, b| a.summary.cmp(&b.summary)),
        "etc" => sort_by(rows, direction, |a, b| a.etc.cmp(&b.etc)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_total_pages_rounds_up() {
        let w = PageWindow::compute(23, 2, 10);
        assert_eq!(w.total_pages, 3);
        assert_eq!(w.start_page, 1);
        assert_eq!(w.end_page, 3);
    }

    #[test]
    fn test_empty_set_has_no_pages() {
        let page = paginate(Vec::<i32>::new(), 1, 10);
        assert!(page.rows.is_empty());
        assert_eq!(page.window.total_pages, 0);
        assert_eq!(page.window.end_page, 0);
    }

    #[test]
    fn test_slice_is_offset_by_page() {
        let rows: Vec<i32> = (1..=23).collect();
        let page = paginate(rows, 2, 10);
        assert_eq!(page.rows, (11..=20).collect::<Vec<i32>>());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let rows: Vec<i32> = (1..=5).collect();
        let page = paginate(rows, 4, 10);
        assert!(page.rows.is_empty());
        assert_eq!(page.window.total_pages, 1);
    }

    #[test]
    fn test_extreme_page_and_limit_do_not_overflow() {
        let rows: Vec<i32> = (1..=3).collect();

        let page = paginate(rows.clone(), u64::MAX, 10);
        assert!(page.rows.is_empty());
        assert_eq!(page.window.total_pages, 1);

        let page = paginate(rows.clone(), 2, u64::MAX);
        assert!(page.rows.is_empty());

        let page = paginate(rows, u64::MAX, u64::MAX);
        assert!(page.rows.is_empty());

        let w = PageWindow::compute(5, u64::MAX, 10);
        assert_eq!((w.start_page, w.end_page), (1, 1));
    }

    #[test]
    fn test_window_centers_on_page() {
        let w = PageWindow::compute(200, 9, 10);
        assert_eq!((w.start_page, w.end_page), (7, 11));
    }

    #[test]
    fn test_window_clamps_at_both_ends() {
        let w = PageWindow::compute(200, 1, 10);
        assert_eq!((w.start_page, w.end_page), (1, 5));

        let w = PageWindow::compute(200, 19, 10);
        assert_eq!((w.start_page, w.end_page), (16, 20));
    }

    fn msp(id: i32, system_name: &str, day: u32) -> msp_reports::Model {
        msp_reports::Model {
            report_id: id,
            request_date: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            completed_date: None,
            client_name: "Acme".to_owned(),
            system_name: system_name.to_owned(),
            target_env: None,
            cloud_type: None,
            requester: "hong".to_owned(),
            request_type: "change".to_owned(),
            request_content: None,
            purpose: None,
            manager: "kim".to_owned(),
            status: None,
            response: None,
            etc: None,
        }
    }

    #[test]
    fn test_natural_sort_on_enumerated_string_field() {
        let mut rows = vec![msp(1, "web10", 1), msp(2, "web2", 2), msp(3, "api", 3)];
        sort_msp(&mut rows, "system_name", Direction::Asc);
        let names: Vec<&str> = rows.iter().map(|r| r.system_name.as_str()).collect();
        assert_eq!(names, vec!["api", "web2", "web10"]);
    }

    #[test]
    fn test_direction_reverses_exactly() {
        let mut asc = vec![msp(1, "a", 3), msp(2, "b", 1), msp(3, "c", 2)];
        let mut desc = asc.clone();
        sort_msp(&mut asc, "request_date", Direction::Asc);
        sort_msp(&mut desc, "request_date", Direction::Desc);
        let asc_ids: Vec<i32> = asc.iter().map(|r| r.report_id).collect();
        let mut desc_ids: Vec<i32> = desc.iter().map(|r| r.report_id).collect();
        desc_ids.reverse();
        assert_eq!(asc_ids, desc_ids);
        assert_eq!(asc_ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_unknown_sort_key_feeds_through() {
        let mut rows = vec![msp(3, "c", 1), msp(1, "a", 2), msp(2, "b", 3)];
        sort_msp(&mut rows, "no_such_column", Direction::Asc);
        let ids: Vec<i32> = rows.iter().map(|r| r.report_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
