//! Report lifecycle: create, edit, delete across the shared header table
//! and the per-type detail tables.
//!
//! The header row and its single detail row are written and removed inside
//! one transaction each, so a crash can never leave an orphan header. The
//! `report_type` string persisted on the header is only ever produced from
//! [`ReportKind`], and reading it back goes through `ReportKind::from_str`,
//! which keeps the type-dispatch invariant in one place.

use crate::orm::{error_reports, log_reports, msp_reports, reports};
use chrono::{NaiveDateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, TransactionTrait,
};
use std::fmt;
use std::str::FromStr;

/// The three report kinds. The string form is what the header row stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Msp,
    Error,
    Log,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Msp => "msp",
            Self::Error => "error",
            Self::Log => "log",
        }
    }

    /// The list page a lifecycle operation redirects back to.
    pub fn list_url(self) -> &'static str {
        match self {
            Self::Msp => "/reports",
            Self::Error => "/error_reports",
            Self::Log => "/log_reports",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "msp" => Ok(Self::Msp),
            "error" => Ok(Self::Error),
            "log" => Ok(Self::Log),
            other => Err(ReportError::InvalidType(other.to_owned())),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ReportError {
    /// Header or detail row missing for the given id.
    NotFound,
    /// A stored `report_type` outside the three known values.
    InvalidType(String),
    Db(DbErr),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("report not found"),
            Self::InvalidType(t) => write!(f, "invalid report type {:?}", t),
            Self::Db(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<DbErr> for ReportError {
    fn from(e: DbErr) -> Self {
        Self::Db(e)
    }
}

/// A malformed or inconsistent date/time form pair. Maps to HTTP 400.
#[derive(Debug)]
pub struct DateTimeError {
    pub field: &'static str,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date/time for {} (expected YYYY-MM-DD HH:MM)", self.field)
    }
}

impl std::error::Error for DateTimeError {}

/// Combines the separate date and time form inputs into one timestamp.
pub fn parse_date_time(
    field: &'static str,
    date: &str,
    time: &str,
) -> Result<NaiveDateTime, DateTimeError> {
    NaiveDateTime::parse_from_str(&format!("{} {}", date.trim(), time.trim()), "%Y-%m-%d %H:%M")
        .map_err(|_| DateTimeError { field })
}

/// Optional pair: both parts present parse as a timestamp, anything less is
/// None (a half-filled pair is treated as absent, as the forms submit it).
pub fn parse_optional_date_time(
    field: &'static str,
    date: &str,
    time: &str,
) -> Result<Option<NaiveDateTime>, DateTimeError> {
    if date.trim().is_empty() || time.trim().is_empty() {
        return Ok(None);
    }
    parse_date_time(field, date, time).map(Some)
}

/// Detail-row fields for an MSP request report, already parsed.
#[derive(Clone, Debug)]
pub struct MspFields {
    pub request_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub client_name: String,
    pub system_name: String,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub requester: String,
    pub request_type: String,
    pub request_content: Option<String>,
    pub purpose: Option<String>,
    pub manager: String,
    pub status: Option<String>,
    pub response: Option<String>,
    pub etc: Option<String>,
}

/// Detail-row fields for an incident/error report.
#[derive(Clone, Debug)]
pub struct ErrorFields {
    pub error_start_date: NaiveDateTime,
    pub error_end_date: Option<NaiveDateTime>,
    pub client_name: String,
    pub system_name: String,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub target_component: Option<String>,
    pub customer_impact: Option<String>,
    pub error_info: String,
    pub error_reason: Option<String>,
    pub action_taken: Option<String>,
    pub manager: String,
    pub status: Option<String>,
    pub etc: Option<String>,
}

/// Detail-row fields for a system log report.
#[derive(Clone, Debug)]
pub struct LogFields {
    pub log_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub client_name: Option<String>,
    pub system_name: Option<String>,
    pub target_env: Option<String>,
    pub cloud_type: Option<String>,
    pub log_type: Option<String>,
    pub content: Option<String>,
    pub action: Option<String>,
    pub manager: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub etc: Option<String>,
}

/// Tagged union of the three detail field sets. Carrying the variant rather
/// than a type string means the dispatch below cannot typo its way into the
/// wrong table.
#[derive(Clone, Debug)]
pub enum ReportDetail {
    Msp(MspFields),
    Error(ErrorFields),
    Log(LogFields),
}

impl ReportDetail {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Msp(_) => ReportKind::Msp,
            Self::Error(_) => ReportKind::Error,
            Self::Log(_) => ReportKind::Log,
        }
    }
}

/// Looks up a header and returns its kind.
pub async fn find_kind(db: &DatabaseConnection, report_id: i32) -> Result<ReportKind, ReportError> {
    let header = reports::Entity::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or(ReportError::NotFound)?;
    header.report_type.parse()
}

/// Inserts the header and its detail row in one transaction, returning the
/// new report id.
pub async fn create(
    db: &DatabaseConnection,
    create_by: i32,
    detail: ReportDetail,
) -> Result<i32, ReportError> {
    let txn = db.begin().await?;

    let header = reports::ActiveModel {
        create_by: Set(create_by),
        report_type: Set(detail.kind().as_str().to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let report_id = header.report_id;

    match detail {
        ReportDetail::Msp(f) => {
            msp_reports::ActiveModel {
                report_id: Set(report_id),
                request_date: Set(f.request_date),
                completed_date: Set(f.completed_date),
                client_name: Set(f.client_name),
                system_name: Set(f.system_name),
                target_env: Set(f.target_env),
                cloud_type: Set(f.cloud_type),
                requester: Set(f.requester),
                request_type: Set(f.request_type),
                request_content: Set(f.request_content),
                purpose: Set(f.purpose),
                manager: Set(f.manager),
                status: Set(f.status),
                response: Set(f.response),
                etc: Set(f.etc),
            }
            .insert(&txn)
            .await?;
        }
        ReportDetail::Error(f) => {
            error_reports::ActiveModel {
                report_id: Set(report_id),
                error_start_date: Set(f.error_start_date),
                error_end_date: Set(f.error_end_date),
                client_name: Set(f.client_name),
                system_name: Set(f.system_name),
                target_env: Set(f.target_env),
                cloud_type: Set(f.cloud_type),
                target_component: Set(f.target_component),
                customer_impact: Set(f.customer_impact),
                error_info: Set(f.error_info),
                error_reason: Set(f.error_reason),
                action_taken: Set(f.action_taken),
                manager: Set(f.manager),
                status: Set(f.status),
                etc: Set(f.etc),
            }
            .insert(&txn)
            .await?;
        }
        ReportDetail::Log(f) => {
            log_reports::ActiveModel {
                report_id: Set(report_id),
                log_date: Set(f.log_date),
                completed_date: Set(f.completed_date),
                client_name: Set(f.client_name),
                system_name: Set(f.system_name),
                target_env: Set(f.target_env),
                cloud_type: Set(f.cloud_type),
                log_type: Set(f.log_type),
                content: Set(f.content),
                action: Set(f.action),
                manager: Set(f.manager),
                status: Set(f.status),
                summary: Set(f.summary),
                etc: Set(f.etc),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(report_id)
}

/// Updates the detail row's mutable fields in place. The header is immutable
/// after creation; a detail whose variant disagrees with the stored
/// `report_type` is rejected as InvalidType.
pub async fn edit(
    db: &DatabaseConnection,
    report_id: i32,
    detail: ReportDetail,
) -> Result<(), ReportError> {
    let kind = find_kind(db, report_id).await?;
    if kind != detail.kind() {
        return Err(ReportError::InvalidType(detail.kind().as_str().to_owned()));
    }

    match detail {
        ReportDetail::Msp(f) => {
            let row = msp_reports::Entity::find_by_id(report_id)
                .one(db)
                .await?
                .ok_or(ReportError::NotFound)?;
            let mut row: msp_reports::ActiveModel = row.into();
            row.request_date = Set(f.request_date);
            row.completed_date = Set(f.completed_date);
            row.client_name = Set(f.client_name);
            row.system_name = Set(f.system_name);
            row.target_env = Set(f.target_env);
            row.cloud_type = Set(f.cloud_type);
            row.requester = Set(f.requester);
            row.request_type = Set(f.request_type);
            row.request_content = Set(f.request_content);
            row.purpose = Set(f.purpose);
            row.manager = Set(f.manager);
            row.status = Set(f.status);
            row.response = Set(f.response);
            row.etc = Set(f.etc);
            row.update(db).await?;
        }
        ReportDetail::Error(f) => {
            let row = error_reports::Entity::find_by_id(report_id)
                .one(db)
                .await?
                .ok_or(ReportError::NotFound)?;
            let mut row: error_reports::ActiveModel = row.into();
            row.error_start_date = Set(f.error_start_date);
            row.error_end_date = Set(f.error_end_date);
            row.client_name = Set(f.client_name);
            row.system_name = Set(f.system_name);
            row.target_env = Set(f.target_env);
            row.cloud_type = Set(f.cloud_type);
            row.target_component = Set(f.target_component);
            row.customer_impact = Set(f.customer_impact);
            row.error_info = Set(f.error_info);
            row.error_reason = Set(f.error_reason);
            row.action_taken = Set(f.action_taken);
            row.manager = Set(f.manager);
            row.status = Set(f.status);
            row.etc = Set(f.etc);
            row.update(db).await?;
        }
        ReportDetail::Log(f) => {
            let row = log_reports::Entity::find_by_id(report_id)
                .one(db)
                .await?
                .ok_or(ReportError::NotFound)?;
            let mut row: log_reports::ActiveModel = row.into();
            row.log_date = Set(f.log_date);
            row.completed_date = Set(f.completed_date);
            row.client_name = Set(f.client_name);
            row.system_name = Set(f.system_name);
            row.target_env = Set(f.target_env);
            row.cloud_type = Set(f.cloud_type);
            row.log_type = Set(f.log_type);
            row.content = Set(f.content);
            row.action = Set(f.action);
            row.manager = Set(f.manager);
            row.status = Set(f.status);
            row.summary = Set(f.summary);
            row.etc = Set(f.etc);
            row.update(db).await?;
        }
    }

    Ok(())
}

/// Removes the detail row and then the header, in one transaction. Returns
/// the kind so the caller can redirect to the right list.
pub async fn delete(db: &DatabaseConnection, report_id: i32) -> Result<ReportKind, ReportError> {
    let header = reports::Entity::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or(ReportError::NotFound)?;
    let kind: ReportKind = header.report_type.parse()?;

    let txn = db.begin().await?;
    match kind {
        ReportKind::Msp => {
            msp_reports::Entity::delete_many()
                .filter(msp_reports::Column::ReportId.eq(report_id))
                .exec(&txn)
                .await?;
        }
        ReportKind::Error => {
            error_reports::Entity::delete_many()
                .filter(error_reports::Column::ReportId.eq(report_id))
                .exec(&txn)
                .await?;
        }
        ReportKind::Log => {
            log_reports::Entity::delete_many()
                .filter(log_reports::Column::ReportId.eq(report_id))
                .exec(&txn)
                .await?;
        }
    }
    header.delete(&txn).await?;
    txn.commit().await?;

    Ok(kind)
}
