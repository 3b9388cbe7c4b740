use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::deadline::parse_instant;
use crate::domain::ApplicationRow;

/// Column an application table can be sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    YearSemester,
    ApplicationDeadline,
    StartDate,
    EndDate,
    FacultyLeads,
    Documents,
    Status,
    /// Any other field carried directly on the application record.
    Field(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Title => "title",
            SortKey::YearSemester => "year_semester",
            SortKey::ApplicationDeadline => "application_deadline",
            SortKey::StartDate => "start_date",
            SortKey::EndDate => "end_date",
            SortKey::FacultyLeads => "faculty_leads",
            SortKey::Documents => "documents",
            SortKey::Status => "status",
            SortKey::Field(name) => name,
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim() {
            "title" => SortKey::Title,
            "year_semester" => SortKey::YearSemester,
            "application_deadline" => SortKey::ApplicationDeadline,
            "start_date" => SortKey::StartDate,
            "end_date" => SortKey::EndDate,
            "faculty_leads" => SortKey::FacultyLeads,
            "documents" => SortKey::Documents,
            "status" => SortKey::Status,
            other => SortKey::Field(other.to_string()),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort selection of a table header. Re-selecting the active column
/// flips the direction, selecting a new one starts ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("cannot sort by {key}: '{value}' is not a valid date")]
    InvalidDate { key: String, value: String },
}

/// Value a row resolves to for a given key.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Instant(DateTime<Utc>),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn type_rank(&self) -> u8 {
        match self {
            SortValue::Instant(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Missing => 3,
        }
    }

    /// Ascending order between two resolved values; missing sorts last.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Greater,
            (_, SortValue::Missing) => Ordering::Less,
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => collate(a, b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

/// Locale-style text order: case-insensitive first, and on a case-only
/// difference lowercase sorts ahead of uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

/// Rank used when sorting by status; unknown statuses rank lowest.
pub fn status_rank(status: &str) -> u8 {
    match status.trim().to_lowercase().as_str() {
        "enrolled" => 4,
        "applied" => 3,
        "withdrawn" => 2,
        "canceled" | "cancelled" => 1,
        _ => 0,
    }
}

/// Resolve the value `row` exposes for `key`.
pub fn resolve(row: &ApplicationRow, key: &SortKey) -> Result<SortValue, SortError> {
    let program = &row.program;
    let value = match key {
        SortKey::Title => SortValue::Text(program.title.clone()),
        SortKey::YearSemester => text_or_missing(program.year_semester.as_deref()),
        SortKey::ApplicationDeadline => {
            date_or_missing(key, program.application_deadline.as_deref())?
        }
        SortKey::StartDate => date_or_missing(key, program.start_date.as_deref())?,
        SortKey::EndDate => date_or_missing(key, program.end_date.as_deref())?,
        SortKey::FacultyLeads => SortValue::Text(program.faculty_names()),
        SortKey::Documents => SortValue::Number(row.document_count() as f64),
        SortKey::Status => SortValue::Number(f64::from(
            row.status.as_deref().map_or(0, status_rank),
        )),
        SortKey::Field(name) => direct_field(row, name),
    };
    Ok(value)
}

fn text_or_missing(value: Option<&str>) -> SortValue {
    value.map_or(SortValue::Missing, |text| SortValue::Text(text.to_string()))
}

fn date_or_missing(key: &SortKey, value: Option<&str>) -> Result<SortValue, SortError> {
    match value {
        None => Ok(SortValue::Missing),
        Some(raw) => parse_instant(raw)
            .map(SortValue::Instant)
            .map_err(|_| SortError::InvalidDate {
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}

fn direct_field(row: &ApplicationRow, name: &str) -> SortValue {
    match name {
        "id" | "application_id" => row
            .application_id
            .map_or(SortValue::Missing, |id| SortValue::Number(id.0 as f64)),
        "payment_status" => text_or_missing(row.payment_status.as_deref()),
        _ => row.extra.get(name).map_or(SortValue::Missing, json_value),
    }
}

fn json_value(value: &Value) -> SortValue {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map_or(SortValue::Missing, SortValue::Number),
        Value::String(text) => SortValue::Text(text.clone()),
        Value::Bool(flag) => SortValue::Number(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => SortValue::Missing,
    }
}

/// Three-way ascending comparison of two rows.
pub fn compare(
    a: &ApplicationRow,
    b: &ApplicationRow,
    key: &SortKey,
) -> Result<Ordering, SortError> {
    Ok(resolve(a, key)?.compare(&resolve(b, key)?))
}

/// Directed comparison. Descending swaps the operands; missing values stay
/// last either way.
pub fn compare_directed(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    let either_missing = matches!(a, SortValue::Missing) || matches!(b, SortValue::Missing);
    match direction {
        SortDirection::Descending if !either_missing => b.compare(a),
        _ => a.compare(b),
    }
}

/// Sort rows in place. Keys are resolved up front so a malformed date fails
/// the sort before any row moves.
pub fn sort_rows(
    rows: &mut Vec<ApplicationRow>,
    key: &SortKey,
    direction: SortDirection,
) -> Result<(), SortError> {
    let resolved = rows
        .iter()
        .map(|row| resolve(row, key))
        .collect::<Result<Vec<_>, _>>()?;

    let mut keyed: Vec<(SortValue, ApplicationRow)> =
        resolved.into_iter().zip(rows.drain(..)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_directed(a, b, direction));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
    Ok(())
}
