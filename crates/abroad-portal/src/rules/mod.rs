//! Rules shared by the portal views: deadline severity, application
//! ordering and status filtering. All of them are pure functions of their
//! inputs; "now" is always passed in.

pub mod deadline;
pub mod ordering;
pub mod status;

pub use deadline::{classify, classify_date, parse_date, DeadlineIndicator, ParseError, Severity};
pub use ordering::{
    compare, compare_directed, resolve, sort_rows, status_rank, SortDirection, SortError,
    SortKey, SortState, SortValue,
};
pub use status::{StatusAccess, StatusBearing, StatusFilter};
