//! Client core for the study-abroad portal.
//!
//! The remote API owns every entity; this crate holds the transient copies,
//! the rules shared by the portal views (deadline severity, application
//! ordering, status filtering) and the typed HTTP client used to fetch them.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod rules;
pub mod telemetry;
pub mod views;
