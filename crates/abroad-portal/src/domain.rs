//! Wire types for the entities the portal API owns.
//!
//! Dates stay as the raw strings the API sent; the rules in
//! [`crate::rules`] parse them on demand so malformed values surface where
//! they are used instead of failing a whole listing at decode time.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rules::status::StatusBearing;

/// Identifier wrapper for programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub u64);

/// Identifier wrapper for student applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

/// Identifier wrapper for custom application questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyLead {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(alias = "name")]
    pub display_name: String,
}

/// A study-abroad program as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub title: String,
    #[serde(default)]
    pub year_semester: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub faculty_leads: Vec<FacultyLead>,
    #[serde(default)]
    pub application_open_date: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub essential_document_deadline: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Program {
    pub fn faculty_names(&self) -> String {
        self.faculty_leads
            .iter()
            .map(|lead| lead.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Payload of `GET /api/programs/{id}/application_status/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStatusResponse {
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A program paired with the student's application status for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramApplication {
    pub program: Program,
    pub application: ApplicationStatusResponse,
}

impl StatusBearing for ProgramApplication {
    fn status(&self) -> Option<&str> {
        self.application.status.as_deref()
    }
}

/// A single row of the student's application table: the fetched status
/// joined with its program and documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRow {
    pub program: Program,
    pub application_id: Option<ApplicationId>,
    pub status: Option<String>,
    /// `None` when the documents fetch for this row failed.
    pub documents: Option<Vec<Document>>,
    pub payment_status: Option<String>,
    /// Any other fields the status endpoint returned, addressable as sort keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationRow {
    pub fn from_parts(joined: ProgramApplication, documents: Option<Vec<Document>>) -> Self {
        let ProgramApplication {
            program,
            application,
        } = joined;
        Self {
            program,
            application_id: application.application_id,
            status: application.status,
            documents,
            payment_status: application.payment_status,
            extra: application.extra,
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.as_ref().map_or(0, Vec::len)
    }
}

impl StatusBearing for ApplicationRow {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// An uploaded application document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub application: ApplicationId,
    #[serde(default, alias = "file")]
    pub url: Option<String>,
}

/// A custom application question attached to a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub program: ProgramId,
    #[serde(default)]
    pub is_required: bool,
}

/// Body of `POST /api/questions/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestion {
    pub program: ProgramId,
    pub text: String,
    pub is_required: bool,
}

/// Body of `PATCH /api/questions/{id}/`; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_required.is_none()
    }
}

/// Body of `POST /api/programs/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProgram {
    pub title: String,
    pub year_semester: String,
    pub description: String,
    pub faculty_leads: Vec<u64>,
    pub application_open_date: NaiveDate,
    pub application_deadline: NaiveDate,
    pub essential_document_deadline: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The `{id, token}` pair that grants access to a letter request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterLink {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterLinkStatus {
    Valid,
    Invalid,
}

/// Payload of `GET /api/letters/{id}/public_info/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterPublicInfo {
    pub status: LetterLinkStatus,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub program_title: Option<String>,
    #[serde(default)]
    pub is_fulfilled: bool,
}
