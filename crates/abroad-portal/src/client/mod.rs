//! Access to the remote portal API.
//!
//! [`PortalApi`] is the seam the views are written against; [`HttpPortalClient`]
//! is the reqwest-backed implementation.

mod http;
mod upload;

use std::future::Future;

pub use http::HttpPortalClient;
pub use upload::{PdfUpload, UploadError, PDF_ONLY_MESSAGE};

use crate::domain::{
    ApplicationId, ApplicationStatusResponse, Document, LetterLink, LetterPublicInfo, NewProgram,
    NewQuestion, Program, ProgramId, Question, QuestionId, QuestionPatch,
};

/// Operations the portal views need from the remote API.
pub trait PortalApi: Send + Sync {
    fn list_programs(
        &self,
        exclude_ended: bool,
    ) -> impl Future<Output = Result<Vec<Program>, ClientError>> + Send;

    fn application_status(
        &self,
        program: ProgramId,
    ) -> impl Future<Output = Result<ApplicationStatusResponse, ClientError>> + Send;

    fn documents(
        &self,
        application: ApplicationId,
    ) -> impl Future<Output = Result<Vec<Document>, ClientError>> + Send;

    fn questions(
        &self,
        program: ProgramId,
    ) -> impl Future<Output = Result<Vec<Question>, ClientError>> + Send;

    fn create_question(
        &self,
        question: &NewQuestion,
    ) -> impl Future<Output = Result<Question, ClientError>> + Send;

    fn update_question(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
    ) -> impl Future<Output = Result<Question, ClientError>> + Send;

    fn delete_question(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn create_program(
        &self,
        program: &NewProgram,
    ) -> impl Future<Output = Result<Program, ClientError>> + Send;

    fn letter_public_info(
        &self,
        link: &LetterLink,
    ) -> impl Future<Output = Result<LetterPublicInfo, ClientError>> + Send;

    fn fulfill_letter(
        &self,
        link: &LetterLink,
        upload: &PdfUpload,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

const NETWORK_MESSAGE: &str = "Unable to reach the portal. Please try again later.";
const VALIDATION_FALLBACK: &str = "The request could not be completed.";
const DECODE_MESSAGE: &str = "The portal returned an unexpected response.";
const CREDENTIALS_MESSAGE: &str = "Sign in as an administrator to make this change.";

/// Failure talking to the portal API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (connection, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("portal rejected the request ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Validation { status: u16, detail: Option<String> },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// An authenticated call was attempted without a configured token.
    #[error("{operation} requires an API token")]
    MissingCredentials { operation: &'static str },
}

impl ClientError {
    /// Text suitable for showing the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
            ClientError::Validation { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| VALIDATION_FALLBACK.to_string()),
            ClientError::Decode(_) => DECODE_MESSAGE.to_string(),
            ClientError::MissingCredentials { .. } => CREDENTIALS_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Validation { status, .. } => Some(*status),
            _ => None,
        }
    }
}
