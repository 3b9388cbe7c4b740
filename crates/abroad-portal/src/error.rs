use crate::client::{ClientError, UploadError};
use crate::config::ConfigError;
use crate::rules::deadline::ParseError;
use crate::rules::ordering::SortError;
use crate::telemetry::TelemetryError;
use crate::views::forms::{FormError, SubmitError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Client(ClientError),
    Sort(SortError),
    Date(ParseError),
    Form(FormError),
    Upload(UploadError),
    Output(serde_json::Error),
    /// The letter page ended somewhere other than a successful upload.
    Letter(String),
}

impl AppError {
    /// Message for the person running the tool; API failures use the
    /// user-facing wording rather than transport details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Client(err) => err.user_message(),
            AppError::Upload(err) => err.user_message().to_string(),
            AppError::Letter(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Client(err) => write!(f, "portal error: {}", err),
            AppError::Sort(err) => write!(f, "sort error: {}", err),
            AppError::Date(err) => write!(f, "invalid date: {}", err),
            AppError::Form(err) => write!(f, "invalid input: {}", err),
            AppError::Upload(err) => write!(f, "upload error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
            AppError::Letter(message) => write!(f, "letter upload: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Client(err) => Some(err),
            AppError::Sort(err) => Some(err),
            AppError::Date(err) => Some(err),
            AppError::Form(err) => Some(err),
            AppError::Upload(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::Letter(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ClientError> for AppError {
    fn from(value: ClientError) -> Self {
        Self::Client(value)
    }
}

impl From<SortError> for AppError {
    fn from(value: SortError) -> Self {
        Self::Sort(value)
    }
}

impl From<ParseError> for AppError {
    fn from(value: ParseError) -> Self {
        Self::Date(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

impl From<SubmitError> for AppError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Form(err) => Self::Form(err),
            SubmitError::Client(err) => Self::Client(err),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(value: UploadError) -> Self {
        Self::Upload(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
