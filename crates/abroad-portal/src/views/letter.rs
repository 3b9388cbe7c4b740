use serde::Serialize;
use tracing::{info, warn};

use crate::client::{ClientError, PdfUpload, PortalApi, PDF_ONLY_MESSAGE};
use crate::domain::{LetterLink, LetterLinkStatus, LetterPublicInfo};

/// What the letter writer is told about the request they were sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterSummary {
    pub student_name: String,
    pub program_title: String,
}

impl LetterSummary {
    fn from_info(info: &LetterPublicInfo) -> Self {
        Self {
            student_name: info.student_name.clone().unwrap_or_default(),
            program_title: info.program_title.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterUploadState {
    /// Waiting on the public-info lookup.
    Validating,
    /// Terminal: the link is missing pieces or was rejected.
    Invalid,
    /// Terminal: a letter was already uploaded for this request.
    AlreadyFulfilled(LetterSummary),
    Ready {
        summary: LetterSummary,
        selected: Option<PdfUpload>,
        error: Option<String>,
    },
    Submitting {
        summary: LetterSummary,
        file: PdfUpload,
    },
    /// Terminal: the letter was accepted.
    Submitted(LetterSummary),
}

/// The public recommendation-letter upload page.
#[derive(Debug)]
pub struct LetterUploadFlow {
    link: Option<LetterLink>,
    state: LetterUploadState,
}

pub const INVALID_LINK_MESSAGE: &str =
    "This letter link is invalid or has expired. Please contact the student for a new link.";

impl LetterUploadFlow {
    /// Start from whatever id and token the link carried. Missing either one
    /// is fatal.
    pub fn open(id: Option<&str>, token: Option<&str>) -> Self {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (non_blank(id), non_blank(token)) {
            (Some(id), Some(token)) => Self {
                link: Some(LetterLink { id, token }),
                state: LetterUploadState::Validating,
            },
            _ => {
                warn!("letter link is missing its id or token");
                Self {
                    link: None,
                    state: LetterUploadState::Invalid,
                }
            }
        }
    }

    pub fn state(&self) -> &LetterUploadState {
        &self.state
    }

    pub fn link(&self) -> Option<&LetterLink> {
        self.link.as_ref()
    }

    /// Apply the public-info lookup. Any failure invalidates the link.
    pub fn apply_public_info(&mut self, result: Result<LetterPublicInfo, ClientError>) {
        if self.state != LetterUploadState::Validating {
            return;
        }

        self.state = match result {
            Ok(info) if info.status == LetterLinkStatus::Invalid => LetterUploadState::Invalid,
            Ok(info) if info.is_fulfilled => {
                LetterUploadState::AlreadyFulfilled(LetterSummary::from_info(&info))
            }
            Ok(info) => LetterUploadState::Ready {
                summary: LetterSummary::from_info(&info),
                selected: None,
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "letter public info lookup failed");
                LetterUploadState::Invalid
            }
        };
    }

    /// Fetch the public info for the link, if the flow is still validating.
    pub async fn load<A: PortalApi>(&mut self, api: &A) {
        let Some(link) = self.link.clone() else {
            return;
        };
        if self.state == LetterUploadState::Validating {
            let result = api.letter_public_info(&link).await;
            self.apply_public_info(result);
        }
    }

    /// Record the file the writer chose. A non-PDF clears any selection and
    /// sets the PDF-only message. Returns whether a PDF is now selected.
    pub fn select_file(
        &mut self,
        file_name: &str,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> bool {
        let LetterUploadState::Ready {
            selected, error, ..
        } = &mut self.state
        else {
            return false;
        };

        match PdfUpload::new(file_name, declared_type, bytes) {
            Ok(upload) => {
                *selected = Some(upload);
                *error = None;
                true
            }
            Err(err) => {
                warn!(error = %err, "rejected letter file");
                *selected = None;
                *error = Some(PDF_ONLY_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn shows_upload_control(&self) -> bool {
        matches!(
            self.state,
            LetterUploadState::Ready { .. } | LetterUploadState::Submitting { .. }
        )
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            LetterUploadState::Ready {
                selected: Some(_),
                ..
            }
        )
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LetterUploadState::Ready { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Move to `submitting` and hand out the file to send. `None` while a
    /// submission is outstanding or nothing valid is selected.
    pub fn begin_submit(&mut self) -> Option<PdfUpload> {
        let LetterUploadState::Ready {
            summary,
            selected: Some(file),
            ..
        } = &self.state
        else {
            return None;
        };

        let (summary, file) = (summary.clone(), file.clone());
        self.state = LetterUploadState::Submitting {
            summary,
            file: file.clone(),
        };
        Some(file)
    }

    pub fn finish_submit(&mut self, result: Result<(), ClientError>) {
        let LetterUploadState::Submitting { summary, file } = &self.state else {
            return;
        };
        let (summary, file) = (summary.clone(), file.clone());

        self.state = match result {
            Ok(()) => {
                info!("recommendation letter uploaded");
                LetterUploadState::Submitted(summary)
            }
            Err(err) => {
                warn!(error = %err, "recommendation letter upload failed");
                LetterUploadState::Ready {
                    summary,
                    selected: Some(file),
                    error: Some(err.user_message()),
                }
            }
        };
    }

    /// Send the selected letter once. Returns whether it was accepted.
    pub async fn submit<A: PortalApi>(&mut self, api: &A) -> bool {
        let Some(link) = self.link.clone() else {
            return false;
        };
        let Some(file) = self.begin_submit() else {
            return false;
        };

        let result = api.fulfill_letter(&link, &file).await;
        self.finish_submit(result);
        matches!(self.state, LetterUploadState::Submitted(_))
    }
}
