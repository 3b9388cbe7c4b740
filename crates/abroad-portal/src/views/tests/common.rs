use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;

use crate::client::{ClientError, PdfUpload, PortalApi};
use crate::domain::{
    ApplicationId, ApplicationStatusResponse, Document, FacultyLead, LetterLink, LetterLinkStatus,
    LetterPublicInfo, NewProgram, NewQuestion, Program, ProgramId, Question, QuestionId,
    QuestionPatch,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn program(id: u64, title: &str, deadline: &str) -> Program {
    Program {
        id: ProgramId(id),
        title: title.to_string(),
        year_semester: Some("2026 Summer".to_string()),
        description: format!("{title} description"),
        faculty_leads: vec![FacultyLead {
            id: Some(id),
            display_name: format!("Lead {id}"),
        }],
        application_open_date: Some("2026-01-05".to_string()),
        application_deadline: Some(deadline.to_string()),
        essential_document_deadline: Some("2026-04-01".to_string()),
        start_date: Some("2026-06-01".to_string()),
        end_date: Some("2026-07-15".to_string()),
    }
}

pub(super) fn status(application: u64, label: &str) -> ApplicationStatusResponse {
    ApplicationStatusResponse {
        application_id: Some(ApplicationId(application)),
        status: Some(label.to_string()),
        payment_status: None,
        extra: Map::new(),
    }
}

pub(super) fn document(application: u64, kind: &str) -> Document {
    Document {
        id: None,
        kind: kind.to_string(),
        application: ApplicationId(application),
        url: Some(format!("https://files.example.edu/{application}/{kind}")),
    }
}

pub(super) fn rejected(status: u16, detail: &str) -> ClientError {
    ClientError::Validation {
        status,
        detail: Some(detail.to_string()),
    }
}

pub(super) fn valid_letter() -> LetterPublicInfo {
    LetterPublicInfo {
        status: LetterLinkStatus::Valid,
        student_name: Some("Ada Student".to_string()),
        program_title: Some("Kyoto Summer".to_string()),
        is_fulfilled: false,
    }
}

pub(super) fn pdf() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj".to_vec()
}

/// In-memory stand-in for the portal API. Failures are configured per id as
/// HTTP status codes.
#[derive(Default)]
pub(super) struct FakePortal {
    pub(super) programs: Vec<Program>,
    pub(super) programs_error: Option<u16>,
    pub(super) statuses: HashMap<ProgramId, Result<ApplicationStatusResponse, u16>>,
    pub(super) documents: HashMap<ApplicationId, Result<Vec<Document>, u16>>,
    pub(super) questions: Mutex<Vec<Question>>,
    pub(super) letter: Option<LetterPublicInfo>,
    pub(super) upload_error: Option<String>,
    pub(super) uploads: Mutex<Vec<(String, String)>>,
    pub(super) created_programs: Mutex<Vec<NewProgram>>,
}

impl FakePortal {
    pub(super) fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().expect("uploads mutex poisoned").clone()
    }

    fn failure(status: u16) -> ClientError {
        ClientError::Validation {
            status,
            detail: None,
        }
    }
}

impl PortalApi for FakePortal {
    async fn list_programs(&self, _exclude_ended: bool) -> Result<Vec<Program>, ClientError> {
        match self.programs_error {
            Some(status) => Err(Self::failure(status)),
            None => Ok(self.programs.clone()),
        }
    }

    async fn application_status(
        &self,
        program: ProgramId,
    ) -> Result<ApplicationStatusResponse, ClientError> {
        match self.statuses.get(&program) {
            Some(Ok(status)) => Ok(status.clone()),
            Some(Err(code)) => Err(Self::failure(*code)),
            None => Ok(ApplicationStatusResponse::default()),
        }
    }

    async fn documents(&self, application: ApplicationId) -> Result<Vec<Document>, ClientError> {
        match self.documents.get(&application) {
            Some(Ok(documents)) => Ok(documents.clone()),
            Some(Err(code)) => Err(Self::failure(*code)),
            None => Ok(Vec::new()),
        }
    }

    async fn questions(&self, program: ProgramId) -> Result<Vec<Question>, ClientError> {
        let questions = self.questions.lock().expect("questions mutex poisoned");
        Ok(questions
            .iter()
            .filter(|question| question.program == program)
            .cloned()
            .collect())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question, ClientError> {
        let mut questions = self.questions.lock().expect("questions mutex poisoned");
        let created = Question {
            id: QuestionId(questions.len() as u64 + 1),
            text: question.text.clone(),
            program: question.program,
            is_required: question.is_required,
        };
        questions.push(created.clone());
        Ok(created)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        patch: &QuestionPatch,
    ) -> Result<Question, ClientError> {
        let mut questions = self.questions.lock().expect("questions mutex poisoned");
        let question = questions
            .iter_mut()
            .find(|question| question.id == id)
            .ok_or_else(|| rejected(404, "Not found."))?;
        if let Some(text) = &patch.text {
            question.text = text.clone();
        }
        if let Some(required) = patch.is_required {
            question.is_required = required;
        }
        Ok(question.clone())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), ClientError> {
        let mut questions = self.questions.lock().expect("questions mutex poisoned");
        let before = questions.len();
        questions.retain(|question| question.id != id);
        if questions.len() == before {
            return Err(rejected(404, "Not found."));
        }
        Ok(())
    }

    async fn create_program(&self, request: &NewProgram) -> Result<Program, ClientError> {
        let mut created = self
            .created_programs
            .lock()
            .expect("programs mutex poisoned");
        created.push(request.clone());
        let mut stored = program(100 + created.len() as u64, &request.title, "2026-05-01");
        stored.application_deadline = Some(request.application_deadline.to_string());
        Ok(stored)
    }

    async fn letter_public_info(
        &self,
        _link: &LetterLink,
    ) -> Result<LetterPublicInfo, ClientError> {
        self.letter
            .clone()
            .ok_or_else(|| rejected(404, "Letter request not found."))
    }

    async fn fulfill_letter(
        &self,
        link: &LetterLink,
        upload: &PdfUpload,
    ) -> Result<(), ClientError> {
        if let Some(detail) = &self.upload_error {
            return Err(rejected(400, detail));
        }
        self.uploads
            .lock()
            .expect("uploads mutex poisoned")
            .push((link.id.clone(), upload.file_name().to_string()));
        Ok(())
    }
}
