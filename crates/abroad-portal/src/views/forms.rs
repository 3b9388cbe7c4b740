use tracing::info;

use crate::client::{ClientError, PortalApi};
use crate::domain::{
    NewProgram, NewQuestion, Program, ProgramId, Question, QuestionId, QuestionPatch,
};
use crate::rules::deadline::parse_date;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{field} is required")]
    Blank { field: &'static str },
    #[error("{field} must be a date (YYYY-MM-DD), got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("nothing to update")]
    EmptyPatch,
}

/// Error from a form-backed action: rejected locally or by the API.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Form(err) => err.to_string(),
            SubmitError::Client(err) => err.user_message(),
        }
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Raw values from the admin "new program" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramForm {
    pub title: String,
    pub year_semester: String,
    pub description: String,
    pub faculty_leads: Vec<u64>,
    pub application_open_date: String,
    pub application_deadline: String,
    pub essential_document_deadline: String,
    pub start_date: String,
    pub end_date: String,
}

impl ProgramForm {
    /// Check required fields and date syntax. Date ordering is left to the API.
    pub fn validate(&self) -> Result<NewProgram, FormError> {
        let date = |field: &'static str, value: &str| {
            parse_date(value).map_err(|_| FormError::InvalidDate {
                field,
                value: value.to_string(),
            })
        };

        Ok(NewProgram {
            title: required_text("title", &self.title)?,
            year_semester: required_text("year_semester", &self.year_semester)?,
            description: self.description.trim().to_string(),
            faculty_leads: self.faculty_leads.clone(),
            application_open_date: date("application_open_date", &self.application_open_date)?,
            application_deadline: date("application_deadline", &self.application_deadline)?,
            essential_document_deadline: date(
                "essential_document_deadline",
                &self.essential_document_deadline,
            )?,
            start_date: date("start_date", &self.start_date)?,
            end_date: date("end_date", &self.end_date)?,
        })
    }

    pub async fn submit<A: PortalApi>(&self, api: &A) -> Result<Program, SubmitError> {
        let request = self.validate()?;
        let program = api.create_program(&request).await?;
        info!(program = %program.id, title = %program.title, "program created");
        Ok(program)
    }
}

/// Admin editor for one program's custom questions.
pub struct QuestionManager<'a, A> {
    api: &'a A,
    program: ProgramId,
}

impl<'a, A: PortalApi> QuestionManager<'a, A> {
    pub fn new(api: &'a A, program: ProgramId) -> Self {
        Self { api, program }
    }

    pub async fn list(&self) -> Result<Vec<Question>, ClientError> {
        self.api.questions(self.program).await
    }

    pub async fn add(&self, text: &str, is_required: bool) -> Result<Question, SubmitError> {
        let question = NewQuestion {
            program: self.program,
            text: required_text("question text", text)?,
            is_required,
        };
        let created = self.api.create_question(&question).await?;
        info!(program = %self.program, question = %created.id, "question added");
        Ok(created)
    }

    /// Overwrite a question in place; omitted fields are left as they are.
    pub async fn edit(
        &self,
        id: QuestionId,
        text: Option<&str>,
        is_required: Option<bool>,
    ) -> Result<Question, SubmitError> {
        let patch = QuestionPatch {
            text: text
                .map(|value| required_text("question text", value))
                .transpose()?,
            is_required,
        };
        if patch.is_empty() {
            return Err(FormError::EmptyPatch.into());
        }

        let updated = self.api.update_question(id, &patch).await?;
        info!(program = %self.program, question = %id, "question updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: QuestionId) -> Result<(), ClientError> {
        self.api.delete_question(id).await?;
        info!(program = %self.program, question = %id, "question deleted");
        Ok(())
    }
}
