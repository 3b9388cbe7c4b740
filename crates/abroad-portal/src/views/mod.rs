//! View models for the portal screens: the student catalog and application
//! table, the admin forms, and the public letter upload page.

pub mod checklist;
pub mod dashboard;
pub mod forms;
pub mod letter;
pub mod state;

#[cfg(test)]
mod tests;

pub use checklist::{ChecklistItem, DocumentChecklist, DocumentState, RequiredDocument};
pub use dashboard::{load_applications, load_catalog, CatalogEntry, DeadlineField};
pub use forms::{FormError, ProgramForm, QuestionManager, SubmitError};
pub use letter::{LetterSummary, LetterUploadFlow, LetterUploadState, INVALID_LINK_MESSAGE};
pub use state::{ExpansionState, LoadTicket, ViewModel, ViewState};
