use serde::Serialize;

use crate::domain::Document;

/// The four documents every application must eventually include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredDocument {
    CodeOfConduct,
    HousingQuestionnaire,
    MedicalInterview,
    AssumptionOfRisk,
}

impl RequiredDocument {
    pub const fn ordered() -> [RequiredDocument; 4] {
        [
            RequiredDocument::CodeOfConduct,
            RequiredDocument::HousingQuestionnaire,
            RequiredDocument::MedicalInterview,
            RequiredDocument::AssumptionOfRisk,
        ]
    }

    /// The `type` value the API stores for this document.
    pub const fn label(self) -> &'static str {
        match self {
            RequiredDocument::CodeOfConduct => "Acknowledgement of the Code of Conduct",
            RequiredDocument::HousingQuestionnaire => "Housing Questionnaire",
            RequiredDocument::MedicalInterview => "Medical Interview Form",
            RequiredDocument::AssumptionOfRisk => "Assumption of Risk",
        }
    }

    pub fn matches(self, kind: &str) -> bool {
        kind.trim().eq_ignore_ascii_case(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    Submitted,
    Missing,
}

impl DocumentState {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentState::Submitted => "Submitted",
            DocumentState::Missing => "Missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub document: RequiredDocument,
    pub label: &'static str,
    pub state: DocumentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentChecklist {
    pub items: Vec<ChecklistItem>,
}

impl DocumentChecklist {
    pub fn from_documents(documents: &[Document]) -> Self {
        let items = RequiredDocument::ordered()
            .into_iter()
            .map(|required| {
                let found = documents.iter().find(|doc| required.matches(&doc.kind));
                ChecklistItem {
                    document: required,
                    label: required.label(),
                    state: if found.is_some() {
                        DocumentState::Submitted
                    } else {
                        DocumentState::Missing
                    },
                    preview_url: found.and_then(|doc| doc.url.clone()),
                }
            })
            .collect();
        Self { items }
    }

    pub fn submitted(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.state == DocumentState::Submitted)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.submitted() == self.items.len()
    }
}
