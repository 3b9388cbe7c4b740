use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::client::{ClientError, PortalApi};
use crate::domain::{ApplicationRow, ApplicationStatusResponse, Program, ProgramApplication};
use crate::rules::deadline::{classify, DeadlineIndicator};
use crate::rules::status::StatusFilter;

/// How a deadline field should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeadlineField {
    Unset,
    Invalid { raw: String },
    Classified(DeadlineIndicator),
}

impl DeadlineField {
    pub fn from_raw(raw: Option<&str>, now: DateTime<Utc>) -> Self {
        match raw {
            None => DeadlineField::Unset,
            Some(value) => match classify(value, now) {
                Ok(indicator) => DeadlineField::Classified(indicator),
                Err(err) => {
                    warn!(error = %err, "deadline could not be classified");
                    DeadlineField::Invalid {
                        raw: value.to_string(),
                    }
                }
            },
        }
    }

    pub fn indicator(&self) -> Option<&DeadlineIndicator> {
        match self {
            DeadlineField::Classified(indicator) => Some(indicator),
            _ => None,
        }
    }
}

/// One program in the student catalog, with deadline annotations and the
/// student's current status when it could be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub program: Program,
    pub application_deadline: DeadlineField,
    pub document_deadline: DeadlineField,
    pub application: Option<ApplicationStatusResponse>,
}

impl CatalogEntry {
    pub fn new(
        program: Program,
        application: Option<ApplicationStatusResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        let application_deadline =
            DeadlineField::from_raw(program.application_deadline.as_deref(), now);
        let document_deadline =
            DeadlineField::from_raw(program.essential_document_deadline.as_deref(), now);
        Self {
            program,
            application_deadline,
            document_deadline,
            application,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.application
            .as_ref()
            .and_then(|application| application.status.as_deref())
    }
}

/// Fetch every program's application status concurrently. A failed lookup
/// yields `None` for that program instead of failing the batch.
async fn statuses_for<A: PortalApi>(
    api: &A,
    programs: &[Program],
) -> Vec<Option<ApplicationStatusResponse>> {
    join_all(programs.iter().map(|program| async move {
        match api.application_status(program.id).await {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(program = %program.id, error = %err, "application status lookup failed");
                None
            }
        }
    }))
    .await
}

/// Programs a student can browse, annotated for display.
pub async fn load_catalog<A: PortalApi>(
    api: &A,
    exclude_ended: bool,
    now: DateTime<Utc>,
) -> Result<Vec<CatalogEntry>, ClientError> {
    let programs = api.list_programs(exclude_ended).await?;
    let statuses = statuses_for(api, &programs).await;

    let entries: Vec<CatalogEntry> = programs
        .into_iter()
        .zip(statuses)
        .map(|(program, status)| CatalogEntry::new(program, status, now))
        .collect();

    info!(programs = entries.len(), "catalog loaded");
    Ok(entries)
}

/// The student's application table: programs with a recognized status,
/// joined with their documents.
///
/// Only the program listing can fail the load. Status lookups that fail drop
/// their row; document lookups that fail keep the row with unknown documents.
pub async fn load_applications<A: PortalApi>(
    api: &A,
    filter: &StatusFilter,
    exclude_ended: bool,
) -> Result<Vec<ApplicationRow>, ClientError> {
    let programs = api.list_programs(exclude_ended).await?;
    let statuses = statuses_for(api, &programs).await;

    let joined = programs
        .into_iter()
        .zip(statuses)
        .map(|(program, status)| {
            status.map(|application| ProgramApplication {
                program,
                application,
            })
        });
    let applications = filter.filter(joined);

    let documents = join_all(applications.iter().map(|joined| async move {
        let id = joined.application.application_id?;
        match api.documents(id).await {
            Ok(documents) => Some(documents),
            Err(err) => {
                warn!(application = %id, error = %err, "document lookup failed");
                None
            }
        }
    }))
    .await;

    let rows: Vec<ApplicationRow> = applications
        .into_iter()
        .zip(documents)
        .map(|(joined, documents)| ApplicationRow::from_parts(joined, documents))
        .collect();

    info!(applications = rows.len(), "applications loaded");
    Ok(rows)
}
