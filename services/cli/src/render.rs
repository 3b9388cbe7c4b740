use std::io::{self, Write};

use abroad_portal::domain::{ApplicationId, ApplicationRow, Question};
use abroad_portal::rules::{DeadlineIndicator, StatusAccess, StatusFilter};
use abroad_portal::views::{CatalogEntry, DeadlineField, DocumentChecklist, ExpansionState};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

fn deadline_cell(field: &DeadlineField) -> String {
    match field {
        DeadlineField::Unset => "-".to_string(),
        DeadlineField::Invalid { raw } => format!("{raw} (unrecognized date)"),
        DeadlineField::Classified(indicator) => indicator_cell(indicator),
    }
}

pub(crate) fn indicator_cell(indicator: &DeadlineIndicator) -> String {
    format!(
        "{} [{}: {}]",
        indicator.formatted_date,
        indicator.severity.label(),
        indicator.message
    )
}

fn access_label(filter: &StatusFilter, status: Option<&str>) -> &'static str {
    match status.and_then(|status| filter.access(status)) {
        Some(StatusAccess::Editable) => "editable",
        Some(StatusAccess::ReadOnly) => "read-only",
        None => "-",
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::from)?;
    writeln!(out)
}

pub(crate) fn catalog<W: Write>(
    out: &mut W,
    entries: &[CatalogEntry],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, entries),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([
                "id",
                "title",
                "year_semester",
                "application_deadline",
                "document_deadline",
                "status",
            ])?;
            for entry in entries {
                writer.write_record([
                    entry.program.id.to_string(),
                    entry.program.title.clone(),
                    entry.program.year_semester.clone().unwrap_or_default(),
                    deadline_cell(&entry.application_deadline),
                    deadline_cell(&entry.document_deadline),
                    entry.status().unwrap_or_default().to_string(),
                ])?;
            }
            writer.flush()
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                return writeln!(out, "No programs available.");
            }
            for entry in entries {
                writeln!(
                    out,
                    "#{} {} ({})",
                    entry.program.id,
                    entry.program.title,
                    entry.program.year_semester.as_deref().unwrap_or("term TBD")
                )?;
                let leads = entry.program.faculty_names();
                if !leads.is_empty() {
                    writeln!(out, "    Faculty: {leads}")?;
                }
                writeln!(
                    out,
                    "    Application deadline: {}",
                    deadline_cell(&entry.application_deadline)
                )?;
                writeln!(
                    out,
                    "    Document deadline:    {}",
                    deadline_cell(&entry.document_deadline)
                )?;
                writeln!(
                    out,
                    "    Your status:          {}",
                    entry.status().unwrap_or("not applied")
                )?;
            }
            Ok(())
        }
    }
}

pub(crate) fn applications<W: Write>(
    out: &mut W,
    rows: &[ApplicationRow],
    filter: &StatusFilter,
    expansion: &ExpansionState<ApplicationId>,
    format: OutputFormat,
) -> io::Result<()> {
    let documents_cell = |row: &ApplicationRow| match &row.documents {
        Some(documents) => documents.len().to_string(),
        None => "?".to_string(),
    };

    match format {
        OutputFormat::Json => write_json(out, rows),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([
                "application_id",
                "title",
                "year_semester",
                "faculty_leads",
                "application_deadline",
                "start_date",
                "end_date",
                "documents",
                "status",
                "access",
            ])?;
            for row in rows {
                let program = &row.program;
                writer.write_record([
                    row.application_id.map(|id| id.to_string()).unwrap_or_default(),
                    program.title.clone(),
                    program.year_semester.clone().unwrap_or_default(),
                    program.faculty_names(),
                    program.application_deadline.clone().unwrap_or_default(),
                    program.start_date.clone().unwrap_or_default(),
                    program.end_date.clone().unwrap_or_default(),
                    documents_cell(row),
                    row.status.clone().unwrap_or_default(),
                    access_label(filter, row.status.as_deref()).to_string(),
                ])?;
            }
            writer.flush()
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return writeln!(out, "You have no active applications.");
            }
            writeln!(
                out,
                "{:<8} {:<28} {:<14} {:<12} {:<12} {:>4}  {:<10} {}",
                "APP", "PROGRAM", "TERM", "DEADLINE", "START", "DOCS", "STATUS", "ACCESS"
            )?;
            for row in rows {
                let program = &row.program;
                writeln!(
                    out,
                    "{:<8} {:<28} {:<14} {:<12} {:<12} {:>4}  {:<10} {}",
                    row.application_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    program.title,
                    program.year_semester.as_deref().unwrap_or("-"),
                    program.application_deadline.as_deref().unwrap_or("-"),
                    program.start_date.as_deref().unwrap_or("-"),
                    documents_cell(row),
                    row.status.as_deref().unwrap_or("-"),
                    access_label(filter, row.status.as_deref()),
                )?;

                let expanded = row
                    .application_id
                    .is_some_and(|id| expansion.is_expanded(&id));
                if expanded {
                    match &row.documents {
                        Some(documents) => {
                            let checklist = DocumentChecklist::from_documents(documents);
                            for item in &checklist.items {
                                writeln!(
                                    out,
                                    "         - {:<40} {}",
                                    item.label,
                                    item.state.label()
                                )?;
                            }
                        }
                        None => writeln!(out, "         - documents unavailable right now")?,
                    }
                }
            }
            Ok(())
        }
    }
}

pub(crate) fn questions<W: Write>(
    out: &mut W,
    questions: &[Question],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, questions),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["id", "program", "required", "text"])?;
            for question in questions {
                writer.write_record([
                    question.id.to_string(),
                    question.program.to_string(),
                    question.is_required.to_string(),
                    question.text.clone(),
                ])?;
            }
            writer.flush()
        }
        OutputFormat::Table => {
            if questions.is_empty() {
                return writeln!(out, "No custom questions for this program.");
            }
            for question in questions {
                let marker = if question.is_required { "*" } else { " " };
                writeln!(out, "{marker} [{}] {}", question.id, question.text)?;
            }
            writeln!(out, "(* required)")
        }
    }
}
