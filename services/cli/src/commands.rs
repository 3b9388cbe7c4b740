use std::io;

use abroad_portal::client::PortalApi;
use abroad_portal::config::AppConfig;
use abroad_portal::domain::{ApplicationId, ProgramId, QuestionId};
use abroad_portal::error::AppError;
use abroad_portal::rules::{self, sort_rows, SortDirection, SortKey, StatusFilter};
use abroad_portal::views::{
    load_applications, load_catalog, ExpansionState, LetterUploadFlow, LetterUploadState,
    ProgramForm, QuestionManager, INVALID_LINK_MESSAGE,
};
use tracing::info;

use crate::cli::{
    ApplicationsArgs, CatalogArgs, CreateProgramArgs, DeadlineArgs, LetterLinkArgs,
    LetterUploadArgs, QuestionAddArgs, QuestionDeleteArgs, QuestionEditArgs, QuestionListArgs,
};
use crate::infra::{portal_client, read_letter, reference_now};
use crate::render;

const ALREADY_FULFILLED_MESSAGE: &str = "This letter has already been submitted. Thank you!";

pub(crate) async fn list_programs(config: &AppConfig, args: CatalogArgs) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let now = reference_now(args.today);
    let entries = load_catalog(&api, !args.include_ended, now).await?;

    let mut out = io::stdout().lock();
    render::catalog(&mut out, &entries, args.format)?;
    Ok(())
}

pub(crate) async fn create_program(
    config: &AppConfig,
    args: CreateProgramArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let form = ProgramForm {
        title: args.title,
        year_semester: args.year_semester,
        description: args.description,
        faculty_leads: args.faculty_leads,
        application_open_date: args.application_open_date,
        application_deadline: args.application_deadline,
        essential_document_deadline: args.essential_document_deadline,
        start_date: args.start_date,
        end_date: args.end_date,
    };

    let program = form.submit(&api).await?;
    println!("Created program #{} {}", program.id, program.title);
    Ok(())
}

pub(crate) async fn list_applications(
    config: &AppConfig,
    args: ApplicationsArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let filter = StatusFilter::from_config(&config.statuses);

    let mut rows = load_applications(&api, &filter, !args.include_ended).await?;

    let key = args
        .sort
        .parse::<SortKey>()
        .unwrap_or_else(|never| match never {});
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    sort_rows(&mut rows, &key, direction)?;
    info!(key = %key, rows = rows.len(), "applications sorted");

    let mut expansion = ExpansionState::default();
    for id in args.expand {
        expansion.set(&ApplicationId(id), true);
    }
    expansion.retain_ids(rows.iter().filter_map(|row| row.application_id.as_ref()));

    let mut out = io::stdout().lock();
    render::applications(&mut out, &rows, &filter, &expansion, args.format)?;
    Ok(())
}

pub(crate) async fn list_questions(
    config: &AppConfig,
    args: QuestionListArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let questions = QuestionManager::new(&api, ProgramId(args.program))
        .list()
        .await?;

    let mut out = io::stdout().lock();
    render::questions(&mut out, &questions, args.format)?;
    Ok(())
}

pub(crate) async fn add_question(
    config: &AppConfig,
    args: QuestionAddArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let created = QuestionManager::new(&api, ProgramId(args.program))
        .add(&args.text, args.required)
        .await?;
    println!("Added question {}", created.id);
    Ok(())
}

pub(crate) async fn edit_question(
    config: &AppConfig,
    args: QuestionEditArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let updated = QuestionManager::new(&api, ProgramId(args.program))
        .edit(QuestionId(args.id), args.text.as_deref(), args.required)
        .await?;
    println!("Updated question {}: {}", updated.id, updated.text);
    Ok(())
}

pub(crate) async fn delete_question(
    config: &AppConfig,
    args: QuestionDeleteArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    QuestionManager::new(&api, ProgramId(args.program))
        .remove(QuestionId(args.id))
        .await?;
    println!("Deleted question {}", args.id);
    Ok(())
}

async fn open_letter<A: PortalApi>(api: &A, link: &LetterLinkArgs) -> LetterUploadFlow {
    let mut flow = LetterUploadFlow::open(link.id.as_deref(), link.token.as_deref());
    flow.load(api).await;
    flow
}

pub(crate) async fn letter_info(config: &AppConfig, args: LetterLinkArgs) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let flow = open_letter(&api, &args).await;
    match flow.state() {
        LetterUploadState::Ready { summary, .. } => {
            println!(
                "Letter of recommendation for {} ({})",
                summary.student_name, summary.program_title
            );
            println!("Upload a PDF with `abroad-portal letter upload`.");
            Ok(())
        }
        LetterUploadState::AlreadyFulfilled(summary) => {
            println!(
                "Letter of recommendation for {} ({})",
                summary.student_name, summary.program_title
            );
            println!("{ALREADY_FULFILLED_MESSAGE}");
            Ok(())
        }
        _ => Err(AppError::Letter(INVALID_LINK_MESSAGE.to_string())),
    }
}

pub(crate) async fn upload_letter(
    config: &AppConfig,
    args: LetterUploadArgs,
) -> Result<(), AppError> {
    let api = portal_client(&config.api)?;
    let mut flow = open_letter(&api, &args.link).await;

    match flow.state() {
        LetterUploadState::Ready { .. } => {}
        LetterUploadState::AlreadyFulfilled(_) => {
            return Err(AppError::Letter(ALREADY_FULFILLED_MESSAGE.to_string()));
        }
        _ => return Err(AppError::Letter(INVALID_LINK_MESSAGE.to_string())),
    }

    let (file_name, bytes) = read_letter(&args.file)?;
    if !flow.select_file(&file_name, None, bytes) {
        let message = flow.error().unwrap_or(INVALID_LINK_MESSAGE).to_string();
        return Err(AppError::Letter(message));
    }

    if flow.submit(&api).await {
        println!("Thank you! {file_name} was submitted.");
        Ok(())
    } else {
        let message = flow
            .error()
            .unwrap_or("The letter could not be uploaded.")
            .to_string();
        Err(AppError::Letter(message))
    }
}

pub(crate) fn deadline(args: DeadlineArgs) -> Result<(), AppError> {
    let now = reference_now(args.today);
    let indicator = rules::classify(&args.date, now)?;
    println!("{}", render::indicator_cell(&indicator));
    Ok(())
}
