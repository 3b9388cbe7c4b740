use crate::commands;
use crate::render::OutputFormat;
use abroad_portal::config::AppConfig;
use abroad_portal::error::AppError;
use abroad_portal::telemetry;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "abroad-portal",
    about = "Browse study-abroad programs, track applications and upload recommendation letters",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse or create programs
    Programs {
        #[command(subcommand)]
        command: ProgramsCommand,
    },
    /// Show your applications with their document checklists
    Applications(ApplicationsArgs),
    /// Manage the custom questions attached to a program
    Questions {
        #[command(subcommand)]
        command: QuestionsCommand,
    },
    /// Look up or fulfill a recommendation letter request
    Letter {
        #[command(subcommand)]
        command: LetterCommand,
    },
    /// Classify a single deadline date
    Deadline(DeadlineArgs),
}

#[derive(Subcommand, Debug)]
enum ProgramsCommand {
    /// List programs with deadline indicators and your application status
    List(CatalogArgs),
    /// Create a program (requires an admin token)
    Create(CreateProgramArgs),
}

#[derive(Subcommand, Debug)]
enum QuestionsCommand {
    /// List the questions for a program
    List(QuestionListArgs),
    /// Add a question to a program
    Add(QuestionAddArgs),
    /// Change a question's text or required flag
    Edit(QuestionEditArgs),
    /// Delete a question
    Delete(QuestionDeleteArgs),
}

#[derive(Subcommand, Debug)]
enum LetterCommand {
    /// Show who requested the letter and whether it is still open
    Info(LetterLinkArgs),
    /// Upload the letter PDF
    Upload(LetterUploadArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Include programs that have already ended
    #[arg(long)]
    pub(crate) include_ended: bool,
    /// Measure deadlines from this date instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ApplicationsArgs {
    /// Include applications for programs that have already ended
    #[arg(long)]
    pub(crate) include_ended: bool,
    /// Column to sort by: title, year_semester, faculty_leads, application_deadline,
    /// start_date, end_date, status, or any other field the portal returns
    #[arg(long, default_value = "application_deadline")]
    pub(crate) sort: String,
    /// Sort descending instead of ascending
    #[arg(long)]
    pub(crate) desc: bool,
    /// Application id whose document checklist should be shown (repeatable)
    #[arg(long = "expand", value_name = "APPLICATION_ID")]
    pub(crate) expand: Vec<u64>,
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct CreateProgramArgs {
    #[arg(long)]
    pub(crate) title: String,
    /// Term label, e.g. "2026 Summer"
    #[arg(long)]
    pub(crate) year_semester: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    /// Faculty user id (repeatable)
    #[arg(long = "faculty-lead", value_name = "USER_ID")]
    pub(crate) faculty_leads: Vec<u64>,
    #[arg(long)]
    pub(crate) application_open_date: String,
    #[arg(long)]
    pub(crate) application_deadline: String,
    #[arg(long)]
    pub(crate) essential_document_deadline: String,
    #[arg(long)]
    pub(crate) start_date: String,
    #[arg(long)]
    pub(crate) end_date: String,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionListArgs {
    #[arg(long)]
    pub(crate) program: u64,
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionAddArgs {
    #[arg(long)]
    pub(crate) program: u64,
    #[arg(long)]
    pub(crate) text: String,
    /// Mark the question as required
    #[arg(long)]
    pub(crate) required: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionEditArgs {
    #[arg(long)]
    pub(crate) program: u64,
    #[arg(long)]
    pub(crate) id: u64,
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// New required flag (true or false)
    #[arg(long, action = ArgAction::Set)]
    pub(crate) required: Option<bool>,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionDeleteArgs {
    #[arg(long)]
    pub(crate) program: u64,
    #[arg(long)]
    pub(crate) id: u64,
}

#[derive(Args, Debug)]
pub(crate) struct LetterLinkArgs {
    /// Letter id from the emailed link
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Token from the emailed link
    #[arg(long)]
    pub(crate) token: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct LetterUploadArgs {
    #[command(flatten)]
    pub(crate) link: LetterLinkArgs,
    /// Path to the letter; only PDFs are accepted
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DeadlineArgs {
    /// Deadline as YYYY-MM-DD or an RFC 3339 timestamp
    pub(crate) date: String,
    /// Measure from this date instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Programs {
            command: ProgramsCommand::List(args),
        } => commands::list_programs(&config, args).await,
        Command::Programs {
            command: ProgramsCommand::Create(args),
        } => commands::create_program(&config, args).await,
        Command::Applications(args) => commands::list_applications(&config, args).await,
        Command::Questions { command } => match command {
            QuestionsCommand::List(args) => commands::list_questions(&config, args).await,
            QuestionsCommand::Add(args) => commands::add_question(&config, args).await,
            QuestionsCommand::Edit(args) => commands::edit_question(&config, args).await,
            QuestionsCommand::Delete(args) => commands::delete_question(&config, args).await,
        },
        Command::Letter { command } => match command {
            LetterCommand::Info(args) => commands::letter_info(&config, args).await,
            LetterCommand::Upload(args) => commands::upload_letter(&config, args).await,
        },
        Command::Deadline(args) => commands::deadline(args),
    }
}
