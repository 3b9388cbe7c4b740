mod cli;
mod commands;
mod infra;
mod render;

use abroad_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
