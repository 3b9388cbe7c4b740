use abroad_portal_cli::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {}", err.user_message());
        tracing::debug!(error = %err, "command failed");
        std::process::exit(1);
    }
}
