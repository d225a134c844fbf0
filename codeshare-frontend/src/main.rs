use codeshare_core::observability::init_tracing;
use codeshare_frontend::config::get_configuration;
use codeshare_frontend::services::metrics::init_metrics;
use codeshare_frontend::startup::build_state;
use codeshare_frontend::terminal;
use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "codeshare-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let state = build_state(&configuration)?;

    terminal::spawn_results_printer(&state);
    state.search.mount();

    info!("Starting codeshare-frontend");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    terminal::run(&state, stdin, &mut stdout).await?;

    info!("codeshare-frontend stopped");
    Ok(())
}
