use docket_api::state::AppState;
use docket_config::DocketConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("docket-api error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = DocketConfig::load_with_dotenv()?;
    let state = AppState::new(config).await?;
    docket_api::serve(state).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
