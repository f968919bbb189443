use anyhow::Result;
use clap::Parser;
use interview_coach::{create_router, AppState, Config, HttpRecordStore, RecordStore};
use std::sync::Arc;
use tracing::info;

/// Webhook receiver converting end-of-call reports into record store rows
#[derive(Debug, Parser)]
#[command(name = "interview-coach", version)]
struct Args {
    /// Configuration file (COACH-prefixed environment variables override)
    #[arg(long, default_value = "config/interview-coach")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("interview-coach v0.1.0");
    info!("Record store: {} (table {})", cfg.store.url, cfg.store.table);
    info!("Assistant configuration: {}", cfg.call_service.assistant_id);

    let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(&cfg.store)?);
    let router = create_router(AppState::new(store));

    let addr = format!("{}:{}", cfg.webhook.bind, cfg.webhook.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Webhook receiver listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
