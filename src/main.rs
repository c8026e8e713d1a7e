use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_info::api::router;
use course_info::config::AppConfig;
use course_info::db;
use course_info::services::RefreshScheduler;
use course_info::source::{HttpTermSource, JsonTermParser, TermParser, TermSource};
use course_info::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_info=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections).await?;

    let source: Arc<dyn TermSource> = Arc::new(HttpTermSource::new(config.source_base_url.clone())?);
    let parser: Arc<dyn TermParser> = Arc::new(JsonTermParser);

    if let Some(interval) = config.refresh_interval_secs {
        let scheduler = RefreshScheduler::new(pool.clone(), source.clone(), parser.clone(), interval);
        tokio::spawn(scheduler.start());
    }

    let state = AppState {
        db: pool.clone(),
        source,
        parser,
    };

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
