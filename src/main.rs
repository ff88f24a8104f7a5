use std::sync::Arc;

use course_compass::cli::TerminalApp;
use course_compass::config::AppConfig;
use course_compass::search::DuckDuckGoSearch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("📚 Course Compass v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Search: DuckDuckGo (up to {} results)\n", config.search_limit);

    let search = Arc::new(DuckDuckGoSearch::new(config.search_timeout)?);
    TerminalApp::new(config, search).run().await?;

    Ok(())
}
