use std::error::Error;

use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional: `.env` next to the binary. Real env vars win.
    let dotenv = dotenvy::dotenv().ok();

    ai_llm_service::telemetry::init("info", Level::INFO)?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    api::start().await?;

    Ok(())
}
