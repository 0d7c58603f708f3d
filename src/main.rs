use runbridge::infrastructure::bootstrap;
use runbridge::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let server = bootstrap::setup(&config).await?;
    info!(host = %config.host, port = config.port, "Runbridge listening");

    server.await?;
    Ok(())
}
