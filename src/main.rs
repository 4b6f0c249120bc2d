use dotenvy::dotenv;
use iftar_booking::{
    api::{self, ApiState},
    config::{self, admin, database},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Secrets from the environment
    let credentials = admin::load_admin_credentials()
        .inspect_err(|e| error!("Admin credentials missing: {}", e))?;
    let tokens = admin::load_token_service(app_config.server.token_lifetime_minutes)
        .inspect_err(|e| error!("Token settings invalid: {}", e))?;

    // 5. Initialize database and seed master data
    let database_url = database::get_database_url()?;
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    database::seed_initial_data(&db, &app_config)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    tokio::fs::create_dir_all(&app_config.server.upload_dir).await?;

    // 6. Serve
    let bind_address = app_config.server.bind_address.clone();
    let app = api::router(ApiState::new(db, app_config, credentials, tokens));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
