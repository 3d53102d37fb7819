use dotenvy::dotenv;
use ledger_edge::{
    api,
    config::{self, database},
    errors::Result,
    gateway::{GeminiClient, InsightGateway},
    service::Ledger,
    store::SqlStore,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Initialize database
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Text-generation gateway; without a key every AI call degrades
    let gateway = match &app_config.ai.api_key {
        Some(key) => {
            let client = GeminiClient::new(key.clone(), app_config.ai.model.clone())
                .with_base_url(app_config.ai.base_url.clone());
            info!(model = %app_config.ai.model, "AI gateway enabled");
            InsightGateway::new(Arc::new(client), app_config.ai.timeout())
        }
        None => {
            warn!("GEMINI_API_KEY not set; summaries and highlights will use fallbacks");
            InsightGateway::disabled()
        }
    };

    let ledger = Arc::new(Ledger::new(Arc::new(SqlStore::new(db)), gateway));

    // 6. Seed demo customers into an empty database
    ledger
        .seed(&app_config.customers)
        .await
        .inspect_err(|e| error!("Failed to seed customers: {e}"))?;

    // 7. Run the API
    api::serve(ledger, &app_config.server.bind_addr).await
}
