use loan_match_api::assistant::Assistant;
use loan_match_api::catalog::ProductCatalog;
use loan_match_api::config::Config;
use loan_match_api::db::Database;
use loan_match_api::gemini_client::GeminiClient;
use loan_match_api::handlers::AppState;
use loan_match_api::llm::ChatModel;
use loan_match_api::product_store::{PgProductStore, ProductStore};
use loan_match_api::routes::build_router;
use loan_match_api::seed::load_seed_products;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, configuration, the product catalog (store plus
/// embedded dataset), the optional Gemini client and the HTTP router, then
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_match_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Embedded catalog is validated up front; a bad dataset aborts startup
    let seed_products = load_seed_products()?;
    tracing::info!("Embedded catalog loaded: {} products", seed_products.len());

    let store: Option<Arc<dyn ProductStore>> = match &config.database_url {
        Some(url) => {
            let db = Database::connect_lazy(url)?;
            tracing::info!("Product store configured (lazy Postgres pool)");
            Some(Arc::new(PgProductStore::new(db.pool)) as Arc<dyn ProductStore>)
        }
        None => {
            tracing::warn!("No DATABASE_URL set, serving the embedded catalog only");
            None
        }
    };
    let catalog = ProductCatalog::new(store, seed_products);

    let model: Option<Arc<dyn ChatModel>> = match &config.gemini_api_key {
        Some(api_key) => match GeminiClient::new(
            api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.ai_timeout(),
        ) {
            Ok(client) => {
                tracing::info!("✓ Gemini client initialized: {}", config.gemini_model);
                Some(Arc::new(client) as Arc<dyn ChatModel>)
            }
            Err(e) => {
                tracing::error!("Failed to initialize Gemini client: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("GEMINI_API_KEY not set, answers will be rule-based");
            None
        }
    };

    // Build application state
    let app_state = Arc::new(AppState {
        catalog,
        assistant: Assistant::new(model),
    });

    let app = build_router(app_state, true)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
