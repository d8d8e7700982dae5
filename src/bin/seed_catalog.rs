//! Utility to load the embedded product catalog into the Postgres store.
//!
//! Creates the `products` table if needed and upserts every embedded product
//! by id, so running it twice leaves the table unchanged.

use loan_match_api::config::Config;
use loan_match_api::db::Database;
use loan_match_api::product_store::PgProductStore;
use loan_match_api::seed::load_seed_products;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_match_api=info,seed_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL or SUPABASE_DB_URL must be set"))?;

    let db = Database::connect(&database_url).await?;
    let store = PgProductStore::new(db.pool);

    store.ensure_schema().await?;

    let products = load_seed_products()?;
    for product in &products {
        store.upsert_product(product).await?;
        tracing::info!("Upserted {} ({})", product.name, product.id);
    }

    tracing::info!("Seeded {} products", products.len());
    Ok(())
}
