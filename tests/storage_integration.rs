use std::env;
use uuid::Uuid;

use loan_match_api::data::product_store::{PgProductStore, ProductStore};
use loan_match_api::db::Database;
use loan_match_api::seed::load_seed_products;

/// Integration smoke test for the Postgres product store.
/// Marked ignored so it never runs against a shared database by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn upsert_and_fetch_product_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::connect(&db_url).await?;
    let store = PgProductStore::new(db.pool.clone());
    store.ensure_schema().await?;

    // Fresh id so repeated runs never collide with seeded rows.
    let mut product = load_seed_products()?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("embedded catalog is empty"))?;
    product.id = Uuid::new_v4();
    product.name = format!("Smoke Test Loan {}", product.id);

    store.upsert_product(&product).await?;

    let fetched = store
        .fetch_product(product.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("upserted product not found"))?;
    assert_eq!(fetched.name, product.name);
    assert_eq!(fetched.rate_apr, product.rate_apr);
    assert_eq!(fetched.faq, product.faq);
    assert_eq!(fetched.terms, product.terms);

    // A second upsert updates in place.
    product.rate_apr = 9.75;
    store.upsert_product(&product).await?;
    let updated = store.fetch_product(product.id).await?;
    assert_eq!(updated.map(|p| p.rate_apr), Some(9.75));

    assert!(store.fetch_product(Uuid::new_v4()).await?.is_none());
    assert!(store
        .fetch_products()
        .await?
        .iter()
        .any(|p| p.id == product.id));

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product.id)
        .execute(&db.pool)
        .await?;
    Ok(())
}
