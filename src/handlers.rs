use crate::assistant::Assistant;
use crate::catalog::{CatalogSource, ProductCatalog};
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use crate::scoring::{list_product, rank_products};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Product fields a Q&A answer may draw from.
pub const CITED_FIELDS: [&str; 6] = [
    "rate_apr",
    "min_income",
    "min_credit_score",
    "tenure",
    "faq",
    "terms",
];

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Product catalog (store with embedded fallback).
    pub catalog: ProductCatalog,
    /// Grounded Q&A orchestrator.
    pub assistant: Assistant,
}

/// Liveness payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub catalog_source: CatalogSource,
    pub ai_configured: bool,
}

/// Health check endpoint.
///
/// Returns the service status, version, catalog source and whether the chat
/// model is configured.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            catalog_source: state.catalog.source(),
            ai_configured: state.assistant.is_configured(),
        }),
    )
}

/// GET /api/v1/products
///
/// Lists catalog products matching the filters, ascending by APR, each with
/// its badges and a match score for the optional borrower profile.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ProductFilters),
    responses(
        (status = 200, description = "Filtered products", body = ProductListResponse),
        (status = 400, description = "Invalid filters")
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ProductFilters>, QueryRejection>,
) -> Result<Json<ProductListResponse>, AppError> {
    let Query(filters) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::info!("GET /products - filters: {:?}", filters);

    filters.validate()?;

    let products = state
        .catalog
        .list_products(&filters)
        .await
        .context("Failed to list products")?;

    let banks: Vec<String> = products
        .iter()
        .map(|p| p.bank.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let profile = filters.profile();
    let products: Vec<ListedProduct> = products
        .into_iter()
        .map(|product| list_product(product, &profile))
        .collect();

    Ok(Json(ProductListResponse {
        total: products.len(),
        products,
        banks,
    }))
}

/// GET /api/v1/products/top-picks
///
/// Every product scored against the optional profile, best first. Ties keep
/// catalog (ascending APR) order.
#[utoipa::path(
    get,
    path = "/api/v1/products/top-picks",
    tag = "products",
    params(TopPicksQuery),
    responses(
        (status = 200, description = "Best matching products", body = [ListedProduct]),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn top_picks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopPicksQuery>, QueryRejection>,
) -> Result<Json<Vec<ListedProduct>>, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::info!("GET /products/top-picks - params: {:?}", params);

    let limit = params.limit()?;
    let profile = params.profile();
    profile.validate()?;

    let products = state
        .catalog
        .list_products(&ProductFilters::default())
        .await
        .context("Failed to load top picks")?;

    let mut ranked = rank_products(products, &profile);
    ranked.truncate(limit);

    Ok(Json(ranked))
}

/// GET /api/v1/products/:id
///
/// A single product with badges and a match score for the optional profile.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(
        ("id" = String, Path, description = "Product UUID"),
        UserProfile
    ),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 400, description = "Malformed product id"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<UserProfile>, QueryRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    tracing::info!("GET /products/{}", id);

    let id = Uuid::parse_str(id.trim())
        .map_err(|_| AppError::BadRequest("Invalid product ID".to_string()))?;
    let Query(profile) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    profile.validate()?;

    let product = state
        .catalog
        .get_product(id)
        .await
        .with_context(|| format!("Failed to load product {}", id))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        product: list_product(product, &profile),
    }))
}

/// POST /api/v1/ai/ask
///
/// Answers a question about one product. Model failures are recovered with a
/// rule-based answer; only malformed input or an unknown product are errors.
#[utoipa::path(
    post,
    path = "/api/v1/ai/ask",
    tag = "assistant",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer with its source", body = AskResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown product")
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let product_id = request.validate()?;

    tracing::info!(
        "POST /ai/ask - product: {}, history turns: {}",
        product_id,
        request.history.len()
    );

    let product = state
        .catalog
        .get_product(product_id)
        .await
        .with_context(|| format!("Failed to load product {}", product_id))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let answer = state
        .assistant
        .generate_ai_response(&product, &request.message, &request.history)
        .await;

    tracing::info!(
        "Answered question about {} from {:?}",
        product.id,
        answer.source
    );

    Ok(Json(AskResponse {
        response: answer.response,
        source: answer.source,
        cited_fields: CITED_FIELDS.iter().map(|f| f.to_string()).collect(),
    }))
}
