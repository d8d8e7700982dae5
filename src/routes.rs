use crate::catalog::CatalogSource;
use crate::handlers::{self, AppState, HealthResponse};
use crate::models::*;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Loan Match API",
        description = "Loan product comparison with match scoring and grounded product Q&A"
    ),
    paths(
        handlers::health,
        handlers::list_products,
        handlers::top_picks,
        handlers::get_product,
        handlers::ask,
    ),
    components(schemas(
        Product,
        Faq,
        Terms,
        LoanType,
        DisbursalSpeed,
        DocsLevel,
        UserProfile,
        Badge,
        BadgeVariant,
        ListedProduct,
        ProductListResponse,
        ProductResponse,
        ChatRole,
        ChatTurn,
        AnswerSource,
        AskRequest,
        AskResponse,
        FieldError,
        HealthResponse,
        CatalogSource,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "products", description = "Catalog listing, top picks and product detail"),
        (name = "assistant", description = "Grounded product Q&A")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Loan Match API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Builds the application router.
///
/// With `rate_limit` set, every route except `/health` is limited per client
/// IP (10 req/s, burst 20). The limiter needs the peer address, so the server
/// must be started with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: Arc<AppState>, rate_limit: bool) -> anyhow::Result<Router> {
    let mut protected_routes = Router::new()
        // API Documentation
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        // Catalog
        .route("/api/v1/products", get(handlers::list_products))
        .route("/api/v1/products/top-picks", get(handlers::top_picks))
        .route("/api/v1/products/:id", get(handlers::get_product))
        // Assistant
        .route("/api/v1/ai/ask", post(handlers::ask))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    if rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(10)
                .burst_size(20)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
        );
        protected_routes = protected_routes.layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }));
    }

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}
