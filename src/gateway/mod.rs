pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::books::handlers as books;
use crate::config::GatewayConfig;
use crate::user_auth::handlers as user_auth;
use crate::user_auth::middleware::jwt_auth_middleware;
use state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Assemble the full application router.
///
/// Catalog reads sit on the public or the protected side depending on
/// `public_book_listing`.
pub fn build_router(state: Arc<AppState>, config: &GatewayConfig) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(user_auth::register))
        .route("/login", post(user_auth::login));

    let catalog_reads = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/{id}", get(books::get_book));

    let mut public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/auth", auth_routes);

    let mut protected_routes = Router::new()
        .route("/books", post(books::create_book))
        .route("/books/mine", get(books::my_books))
        .route(
            "/books/{id}",
            axum::routing::put(books::update_book).delete(books::delete_book),
        )
        .route("/books/{id}/buy", post(user_auth::buy_book))
        .route("/user/purchases", get(user_auth::purchased_books));

    if config.public_book_listing {
        public_routes = public_routes.merge(catalog_reads);
    } else {
        protected_routes = protected_routes.merge(catalog_reads);
    }

    let protected_routes =
        protected_routes.route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .nest("/api/v1", public_routes.merge(protected_routes))
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run_server(state: Arc<AppState>, config: &GatewayConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let app = build_router(state, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port already in use?)", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);
    tracing::info!(
        public_book_listing = config.public_book_listing,
        "Book listing access configured"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
