use crate::interceptor::log_requests;
use crate::modules::product::{ProductController, ProductRepository, ProductService};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const WELCOME: &str = "Welcome to Bike Shop Server!";

/// Build the application router over the given product storage.
///
/// JSON bodies are parsed by the route extractors; every route gets
/// request logging and permissive CORS.
pub fn build_router(products: Arc<dyn ProductRepository>) -> Router {
    let service = Arc::new(ProductService::new(products));
    let product_controller = Arc::new(ProductController::new(service));

    Router::new()
        .route("/", get(welcome))
        .nest(
            ProductController::base_path(),
            ProductController::router(product_controller),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
}

async fn welcome() -> &'static str {
    WELCOME
}
