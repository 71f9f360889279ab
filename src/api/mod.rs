//! HTTP surface: routes, CORS and request tracing.

pub mod handlers;

use crate::app::AccountingService;
use axum::{
    http::{header, HeaderValue, Method},
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const ACCOUNTING_INFO_ROUTE: &str = "/api/v0/accountinginfo";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountingService>,
}

impl AppState {
    pub fn new(service: AccountingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Builds the router. `allowed_origin` is the single origin CORS lets through.
pub fn create_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            ACCOUNTING_INFO_ROUTE,
            post(handlers::create_accounting_info).get(handlers::list_accounting_info),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
