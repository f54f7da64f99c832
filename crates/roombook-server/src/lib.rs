//! REST API service for the room catalog and its bookings.
//!
//! [`app`] builds the router; persistence is whatever [`Store`] the
//! [`AppState`] carries.

pub mod config;
pub mod error;
pub mod store;

mod extractors;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, patch, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{Span, debug, debug_span};

pub use config::ServerConfig;
pub use error::ServerError;
pub use store::{MemoryStore, Store, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest(
            "/api",
            Router::new()
                .route("/rooms", get(routes::rooms::list).post(routes::rooms::create))
                .route("/rooms/{id}", put(routes::rooms::update).delete(routes::rooms::delete))
                .route(
                    "/bookings",
                    get(routes::bookings::list).post(routes::bookings::create),
                )
                .route(
                    "/bookings/{id}",
                    put(routes::bookings::update).delete(routes::bookings::delete),
                )
                .route("/bookings/{id}/cancel", patch(routes::bookings::cancel)),
        )
        .fallback(routes::fallback)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    debug_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        status_code = tracing::field::Empty,
                        ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
                    span.record("status_code", tracing::field::display(response.status()));
                    span.record("ms", tracing::field::display(latency.as_millis()));

                    debug!("response processed");
                }),
        )
}
