pub mod appresult;
pub mod config;
pub mod db;
pub mod health;
pub mod logging;
pub mod reaper;
pub mod request_log;
pub mod res;
pub mod rooms;
pub mod store;

use std::sync::Arc;

use axum::{Router, extract::FromRef, http::Method, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

pub use appresult::{AppError, AppResult};
pub use reaper::{Reaper, Reconciled};
pub use rooms::{Room, RoomError, Rooms};
pub use store::{MemoryRoomStore, RoomStore, SqliteRoomStore, StoreError};

/// Name the service reports on `/health`.
#[derive(Clone, Debug)]
pub struct ServiceName(pub Arc<str>);

#[derive(Clone, FromRef)]
pub struct AppState {
    pub rooms: Rooms,
    pub service: ServiceName,
}

impl AppState {
    pub fn new(rooms: Rooms, service: &str) -> Self {
        Self {
            rooms,
            service: ServiceName(Arc::from(service)),
        }
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(rooms::router())
        .layer(middleware::from_fn(request_log::log_requests))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]),
        )
        .with_state(app_state)
}
