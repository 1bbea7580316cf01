//! HTTP API
//!
//! - `GET /` liveness message
//! - `GET /health` status and active model metadata
//! - `POST /predict` attrition prediction for one employee record

pub mod handlers;
pub mod response;
pub mod server;


use actix_web::web;

pub use response::ApiResponse;
pub use server::ApiServerState;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/health", web::get().to(handlers::health))
        .route("/predict", web::post().to(handlers::predict));
}

/// JSON extractor settings for request bodies
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(handlers::json_error_handler)
}
