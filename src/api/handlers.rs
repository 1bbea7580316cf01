//! API request handlers

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, warn};
use serde_json::Value;

use crate::api::response::{ApiResponse, HealthResponse, WelcomeResponse};
use crate::api::server::ApiServerState;
use crate::error::Error;

pub const WELCOME_MESSAGE: &str = "Welcome to HR-Attrition backend API";

/// Liveness message
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Status plus the metadata of the model being served
pub async fn health(state: web::Data<ApiServerState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.model().metadata().clone(),
    })
}

/// Validate the body, run inference, log it and return the prediction
pub async fn predict(
    state: web::Data<ApiServerState>,
    body: web::Json<Value>,
) -> HttpResponse {
    let outcome = tokio::time::timeout(state.request_timeout, state.prediction.predict_json(&body))
        .await
        .unwrap_or_else(|_| {
            Err(Error::timeout(format!(
                "prediction not finished after {:?}",
                state.request_timeout
            )))
        });
    match outcome {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(&err),
    }
}

/// Map a service error onto an HTTP response
pub fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::Validation(violations) => {
            warn!("Rejected prediction request: {}", violations);
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_with_details(
                "validation failed",
                422,
                violations.clone(),
            ))
        }
        Error::Inference(_) => {
            error!("Inference failed: {}", err);
            HttpResponse::InternalServerError().json(ApiResponse::error("inference failed", 500))
        }
        Error::Persistence(_) => {
            error!("Prediction could not be logged: {}", err);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("prediction could not be logged", 500))
        }
        Error::Timeout(_) => {
            error!("Prediction timed out: {}", err);
            HttpResponse::ServiceUnavailable().json(ApiResponse::error("request timed out", 503))
        }
        _ => {
            error!("Request failed: {}", err);
            HttpResponse::InternalServerError().json(ApiResponse::error("internal error", 500))
        }
    }
}

/// Turn body extraction failures into JSON error envelopes
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            HttpResponse::PayloadTooLarge().json(ApiResponse::error(err.to_string(), 413))
        }
        JsonPayloadError::ContentType => HttpResponse::UnsupportedMediaType()
            .json(ApiResponse::error("expected application/json", 415)),
        _ => HttpResponse::BadRequest()
            .json(ApiResponse::error(format!("malformed JSON body: {}", err), 400)),
    };
    warn!("Rejected request body: {}", err);
    InternalError::from_response(err, response).into()
}
