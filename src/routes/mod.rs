// Route exports
pub mod matches;

use actix_web::{error, web, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .configure(matches::configure),
    );
}

/// Handle malformed path parameters such as an offer id that is not a UUID
pub fn handle_path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    let message = format!("Invalid path: {}", err);
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_path".to_string(),
            message,
            status_code: 400,
        }),
    )
    .into()
}
