use actix_web::{error::JsonPayloadError, web, HttpRequest};
use log::debug;

use crate::{errors::ApiError, handlers::shorten_handler};

// Any body that does not decode into a ShortenRequest gets the same 400
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected body for {} {}: {}", req.method(), req.path(), err);
    ApiError::MalformedInput.into()
}

// Configure shortener routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1")
            .app_data(
                web::JsonConfig::default()
                    .content_type_required(false)
                    .error_handler(json_error_handler),
            )
            .route(web::post().to(shorten_handler)),
    );
}
