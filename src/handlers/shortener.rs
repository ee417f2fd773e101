use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;

use crate::{
    errors::ApiError, models::ShortenRequest, services::ShortenerService, utils::ip::client_ip,
};

/// Shorten URL route handler
pub async fn shorten_handler(
    req: HttpRequest,
    body: web::Json<ShortenRequest>,
    service: web::Data<ShortenerService>,
) -> Result<HttpResponse, ApiError> {
    let client_ip = client_ip(&req, service.settings().trust_proxy_headers);
    debug!("Shorten requested by {}", client_ip);

    let response = service.shorten(&client_ip, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
