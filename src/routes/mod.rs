use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};

use crate::{
    db::DatabaseHealth,
    services::ShortenerService,
    types::{AppState, HealthStatus},
};

mod shortener;

// Handler function for the health check endpoint
async fn health_check(
    data: web::Data<AppState>,
    service: web::Data<ShortenerService>,
) -> impl Responder {
    let started = Instant::now();
    let store = DatabaseHealth::from_ping(service.repository().ping().await, started);

    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
        store,
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
    shortener::configure_routes(cfg);
}
