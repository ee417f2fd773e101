use std::process;

use log::error;

mod app;
mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod types;
mod utils;

use errors::AppError;

#[actix_web::main]
async fn main() {
    if let Err(err) = app::server().await {
        let code = match err {
            AppError::Server(ref e) => {
                error!("Critical server error: {}", e);
                1
            }
            AppError::Config(ref e) => {
                // Configuration fails before the logger is set up
                eprintln!("Critical configuration error: {}", e);
                2
            }
            AppError::Logger(ref e) => {
                // The logger is what failed, so report on stderr directly
                eprintln!("Critical logger error: {}", e);
                3
            }
            AppError::Store(ref e) => {
                error!("Critical store error: {}", e);
                4
            }
        };
        process::exit(code);
    }
}
