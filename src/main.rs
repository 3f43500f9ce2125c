use std::net::SocketAddr;
use std::sync::Arc;

use astra::Server;

use crate::auth::magic::{SignInConfig, SignInService};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::geocode::GeocodeClient;
use crate::router::{handle, App};
use crate::storage::ObjectStore;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod geocode;
mod responses;
mod router;
mod storage;
mod templates;


fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(&config.database_path);
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    let geocoder = match GeocodeClient::new(
        config.geocode_endpoint.clone(),
        config.geocode_api_key.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Geocoding client init failed: {e}");
            std::process::exit(1);
        }
    };

    let store = match ObjectStore::new(
        config.storage_url.clone(),
        config.storage_bucket.clone(),
        config.storage_api_key.clone(),
    ) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Object store init failed: {e}");
            std::process::exit(1);
        }
    };

    let app = Arc::new(App {
        db,
        geocoder,
        store,
        sign_in: SignInService::new(SignInConfig::default()),
    });

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ Invalid bind address {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => crate::responses::error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
