mod aggregator;
mod config;
mod error;
mod exclusion;
mod file_system;
mod handlers;
mod models;
mod test_utils;
mod utils;
mod workspace;

use crate::config::{Config, TlsPaths};
use crate::workspace::Workspace;
use actix_web::{middleware, web, App, HttpServer};
use log::{info, warn};
use rustls::ServerConfig;
use rustls_pemfile::{certs, pkcs8_private_keys};
use std::fs::File;
use std::io::{self, BufReader};

fn load_tls_config(tls: &TlsPaths) -> io::Result<ServerConfig> {
    let cert_file = &mut BufReader::new(File::open(&tls.cert)?);
    let key_file = &mut BufReader::new(File::open(&tls.key)?);
    let cert_chain = certs(cert_file).collect::<Result<Vec<_>, _>>()?;
    let mut keys = pkcs8_private_keys(key_file).collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        return Err(io::Error::new(io::ErrorKind::Other, "No private keys found in key file"));
    }

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, keys.remove(0).into())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    // Override the level with RUST_LOG, e.g. `RUST_LOG=debug prompster`.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let workspace = Workspace::from_config(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    info!("Browsing {}", workspace.root().display());
    let workspace = web::Data::new(workspace);
    let addr = config.bind_address();

    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(workspace.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
            .default_service(web::to(handlers::static_handler))
    });

    let http_server = match &config.tls {
        Some(tls) if tls.cert.exists() && tls.key.exists() => {
            let tls_config = load_tls_config(tls)?;
            info!("Server running at https://{}", addr);
            http_server.bind_rustls_0_23(&addr, tls_config)?
        }
        Some(_) => {
            warn!("CERT_PATH or KEY_PATH points to a non-existent file. Starting without HTTPS.");
            info!("Server running at http://{}", addr);
            http_server.bind(&addr)?
        }
        None => {
            info!("Server running at http://{}", addr);
            http_server.bind(&addr)?
        }
    };

    http_server.run().await
}
