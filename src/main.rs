//! # bare_http - Entry Point
//! src/main.rs
//!
//! Arma la configuración, registra las rutas de ejemplo y sirve hasta
//! recibir SIGINT/SIGTERM.

use std::path::Path;

use bare_http::config::Config;
use bare_http::handlers;
use bare_http::logging;
use bare_http::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }
    config.log_summary();

    let web_root = config.web_root.clone();
    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    };

    handlers::register_defaults(server.router_mut(), Path::new(&web_root));

    // Bloquea hasta que llegue la señal de apagado
    if let Err(e) = server.start() {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
