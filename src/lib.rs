//! # bare_http
//! src/lib.rs
//!
//! Servidor HTTP/1.x mínimo implementado desde cero: acepta conexiones TCP,
//! parsea un request por conexión, lo despacha a un handler por path exacto,
//! escribe la respuesta y cierra.
//!
//! ## Arquitectura
//!
//! ```text
//! bytes → Request (parse) → Router (path exacto) → Handler → Response → bytes
//! ```
//!
//! - `http`: parsing de requests y serialización de responses
//! - `router`: tabla path → handler y el trait `Handler`
//! - `server`: socket, accept loop, ciclo de vida de la conexión y apagado
//! - `handlers`: rutas de ejemplo que sirven archivos
//! - `config`, `logging`, `error`: configuración, logs y errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use bare_http::config::Config;
//! use bare_http::http::{Request, Response};
//! use bare_http::router::HandlerResult;
//! use bare_http::server::Server;
//!
//! fn hello(_req: &Request) -> HandlerResult {
//!     Ok(Response::new("HTTP/1.1", 200, "Success").with_body("hello").with_content_length())
//! }
//!
//! let mut server = Server::bind(Config::default()).expect("bind failed");
//! server.register("/", hello);
//! server.start().expect("server failed");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
