//! # Errores del servidor
//! src/error.rs
//!
//! Solo [`ServerError`] es fatal, y únicamente al arrancar. Los errores de
//! un request ([`RouteError`], [`HandlerError`] y el `ParseError` del
//! parser) se convierten en la respuesta de fallback dentro de la conexión.

use std::io;
use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Fallo al resolver un path en la tabla de rutas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route not found: {0}")]
    NotFound(String),
}

/// Error devuelto por un handler
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Handler failed: {0}")]
    Failed(String),
}

/// Errores fatales: el servidor no arranca
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid bind address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("Failed to create socket: {0}")]
    Socket(#[source] io::Error),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
