//! # Módulo HTTP
//!
//! Este módulo implementa el subconjunto de HTTP/1.x que habla el servidor,
//! sin usar librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (método, path, versión, headers, body)
//! - Construcción y serialización de responses
//! - Códigos de estado que usa el propio servidor
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\n
//! Header-Name:Header-Value\n
//! \n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 Success\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
