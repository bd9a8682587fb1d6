//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas de forma programática y serializarlas a
//! bytes para enviar al cliente.
//!
//! ## Formato en el cable
//!
//! ```text
//! HTTP/1.1 200 Success\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! No se agrega ningún header implícito: ni `Date`, ni `Server`, ni un
//! `Content-Length` calculado. Lo que aparece en el cable es exactamente lo
//! que el handler puso.
//!
//! Las líneas terminan en `\r\n`, nunca en `\n` solo: es lo que exigen
//! clientes como curl. Los requests, en cambio, aceptan ambos.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use bare_http::http::Response;
//!
//! let response = Response::new("HTTP/1.1", 200, "Success")
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello")
//!     .with_content_length();
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nHello"));
//! ```

use super::StatusCode;
use std::collections::BTreeMap;

/// Versión usada por las respuestas que sintetiza el servidor
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

/// Representa una respuesta HTTP en construcción
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: String,

    status_code: u32,

    /// Texto libre, no tiene que coincidir con la reason phrase estándar
    status_message: String,

    /// Se emiten en orden de llave
    headers: BTreeMap<String, String>,

    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(version: &str, status_code: u32, status_message: &str) -> Self {
        Self {
            version: version.to_string(),
            status_code,
            status_message: status_message.to_string(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Crea una respuesta `HTTP/1.1` con la reason phrase estándar del código
    ///
    /// # Ejemplo
    /// ```
    /// use bare_http::http::{Response, StatusCode};
    ///
    /// let response = Response::from_status(StatusCode::NotFound);
    /// assert_eq!(response.status_message(), "Not Found");
    /// ```
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(DEFAULT_VERSION, status.as_u32(), status.reason_phrase())
    }

    /// Agrega un header; si ya existe, se sobrescribe
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`with_header`](Self::with_header)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde un string (no toca los headers)
    pub fn with_body(mut self, body: &str) -> Self {
        self.set_body(body.as_bytes().to_vec());
        self
    }

    /// Establece el cuerpo desde bytes, útil para respuestas binarias
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.set_body(body);
        self
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Pone `Content-Length` con el tamaño actual del body
    ///
    /// El serializador nunca lo calcula solo.
    pub fn with_content_length(mut self) -> Self {
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Serializa la respuesta a los bytes exactos que van al socket
    ///
    /// - Status line: `<version> <code> <message>\r\n`
    /// - Headers: `Key: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body, sin nada después
    ///
    /// Nunca se emite un `\n` sin su `\r` (ver la doc del módulo).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        // 1. Status line
        let status_line = format!(
            "{} {} {}\r\n",
            self.version, self.status_code, self.status_message
        );
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body
        result.extend_from_slice(&self.body);

        result
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status_code(&self) -> u32 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
