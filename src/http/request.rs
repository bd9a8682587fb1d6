//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Este módulo implementa el parser de requests desde cero. Es una
//! transformación pura de bytes a [`Request`]: no hace I/O, así que se
//! puede probar sin red.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /path HTTP/1.1\n
//! Host:localhost\n
//! \n
//! <body>
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD PATH VERSION`, separados por un espacio
//! 2. **Headers**: `Key:Value`, uno por línea, sin recortar espacios
//! 3. **Empty Line**: separa los headers del body
//! 4. **Body**: el resto de los bytes, tal cual

use std::collections::BTreeMap;
use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Métodos HTTP reconocidos
///
/// El conjunto es cerrado: cualquier otro token es un request malformado.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

impl Method {
    /// Parsea un método HTTP (comparación exacta, sensible a mayúsculas)
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        Method::from_str(token).map_err(|_| ParseError::UnknownMethod(token.to_string()))
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No se recibió ningún byte
    #[error("Empty request")]
    EmptyRequest,

    /// La request line no tiene exactamente 3 tokens
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Método fuera del conjunto reconocido
    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// Línea de header sin ':'
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request line o headers que no son UTF-8
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,
}

/// Representa un request HTTP parseado
///
/// Es inmutable: se construye una vez por conexión y se descarta
/// después de producir la respuesta.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path tal cual llegó; es la llave de enrutamiento
    path: String,

    /// Versión HTTP, se guarda pero no se valida
    version: String,

    /// Headers con las llaves como llegaron (la última ocurrencia gana)
    headers: BTreeMap<String, String>,

    body: Vec<u8>,
}

/// Recorre un buffer línea por línea (terminadas en `\n`, con `\r` opcional)
struct Lines<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.position >= self.buffer.len() {
            return None;
        }

        let remaining = &self.buffer[self.position..];
        let line = match remaining.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                self.position += newline + 1;
                &remaining[..newline]
            }
            // Sin '\n' final: la última línea llega hasta el fin del input
            None => {
                self.position = self.buffer.len();
                remaining
            }
        };

        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }

    fn rest(&self) -> &'a [u8] {
        &self.buffer[self.position.min(self.buffer.len())..]
    }
}

fn to_str(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)
}

impl Request {
    /// Parsea un request desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use bare_http::http::{Method, Request};
    ///
    /// let request = Request::parse(b"GET /x HTTP/1.1\nHost:example.com\n\n").unwrap();
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.path(), "/x");
    /// assert_eq!(request.header("Host"), Some("example.com"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = Lines::new(buffer);

        // 1. Request line
        let request_line = lines.next_line().ok_or(ParseError::EmptyRequest)?;
        let (method, path, version) = Self::parse_request_line(to_str(request_line)?)?;

        // 2. Headers hasta la línea vacía
        let mut headers = BTreeMap::new();
        while let Some(line) = lines.next_line() {
            if line.is_empty() {
                break;
            }
            let (key, value) = Self::parse_header(to_str(line)?)?;
            headers.insert(key, value);
        }

        // 3. Body
        let body = lines.rest().to_vec();

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Formato: `GET /path HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::parse(parts[0])?;
        Ok((method, parts[1].to_string(), parts[2].to_string()))
    }

    /// Separa en el primer ':'; llave y valor quedan sin recortar
    fn parse_header(line: &str) -> Result<(String, String), ParseError> {
        line.split_once(':')
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (la llave se compara exacta)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}
