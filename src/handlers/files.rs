//! # Handler de archivos
//!
//! Sirve un único archivo del disco con un `Content-Type` fijo. El archivo
//! se lee en cada request, así que los cambios se ven sin reiniciar.

use std::fs;
use std::path::{Path, PathBuf};

use crate::http::{Request, Response};
use crate::router::{Handler, HandlerResult};

/// Handler que responde siempre con el contenido de `path`
#[derive(Debug, Clone)]
pub struct FileHandler {
    path: PathBuf,
    content_type: String,
}

impl FileHandler {
    pub fn new(path: impl Into<PathBuf>, content_type: &str) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl Handler for FileHandler {
    /// `200 Success` con el archivo; si no se puede leer, el error sube y
    /// el cliente recibe el fallback
    fn handle(&self, _request: &Request) -> HandlerResult {
        let body = fs::read(&self.path)?;

        Ok(Response::new("HTTP/1.1", 200, "Success")
            .with_header("Content-Type", &self.content_type)
            .with_body_bytes(body)
            .with_content_length())
    }
}
