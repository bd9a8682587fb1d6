//! # Handlers de la aplicación
//! src/handlers/mod.rs
//!
//! Rutas de ejemplo que sirve el binario:
//! - `/`: la página `index.html`
//! - `/img.png`: una imagen webp (en `web_files/` va un placeholder de 1x1)
//!
//! No forman parte del núcleo del servidor; solo usan el trait
//! [`Handler`](crate::router::Handler).

pub mod files;

pub use files::FileHandler;

use std::path::Path;

use crate::router::Router;

/// Página principal dentro del web root
pub const INDEX_FILE: &str = "index.html";

/// Imagen de ejemplo dentro del web root
pub const IMAGE_FILE: &str = "mars-5k_1538069567.jpg.webp";

/// Registra las rutas de ejemplo leyendo desde `web_root`
pub fn register_defaults(router: &mut Router, web_root: &Path) {
    router.register("/", FileHandler::new(web_root.join(INDEX_FILE), "text/html"));
    router.register("/img.png", FileHandler::new(web_root.join(IMAGE_FILE), "image/webp"));
}
