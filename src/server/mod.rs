//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Hace bind en la dirección configurada
//! 2. Escucha y acepta conexiones entrantes
//! 3. Lee y parsea un request por conexión
//! 4. Enruta, serializa la response, la escribe y cierra

pub mod connection;
pub mod shutdown;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use shutdown::Shutdown;
pub use tcp::Server;
