//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Tabla que asocia un path exacto con un handler.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! La comparación es byte a byte: sin prefijos, sin normalizar la barra
//! final, sin comodines ni parámetros. Cualquier enrutamiento más rico se
//! construye encima de esta primitiva.

use std::collections::HashMap;

use crate::error::{HandlerError, RouteError};
use crate::http::{Request, Response};

/// Resultado de invocar un handler
pub type HandlerResult = Result<Response, HandlerError>;

/// Cualquier cosa que convierta un [`Request`] en un [`Response`]
///
/// Las funciones y closures `Fn(&Request) -> HandlerResult` lo implementan
/// automáticamente; un struct puede implementarlo para cargar configuración
/// propia. Un handler bloquea su conexión mientras corre, así que debe
/// terminar en un tiempo acotado.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, request: &Request) -> HandlerResult {
        self(request)
    }
}

/// Router que mapea paths a handlers
///
/// Se llena antes de arrancar el servidor; una vez sirviendo queda detrás
/// de un `Arc` y es de solo lectura.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Box<dyn Handler>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registra una ruta con su handler, reemplazando el anterior si existía
    ///
    /// # Ejemplo
    /// ```
    /// use bare_http::router::{HandlerResult, Router};
    /// use bare_http::http::{Request, Response};
    ///
    /// fn hello_handler(_req: &Request) -> HandlerResult {
    ///     Ok(Response::new("HTTP/1.1", 200, "Success").with_body("hello"))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register("/hello", hello_handler);
    /// assert!(router.resolve("/hello").is_ok());
    /// ```
    pub fn register<H: Handler>(&mut self, path: &str, handler: H) {
        self.routes.insert(path.to_string(), Box::new(handler));
    }

    /// Busca el handler cuyo path coincide exactamente
    pub fn resolve(&self, path: &str) -> Result<&dyn Handler, RouteError> {
        self.routes
            .get(path)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    /// Número de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        f.debug_struct("Router").field("routes", &paths).finish()
    }
}
