//! # Códigos de Estado HTTP
//!
//! Códigos que usa el propio servidor para sus respuestas sintetizadas.
//! Los handlers pueden usar cualquier código y mensaje arbitrario a través
//! de [`Response::new`](super::Response::new).

/// Representa los códigos de estado HTTP conocidos por el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 404 Not Found - Ruta inexistente, request malformado o handler fallido
    NotFound = 404,

    /// 413 Payload Too Large - El request excede la capacidad de lectura
    PayloadTooLarge = 413,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use bare_http::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.as_u32(), 404);
    /// ```
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::PayloadTooLarge => "Payload Too Large",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "404 Not Found"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u32(), self.reason_phrase())
    }
}
