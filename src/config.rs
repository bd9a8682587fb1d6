//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./bare_http --host 127.0.0.1 --port 8080 --web-root ./web_files
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=127.0.0.1 ./bare_http
//! ```

use std::time::Duration;

use clap::Parser;

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "bare_http")]
#[command(about = "Servidor HTTP/1.x mínimo con enrutamiento por path exacto")]
#[command(version = "0.1.0")]
pub struct Config {
    /// IP en la que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "80", env = "HTTP_PORT")]
    pub port: u16,

    /// Backlog del listen()
    #[arg(long, default_value = "32", env = "HTTP_BACKLOG")]
    pub backlog: u32,

    // === Conexiones ===

    /// Máximo de bytes aceptados por request; más que eso se responde 413
    #[arg(long = "max-request-bytes", default_value = "32768", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Timeout de lectura por conexión en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Cada cuánto revisa el accept loop si se pidió el apagado
    #[arg(long = "accept-poll-ms", default_value = "50", env = "ACCEPT_POLL_MS")]
    pub accept_poll_ms: u64,

    /// Atender cada conexión en su propio thread (por defecto se atiende
    /// una a la vez, en el thread del accept loop)
    #[arg(long, env = "HTTP_CONCURRENT")]
    pub concurrent: bool,

    // === Aplicación ===

    /// Directorio del que leen las rutas de archivos
    #[arg(long = "web-root", default_value = "./web_files", env = "WEB_ROOT")]
    pub web_root: String,

    /// Filtro de logging (se ignora si RUST_LOG está definido)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use bare_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:80");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn accept_poll_interval(&self) -> Duration {
        Duration::from_millis(self.accept_poll_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.backlog == 0 {
            return Err("Backlog must be >= 1".to_string());
        }
        if self.backlog > i32::MAX as u32 {
            return Err("Backlog is too large".to_string());
        }
        if self.max_request_bytes == 0 {
            return Err("Max request bytes must be >= 1".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        if self.accept_poll_ms == 0 {
            return Err("Accept poll interval must be > 0".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            backlog = self.backlog,
            max_request_bytes = self.max_request_bytes,
            read_timeout_ms = self.read_timeout_ms,
            mode = if self.concurrent { "thread-per-connection" } else { "sequential" },
            web_root = %self.web_root,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto (igual a la del CLI sin argumentos)
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            backlog: 32,
            max_request_bytes: 1 << 15,
            read_timeout_ms: 5_000,
            accept_poll_ms: 50,
            concurrent: false,
            web_root: "./web_files".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 80);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.backlog, 32);
        assert_eq!(config.max_request_bytes, 32768);
        assert!(!config.concurrent);
    }

    #[test]
    fn test_cli_defaults_match_default() {
        let parsed = Config::try_parse_from(["bare_http"]).unwrap();
        let default = Config::default();

        assert_eq!(parsed.host, default.host);
        assert_eq!(parsed.port, default.port);
        assert_eq!(parsed.backlog, default.backlog);
        assert_eq!(parsed.max_request_bytes, default.max_request_bytes);
        assert_eq!(parsed.read_timeout_ms, default.read_timeout_ms);
        assert_eq!(parsed.accept_poll_ms, default.accept_poll_ms);
        assert_eq!(parsed.concurrent, default.concurrent);
        assert_eq!(parsed.web_root, default.web_root);
        assert_eq!(parsed.log_level, default.log_level);
    }

    #[test]
    fn test_cli_arguments() {
        let config = Config::try_parse_from([
            "bare_http",
            "--host",
            "127.0.0.1",
            "-p",
            "25565",
            "--concurrent",
            "--max-request-bytes",
            "1024",
        ])
        .unwrap();

        assert_eq!(config.address(), "127.0.0.1:25565");
        assert!(config.concurrent);
        assert_eq!(config.max_request_bytes, 1024);
    }

    #[test]
    fn test_log_level_argument() {
        let config = Config::try_parse_from(["bare_http", "--log-level", "bare_http=debug"]).unwrap();
        assert_eq!(config.log_level, "bare_http=debug");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert_eq!(config.accept_poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_backlog() {
        let mut config = Config::default();
        config.backlog = 0;
        assert!(config.validate().unwrap_err().contains("Backlog"));
    }

    #[test]
    fn test_validate_invalid_max_request_bytes() {
        let mut config = Config::default();
        config.max_request_bytes = 0;
        assert!(config.validate().unwrap_err().contains("Max request bytes"));
    }

    #[test]
    fn test_validate_invalid_timeouts() {
        let mut config = Config::default();
        config.read_timeout_ms = 0;
        assert!(config.validate().unwrap_err().contains("Read timeout"));

        let mut config = Config::default();
        config.accept_poll_ms = 0;
        assert!(config.validate().unwrap_err().contains("Accept poll"));
    }
}
