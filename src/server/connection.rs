//! # Ciclo de vida de una conexión
//! src/server/connection.rs
//!
//! ```text
//! Accepted → Parsed → Routed → Responded → Closed
//! ```
//!
//! Todo lo que falla al parsear, al resolver la ruta o dentro del handler
//! termina en la misma respuesta de fallback (404). Nada de eso sale de
//! esta etapa. Los errores de I/O solo afectan a su propia conexión.

use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::http::{Request, Response, StatusCode};
use crate::router::Router;

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Resultado de leer un request del socket
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes del request (completo, o lo que llegó antes de EOF/timeout)
    Request(Vec<u8>),

    /// El peer cerró sin mandar nada
    Closed,

    /// El request excede el máximo permitido
    TooLarge,
}

/// Respuesta sintetizada para cualquier fallo por request
///
/// ```
/// use bare_http::server::connection::fallback_response;
///
/// let response = fallback_response();
/// assert_eq!(response.status_code(), 404);
/// assert_eq!(response.body(), b"Page not found");
/// ```
pub fn fallback_response() -> Response {
    Response::from_status(StatusCode::NotFound)
        .with_header("Content-Type", "text/html")
        .with_body("Page not found")
        .with_content_length()
}

/// Respuesta para un request que no cabe en el buffer
pub fn payload_too_large_response() -> Response {
    Response::from_status(StatusCode::PayloadTooLarge)
        .with_header("Content-Type", "text/html")
        .with_body("Request too large")
        .with_content_length()
}

/// Índice del primer byte del body, si ya llegó la línea vacía
fn head_end(buffer: &[u8]) -> Option<usize> {
    let mut start = 0;
    while let Some(offset) = buffer[start..].iter().position(|&b| b == b'\n') {
        let newline = start + offset;
        let rest = &buffer[newline + 1..];
        if rest.starts_with(b"\n") {
            return Some(newline + 2);
        }
        if rest.starts_with(b"\r\n") {
            return Some(newline + 3);
        }
        start = newline + 1;
    }
    None
}

/// `Content-Length` declarado en el head (sin distinguir mayúsculas)
///
/// Con headers duplicados gana el último, igual que en el parser.
fn declared_length(head: &[u8]) -> Option<usize> {
    let value = head.split(|&b| b == b'\n').rev().find_map(|line| {
        let colon = line.iter().position(|&b| b == b':')?;
        let (key, value) = (&line[..colon], &line[colon + 1..]);
        key.eq_ignore_ascii_case(b"content-length").then_some(value)
    })?;
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

/// Lee un request hasta la línea vacía más el `Content-Length` declarado
///
/// Se detiene también en EOF o cuando vence el timeout de lectura, y en
/// ese caso devuelve lo que haya llegado. Un timeout sin ningún byte se
/// propaga como error.
pub fn read_request<R: Read>(stream: &mut R, max_bytes: usize) -> io::Result<ReadOutcome> {
    let mut buffer = Vec::with_capacity(READ_CHUNK.min(max_bytes));
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let read = match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e)
                if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
                    && !buffer.is_empty() =>
            {
                debug!(bytes = buffer.len(), "read timed out, using partial request");
                break;
            }
            Err(e) => return Err(e),
        };

        if buffer.len() + read > max_bytes {
            return Ok(ReadOutcome::TooLarge);
        }
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(body_start) = head_end(&buffer) {
            let declared = declared_length(&buffer[..body_start]).unwrap_or(0);
            let expected = match body_start.checked_add(declared) {
                Some(expected) if expected <= max_bytes => expected,
                _ => return Ok(ReadOutcome::TooLarge),
            };
            if buffer.len() >= expected {
                break;
            }
        }
    }

    if buffer.is_empty() {
        Ok(ReadOutcome::Closed)
    } else {
        Ok(ReadOutcome::Request(buffer))
    }
}

/// Parsea, enruta e invoca el handler; nunca falla
pub fn respond(router: &Router, raw: &[u8]) -> Response {
    let request = match Request::parse(raw) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "malformed request");
            return fallback_response();
        }
    };

    let handler = match router.resolve(request.path()) {
        Ok(handler) => handler,
        Err(e) => {
            debug!(method = %request.method(), error = %e, "no route");
            return fallback_response();
        }
    };

    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&request))) {
        Ok(Ok(response)) => {
            debug!(
                method = %request.method(),
                path = request.path(),
                status = response.status_code(),
                "request handled"
            );
            response
        }
        Ok(Err(e)) => {
            warn!(path = request.path(), error = %e, "handler failed");
            fallback_response()
        }
        Err(_) => {
            warn!(path = request.path(), "handler panicked");
            fallback_response()
        }
    }
}

/// Atiende una conexión completa: lee, responde y escribe una sola vez
///
/// El cierre queda a cargo de quien es dueño del stream (al soltarlo).
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    router: &Router,
    max_request_bytes: usize,
) -> io::Result<()> {
    let response = match read_request(stream, max_request_bytes)? {
        ReadOutcome::Closed => {
            debug!("peer closed without sending data");
            return Ok(());
        }
        ReadOutcome::TooLarge => {
            warn!(limit = max_request_bytes, "request too large");
            payload_too_large_response()
        }
        ReadOutcome::Request(raw) => respond(router, &raw),
    };

    let bytes = response.to_bytes();
    stream.write_all(&bytes)?;
    stream.flush()?;

    debug!(status = response.status_code(), bytes = bytes.len(), "response sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::router::HandlerResult;
    use std::io::Cursor;

    /// Stream en memoria: lee de `input`, escribe en `output`
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        /// Error a devolver cuando se acaba el input (simula un timeout)
        eof_error: Option<io::ErrorKind>,
    }

    impl MockStream {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
                eof_error: None,
            }
        }

        fn timing_out(input: &[u8]) -> Self {
            Self {
                eof_error: Some(io::ErrorKind::WouldBlock),
                ..Self::new(input)
            }
        }

        fn output_str(&self) -> String {
            String::from_utf8_lossy(&self.output).into_owned()
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let read = self.input.read(buf)?;
            match (read, self.eof_error) {
                (0, Some(kind)) => Err(io::Error::new(kind, "timed out")),
                _ => Ok(read),
            }
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn hello_handler(_req: &Request) -> HandlerResult {
        Ok(Response::new("HTTP/1.1", 200, "Success")
            .with_header("Content-Length", "5")
            .with_body("hello"))
    }

    fn echo_handler(req: &Request) -> HandlerResult {
        Ok(Response::new("HTTP/1.1", 200, "Success").with_body_bytes(req.body().to_vec()))
    }

    fn failing_handler(_req: &Request) -> HandlerResult {
        Err(HandlerError::Failed("boom".to_string()))
    }

    fn panicking_handler(_req: &Request) -> HandlerResult {
        panic!("handler bug");
    }

    fn test_router() -> Router {
        let mut router = Router::new();
        router.register("/", hello_handler);
        router.register("/echo", echo_handler);
        router.register("/fail", failing_handler);
        router.register("/panic", panicking_handler);
        router
    }

    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\nContent-Length: 14\r\nContent-Type: text/html\r\n\r\nPage not found";

    #[test]
    fn test_fallback_response_shape() {
        let response = fallback_response();

        assert_eq!(response.version(), "HTTP/1.1");
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.status_message(), "Not Found");
        assert_eq!(response.header("Content-Length"), Some("14"));
        assert_eq!(response.header("Content-Type"), Some("text/html"));
    }

    #[test]
    fn test_handle_known_route() {
        let mut stream = MockStream::new(b"GET / HTTP/1.1\r\n\r\n");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert_eq!(
            stream.output_str(),
            "HTTP/1.1 200 Success\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn test_handle_unknown_route() {
        let mut stream = MockStream::new(b"GET /missing HTTP/1.1\n\n");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert_eq!(stream.output_str(), NOT_FOUND);
    }

    #[test]
    fn test_handle_malformed_request() {
        let mut stream = MockStream::new(b"FETCH / HTTP/1.1\n");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert_eq!(stream.output_str(), NOT_FOUND);
    }

    #[test]
    fn test_handler_error_falls_back() {
        let mut stream = MockStream::new(b"GET /fail HTTP/1.1\n\n");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert_eq!(stream.output_str(), NOT_FOUND);
    }

    #[test]
    fn test_handler_panic_falls_back() {
        let mut stream = MockStream::new(b"GET /panic HTTP/1.1\n\n");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert_eq!(stream.output_str(), NOT_FOUND);
    }

    #[test]
    fn test_peer_closed_without_data() {
        let mut stream = MockStream::new(b"");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert!(stream.output.is_empty());
    }

    #[test]
    fn test_too_large_request() {
        let raw = format!("GET / HTTP/1.1\nX-Pad:{}\n\n", "a".repeat(200));
        let mut stream = MockStream::new(raw.as_bytes());
        handle_connection(&mut stream, &test_router(), 64).unwrap();

        assert!(stream.output_str().starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[test]
    fn test_declared_body_larger_than_limit() {
        let mut stream = MockStream::new(b"POST /echo HTTP/1.1\nContent-Length:5000\n\nabc");
        let outcome = read_request(&mut stream, 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::TooLarge);
    }

    #[test]
    fn test_declared_length_overflow_is_too_large() {
        let raw = format!("POST /echo HTTP/1.1\r\nContent-Length: {}\r\n\r\nx", usize::MAX);
        let mut stream = MockStream::new(raw.as_bytes());
        let outcome = read_request(&mut stream, 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::TooLarge);
    }

    #[test]
    fn test_declared_length_overflow_gets_413() {
        let raw = format!("POST /echo HTTP/1.1\r\nContent-Length: {}\r\n\r\nx", usize::MAX);
        let mut stream = MockStream::new(raw.as_bytes());
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert!(stream.output_str().starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[test]
    fn test_body_read_per_content_length() {
        let mut stream = MockStream::new(b"POST /echo HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert!(stream.output_str().ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_read_stops_at_head_end() {
        // Sin Content-Length: lo que sigue a la línea vacía en la misma lectura es body
        let mut stream = MockStream::timing_out(b"GET / HTTP/1.1\n\n");
        let outcome = read_request(&mut stream, 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::Request(b"GET / HTTP/1.1\n\n".to_vec()));
    }

    #[test]
    fn test_partial_request_on_timeout() {
        let mut stream = MockStream::timing_out(b"GET / HTTP/1.1");
        handle_connection(&mut stream, &test_router(), 1024).unwrap();

        assert!(stream.output_str().starts_with("HTTP/1.1 200 Success\r\n"));
    }

    #[test]
    fn test_timeout_without_data_is_error() {
        let mut stream = MockStream::timing_out(b"");
        let err = handle_connection(&mut stream, &test_router(), 1024).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert!(stream.output.is_empty());
    }

    #[test]
    fn test_head_end_variants() {
        assert_eq!(head_end(b"GET / HTTP/1.1\n\nbody"), Some(16));
        assert_eq!(head_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(18));
        assert_eq!(head_end(b"GET / HTTP/1.1\r\nHost:x\r\n"), None);
    }

    #[test]
    fn test_declared_length() {
        assert_eq!(declared_length(b"GET / HTTP/1.1\nContent-Length: 12\n"), Some(12));
        assert_eq!(declared_length(b"GET / HTTP/1.1\nHost:x\n"), None);
        assert_eq!(declared_length(b"GET / HTTP/1.1\nContent-Length:abc\n"), None);
    }

    #[test]
    fn test_declared_length_last_duplicate_wins() {
        let head = b"POST / HTTP/1.1\nContent-Length: 3\nContent-Length: 8\n\n";
        assert_eq!(declared_length(head), Some(8));
    }

    #[test]
    fn test_declared_length_last_duplicate_invalid() {
        let head = b"POST / HTTP/1.1\nContent-Length: 3\nContent-Length: x\n\n";
        assert_eq!(declared_length(head), None);
    }

    #[test]
    fn test_duplicate_content_length_limit_uses_last() {
        let mut stream =
            MockStream::new(b"POST /echo HTTP/1.1\nContent-Length:2\nContent-Length:5000\n\nhi");
        let outcome = read_request(&mut stream, 1024).unwrap();

        assert_eq!(outcome, ReadOutcome::TooLarge);
    }
}
