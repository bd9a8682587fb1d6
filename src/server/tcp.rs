//! # Servidor TCP
//! src/server/tcp.rs
//!
//! ```text
//! Uninitialized → Bound → Listening → (conexiones) → Stopped
//! ```
//!
//! [`Server::bind`] crea el socket y hace bind (un fallo aquí es fatal).
//! [`Server::run`] hace listen y entra al accept loop hasta que el token de
//! [`Shutdown`] se apaga. Por defecto cada conexión se atiende en el thread
//! del loop antes de aceptar la siguiente; con `concurrent` cada una va a
//! su propio thread.

use std::io;
use std::net::{IpAddr, Shutdown as SocketShutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, error, info, warn};

use super::connection;
use super::shutdown::{self, Shutdown};
use crate::config::Config;
use crate::error::ServerError;
use crate::router::{Handler, Router};

/// Pausa tras un error de accept no transitorio (ej: sin descriptores)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Lo que necesita cada conexión, copiado desde la configuración
#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    max_request_bytes: usize,
    read_timeout: Duration,
}

impl From<&Config> for ConnectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_request_bytes: config.max_request_bytes,
            read_timeout: config.read_timeout(),
        }
    }
}

/// Servidor HTTP con enrutamiento por path exacto
pub struct Server {
    config: Config,
    router: Router,
    socket: Socket,
    local_addr: SocketAddr,
    shutdown: Shutdown,
}

impl Server {
    /// Crea el socket TCP y lo asocia a `host:port`
    ///
    /// Con `port = 0` el sistema elige un puerto libre; ver [`local_addr`](Self::local_addr).
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let ip: IpAddr = config
            .host
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                address: config.address(),
                source,
            })?;
        let addr = SocketAddr::new(ip, config.port);

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(ServerError::Socket)?;
        socket.set_reuse_address(true).map_err(ServerError::Socket)?;
        socket
            .bind(&addr.into())
            .map_err(|source| ServerError::Bind { addr, source })?;

        let local_addr = socket
            .local_addr()
            .map_err(ServerError::Socket)?
            .as_socket()
            .ok_or_else(|| {
                ServerError::Socket(io::Error::new(
                    io::ErrorKind::Other,
                    "bound socket has no IP address",
                ))
            })?;

        info!(address = %local_addr, "socket bound");

        Ok(Self {
            config,
            router: Router::new(),
            socket,
            local_addr,
            shutdown: Shutdown::new(),
        })
    }

    /// Registra un handler para un path exacto
    pub fn register<H: Handler>(&mut self, path: &str, handler: H) {
        self.router.register(path, handler);
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Dirección real del socket (útil si se pidió el puerto 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Token para detener el servidor desde otro thread
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Instala el handler de SIGINT/SIGTERM y sirve hasta recibir la señal
    pub fn start(self) -> Result<(), ServerError> {
        shutdown::install_signal_handler(&self.shutdown).map_err(ServerError::Signal)?;
        self.run()
    }

    /// Hace listen y corre el accept loop hasta que se apague el token
    ///
    /// Solo el listen es fatal. Los errores de accept se registran y el
    /// loop sigue; los de una conexión quedan en esa conexión.
    pub fn run(self) -> Result<(), ServerError> {
        let Server {
            config,
            router,
            socket,
            local_addr,
            shutdown,
        } = self;

        socket
            .listen(config.backlog as i32)
            .map_err(|source| ServerError::Listen {
                addr: local_addr,
                source,
            })?;
        let listener: TcpListener = socket.into();
        // No bloqueante para poder observar el token entre accepts
        listener.set_nonblocking(true)?;

        info!(
            address = %local_addr,
            routes = router.len(),
            concurrent = config.concurrent,
            "started listening"
        );

        let router = Arc::new(router);
        let settings = ConnectionSettings::from(&config);
        let poll_interval = config.accept_poll_interval();
        let mut workers: Vec<JoinHandle<()>> = Vec::new();

        while shutdown.is_active() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    debug!(peer = %peer, "connection accepted");
                    if config.concurrent {
                        workers.retain(|worker| !worker.is_finished());
                        let router = Arc::clone(&router);
                        let spawned = thread::Builder::new()
                            .name(format!("conn-{}", peer))
                            .spawn(move || serve_connection(stream, peer, &router, settings));
                        match spawned {
                            Ok(worker) => workers.push(worker),
                            Err(e) => error!(peer = %peer, error = %e, "failed to spawn connection thread"),
                        }
                    } else {
                        serve_connection(stream, peer, &router, settings);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(poll_interval),
                Err(e) if is_transient(&e) => {
                    warn!(error = %e, "transient accept error");
                }
                Err(e) => {
                    error!(error = %e, "accept failed, backing off");
                    thread::sleep(ACCEPT_BACKOFF);
                }
            }
        }

        info!("shutdown requested, ending listener");
        drop(listener);

        for worker in workers {
            if worker.join().is_err() {
                warn!("connection thread panicked");
            }
        }

        info!("server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .field("router", &self.router)
            .field("active", &self.shutdown.is_active())
            .finish()
    }
}

/// Errores que no indican un problema del listener
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::TimedOut
    )
}

/// Atiende una conexión aceptada y la cierra pase lo que pase
fn serve_connection(mut stream: TcpStream, peer: SocketAddr, router: &Router, settings: ConnectionSettings) {
    // En algunas plataformas el stream hereda el modo no bloqueante del listener
    let prepared = stream
        .set_nonblocking(false)
        .and_then(|_| stream.set_read_timeout(Some(settings.read_timeout)));

    let result = prepared.and_then(|_| connection::handle_connection(&mut stream, router, settings.max_request_bytes));
    if let Err(e) = result {
        warn!(peer = %peer, error = %e, "connection failed");
    }

    let _ = stream.shutdown(SocketShutdown::Both);
    debug!(peer = %peer, "connection closed");
}
