//! # Cancelación del servidor
//! src/server/shutdown.rs
//!
//! [`Shutdown`] es el flag de "activo" que observa el accept loop. Se pasa
//! de forma explícita, así que un test puede detener el servidor llamando
//! [`Shutdown::trigger`] sin mandar señales al proceso. El handler de
//! SIGINT/SIGTERM solo apaga ese mismo flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Token de cancelación compartido entre el accept loop y quien lo detiene
#[derive(Debug, Clone)]
pub struct Shutdown {
    active: Arc<AtomicBool>,
}

impl Shutdown {
    /// Crea un token en estado activo
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// `true` mientras no se haya pedido el apagado
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Pide el apagado; el accept loop sale en su siguiente iteración
    pub fn trigger(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
mod signal {
    use super::*;
    use std::sync::OnceLock;

    /// Flag que apaga el handler de señales; solo se enlaza una vez por proceso
    static SIGNAL_TARGET: OnceLock<Arc<AtomicBool>> = OnceLock::new();

    extern "C" fn on_signal(_signum: libc::c_int) {
        // Solo una carga y un store atómicos: seguro dentro de un signal handler
        if let Some(active) = SIGNAL_TARGET.get() {
            active.store(false, Ordering::SeqCst);
        }
    }

    pub fn install(shutdown: &Shutdown) -> io::Result<()> {
        let target = SIGNAL_TARGET.get_or_init(|| Arc::clone(&shutdown.active));
        if !Arc::ptr_eq(target, &shutdown.active) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "signal handler already bound to another server",
            ));
        }

        for signum in [libc::SIGINT, libc::SIGTERM] {
            // SAFETY: `action` se inicializa completo antes de pasarlo a
            // sigaction, y `on_signal` solo toca atómicos.
            let status = unsafe {
                let mut action: libc::sigaction = std::mem::zeroed();
                action.sa_sigaction = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
                action.sa_flags = 0;
                libc::sigemptyset(&mut action.sa_mask);
                libc::sigaction(signum, &action, std::ptr::null_mut())
            };
            if status != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }
}

/// Instala el handler de SIGINT/SIGTERM que apaga `shutdown`
///
/// Solo un token por proceso puede quedar enlazado a las señales; intentar
/// enlazar otro distinto devuelve `AlreadyExists`.
#[cfg(unix)]
pub fn install_signal_handler(shutdown: &Shutdown) -> io::Result<()> {
    signal::install(shutdown)
}

#[cfg(not(unix))]
pub fn install_signal_handler(_shutdown: &Shutdown) -> io::Result<()> {
    tracing::warn!("signal handling is only supported on unix; use Shutdown::trigger");
    Ok(())
}
