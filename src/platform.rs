//! The composition root: one engine, one lifecycle.
//!
//! A [`Platform`] owns its engine for the whole application lifetime.
//! Routes are registered through [`Platform::router`]; [`Platform::start`]
//! materializes the engine's dispatch table, binds the listener, and spawns
//! the accept loop; [`Platform::stop`] shuts the run down and drains it.
//! Start–stop–start works: every start binds a freshly materialized table,
//! so nothing from a previous run leaks into the next.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::{Engine, RadixEngine, RegexEngine};
use crate::error::Error;
use crate::router::Router;
use crate::server;

/// An HTTP platform over one routing backend.
///
/// ```rust,no_run
/// use janus::{Platform, Request};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), janus::Error> {
/// let mut app = Platform::radix();
/// app.router().get("/users/:id?", |req: Request| async move {
///     match req.param("id") {
///         Some(id) => json!({"id": id}),
///         None => json!(["alice", "bob"]),
///     }
/// });
///
/// app.start(3000).await?;
/// // ... serve ...
/// app.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Platform<E: Engine> {
    engine: E,
    running: Option<Running>,
}

struct Running {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Platform<RegexEngine> {
    /// A platform on the immediate-binding regex backend.
    pub fn regex() -> Self {
        Self::new(RegexEngine::new())
    }
}

impl Platform<RadixEngine> {
    /// A platform on the deferred-binding radix backend.
    pub fn radix() -> Self {
        Self::new(RadixEngine::new())
    }
}

impl<E: Engine> Platform<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, running: None }
    }

    /// The registration surface. Registrations made while the platform is
    /// running take effect on the next start.
    pub fn router(&mut self) -> Router<'_, E> {
        Router::new(&mut self.engine)
    }

    /// Materializes the route table, binds the listener, and starts serving.
    ///
    /// Resolves once the listener is bound — port 0 asks the OS for an
    /// ephemeral port, which [`Platform::local_addr`] then reports. A bind
    /// failure (port in use) or an unbindable route table returns the error
    /// immediately; there is no retry.
    pub async fn start(&mut self, port: u16) -> Result<(), Error> {
        if self.running.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let table = self.engine.bind()?;
        let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
        let addr = listener.local_addr()?;

        let (shutdown, task) = server::spawn(listener, table);
        self.running = Some(Running { addr, shutdown, task });

        info!(%addr, "listening");
        Ok(())
    }

    /// Stops accepting, drains in-flight connections, and releases the
    /// listener. Resolves once the run has fully wound down. Calling `stop`
    /// on a platform that is not running is a no-op, not an error.
    pub async fn stop(&mut self) -> Result<(), Error> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        let _ = running.shutdown.send(true);
        running
            .task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        Ok(())
    }

    /// The bound address of the current run, for test harnesses driving raw
    /// requests against the server.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Whether a run is currently serving.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}
