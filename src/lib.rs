//! # janus
//!
//! One router surface over two HTTP engine backends. Register routes once,
//! run them unmodified on either.
//!
//! ## The contract
//!
//! Application code talks to a [`Router`]: five verb methods and
//! [`mount`](Router::mount). Behind it sits one of two engines:
//!
//! - **[`RegexEngine`]** — immediate binding. Its matcher natively speaks
//!   the full pattern language (dynamic parameters, inline regex
//!   constraints, optional segments), so every registration compiles and
//!   attaches on the spot.
//! - **[`RadixEngine`]** — deferred binding. Its radix tree has no notion of
//!   an optional segment, so registrations buffer until
//!   [`start`](Platform::start), when each pattern with `k` optional
//!   segments expands into its full set of up to `2^k` concrete routes —
//!   all wired to the same handler instance, with parameters from omitted
//!   segments simply absent.
//!
//! Either way a handler sees the same [`Request`] (params, query, body,
//! headers) and returns a value classified into one send strategy:
//! `null` → empty body, object → JSON, primitive → plain text — or an
//! explicit [`Response`] when it wants the wire to itself.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use janus::{Platform, Request};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), janus::Error> {
//!     let mut app = Platform::radix();
//!
//!     app.router()
//!         .get("/api/:version?/users/:userId?", get_users)
//!         .post("/users", create_user);
//!
//!     app.start(3000).await?;
//!     tokio::signal::ctrl_c().await.ok();
//!     app.stop().await
//! }
//!
//! async fn get_users(req: Request) -> serde_json::Value {
//!     json!({
//!         "version": req.param("version").unwrap_or("v1"),
//!         "user": req.param("userId"),
//!     })
//! }
//!
//! async fn create_user(req: Request) -> serde_json::Value {
//!     json!({"created": req.body()})
//! }
//! ```

mod error;
mod handler;
mod method;
mod platform;
mod request;
mod response;
mod router;
mod server;

pub mod engine;
pub mod pattern;

pub use error::Error;
pub use engine::{Dispatch, Engine, RadixEngine, RegexEngine};
pub use handler::Handler;
pub use method::Method;
pub use platform::Platform;
pub use request::{QueryValue, Request};
pub use response::{IntoResponse, Reply, Response};
pub use router::{Router, Scope};
