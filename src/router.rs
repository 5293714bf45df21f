//! The registration surface: per-verb methods and mounting.
//!
//! [`Router`] is a thin facade over the platform's engine — each verb method
//! forwards straight to the engine's registration strategy, so the
//! immediate-binding family compiles the route on the spot and the deferred
//! family buffers it. Registration happens before `start`; what you register
//! after a start only takes effect on the next one.
//!
//! [`Scope`] is a standalone, engine-agnostic collection of registrations
//! for composing route groups before attaching them anywhere:
//!
//! ```rust,no_run
//! use janus::{Platform, Request, Scope};
//! use serde_json::json;
//!
//! let users = Scope::new()
//!     .get("/users", |_req: Request| async { json!(["alice", "bob"]) })
//!     .get("/users/:id", |req: Request| async move {
//!         json!({"id": req.param("id")})
//!     });
//!
//! let mut app = Platform::radix();
//! app.router().mount("/api", users);
//! ```

use crate::engine::Engine;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

// ── Router ────────────────────────────────────────────────────────────────────

/// The application-facing registration handle, borrowed from
/// [`Platform::router`](crate::Platform::router).
pub struct Router<'e, E: Engine> {
    engine: &'e mut E,
}

impl<'e, E: Engine> Router<'e, E> {
    pub(crate) fn new(engine: &'e mut E) -> Self {
        Self { engine }
    }

    /// Register a handler for `GET path`. Returns `self` for chaining.
    pub fn get(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Get, path, handler.into_boxed_handler())
    }

    /// Register a handler for `POST path`.
    pub fn post(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Post, path, handler.into_boxed_handler())
    }

    /// Register a handler for `PUT path`.
    pub fn put(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Put, path, handler.into_boxed_handler())
    }

    /// Register a handler for `PATCH path`.
    pub fn patch(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Patch, path, handler.into_boxed_handler())
    }

    /// Register a handler for `DELETE path`.
    pub fn delete(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.on(Method::Delete, path, handler.into_boxed_handler())
    }

    /// Mounts every route of `scope` under `prefix`, in the order the scope
    /// declared them.
    ///
    /// Mounting replays each entry through the engine's own registration
    /// strategy, so it carries the same timing as direct registration and
    /// must happen before the platform starts.
    pub fn mount(&mut self, prefix: &str, scope: Scope) -> &mut Self {
        for (method, path, handler) in scope.entries {
            self.on(method, &join(prefix, &path), handler);
        }
        self
    }

    fn on(&mut self, method: Method, path: &str, handler: BoxedHandler) -> &mut Self {
        self.engine.register(method, path, handler);
        self
    }
}

// ── Scope ─────────────────────────────────────────────────────────────────────

/// An unattached group of route registrations.
///
/// A scope records `(verb, path, handler)` entries in declaration order and
/// hands them over wholesale when mounted — onto a [`Router`] or nested into
/// another scope.
#[derive(Default)]
pub struct Scope {
    entries: Vec<(Method, String, BoxedHandler)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler.into_boxed_handler())
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler.into_boxed_handler())
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler.into_boxed_handler())
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, path, handler.into_boxed_handler())
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler.into_boxed_handler())
    }

    /// Nests another scope under `prefix`.
    pub fn mount(mut self, prefix: &str, scope: Scope) -> Self {
        for (method, path, handler) in scope.entries {
            self.entries.push((method, join(prefix, &path), handler));
        }
        self
    }

    fn on(mut self, method: Method, path: &str, handler: BoxedHandler) -> Self {
        self.entries.push((method, path.to_owned(), handler));
        self
    }
}

// ── Path joining ──────────────────────────────────────────────────────────────

/// Joins a mount prefix and a route path with exactly one slash between.
pub(crate) fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_owned(),
        (true, false) => format!("/{path}"),
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix}/{path}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_plain_prefix_and_path() {
        assert_eq!(join("/api", "/users"), "/api/users");
    }

    #[test]
    fn join_tolerates_slash_variants() {
        assert_eq!(join("/api/", "/users"), "/api/users");
        assert_eq!(join("/api", "users"), "/api/users");
        assert_eq!(join("/api/", "users/"), "/api/users/");
    }

    #[test]
    fn join_root_prefix_is_identity() {
        assert_eq!(join("/", "/users"), "/users");
        assert_eq!(join("", "/users"), "/users");
    }

    #[test]
    fn join_root_path_collapses_to_prefix() {
        assert_eq!(join("/api", "/"), "/api");
        assert_eq!(join("/", "/"), "/");
    }
}
