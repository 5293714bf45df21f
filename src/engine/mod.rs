//! The two routing backends behind one capability set.
//!
//! An engine does exactly two things: accept a registration and materialize
//! a dispatch table. The two implementations differ in *when* a pattern is
//! processed:
//!
//! - [`RegexEngine`] is the immediate-binding family: [`Engine::register`]
//!   compiles the pattern on the spot and attaches it to the live matcher.
//!   Its native pattern language covers dynamic parameters, inline regex
//!   constraints, and optional segments, so registration is a 1:1
//!   passthrough.
//! - [`RadixEngine`] is the deferred-binding family: [`Engine::register`]
//!   buffers the raw pattern untouched, and [`Engine::bind`] expands every
//!   buffered entry into its concrete permutation set before inserting into
//!   the radix tree, which has no optional-segment support of its own.
//!
//! `bind` always builds a fresh table, so a stopped-and-restarted platform
//! serves from a clean materialization instead of accreting bindings.

mod radix;
mod regex;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;

pub use radix::RadixEngine;
pub use regex::RegexEngine;

/// A routing backend: registration strategy plus table materialization.
pub trait Engine: 'static {
    /// Accepts one verb + pattern + handler registration.
    fn register(&mut self, method: Method, path: &str, handler: BoxedHandler);

    /// Materializes a dispatch table for one server run.
    ///
    /// Conflicting bindings the backend cannot represent surface here, which
    /// for the deferred family means at start time — never at registration.
    fn bind(&self) -> Result<Arc<dyn Dispatch>, Error>;
}

/// A materialized routing table.
pub trait Dispatch: Send + Sync {
    /// Resolves a method + path to a handler and its extracted parameters.
    ///
    /// Only parameters present in the matched concrete pattern appear in the
    /// map; an omitted optional segment contributes no entry.
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)>;
}

/// Engines stay usable behind a trait object, e.g. to drive the same test
/// suite over both backends.
impl Engine for Box<dyn Engine> {
    fn register(&mut self, method: Method, path: &str, handler: BoxedHandler) {
        (**self).register(method, path, handler);
    }

    fn bind(&self) -> Result<Arc<dyn Dispatch>, Error> {
        (**self).bind()
    }
}
