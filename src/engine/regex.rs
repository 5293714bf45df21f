//! Immediate-binding backend on an anchored-regex matcher.
//!
//! This family's native pattern language already understands everything the
//! router surface can express — dynamic parameters, inline constraints,
//! optional segments — so registration is a straight passthrough: the
//! pattern is compiled into one anchored regex with named capture groups
//! the moment it is registered, and an invalid pattern fails fast at the
//! registration site.
//!
//! Dispatch scans routes in registration order and takes the first match,
//! so overlapping patterns resolve by declaration order.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::engine::{Dispatch, Engine};
use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::pattern::{self, Segment};

/// The immediate-binding engine.
pub struct RegexEngine {
    router: RegexRouter,
}

impl RegexEngine {
    pub fn new() -> Self {
        Self { router: RegexRouter { routes: Vec::new() } }
    }
}

impl Default for RegexEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RegexEngine {
    /// Compiles and attaches the route now.
    ///
    /// # Panics
    ///
    /// Panics if the pattern (or an inline constraint) does not compile —
    /// registration is the caller's code path, so the failure lands where
    /// the bad pattern was written.
    fn register(&mut self, method: Method, path: &str, handler: BoxedHandler) {
        let pattern = compile(path)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.router.routes.push(CompiledRoute { method, pattern, handler });
    }

    /// Snapshots the live matcher for one server run.
    fn bind(&self) -> Result<Arc<dyn Dispatch>, Error> {
        Ok(Arc::new(self.router.clone()))
    }
}

// ── Matcher ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct CompiledRoute {
    method: Method,
    pattern: Regex,
    handler: BoxedHandler,
}

#[derive(Clone)]
struct RegexRouter {
    routes: Vec<CompiledRoute>,
}

impl Dispatch for RegexRouter {
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        for route in &self.routes {
            if route.method != method {
                continue;
            }
            let Some(captures) = route.pattern.captures(path) else {
                continue;
            };
            let params = route
                .pattern
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|m| (name.to_owned(), m.as_str().to_owned()))
                })
                .collect();
            return Some((Arc::clone(&route.handler), params));
        }
        None
    }
}

/// Compiles a route pattern into one anchored regex.
///
/// - literal segment → `/escaped-text`
/// - `:name`         → `/(?P<name>[^/]+)`
/// - `:name(re)`     → `/(?P<name>re)` — the constraint body is spliced in
///   unmodified
/// - `:name?`        → `(?:/(?P<name>[^/]+))?` — slash and segment are
///   optional together, so an absent segment leaves no capture and no
///   doubled slash
///
/// The trailing `/?` tolerates the root path; trailing slashes on deeper
/// paths are stripped before dispatch ever gets here.
fn compile(path: &str) -> Result<Regex, regex::Error> {
    let mut out = String::with_capacity(path.len() + 8);
    out.push('^');
    for segment in pattern::parse(path) {
        match segment {
            Segment::Literal(text) => {
                out.push('/');
                out.push_str(&regex::escape(&text));
            }
            Segment::Param { name, constraint } => {
                out.push_str("/(?P<");
                out.push_str(&name);
                out.push('>');
                out.push_str(constraint.as_deref().unwrap_or("[^/]+"));
                out.push(')');
            }
            Segment::OptionalParam { name, constraint } => {
                out.push_str("(?:/(?P<");
                out.push_str(&name);
                out.push('>');
                out.push_str(constraint.as_deref().unwrap_or("[^/]+"));
                out.push_str("))?");
            }
        }
    }
    out.push_str("/?$");
    Regex::new(&out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
