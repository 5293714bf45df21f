//! Deferred-binding backend on a radix-tree matcher.
//!
//! The tree ([`matchit`]) gives O(path-length) lookup but speaks a smaller
//! pattern language than the router surface: no optional segments, no inline
//! constraints. Registration therefore buffers the raw pattern untouched,
//! and [`Engine::bind`] does the real work per buffered entry:
//!
//! 1. expand the pattern into its concrete permutation set
//!    ([`pattern::expand`]), every member sharing the entry's handler `Arc`;
//! 2. lower each concrete pattern to tree syntax (`:name` → `{name}`),
//!    compiling inline constraints into post-match guards the tree itself
//!    cannot express;
//! 3. insert in expansion order — the set is already duplicate-free, and an
//!    exact duplicate from a *different* registration is dropped with a
//!    warning, first registration wins.
//!
//! Bindings the tree cannot hold at all (two parameter names competing for
//! one position) surface as an error from `bind`, i.e. at start time.
//!
//! The buffer outlives `bind`, so each server run materializes a fresh tree
//! instead of mutating the previous one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::engine::{Dispatch, Engine};
use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::pattern::{self, Segment};

/// The deferred-binding engine.
pub struct RadixEngine {
    routes: Vec<RouteEntry>,
}

struct RouteEntry {
    method: Method,
    path: String,
    handler: BoxedHandler,
}

impl RadixEngine {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }
}

impl Default for RadixEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RadixEngine {
    /// Buffers the registration; the pattern is not even parsed until `bind`.
    fn register(&mut self, method: Method, path: &str, handler: BoxedHandler) {
        self.routes.push(RouteEntry { method, path: path.to_owned(), handler });
    }

    fn bind(&self) -> Result<Arc<dyn Dispatch>, Error> {
        let mut trees: HashMap<Method, matchit::Router<RouteSlot>> = HashMap::new();
        let mut bound: HashSet<(Method, String)> = HashSet::new();

        for entry in &self.routes {
            for concrete in pattern::expand(&entry.path) {
                let (tree_path, guards) = lower(&concrete)?;

                if !bound.insert((entry.method, tree_path.clone())) {
                    warn!(
                        method = %entry.method,
                        route = %concrete,
                        "duplicate binding dropped, first registration wins"
                    );
                    continue;
                }

                let slot = RouteSlot {
                    handler: Arc::clone(&entry.handler),
                    guards,
                };
                trees
                    .entry(entry.method)
                    .or_default()
                    .insert(tree_path.as_str(), slot)
                    .map_err(|e| {
                        Error::Route(format!("cannot bind {} {concrete}: {e}", entry.method))
                    })?;
            }
        }

        Ok(Arc::new(RadixRouter { trees }))
    }
}

// ── Lowering ──────────────────────────────────────────────────────────────────

/// Rewrites a concrete pattern into tree syntax and splits off the
/// constraints as anchored post-match guards.
fn lower(concrete: &str) -> Result<(String, Vec<(String, Regex)>), Error> {
    let mut tree_path = String::with_capacity(concrete.len());
    let mut guards = Vec::new();

    for segment in pattern::parse(concrete) {
        match segment {
            Segment::Literal(text) => {
                tree_path.push('/');
                tree_path.push_str(&text);
            }
            Segment::Param { name, constraint }
            | Segment::OptionalParam { name, constraint } => {
                tree_path.push_str("/{");
                tree_path.push_str(&name);
                tree_path.push('}');
                if let Some(body) = constraint {
                    let guard = Regex::new(&format!("^(?:{body})$")).map_err(|e| {
                        Error::Route(format!("invalid constraint on `:{name}`: {e}"))
                    })?;
                    guards.push((name, guard));
                }
            }
        }
    }

    if tree_path.is_empty() {
        tree_path.push('/');
    }
    Ok((tree_path, guards))
}

// ── Matcher ───────────────────────────────────────────────────────────────────

struct RouteSlot {
    handler: BoxedHandler,
    guards: Vec<(String, Regex)>,
}

struct RadixRouter {
    trees: HashMap<Method, matchit::Router<RouteSlot>>,
}

impl Dispatch for RadixRouter {
    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.trees.get(&method)?;
        let matched = tree.at(path).ok()?;

        let params: HashMap<String, String> = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();

        // A failed guard means the tree matched a shape the constraint
        // rejects — the same outcome as no route at all.
        for (name, guard) in &matched.value.guards {
            if !params.get(name).is_some_and(|value| guard.is_match(value)) {
                return None;
            }
        }

        Some((Arc::clone(&matched.value.handler), params))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::request::Request;

    fn noop() -> BoxedHandler {
        (|_req: Request| async { "" }).into_boxed_handler()
    }

    fn lookup(engine: &RadixEngine, method: Method, path: &str) -> Option<HashMap<String, String>> {
        engine.bind().unwrap().lookup(method, path).map(|(_, params)| params)
    }

    #[test]
    fn static_route_binds_and_matches() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/test", noop());
        assert!(lookup(&engine, Method::Get, "/test").is_some());
        assert!(lookup(&engine, Method::Post, "/test").is_none());
        assert!(lookup(&engine, Method::Get, "/other").is_none());
    }

    #[test]
    fn every_optional_permutation_is_reachable() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/api/:version?/users/:userId?/posts/:postId?", noop());

        let params = lookup(&engine, Method::Get, "/api/v2/users/123/posts/456").unwrap();
        assert_eq!(params["version"], "v2");
        assert_eq!(params["userId"], "123");
        assert_eq!(params["postId"], "456");

        let params = lookup(&engine, Method::Get, "/api/users/123/posts/456").unwrap();
        assert!(!params.contains_key("version"));
        assert_eq!(params["userId"], "123");

        let params = lookup(&engine, Method::Get, "/api/v2/users/posts/456").unwrap();
        assert_eq!(params["version"], "v2");
        assert!(!params.contains_key("userId"));

        assert!(lookup(&engine, Method::Get, "/api/users/posts").unwrap().is_empty());
    }

    #[test]
    fn constraints_become_post_match_guards() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, r"/users/:id(\d+)", noop());
        assert!(lookup(&engine, Method::Get, "/users/123").is_some());
        assert!(lookup(&engine, Method::Get, "/users/abc").is_none());
    }

    #[test]
    fn optional_constraint_allows_absence_but_guards_presence() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/search/:query([a-zA-Z]+)?", noop());
        assert_eq!(lookup(&engine, Method::Get, "/search/test").unwrap()["query"], "test");
        assert!(lookup(&engine, Method::Get, "/search").unwrap().is_empty());
        assert!(lookup(&engine, Method::Get, "/search/123").is_none());
    }

    #[test]
    fn duplicate_binding_keeps_first_registration() {
        let first = noop();
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/ping", Arc::clone(&first));
        engine.register(Method::Get, "/ping", noop());

        let table = engine.bind().unwrap();
        let (handler, _) = table.lookup(Method::Get, "/ping").unwrap();
        assert!(Arc::ptr_eq(&handler, &first));
    }

    #[test]
    fn competing_param_names_fail_at_bind() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/a/:b", noop());
        engine.register(Method::Get, "/a/:c", noop());
        assert!(engine.bind().is_err());
    }

    #[test]
    fn registration_never_fails_eagerly() {
        let mut engine = RadixEngine::new();
        // Both entries buffer fine; the conflict only exists once the tree
        // is materialized.
        engine.register(Method::Get, "/a/:b", noop());
        engine.register(Method::Get, "/a/:c", noop());
    }

    #[test]
    fn bind_is_repeatable() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/users/:id?", noop());

        for _ in 0..2 {
            let table = engine.bind().unwrap();
            assert!(table.lookup(Method::Get, "/users").is_some());
            assert!(table.lookup(Method::Get, "/users/42").is_some());
        }
    }

    #[test]
    fn fully_optional_pattern_serves_root() {
        let mut engine = RadixEngine::new();
        engine.register(Method::Get, "/:page?", noop());
        assert!(lookup(&engine, Method::Get, "/").unwrap().is_empty());
        assert_eq!(lookup(&engine, Method::Get, "/home").unwrap()["page"], "home");
    }
}
