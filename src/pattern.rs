//! Route pattern parsing and optional-segment expansion.
//!
//! A pattern is a `/`-separated sequence of segments. A segment with a
//! leading `:` is a named parameter; a trailing `?` marks it optional; an
//! inline `(…)` body is a regex constraint carried through verbatim:
//!
//! ```text
//! /users/:id               required parameter
//! /users/:id?              optional parameter
//! /users/:id(\d+)          constrained parameter
//! /search/:query([a-z]+)?  optional + constrained
//! ```
//!
//! The parser is a plain classifier — same input, same output, no
//! validation beyond segment splitting. Malformed patterns are a caller
//! problem and surface wherever the backing matcher rejects them.
//!
//! [`expand`] is the heart of the deferred backend: a radix tree cannot
//! express "this segment may be missing", so one pattern with `k` optional
//! segments becomes up to `2^k` concrete patterns that collectively match
//! exactly what a native optional-segment matcher would.

// ── Segments ──────────────────────────────────────────────────────────────────

/// One parsed path segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// Verbatim text, matched literally.
    Literal(String),
    /// `:name` or `:name(constraint)` — always present, captures one segment.
    Param { name: String, constraint: Option<String> },
    /// `:name?` or `:name(constraint)?` — may be omitted entirely.
    OptionalParam { name: String, constraint: Option<String> },
}

impl Segment {
    fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalParam { .. })
    }

    /// Renders the segment with the optional marker collapsed: a kept
    /// optional segment is indistinguishable from a required one.
    fn concrete(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Param { name, constraint } | Self::OptionalParam { name, constraint } => {
                match constraint {
                    Some(c) => format!(":{name}({c})"),
                    None => format!(":{name}"),
                }
            }
        }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Splits `path` on `/` and classifies each non-empty segment.
pub fn parse(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(classify)
        .collect()
}

fn classify(segment: &str) -> Segment {
    let Some(rest) = segment.strip_prefix(':') else {
        return Segment::Literal(segment.to_owned());
    };

    let (rest, optional) = match rest.strip_suffix('?') {
        Some(inner) => (inner, true),
        None => (rest, false),
    };

    // `:name(body)` — the constraint body is everything between the first
    // `(` and the final `)`, passed through to the matcher unparsed.
    let (name, constraint) = match rest.split_once('(') {
        Some((name, tail)) => {
            let body = tail.strip_suffix(')').unwrap_or(tail);
            (name.to_owned(), Some(body.to_owned()))
        }
        None => (rest.to_owned(), None),
    };

    if optional {
        Segment::OptionalParam { name, constraint }
    } else {
        Segment::Param { name, constraint }
    }
}

// ── Expansion ─────────────────────────────────────────────────────────────────

/// Expands a pattern with optional segments into the full set of concrete
/// patterns, in deterministic registration order.
///
/// Every combination of "optional segment present / absent" is enumerated as
/// a bitmask over the optional positions, masks in increasing order. Dropped
/// segments are removed outright — no empty placeholder — so surviving
/// segments become adjacent and the rejoined path has no doubled slashes.
/// A kept optional segment loses its `?` and behaves as a required one.
///
/// The output is deduplicated by exact string equality, first produced wins.
/// A mask that drops every segment yields the root path `/`.
///
/// Patterns with no optional segments come back as a single-element list
/// containing the input unmodified.
pub fn expand(path: &str) -> Vec<String> {
    let segments = parse(path);
    let optional: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_optional())
        .map(|(i, _)| i)
        .collect();

    if optional.is_empty() {
        return vec![path.to_owned()];
    }

    let mut out: Vec<String> = Vec::with_capacity(1 << optional.len());
    for mask in 0u32..(1 << optional.len()) {
        let mut kept = String::new();
        for (i, segment) in segments.iter().enumerate() {
            let dropped = optional
                .iter()
                .position(|&o| o == i)
                .is_some_and(|j| mask >> j & 1 == 0);
            if dropped {
                continue;
            }
            kept.push('/');
            kept.push_str(&segment.concrete());
        }
        if kept.is_empty() {
            kept.push('/');
        }
        if !out.contains(&kept) {
            out.push(kept);
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
