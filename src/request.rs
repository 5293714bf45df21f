//! The uniform request record handed to handlers.
//!
//! Whatever engine matched the route, the handler sees the same four fields:
//! resolved path parameters, aggregated query parameters, decoded body, and
//! headers. Absent parameters and keys are simply missing from the maps —
//! an optional segment that was not in the matched route leaves no entry,
//! never an empty-string placeholder.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

/// One logical query key's value.
///
/// Repeated keys (`?items=1&items=2`) and bracketed keys (`?items[]=1`)
/// collapse into one [`QueryValue::Many`] per key, repetition order intact.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// The value, if the key appeared exactly once.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(_) => None,
        }
    }

    /// Every occurrence, single or repeated.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }
}

/// An inbound HTTP request, normalized.
pub struct Request {
    pub(crate) params: HashMap<String, String>,
    pub(crate) query: HashMap<String, QueryValue>,
    pub(crate) body: Value,
    pub(crate) headers: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        params: HashMap<String, String>,
        query: HashMap<String, QueryValue>,
        body: Value,
        headers: HashMap<String, String>,
    ) -> Self {
        Self { params, query, body, headers }
    }

    /// A resolved path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`. An optional parameter whose segment was absent from the
    /// matched path returns `None`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// All resolved path parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// A query parameter by logical key (bracket suffix already stripped).
    pub fn query(&self, name: &str) -> Option<&QueryValue> {
        self.query.get(name)
    }

    /// All query parameters.
    pub fn queries(&self) -> &HashMap<String, QueryValue> {
        &self.query
    }

    /// The decoded body. JSON and form-urlencoded payloads arrive as their
    /// object form; everything else is an empty object.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Case-insensitive header lookup (names are stored lowercase).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// All headers, names lowercase.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// Aggregates a raw query string into per-key values.
///
/// `items[]=a` and `items=a` address the same logical key `items`; repeats
/// in either spelling accumulate in arrival order.
pub(crate) fn parse_query(raw: Option<&str>) -> HashMap<String, QueryValue> {
    let Some(raw) = raw else {
        return HashMap::new();
    };

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let key = match key.strip_suffix("[]") {
            Some(stripped) => stripped.to_owned(),
            None => key.into_owned(),
        };
        grouped.entry(key).or_default().push(value.into_owned());
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                QueryValue::One(values.remove(0))
            } else {
                QueryValue::Many(values)
            };
            (key, value)
        })
        .collect()
}

/// Decodes a request body according to its content type.
///
/// An absent or empty JSON body normalizes to `{}`. Malformed JSON is the
/// one hard failure — the caller turns it into a 400.
pub(crate) fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let content_type = content_type.unwrap_or("");

    if content_type.starts_with("application/json") {
        if bytes.is_empty() {
            return Ok(empty_object());
        }
        return serde_json::from_slice(bytes);
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let map = form_urlencoded::parse(bytes)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        return Ok(Value::Object(map));
    }

    Ok(empty_object())
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
