//! Outgoing HTTP response type, the [`Reply`] classification, and the
//! [`IntoResponse`] conversion trait.
//!
//! Handlers usually just return a value — a `serde_json::Value`, a string, a
//! number — and the classification below decides how it goes on the wire.
//! Handlers that need a custom status or headers return an explicit
//! [`Response`], which passes through untouched.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use serde_json::Value;

// ── Reply ─────────────────────────────────────────────────────────────────────

/// Classification of a bare handler return value.
///
/// Exactly one send strategy per variant:
///
/// - [`Reply::Empty`] — empty `text/plain` body (a JSON `null` is *not* sent
///   as the literal text `null`)
/// - [`Reply::Structured`] — serialized as `application/json`
/// - [`Reply::Text`] — the value's textual form, `text/plain`
///
/// All three respond `200 OK`.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Empty,
    Structured(Value),
    Text(String),
}

impl Reply {
    /// Buckets a JSON value into its send strategy.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => Self::Text(s),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Number(n) => Self::Text(n.to_string()),
            structured => Self::Structured(structured),
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use janus::Response;
/// use serde_json::json;
///
/// Response::json(&json!({"id": 1}));
/// Response::text("hello");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use http::StatusCode;
/// use janus::Response;
/// use serde_json::json;
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(&json!({"id": 42}));
/// ```
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl Response {
    /// `200 OK` — `application/json`.
    ///
    /// Serialization failure degrades to a bodyless 500 rather than a panic.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::with_body("application/json", body),
            Err(_) => Self::status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body("text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Vec::new() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: StatusCode::OK }
    }

    fn with_body(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            body,
        }
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|_| {
                // Only reachable through a malformed user-supplied header.
                http::Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Full::new(Bytes::new()))
                    .expect("bodyless 500 response")
            })
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`], obtained via [`Response::builder()`].
/// Defaults to 200; terminated by a typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    ///
    /// Serialization failure degrades to a bodyless 500, discarding the
    /// builder's status and headers.
    pub fn json<T: Serialize>(self, value: &T) -> Response {
        let Ok(body) = serde_json::to_vec(value) else {
            return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
        };
        let mut headers = vec![("content-type".to_owned(), "application/json".to_owned())];
        headers.extend(self.headers);
        Response { status: self.status, headers, body }
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        let mut response = Response::text(body);
        response.status = self.status;
        response.headers.extend(self.headers);
        response
    }

    /// Terminate with no body.
    pub fn empty(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Vec::new() }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Bare values run through the [`Reply`] classification; an explicit
/// [`Response`] skips it entirely, so a handler that already shaped its
/// response is never second-guessed.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Empty => Response::text(""),
            Reply::Structured(value) => Response::json(&value),
            Reply::Text(text) => Response::text(text),
        }
    }
}

impl IntoResponse for Value {
    fn into_response(self) -> Response {
        Reply::classify(self).into_response()
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Reply::Text(self).into_response()
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Reply::Text(self.to_owned()).into_response()
    }
}

/// A handler that returns nothing sends an empty body.
impl IntoResponse for () {
    fn into_response(self) -> Response {
        Reply::Empty.into_response()
    }
}

impl IntoResponse for bool {
    fn into_response(self) -> Response {
        Reply::Text(self.to_string()).into_response()
    }
}

impl IntoResponse for i32 {
    fn into_response(self) -> Response {
        Reply::Text(self.to_string()).into_response()
    }
}

impl IntoResponse for i64 {
    fn into_response(self) -> Response {
        Reply::Text(self.to_string()).into_response()
    }
}

impl IntoResponse for u64 {
    fn into_response(self) -> Response {
        Reply::Text(self.to_string()).into_response()
    }
}

impl IntoResponse for f64 {
    fn into_response(self) -> Response {
        Reply::Text(self.to_string()).into_response()
    }
}

/// Return a [`StatusCode`] directly from a handler for a bodyless response.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_classifies_as_empty() {
        assert_eq!(Reply::classify(Value::Null), Reply::Empty);
    }

    #[test]
    fn objects_and_arrays_classify_as_structured() {
        assert_eq!(
            Reply::classify(json!({"a": 1})),
            Reply::Structured(json!({"a": 1}))
        );
        assert_eq!(Reply::classify(json!([1, 2])), Reply::Structured(json!([1, 2])));
    }

    #[test]
    fn primitives_classify_as_text() {
        assert_eq!(Reply::classify(json!("hi")), Reply::Text("hi".into()));
        assert_eq!(Reply::classify(json!(42)), Reply::Text("42".into()));
        assert_eq!(Reply::classify(json!(true)), Reply::Text("true".into()));
    }

    #[test]
    fn empty_reply_renders_empty_text_body() {
        let response = Reply::Empty.into_response();
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
        assert!(response
            .headers
            .iter()
            .any(|(k, v)| k == "content-type" && v.starts_with("text/plain")));
    }

    #[test]
    fn structured_reply_serializes() {
        let response = Reply::Structured(json!({"message": "Hello World"})).into_response();
        assert_eq!(response.body, br#"{"message":"Hello World"}"#);
    }

    #[test]
    fn builder_keeps_status_and_headers() {
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/99")
            .json(&json!({"id": "99"}));
        assert_eq!(response.status, StatusCode::CREATED);
        assert!(response
            .headers
            .iter()
            .any(|(k, v)| k == "location" && v == "/users/99"));
    }
}
