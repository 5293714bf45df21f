//! Shared harness: every test runs against both backends through the same
//! boxed-engine platform, talking real HTTP over a raw socket.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;

use janus::{Engine, Platform, RadixEngine, RegexEngine};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// One platform per backend family, behind the same type so a single test
/// body can exercise both.
pub fn platforms() -> Vec<(&'static str, Platform<Box<dyn Engine>>)> {
    vec![
        ("regex", Platform::new(Box::new(RegexEngine::new()) as Box<dyn Engine>)),
        ("radix", Platform::new(Box::new(RadixEngine::new()) as Box<dyn Engine>)),
    ]
}

/// A parsed HTTP response.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == &name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("non-JSON body {:?}: {e}", self.body))
    }
}

/// Sends one request and reads the full response. `connection: close` makes
/// the server end the stream, so read-to-end sees the whole reply.
pub async fn send(
    addr: SocketAddr,
    method: &str,
    target: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Reply {
    // The platform binds the wildcard address; reach it over loopback.
    let ip = if addr.ip().is_unspecified() {
        std::net::IpAddr::from([127, 0, 0, 1])
    } else {
        addr.ip()
    };
    let mut stream = TcpStream::connect((ip, addr.port())).await.expect("connect");

    let mut request = format!(
        "{method} {target} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\ncontent-length: {}\r\n",
        body.len()
    );
    for (name, value) in headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");
    request.push_str(body);

    stream.write_all(request.as_bytes()).await.expect("write request");
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    parse(&raw)
}

pub async fn get(addr: SocketAddr, target: &str) -> Reply {
    send(addr, "GET", target, &[], "").await
}

pub async fn post_json(addr: SocketAddr, target: &str, body: &str) -> Reply {
    send(addr, "POST", target, &[("content-type", "application/json")], body).await
}

fn parse(raw: &[u8]) -> Reply {
    let text = String::from_utf8_lossy(raw);
    let (head, body) = text.split_once("\r\n\r\n").expect("malformed response");

    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .expect("status line");
    let headers = lines
        .filter_map(|line| {
            line.split_once(':')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_owned()))
        })
        .collect();

    Reply { status, headers, body: body.to_owned() }
}
