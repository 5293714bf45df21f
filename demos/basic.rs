//! Minimal janus example — the same routes served by both backends.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/params/alice          # regex backend
//!   curl http://localhost:3001/params/alice          # radix backend
//!   curl http://localhost:3000/api/v2/users/123
//!   curl http://localhost:3000/api/users/123
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'

use janus::{Platform, Request, Scope};
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> Result<(), janus::Error> {
    tracing_subscriber::fmt::init();

    let mut regex = Platform::regex();
    register(&mut regex);
    regex.start(3000).await?;

    let mut radix = Platform::radix();
    register(&mut radix);
    radix.start(3001).await?;

    println!("regex backend: http://localhost:3000");
    println!("radix backend: http://localhost:3001");

    tokio::signal::ctrl_c().await.ok();

    regex.stop().await?;
    radix.stop().await
}

fn register<E: janus::Engine>(platform: &mut Platform<E>) {
    let users = Scope::new()
        .get("/users/:userId?", get_users)
        .post("/users", create_user);

    platform
        .router()
        .get("/", |_req: Request| async { "Hello from janus!" })
        .get("/params/:name", greet)
        .mount("/api/:version?", users);
}

async fn greet(req: Request) -> String {
    format!("Hello, {}!", req.param("name").unwrap_or("stranger"))
}

// GET /api/:version?/users/:userId? — both segments optional, absent
// parameters stay absent.
async fn get_users(req: Request) -> Value {
    json!({
        "version": req.param("version").unwrap_or("v1"),
        "user": req.param("userId"),
    })
}

// POST /api/:version?/users — echoes the decoded JSON body back.
async fn create_user(req: Request) -> Value {
    json!({
        "message": "User created",
        "user": req.body(),
    })
}
