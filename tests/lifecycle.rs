//! Start/stop lifecycle: restartability, idempotent stop, bind failures.

mod common;

use janus::{Platform, Request};
use serde_json::json;

#[tokio::test]
async fn restart_serves_identically() {
    for (name, mut platform) in common::platforms() {
        platform
            .router()
            .get("/api/:version?/users", |req: Request| async move {
                json!({"version": req.param("version").unwrap_or("v1")})
            });

        // First run.
        platform.start(0).await.unwrap();
        let addr = platform.local_addr().unwrap();
        assert_eq!(
            common::get(addr, "/api/v2/users").await.json(),
            json!({"version": "v2"}),
            "{name}"
        );
        platform.stop().await.unwrap();
        assert!(!platform.is_running(), "{name}");

        // Second run: a fresh table, same behavior.
        platform.start(0).await.unwrap();
        let addr = platform.local_addr().unwrap();
        assert_eq!(
            common::get(addr, "/api/v2/users").await.json(),
            json!({"version": "v2"}),
            "{name}"
        );
        assert_eq!(
            common::get(addr, "/api/users").await.json(),
            json!({"version": "v1"}),
            "{name}"
        );
        platform.stop().await.unwrap();
    }
}

#[tokio::test]
async fn stop_is_a_no_op_when_not_running() {
    for (name, mut platform) in common::platforms() {
        assert!(platform.stop().await.is_ok(), "{name}: stop before any start");

        platform.router().get("/x", |_req: Request| async { "x" });
        platform.start(0).await.unwrap();
        platform.stop().await.unwrap();
        assert!(platform.stop().await.is_ok(), "{name}: second stop");
    }
}

#[tokio::test]
async fn start_twice_without_stop_is_an_error() {
    for (name, mut platform) in common::platforms() {
        platform.start(0).await.unwrap();
        assert!(platform.start(0).await.is_err(), "{name}");
        platform.stop().await.unwrap();
    }
}

#[tokio::test]
async fn bind_failure_propagates_immediately() {
    let mut first = Platform::radix();
    first.router().get("/x", |_req: Request| async { "x" });
    first.start(0).await.unwrap();
    let port = first.local_addr().unwrap().port();

    let mut second = Platform::radix();
    second.router().get("/x", |_req: Request| async { "x" });
    assert!(second.start(port).await.is_err(), "port already taken");

    first.stop().await.unwrap();
}

#[tokio::test]
async fn local_addr_tracks_the_current_run() {
    for (name, mut platform) in common::platforms() {
        assert!(platform.local_addr().is_none(), "{name}");
        platform.router().get("/x", |_req: Request| async { "x" });

        platform.start(0).await.unwrap();
        assert!(platform.local_addr().is_some(), "{name}");

        platform.stop().await.unwrap();
        assert!(platform.local_addr().is_none(), "{name}");
    }
}

#[tokio::test]
async fn conflicting_deferred_routes_fail_at_start_not_registration() {
    let mut platform = Platform::radix();
    {
        let mut router = platform.router();
        // Two parameter names competing for one tree position: buffering
        // accepts both, materialization cannot.
        router.get("/a/:b", |_req: Request| async { "b" });
        router.get("/a/:c", |_req: Request| async { "c" });
    }
    assert!(platform.start(0).await.is_err());
    assert!(!platform.is_running());
}
