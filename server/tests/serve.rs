//! End-to-end run over a real TCP listener.
//!
//! # Design
//! Starts the server on a random port with an in-memory store, drives the
//! documented scenario with a blocking ureq agent, then triggers graceful
//! shutdown and checks the server task exits cleanly.

use std::sync::Arc;

use todo_core::{MemoryStore, SharedStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Agent that hands back 4xx/5xx responses as data instead of `Err`.
fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn read_json(resp: &mut ureq::http::Response<ureq::Body>) -> serde_json::Value {
    let text = resp.body_mut().read_to_string().unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store: SharedStore = Arc::new(MemoryStore::new());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(todo_server::run_until(listener, store, async move {
        let _ = stop_rx.await;
    }));

    let base = format!("http://{addr}");
    tokio::task::spawn_blocking(move || {
        let agent = agent();

        // create
        let mut resp = agent
            .post(&format!("{base}/todos"))
            .content_type("application/json")
            .send(r#"{"content":"buy milk"}"#.as_bytes())
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let id = read_json(&mut resp)["insertedId"].as_str().unwrap().to_string();

        // list
        let mut resp = agent.get(&format!("{base}/todos")).call().unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(
            read_json(&mut resp),
            serde_json::json!([{ "_id": id, "content": "buy milk" }])
        );

        // malformed id is rejected
        let mut resp = agent.delete(&format!("{base}/todos/not-an-id")).call().unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert!(read_json(&mut resp)["message"].is_string());

        // delete
        let mut resp = agent.delete(&format!("{base}/todos/{id}")).call().unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(read_json(&mut resp)["deletedCount"], 1);

        // list after delete
        let mut resp = agent.get(&format!("{base}/todos")).call().unwrap();
        assert_eq!(read_json(&mut resp), serde_json::json!([]));
    })
    .await
    .expect("client thread panicked");

    stop_tx.send(()).unwrap();
    server.await.expect("server task panicked").unwrap();
}
