//! End-to-end workbench flows against a local HTTP backend

use axum::{
    extract::Multipart,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lector_domain::{FailureKind, PresetId, SessionPhase};
use lector_sdk::LectorClient;
use lector_session::{DirectorySink, SessionConfig, Workbench, OOM_NOTICE, TRANSPORT_MESSAGE};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;

async fn extract_handler(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut prompt = None;
    let mut image_len = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image_len = field.bytes().await.unwrap().len(),
            "prompt" => prompt = Some(field.text().await.unwrap()),
            _ => {}
        }
    }

    if prompt.as_deref() == Some("oom") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "CUDA out of memory. Tried to allocate 1.50 GiB"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "result": format!("<h3>Receipt</h3><p>{} bytes</p><p>{}</p>", image_len, prompt.unwrap_or_default())
        })),
    )
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/extract", post(extract_handler))
        .route("/clear_cache", post(|| async { Json(json!({"success": true, "message": "ok"})) }))
        .route(
            "/download_json",
            get(|| async { Json(json!({"full_text": "Receipt", "prompt_used": ""})) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn workbench(url: &str) -> Workbench<LectorClient> {
    let client = Arc::new(LectorClient::new(url).unwrap());
    Workbench::new(client, SessionConfig::default())
}

#[tokio::test]
async fn test_file_to_text() {
    let url = spawn_backend().await;
    let mut workbench = workbench(&url);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("receipt.jpg");
    std::fs::File::create(&path).unwrap().write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

    workbench.select_file(&path).await.unwrap();
    workbench.select_preset(PresetId::Table);
    workbench.submit().unwrap();
    workbench.settle().await;

    assert_eq!(workbench.phase(), SessionPhase::Succeeded);
    let rendered = workbench.view().result.unwrap();
    assert_eq!(
        rendered.plain_text(),
        format!("Receipt\n4 bytes\n{}", PresetId::Table.canonical_text())
    );
    assert!(rendered.markup().starts_with("<h3>Receipt</h3>"));
}

#[tokio::test]
async fn test_server_oom() {
    let url = spawn_backend().await;
    let mut workbench = workbench(&url);

    workbench.select_bytes("big.png", Some("image/png"), vec![0; 64]).unwrap();
    workbench.set_prompt("oom");
    workbench.submit();
    workbench.settle().await;

    let (message, kind) = workbench.state().error().unwrap();
    assert!(message.starts_with("CUDA out of memory"));
    assert_eq!(kind, FailureKind::Backend);
    assert!(workbench.take_notices().iter().any(|n| n.message == OOM_NOTICE));
}

#[tokio::test]
async fn test_clear_cache_and_export() {
    let url = spawn_backend().await;
    let mut workbench = workbench(&url);

    assert!(workbench.clear_cache());
    workbench.settle().await;
    assert!(!workbench.is_clearing());

    let dir = tempfile::tempdir().unwrap();
    let path = workbench.export(&DirectorySink::new(dir.path())).await.unwrap();
    let saved: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(saved["full_text"], "Receipt");

    // Empty prompt_used yields no prompt notice
    let messages: Vec<String> = workbench.take_notices().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["GPU memory cleared successfully", "JSON file downloaded"]);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut workbench = workbench(&format!("http://{}", addr));
    workbench.select_bytes("a.webp", None, vec![1, 2]).unwrap();
    workbench.submit();
    workbench.settle().await;

    assert_eq!(workbench.state().error(), Some((TRANSPORT_MESSAGE, FailureKind::Transport)));
}
