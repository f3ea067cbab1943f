mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::TestApp;

#[tokio::test]
async fn health_reports_memory_store() -> Result<()> {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/health", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_banner_lists_endpoints() -> Result<()> {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "NexGuild API");
    assert!(res.body["endpoints"]["protected"].as_array().is_some());
    Ok(())
}

#[tokio::test]
async fn spawned_binary_serves_health() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["store"], "memory");
    Ok(())
}
