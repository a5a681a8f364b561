use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use engine::persist::StorePaths;
use engine::{IndexBuilder, Stopwords};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_store(dir: &Path) {
    let mut builder = IndexBuilder::new(Stopwords::none());
    builder.add_document("doc0", "rust rust systems programming");
    builder.add_document("doc1", "learning rust");
    builder.add_document("doc2", "gardening weekly");
    builder.write_store(&StorePaths::new(dir.join("store"))).unwrap();

    fs::write(dir.join("stopwords.txt"), "").unwrap();
    fs::write(
        dir.join("urls.txt"),
        "doc0.html https://example.com/rust\ndoc1.html https://example.com/learn\n",
    )
    .unwrap();
}

fn app_for(dir: &Path) -> Router {
    server::build_app(
        dir.join("store").to_string_lossy().into_owned(),
        dir.join("stopwords.txt").to_string_lossy().into_owned(),
        dir.join("urls.txt").to_string_lossy().into_owned(),
    )
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_store(dir.path());

    let (status, json) = call(app_for(dir.path()), "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    let docs: Vec<&str> = results.iter().map(|r| r["doc"].as_str().unwrap()).collect();
    // doc0 mentions rust more heavily relative to its length than doc1
    assert_eq!(docs, vec!["doc0", "doc1"]);
    assert_eq!(results[0]["url"], "https://example.com/rust");
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn unmatched_query_returns_empty_results() {
    let dir = tempdir().unwrap();
    build_tiny_store(dir.path());

    let (status, json) = call(app_for(dir.path()), "/search?q=zebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_store_is_a_server_error() {
    let dir = tempdir().unwrap();
    build_tiny_store(dir.path());
    fs::remove_file(dir.path().join("store/vocabulary.txt")).unwrap();

    let (status, _) = call(app_for(dir.path()), "/search?q=rust").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let dir = tempdir().unwrap();
    build_tiny_store(dir.path());

    let app = app_for(dir.path());
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
