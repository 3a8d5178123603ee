use super::*;
use axum::{
    body::{self, Body},
    http::Request,
};
use shared::domain::Product;
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let api = ApiContext {
        storage: storage.clone(),
    };
    (build_router(Arc::new(AppState { api })), storage)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn seed(storage: &Storage, name: &str) -> Product {
    storage
        .create_product(&ProductDraft {
            name: name.into(),
            price: 20.0,
            description: "seeded".into(),
            stock: 8,
        })
        .await
        .expect("seed")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn list_returns_success_envelope_with_products() {
    let (app, storage) = test_app().await;
    let (status, body) = send(
        &app,
        Request::get("/productos").body(Body::empty()).expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["productos"], serde_json::json!([]));

    let lamp = seed(&storage, "Lamp").await;
    let (_, body) = send(
        &app,
        Request::get("/productos").body(Body::empty()).expect("request"),
    )
    .await;
    let envelope: ProductListResponse = serde_json::from_value(body).expect("envelope");
    assert_eq!(envelope.productos, Some(vec![lamp]));
}

#[tokio::test]
async fn create_returns_201_with_new_product() {
    let (app, storage) = test_app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/productos",
            serde_json::json!({
                "nombre": "Laptop Test",
                "precio": 999.99,
                "descripcion": "automated",
                "stock": 5
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["producto"]["nombre"], "Laptop Test");
    assert!(body["producto"]["id"].as_i64().is_some());
    assert!(
        body["producto"]["fecha_creacion"].as_str().is_some(),
        "created product carries its stored timestamp: {body}"
    );
    let listed = storage.list_products().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].stock, 5);
}

#[tokio::test]
async fn create_with_missing_fields_is_a_failure_envelope() {
    let (app, storage) = test_app().await;
    let (status, body) = send(
        &app,
        json_request("POST", "/productos", serde_json::json!({ "nombre": "Half" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(storage.list_products().await.expect("list").is_empty());
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let (app, storage) = test_app().await;
    let lamp = seed(&storage, "Lamp").await;
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/productos/{}", lamp.id),
            serde_json::json!({ "precio": 25.5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let stored = storage
        .get_product(lamp.id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(stored.price, 25.5);
    assert_eq!(stored.name, "Lamp");
    assert_eq!(stored.stock, 8);
}

#[tokio::test]
async fn update_with_empty_body_is_rejected() {
    let (app, storage) = test_app().await;
    let lamp = seed(&storage, "Lamp").await;
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/productos/{}", lamp.id),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_and_delete_unknown_product_are_not_found() {
    let (app, _storage) = test_app().await;
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/productos/99999",
            serde_json::json!({ "nombre": "Nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (status, body) = send(
        &app,
        Request::delete("/productos/99999")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_removes_product() {
    let (app, storage) = test_app().await;
    let lamp = seed(&storage, "Lamp").await;
    let (status, body) = send(
        &app,
        Request::delete(format!("/productos/{}", lamp.id))
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted");
    assert!(storage.list_products().await.expect("list").is_empty());
}
