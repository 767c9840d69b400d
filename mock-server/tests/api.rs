use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{Map, Value};
use tower::ServiceExt;

type Item = Map<String, Value>;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn form_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let resp = app().oneshot(empty_request("GET", "/items")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_item_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request("POST", "/items", r#"{"name":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item["name"], "Buy milk");
    assert!(item["id"].is_string());
}

#[tokio::test]
async fn create_item_from_form_body() {
    let resp = app()
        .oneshot(form_request("POST", "/items", "model%5Bname%5D=Buy+milk"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item["name"], "Buy milk");
}

#[tokio::test]
async fn create_item_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/items", "not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_item_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/items/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_item_bad_uuid_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/items/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- override ---

#[tokio::test]
async fn post_without_override_is_not_allowed() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/items/00000000-0000-0000-0000-000000000000",
            r#"{"name":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- echo / status ---

#[tokio::test]
async fn echo_reflects_method_headers_and_body() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-HTTP-Method-Override", "PUT")
        .body(r#"{"a":1}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["override"], "PUT");
    assert_eq!(echoed["content_type"], "application/json");
    assert_eq!(echoed["body"], r#"{"a":1}"#);
}

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(empty_request("GET", "/status/503")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"status 503");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/items", r#"{"name":"Walk dog","done":false}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    // list: should contain the one item
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/items"))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());

    // update: plain PUT, partial
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/items/{id}"), r#"{"done":true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Item = body_json(resp).await;
    assert_eq!(updated["name"], "Walk dog"); // unchanged
    assert_eq!(updated["done"], true);

    // update: POST with form body and `_method`
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "POST",
            &format!("/items/{id}"),
            "model%5Bname%5D=Walk+cat&model%5B_method%5D=PUT",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Item = body_json(resp).await;
    assert_eq!(updated["name"], "Walk cat");
    assert!(updated.get("_method").is_none());

    // delete: POST with override header
    let req = Request::builder()
        .method("POST")
        .uri(format!("/items/{id}"))
        .header("X-HTTP-Method-Override", "DELETE")
        .body(String::new())
        .unwrap();
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
