use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const METHOD_OVERRIDE: &str = "x-http-method-override";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Stored items keyed by id. Each item is a JSON object with an `"id"` field.
pub type Db = Arc<RwLock<HashMap<Uuid, Map<String, Value>>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item).post(overridden_item),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/slow/{ms}", get(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A decoded request body: item fields plus the `_method` field, if any.
#[derive(Debug, Default, PartialEq)]
pub struct Payload {
    pub fields: Map<String, Value>,
    pub method_field: Option<String>,
}

/// Decode a JSON or form-emulated body. Form bodies use bracket keys and
/// wrap the item in `model`; both shapes yield the same fields.
pub fn decode_payload(headers: &HeaderMap, body: &[u8]) -> Result<Payload, StatusCode> {
    if body.is_empty() {
        return Ok(Payload::default());
    }

    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(FORM_CONTENT_TYPE));

    let mut root = if is_form {
        parse_form(body)
    } else {
        match serde_json::from_slice(body) {
            Ok(Value::Object(map)) => map,
            _ => return Err(StatusCode::BAD_REQUEST),
        }
    };

    let mut method_field = take_method(&mut root);
    let mut fields = if is_form {
        match root.remove("model") {
            Some(Value::Object(model)) => model,
            _ => Map::new(),
        }
    } else {
        root
    };
    if let Some(inner) = take_method(&mut fields) {
        method_field = Some(inner);
    }
    Ok(Payload { fields, method_field })
}

fn take_method(map: &mut Map<String, Value>) -> Option<String> {
    match map.remove("_method") {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn parse_form(body: &[u8]) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        let segments: Vec<&str> = key
            .split('[')
            .map(|s| s.trim_end_matches(']'))
            .collect();
        insert_path(&mut root, &segments, Value::String(value.into_owned()));
    }
    root
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.insert(first.to_string(), value);
        return;
    }
    if rest == [""] {
        let entry = map.entry(first.to_string()).or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.push(value);
        }
        return;
    }
    let entry = map.entry(first.to_string()).or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(nested) = entry {
        insert_path(nested, rest, value);
    }
}

/// The verb a POST really stands for: override header first, then `_method`.
fn effective_method(headers: &HeaderMap, payload: &Payload) -> Option<Method> {
    let raw = headers
        .get(METHOD_OVERRIDE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| payload.method_field.clone())?;
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).ok()
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Map<String, Value>>> {
    let items = db.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(
    State(db): State<Db>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Map<String, Value>>), StatusCode> {
    let payload = decode_payload(&headers, &body)?;
    let id = Uuid::new_v4();
    let mut item = payload.fields;
    item.insert("id".to_string(), Value::String(id.to_string()));
    db.write().await.insert(id, item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let items = db.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let payload = decode_payload(&headers, &body)?;
    apply_update(&db, id, payload.fields).await
}

async fn delete_item(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    remove_item(&db, id).await
}

/// POST on a single item, honoured only when it carries a method override.
async fn overridden_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let payload = decode_payload(&headers, &body)?;
    let method = effective_method(&headers, &payload);
    tracing::debug!(%id, method = ?method, "POST with method override");
    if method == Some(Method::PUT) {
        Ok(apply_update(&db, id, payload.fields).await?.into_response())
    } else if method == Some(Method::DELETE) {
        Ok(remove_item(&db, id).await?.into_response())
    } else {
        Err(StatusCode::METHOD_NOT_ALLOWED)
    }
}

async fn apply_update(db: &Db, id: Uuid, fields: Map<String, Value>) -> Result<Json<Map<String, Value>>, StatusCode> {
    let mut items = db.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in fields {
        if key != "id" {
            item.insert(key, value);
        }
    }
    Ok(Json(item.clone()))
}

async fn remove_item(db: &Db, id: Uuid) -> Result<StatusCode, StatusCode> {
    let mut items = db.write().await;
    items.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Reflect what arrived on the wire.
async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header_value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "method": method.as_str(),
        "override": header_value(METHOD_OVERRIDE),
        "content_type": header_value(header::CONTENT_TYPE.as_str()),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {code}")).into_response()
}

async fn slow(Path(ms): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "slept": ms }))
}
