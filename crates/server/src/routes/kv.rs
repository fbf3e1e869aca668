//! `/kv/:key` handlers. Each one makes exactly one store call; no state of
//! its own.

use axum::{extract::{Path, State}, Json};
use serde::{Deserialize, Serialize};
use store::KvStore;
use tracing::debug;

use crate::errors::ApiError;
use crate::observability::{self, REQUEST_DURATION};
use crate::state::AppState;

#[derive(Serialize, Deserialize, Debug)]
pub struct ValueBody {
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Ack {
    pub ok: bool,
}

/// Upsert `key`. `PUT /kv/:key` with `{"value": ...}`.
pub async fn put_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<ValueBody>,
) -> Json<Ack> {
    let _timer = REQUEST_DURATION.with_label_values(&["put"]).start_timer();
    debug!(%key, "put");
    state.store.put(key, body.value);
    observability::OPERATIONS_TOTAL.with_label_values(&["put"]).inc();
    Json(Ack { ok: true })
}

pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let _timer = REQUEST_DURATION.with_label_values(&["get"]).start_timer();
    debug!(%key, "get");
    let res = state.store.get(&key);
    observability::record("get", &res);
    let value = res?;
    Ok(Json(Entry { key, value }))
}

/// Replace the value of an existing key; 404 if it was never stored.
pub async fn update_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<ValueBody>,
) -> Result<Json<Ack>, ApiError> {
    let _timer = REQUEST_DURATION.with_label_values(&["update"]).start_timer();
    debug!(%key, "update");
    let res = state.store.update(key, body.value);
    observability::record("update", &res);
    res?;
    Ok(Json(Ack { ok: true }))
}

/// Remove `key`, answering with the value it held.
pub async fn delete_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let _timer = REQUEST_DURATION.with_label_values(&["delete"]).start_timer();
    debug!(%key, "delete");
    let res = state.store.delete(&key);
    observability::record("delete", &res);
    let value = res?;
    Ok(Json(Entry { key, value }))
}
