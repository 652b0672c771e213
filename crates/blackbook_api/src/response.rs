//! Success envelopes: `{"<key>": ...}` plus pagination metadata for lists.

use crate::error::ApiResult;
use axum::http::StatusCode;
use axum::Json;
use blackbook_core::{BlackBookError, Paginated};
use serde::Serialize;
use serde_json::{Map, Value};

pub type JsonResponse = (StatusCode, Json<Value>);

fn to_value<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|err| BlackBookError::Internal(format!("serialize response: {err}")).into())
}

fn envelope(entries: Vec<(&str, Value)>) -> Value {
    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Value::Object(map)
}

pub fn ok<T: Serialize>(key: &str, value: &T) -> ApiResult<JsonResponse> {
    Ok((StatusCode::OK, Json(envelope(vec![(key, to_value(value)?)]))))
}

pub fn created<T: Serialize>(key: &str, value: &T) -> ApiResult<JsonResponse> {
    Ok((
        StatusCode::CREATED,
        Json(envelope(vec![(key, to_value(value)?)])),
    ))
}

pub fn list<T: Serialize>(key: &str, items: &[T]) -> ApiResult<JsonResponse> {
    Ok((StatusCode::OK, Json(envelope(vec![(key, to_value(&items)?)]))))
}

pub fn page<T: Serialize>(key: &str, page: &Paginated<T>) -> ApiResult<JsonResponse> {
    Ok((
        StatusCode::OK,
        Json(envelope(vec![
            (key, to_value(&page.items)?),
            ("pagination", to_value(&page.meta())?),
        ])),
    ))
}
