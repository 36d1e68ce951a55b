//! Route handlers.
//!
//! Handlers stay thin: extract, call the store, serialize. Extraction
//! failures are converted into [`ApiError`] so every rejection shares one
//! response shape.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::items::{Item, ItemId, ItemReceipt};

/// Query string accepted by `GET /items/{item_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ReadQuery {
    /// Accepted and logged, not used for lookup.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub items: usize,
}

/// `GET /items/{item_id}`: the stored item, or `null` when there is none.
pub async fn read_item(
    State(state): State<AppState>,
    item_id: Result<Path<ItemId>, PathRejection>,
    query: Result<Query<ReadQuery>, QueryRejection>,
) -> Result<Json<Option<Item>>, ApiError> {
    let Path(item_id) = item_id?;
    let q = query.ok().and_then(|Query(query)| query.q);

    let item = state.store.get(item_id);
    tracing::debug!(item_id, q = ?q, found = item.is_some(), "Read item");

    Ok(Json(item))
}

/// `PUT /items/{item_id}`: store the item, replacing any previous one.
///
/// A body without `Content-Type` is still decoded as JSON; an explicit
/// non-JSON content type is rejected.
pub async fn update_item(
    State(state): State<AppState>,
    item_id: Result<Path<ItemId>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ItemReceipt>, ApiError> {
    let Path(item_id) = item_id?;
    let body = body?;
    if !accepts_json(&headers) {
        return Err(ApiError::MalformedBody(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }
    let Json(item) = Json::<Item>::from_bytes(&body)?;

    let receipt = ItemReceipt::new(item_id, &item);
    state.store.put(item_id, item);
    tracing::debug!(item_id, item_name = %receipt.item_name, "Stored item");

    Ok(Json(receipt))
}

/// True when the content type is absent, `application/json` or `application/*+json`.
fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// `GET /health`: liveness, version and number of stored items.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        items: state.store.len(),
    })
}
