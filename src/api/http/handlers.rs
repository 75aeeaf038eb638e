// src/api/http/handlers.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::state::AppState;

/// Liveness plus a cheap storage round-trip.
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let decay_events = app_state.store.events.count_events().await?;
    let interactions = app_state.store.social.interaction_count().await?;

    Ok(Json(json!({
        "status": "ok",
        "decay_events": decay_events,
        "interactions": interactions,
    })))
}
