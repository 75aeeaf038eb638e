// src/api/http/decay.rs
// Admin actions for the decay batch: run now, debounced scheduling, and the
// two reporting queries the analytics page reads.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::decay::DecayRunSummary;
use crate::state::AppState;
use crate::storage::sqlite::event_ops::{AffectedAei, DailyDecayStats};

#[derive(Serialize)]
pub struct DecayRunResponse {
    pub message: String,
    pub summary: DecayRunSummary,
}

pub async fn run_decay_now(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<DecayRunResponse>> {
    let summary = app_state.decay.process_all_eligible_sessions().await?;

    let message = if summary.already_running {
        "Decay batch already running, nothing done".to_string()
    } else {
        format!(
            "Processed {} sessions, {} decayed, {} triggers",
            summary.processed, summary.decayed, summary.triggered
        )
    };

    Ok(Json(DecayRunResponse { message, summary }))
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub scheduled: bool,
    pub message: String,
}

pub async fn schedule_decay_job(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduleResponse>> {
    let scheduled = app_state.scheduler.schedule_decay_processing().await?;

    let message = if scheduled {
        "Decay job scheduled".to_string()
    } else {
        "Decay job already scheduled within the last hour".to_string()
    };

    Ok(Json(ScheduleResponse { scheduled, message }))
}

#[derive(Deserialize)]
pub struct StatisticsQuery {
    pub days: Option<i64>,
}

pub async fn decay_statistics(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<StatisticsQuery>,
) -> ApiResult<Json<Vec<DailyDecayStats>>> {
    let days = params.days.unwrap_or(7).clamp(1, 365);
    let stats = app_state.decay.decay_statistics(days).await?;
    Ok(Json(stats))
}

#[derive(Deserialize)]
pub struct MostAffectedQuery {
    pub limit: Option<i64>,
}

pub async fn most_affected_aeis(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<MostAffectedQuery>,
) -> ApiResult<Json<Vec<AffectedAei>>> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let ranking = app_state.decay.most_affected_aeis(limit).await?;
    Ok(Json(ranking))
}
