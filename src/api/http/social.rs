// src/api/http/social.rs
// Admin actions for the social interaction processor.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::social::{AeiSocialOutcome, SocialRunSummary};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SocialRunResponse {
    pub message: String,
    pub summary: SocialRunSummary,
}

pub async fn process_all_social(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<SocialRunResponse>> {
    let summary = app_state.social.process_all_aei_social().await?;

    let message = if summary.already_running {
        "Social batch already running, nothing done".to_string()
    } else {
        format!(
            "Processed {} companions, {} interactions, {} failures",
            summary.processed, summary.interactions, summary.failures
        )
    };

    Ok(Json(SocialRunResponse { message, summary }))
}

pub async fn process_single_aei(
    State(app_state): State<Arc<AppState>>,
    Path(aei_id): Path<String>,
) -> ApiResult<Json<AeiSocialOutcome>> {
    let outcome = app_state.social.process_single_aei(&aei_id).await?;
    Ok(Json(outcome))
}

#[derive(Serialize)]
pub struct InitializeResponse {
    pub initialized: bool,
    pub message: String,
}

pub async fn initialize_environment(
    State(app_state): State<Arc<AppState>>,
    Path(aei_id): Path<String>,
) -> ApiResult<Json<InitializeResponse>> {
    let initialized = app_state.social.initialize_social_environment(&aei_id).await?;

    let message = if initialized {
        "Social environment created".to_string()
    } else {
        "Social environment already initialized".to_string()
    };

    Ok(Json(InitializeResponse {
        initialized,
        message,
    }))
}

#[derive(Serialize)]
pub struct CleanupResponse {
    pub deleted: u64,
}

pub async fn cleanup_interactions(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<CleanupResponse>> {
    let deleted = app_state.social.cleanup_old_interactions().await?;
    Ok(Json(CleanupResponse { deleted }))
}
