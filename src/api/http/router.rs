// src/api/http/router.rs
// HTTP router composition for the admin endpoints

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::{
    decay::{decay_statistics, most_affected_aeis, run_decay_now, schedule_decay_job},
    handlers::health_handler,
    social::{
        cleanup_interactions, initialize_environment, process_all_social, process_single_aei,
    },
};
use crate::state::AppState;

/// Admin router: batch triggers plus the analytics reads.
pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))

        // Decay batch
        .route("/admin/decay/run", post(run_decay_now))
        .route("/admin/decay/schedule", post(schedule_decay_job))
        .route("/admin/decay/statistics", get(decay_statistics))
        .route("/admin/decay/most-affected", get(most_affected_aeis))

        // Social batch
        .route("/admin/social/process-all", post(process_all_social))
        .route("/admin/social/process/{aei_id}", post(process_single_aei))
        .route("/admin/social/initialize/{aei_id}", post(initialize_environment))
        .route("/admin/social/cleanup", post(cleanup_interactions))

        .with_state(app_state)
}
