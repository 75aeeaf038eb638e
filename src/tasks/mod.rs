// src/tasks/mod.rs

//! Background task management for the periodic batch jobs.
//! Handles decay, social interactions, cleanup and metrics reporting.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, info};

use crate::state::AppState;

pub mod config;
pub mod metrics;

use config::TaskConfig;
use metrics::TaskMetrics;

/// Manages the interval loops behind the batch processors. Mutual exclusion
/// with admin-triggered runs comes from the job lock inside each processor,
/// not from anything here.
pub struct TaskManager {
    app_state: Arc<AppState>,
    config: TaskConfig,
    metrics: Arc<TaskMetrics>,
    handles: Vec<JoinHandle<()>>,
}

impl TaskManager {
    pub fn new(app_state: Arc<AppState>) -> Self {
        Self {
            app_state,
            config: TaskConfig::from_env(),
            metrics: Arc::new(TaskMetrics::new()),
            handles: Vec::new(),
        }
    }

    /// Starts all enabled background tasks
    pub fn start(&mut self) {
        info!("Starting background task manager");
        info!("{}", self.config.summary());

        if self.config.decay_enabled {
            let handle = self.spawn_decay_loop();
            self.handles.push(handle);
        }

        if self.config.social_enabled {
            let handle = self.spawn_social_loop();
            self.handles.push(handle);
        }

        if self.config.cleanup_enabled {
            let handle = self.spawn_cleanup_loop();
            self.handles.push(handle);
        }

        let handle = self.spawn_metrics_reporter();
        self.handles.push(handle);

        info!("Started {} background tasks", self.handles.len());
    }

    fn spawn_decay_loop(&self) -> JoinHandle<()> {
        let app_state = self.app_state.clone();
        let interval = self.config.decay_interval;
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            info!("Decay loop started (interval: {:?})", interval);
            let mut interval_timer = time::interval(interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                interval_timer.tick().await;
                match app_state.decay.process_all_eligible_sessions().await {
                    Ok(summary) if summary.already_running => {}
                    Ok(summary) => {
                        metrics.add_processed_items("decay", summary.decayed as usize);
                    }
                    Err(e) => {
                        metrics.record_error("decay");
                        error!("Decay loop pass failed: {e}");
                    }
                }
            }
        })
    }

    fn spawn_social_loop(&self) -> JoinHandle<()> {
        let app_state = self.app_state.clone();
        let interval = self.config.social_interval;
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            info!("Social loop started (interval: {:?})", interval);
            let mut interval_timer = time::interval(interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                interval_timer.tick().await;
                match app_state.social.process_all_aei_social().await {
                    Ok(summary) if summary.already_running => {}
                    Ok(summary) => {
                        metrics.add_processed_items("social", summary.interactions as usize);
                    }
                    Err(e) => {
                        metrics.record_error("social");
                        error!("Social loop pass failed: {e}");
                    }
                }
            }
        })
    }

    fn spawn_cleanup_loop(&self) -> JoinHandle<()> {
        let app_state = self.app_state.clone();
        let interval = self.config.cleanup_interval;
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            info!("Cleanup loop started (interval: {:?})", interval);
            let mut interval_timer = time::interval(interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                interval_timer.tick().await;
                match app_state.social.cleanup_old_interactions().await {
                    Ok(deleted) => {
                        metrics.add_processed_items("cleanup", deleted as usize);
                    }
                    Err(e) => {
                        metrics.record_error("cleanup");
                        error!("Cleanup pass failed: {e}");
                    }
                }
            }
        })
    }

    fn spawn_metrics_reporter(&self) -> JoinHandle<()> {
        let metrics = self.metrics.clone();
        let interval = self.config.metrics_interval;

        tokio::spawn(async move {
            let mut interval_timer = time::interval(interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                interval_timer.tick().await;
                metrics.report();
            }
        })
    }

    /// Aborts all running task loops.
    pub fn shutdown(&mut self) {
        info!("Shutting down {} background tasks", self.handles.len());
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
