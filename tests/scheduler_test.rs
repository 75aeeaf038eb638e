// tests/scheduler_test.rs
// Debounce and single-flight semantics of the job scheduler.

mod test_helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};

use ayuni::scheduler::{JobScheduler, JobType, RunReport};
use test_helpers::setup_store;

#[tokio::test]
async fn second_schedule_within_the_hour_is_refused() {
    let store = setup_store().await;
    let scheduler = JobScheduler::new(store, 60, 10);

    assert!(scheduler.schedule_decay_processing().await.unwrap());
    assert!(!scheduler.schedule_decay_processing().await.unwrap());
}

#[tokio::test]
async fn schedule_succeeds_again_after_the_window() {
    let store = setup_store().await;
    let scheduler = JobScheduler::new(store.clone(), 60, 10);

    assert!(scheduler.schedule_decay_processing().await.unwrap());

    // Age the recorded run past the debounce window
    store
        .settings
        .record_last_run(
            JobType::EmotionalDecay.as_str(),
            Utc::now() - Duration::minutes(61),
        )
        .await
        .unwrap();

    assert!(scheduler.schedule_decay_processing().await.unwrap());
}

#[tokio::test]
async fn lock_is_single_flight() {
    let store = setup_store().await;
    let scheduler = JobScheduler::new(store, 60, 10);

    assert!(scheduler.try_acquire(JobType::EmotionalDecay).await.unwrap());
    assert!(!scheduler.try_acquire(JobType::EmotionalDecay).await.unwrap());

    // A different job type is unaffected
    assert!(scheduler.try_acquire(JobType::SocialInteraction).await.unwrap());

    scheduler.release(JobType::EmotionalDecay).await.unwrap();
    assert!(scheduler.try_acquire(JobType::EmotionalDecay).await.unwrap());
}

#[tokio::test]
async fn stale_lock_is_reclaimable() {
    let store = setup_store().await;
    let scheduler = JobScheduler::new(store.clone(), 60, 10);

    // Plant a lock older than the stale window, as a crashed holder would
    let job = JobType::EmotionalDecay.as_str();
    store
        .settings
        .try_lock_job(job, Utc::now() - Duration::minutes(30), Utc::now())
        .await
        .unwrap();

    assert!(scheduler.try_acquire(JobType::EmotionalDecay).await.unwrap());
}

#[tokio::test]
async fn run_report_round_trips() {
    let store = setup_store().await;
    let scheduler = Arc::new(JobScheduler::new(store, 60, 10));

    assert!(scheduler.last_report(JobType::EmotionalDecay).await.unwrap().is_none());

    let report = RunReport {
        timestamp: Utc::now(),
        processed_aeis: 7,
        cleaned_interactions: 2,
        execution_time: 0.41,
    };
    scheduler.record_run(JobType::EmotionalDecay, &report).await.unwrap();

    let loaded = scheduler
        .last_report(JobType::EmotionalDecay)
        .await
        .unwrap()
        .expect("report stored");
    assert_eq!(loaded.processed_aeis, 7);
    assert_eq!(loaded.cleaned_interactions, 2);
}

#[tokio::test]
async fn overlapping_batches_refuse_to_double_apply() {
    // End to end: a held decay lock makes the processor a no-op
    let app = test_helpers::setup_app().await;
    test_helpers::seed_companion_session(&app.store, "Mika", 0.3, 10).await;

    assert!(app.state.scheduler.try_acquire(JobType::EmotionalDecay).await.unwrap());

    let summary = app.state.decay.process_all_eligible_sessions().await.unwrap();
    assert!(summary.already_running);
    assert_eq!(app.store.events.count_events().await.unwrap(), 0);

    // Once released, the batch proceeds normally
    app.state.scheduler.release(JobType::EmotionalDecay).await.unwrap();
    let summary = app.state.decay.process_all_eligible_sessions().await.unwrap();
    assert_eq!(summary.decayed, 1);
}
