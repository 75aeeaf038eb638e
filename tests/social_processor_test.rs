// tests/social_processor_test.rs
// Social environment seeding, interaction generation, partial-failure
// semantics, and age-based cleanup.

mod test_helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};

use ayuni::error::AyuniError;
use ayuni::social::types::{Initiator, Speaker};
use test_helpers::{seed_companion_session, setup_app, setup_app_with, FailingDialogGenerator};

#[tokio::test]
async fn initialize_seeds_contacts_once() {
    let app = setup_app().await;
    let (aei_id, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;

    assert!(app.state.social.initialize_social_environment(&aei_id).await.unwrap());
    let contacts = app.store.social.active_contacts(&aei_id).await.unwrap();
    assert_eq!(contacts.len(), 3);

    // Second call is a benign no-op
    assert!(!app.state.social.initialize_social_environment(&aei_id).await.unwrap());
    assert_eq!(app.store.social.active_contacts(&aei_id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn initialize_rejects_unknown_companion() {
    let app = setup_app().await;

    let err = app
        .state
        .social
        .initialize_social_environment("no-such-aei")
        .await
        .unwrap_err();
    assert!(matches!(err, AyuniError::NotFound { .. }));
}

#[tokio::test]
async fn single_pass_generates_and_persists_an_interaction() {
    let app = setup_app().await;
    let (aei_id, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;
    app.state.social.initialize_social_environment(&aei_id).await.unwrap();

    let outcome = app.state.social.process_single_aei(&aei_id).await.unwrap();
    assert_eq!(outcome.interactions_generated, 1);
    assert!(outcome.skipped_reason.is_none());

    let interactions = app.store.social.interactions_for_aei(&aei_id).await.unwrap();
    assert_eq!(interactions.len(), 1);

    let interaction = &interactions[0];
    assert_eq!(interaction.dialog_history.len(), 2);
    assert_eq!(interaction.dialog_history[0].speaker, Speaker::Contact);
    assert!(interaction.dialog_history[0].text.contains("Mika"));
    assert_eq!(interaction.aei_thoughts.as_deref(), Some("That was a nice chat."));
    assert!(!interaction.processed_for_emotions);
    assert!(matches!(
        interaction.initiated_by,
        Initiator::Companion | Initiator::Contact
    ));
}

#[tokio::test]
async fn companion_without_contacts_is_skipped() {
    let app = setup_app().await;
    let (aei_id, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;

    let outcome = app.state.social.process_single_aei(&aei_id).await.unwrap();
    assert_eq!(outcome.interactions_generated, 0);
    assert_eq!(outcome.skipped_reason, Some("no active contacts"));
}

#[tokio::test]
async fn missing_companion_is_not_found() {
    let app = setup_app().await;

    let err = app.state.social.process_single_aei("ghost").await.unwrap_err();
    assert!(matches!(err, AyuniError::NotFound { .. }));
}

#[tokio::test]
async fn provider_failure_is_partial_success_in_full_pass() {
    let app = setup_app_with(Arc::new(FailingDialogGenerator)).await;
    let (aei_a, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;
    let (aei_b, _) = seed_companion_session(&app.store, "Rei", 0.3, 1).await;
    app.state.social.initialize_social_environment(&aei_a).await.unwrap();
    app.state.social.initialize_social_environment(&aei_b).await.unwrap();

    let summary = app.state.social.process_all_aei_social().await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.interactions, 0);
    assert_eq!(summary.failures, 2);
    assert_eq!(app.store.social.interaction_count().await.unwrap(), 0);
}

#[tokio::test]
async fn full_pass_counts_generated_interactions() {
    let app = setup_app().await;
    let (aei_a, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;
    let (aei_b, _) = seed_companion_session(&app.store, "Rei", 0.3, 1).await;
    app.state.social.initialize_social_environment(&aei_a).await.unwrap();
    app.state.social.initialize_social_environment(&aei_b).await.unwrap();

    let summary = app.state.social.process_all_aei_social().await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.interactions, 2);
    assert_eq!(summary.failures, 0);
}

#[tokio::test]
async fn mark_processed_flips_the_flag() {
    let app = setup_app().await;
    let (aei_id, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;
    app.state.social.initialize_social_environment(&aei_id).await.unwrap();
    app.state.social.process_single_aei(&aei_id).await.unwrap();

    let interaction_id = app.store.social.interactions_for_aei(&aei_id).await.unwrap()[0]
        .id
        .clone();
    app.state.social.mark_interaction_processed(&interaction_id).await.unwrap();

    let interaction = app.store.social.get_interaction(&interaction_id).await.unwrap();
    assert!(interaction.processed_for_emotions);

    let err = app
        .state
        .social
        .mark_interaction_processed("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AyuniError::NotFound { .. }));
}

#[tokio::test]
async fn cleanup_deletes_only_stale_interactions() {
    let app = setup_app().await;
    let (aei_id, _) = seed_companion_session(&app.store, "Mika", 0.3, 1).await;
    app.state.social.initialize_social_environment(&aei_id).await.unwrap();
    let contact_id = app.store.social.active_contacts(&aei_id).await.unwrap()[0]
        .id
        .clone();

    let turns = vec![ayuni::social::types::DialogTurn {
        speaker: Speaker::Contact,
        text: "old news".into(),
    }];
    // Two stale rows, one fresh
    for days_ago in [45, 31] {
        app.store
            .social
            .insert_interaction(
                &aei_id,
                &contact_id,
                Initiator::Contact,
                &turns,
                None,
                Utc::now() - Duration::days(days_ago),
            )
            .await
            .unwrap();
    }
    let fresh_turns = vec![ayuni::social::types::DialogTurn {
        speaker: Speaker::Companion,
        text: "fresh chat".into(),
    }];
    app.store
        .social
        .insert_interaction(
            &aei_id,
            &contact_id,
            Initiator::Companion,
            &fresh_turns,
            None,
            Utc::now() - Duration::days(5),
        )
        .await
        .unwrap();

    let deleted = app.state.social.cleanup_old_interactions().await.unwrap();
    assert_eq!(deleted, 2);

    let remaining = app.store.social.interactions_for_aei(&aei_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].dialog_history[0].text, "fresh chat");
}
