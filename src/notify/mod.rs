// src/notify/mod.rs
// Fire-and-forget proactive message side effect. The decay processor calls
// this when a companion's state crosses a trigger threshold; delivery is the
// host app's concern.

use async_trait::async_trait;
use tracing::info;

use crate::emotion::EmotionalState;

#[async_trait]
pub trait ProactiveNotifier: Send + Sync {
    /// Request a companion-initiated message. Must not fail the batch:
    /// callers log and move on regardless of the result.
    async fn notify_proactive_message(
        &self,
        session_id: &str,
        aei_id: &str,
        state: &EmotionalState,
        hours_inactive: f64,
    ) -> anyhow::Result<()>;
}

/// Default notifier: records the trigger and nothing else. Useful until a
/// delivery channel is wired in, and as the quiet option for one-shot runs.
pub struct LoggingNotifier;

#[async_trait]
impl ProactiveNotifier for LoggingNotifier {
    async fn notify_proactive_message(
        &self,
        session_id: &str,
        aei_id: &str,
        state: &EmotionalState,
        hours_inactive: f64,
    ) -> anyhow::Result<()> {
        info!(
            "Proactive message trigger: session={} aei={} loneliness={:.2} after {:.1}h",
            session_id, aei_id, state.loneliness, hours_inactive
        );
        Ok(())
    }
}
