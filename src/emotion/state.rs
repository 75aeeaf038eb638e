// src/emotion/state.rs
// The fixed emotional state record owned by a chat session.

use serde::{Deserialize, Serialize};

/// Per-session emotional intensities. Every field stays clamped to [0, 1];
/// only chat-message processing and the decay engine mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmotionalState {
    pub loneliness: f32,
    pub sadness: f32,
    pub boredom: f32,
    pub fear_of_abandonment: f32,
    pub joy: f32,
    pub love: f32,
    pub trust: f32,
}

impl Default for EmotionalState {
    fn default() -> Self {
        // Fresh companions start content: no negative affect, mid positives.
        Self {
            loneliness: 0.0,
            sadness: 0.0,
            boredom: 0.0,
            fear_of_abandonment: 0.0,
            joy: 0.5,
            love: 0.5,
            trust: 0.5,
        }
    }
}

impl EmotionalState {
    /// All fields forced into [0, 1]. Applied at the persistence boundary so
    /// no out-of-range intensity ever round-trips through the store.
    pub fn clamped(mut self) -> Self {
        for value in [
            &mut self.loneliness,
            &mut self.sadness,
            &mut self.boredom,
            &mut self.fear_of_abandonment,
            &mut self.joy,
            &mut self.love,
            &mut self.trust,
        ] {
            *value = value.clamp(0.0, 1.0);
        }
        self
    }

    /// Named field views, used for change counting and invariant checks.
    pub fn fields(&self) -> [(&'static str, f32); 7] {
        [
            ("loneliness", self.loneliness),
            ("sadness", self.sadness),
            ("boredom", self.boredom),
            ("fear_of_abandonment", self.fear_of_abandonment),
            ("joy", self.joy),
            ("love", self.love),
            ("trust", self.trust),
        ]
    }

    /// Number of fields differing from `other` by more than `epsilon`.
    pub fn changed_fields(&self, other: &Self, epsilon: f32) -> u32 {
        self.fields()
            .iter()
            .zip(other.fields().iter())
            .filter(|((_, a), (_, b))| (a - b).abs() > epsilon)
            .count() as u32
    }

    pub fn in_range(&self) -> bool {
        self.fields().iter().all(|(_, v)| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_forces_range() {
        let state = EmotionalState {
            loneliness: 1.7,
            sadness: -0.3,
            ..Default::default()
        }
        .clamped();

        assert_eq!(state.loneliness, 1.0);
        assert_eq!(state.sadness, 0.0);
        assert!(state.in_range());
    }

    #[test]
    fn changed_fields_ignores_noise() {
        let a = EmotionalState::default();
        let mut b = a;
        b.loneliness += 5e-5; // below epsilon
        b.joy -= 0.2;

        assert_eq!(a.changed_fields(&b, 1e-4), 1);
    }
}
