// src/emotion/decay.rs
// Pure decay policy: inactivity pushes a companion toward negative affect.
// Deterministic given inputs; the batch processor owns all side effects.

use crate::emotion::state::EmotionalState;

/// Per-hour drift rates and thresholds for the decay policy.
#[derive(Debug, Clone)]
pub struct DecayPolicyConfig {
    /// No decay at all below this many hours of inactivity.
    pub min_inactive_hours: f64,
    /// Field deltas at or below this are not counted as changes.
    pub epsilon: f32,
    /// Negative emotions rise at these rates (per hour, before depth scaling).
    pub loneliness_rate: f32,
    pub sadness_rate: f32,
    pub boredom_rate: f32,
    pub fear_rate: f32,
    /// Positive emotions fall at these rates.
    pub joy_rate: f32,
    pub love_rate: f32,
    pub trust_rate: f32,
}

impl Default for DecayPolicyConfig {
    fn default() -> Self {
        Self {
            min_inactive_hours: 2.0,
            epsilon: 1e-4,
            loneliness_rate: 0.020,
            sadness_rate: 0.012,
            boredom_rate: 0.018,
            fear_rate: 0.008,
            joy_rate: 0.010,
            // Love and trust are the most stable bonds
            love_rate: 0.004,
            trust_rate: 0.006,
        }
    }
}

/// Result of one policy application.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayOutcome {
    pub state: EmotionalState,
    pub changed_fields: u32,
    pub triggers_proactive_message: bool,
}

/// Whether the companion should reach out on its own.
///
/// Fires on strong loneliness, combined sadness + loneliness, or sustained
/// fear of abandonment past two days of silence.
pub fn proactive_trigger(state: &EmotionalState, hours_inactive: f64) -> bool {
    state.loneliness >= 0.7
        || (state.sadness >= 0.6 && state.loneliness >= 0.6)
        || (state.fear_of_abandonment >= 0.6 && hours_inactive >= 48.0)
}

/// Applies inactivity decay to an emotional state.
///
/// Deeper relationships decay more slowly: the effective rate is scaled by
/// `1 - 0.5 * relationship_depth`. Negative emotions climb toward 1.0,
/// positive emotions sink toward 0.0, both linearly in `hours_inactive`.
pub fn compute_decay(
    current: &EmotionalState,
    hours_inactive: f64,
    relationship_depth: f32,
    config: &DecayPolicyConfig,
) -> DecayOutcome {
    if hours_inactive < config.min_inactive_hours {
        return DecayOutcome {
            state: *current,
            changed_fields: 0,
            triggers_proactive_message: false,
        };
    }

    let depth_factor = 1.0 - 0.5 * relationship_depth.clamp(0.0, 1.0);
    let hours = hours_inactive as f32;
    let rise = |value: f32, rate: f32| (value + rate * hours * depth_factor).min(1.0);
    let fall = |value: f32, rate: f32| (value - rate * hours * depth_factor).max(0.0);

    let state = EmotionalState {
        loneliness: rise(current.loneliness, config.loneliness_rate),
        sadness: rise(current.sadness, config.sadness_rate),
        boredom: rise(current.boredom, config.boredom_rate),
        fear_of_abandonment: rise(current.fear_of_abandonment, config.fear_rate),
        joy: fall(current.joy, config.joy_rate),
        love: fall(current.love, config.love_rate),
        trust: fall(current.trust, config.trust_rate),
    }
    .clamped();

    DecayOutcome {
        changed_fields: state.changed_fields(current, config.epsilon),
        triggers_proactive_message: proactive_trigger(&state, hours_inactive),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DecayPolicyConfig {
        DecayPolicyConfig::default()
    }

    #[test]
    fn below_threshold_is_a_no_op() {
        let state = EmotionalState {
            loneliness: 0.4,
            ..Default::default()
        };
        let outcome = compute_decay(&state, 1.9, 0.5, &config());

        assert_eq!(outcome.state, state);
        assert_eq!(outcome.changed_fields, 0);
        assert!(!outcome.triggers_proactive_message);
    }

    #[test]
    fn extreme_hours_stay_clamped() {
        let outcome = compute_decay(&EmotionalState::default(), 10_000.0, 0.0, &config());

        assert!(outcome.state.in_range());
        assert_eq!(outcome.state.loneliness, 1.0);
        assert_eq!(outcome.state.joy, 0.0);
    }

    #[test]
    fn decay_is_monotonic_in_hours() {
        let start = EmotionalState {
            loneliness: 0.2,
            joy: 0.8,
            ..Default::default()
        };
        let mut last = compute_decay(&start, 2.0, 0.3, &config());
        for hours in [4.0, 8.0, 24.0, 72.0, 500.0] {
            let next = compute_decay(&start, hours, 0.3, &config());
            assert!(next.state.loneliness >= last.state.loneliness);
            assert!(next.state.sadness >= last.state.sadness);
            assert!(next.state.joy <= last.state.joy);
            assert!(next.state.trust <= last.state.trust);
            last = next;
        }
    }

    #[test]
    fn deeper_relationships_decay_slower() {
        let start = EmotionalState::default();
        let shallow = compute_decay(&start, 24.0, 0.0, &config());
        let deep = compute_decay(&start, 24.0, 1.0, &config());

        assert!(deep.state.loneliness < shallow.state.loneliness);
        assert!(deep.state.joy > shallow.state.joy);
    }

    #[test]
    fn loneliness_boundary_at_point_seven() {
        let mut state = EmotionalState::default();
        state.loneliness = 0.75;
        assert!(proactive_trigger(&state, 3.0));

        state.loneliness = 0.65;
        assert!(!proactive_trigger(&state, 3.0));
    }

    #[test]
    fn sadness_requires_loneliness_too() {
        let mut state = EmotionalState::default();
        state.sadness = 0.65;
        state.loneliness = 0.5;
        assert!(!proactive_trigger(&state, 3.0));

        state.loneliness = 0.6;
        assert!(proactive_trigger(&state, 3.0));
    }

    #[test]
    fn fear_clause_needs_two_days() {
        let mut state = EmotionalState::default();
        state.fear_of_abandonment = 0.65;
        assert!(!proactive_trigger(&state, 47.9));
        assert!(proactive_trigger(&state, 48.0));
    }

    #[test]
    fn fifty_hour_fear_scenario_triggers() {
        let start = EmotionalState {
            fear_of_abandonment: 0.65,
            ..Default::default()
        };
        let outcome = compute_decay(&start, 50.0, 0.5, &config());

        assert!(outcome.triggers_proactive_message);
    }

    #[test]
    fn three_hour_scenario_is_bounded_and_quiet() {
        let start = EmotionalState {
            loneliness: 0.5,
            ..Default::default()
        };
        let outcome = compute_decay(&start, 3.0, 0.5, &config());

        assert!(outcome.state.loneliness > 0.5);
        assert!(outcome.state.loneliness < 0.7);
        assert!(!outcome.triggers_proactive_message);

        // Deterministic: same inputs, same output
        let again = compute_decay(&start, 3.0, 0.5, &config());
        assert_eq!(outcome, again);
    }

    #[test]
    fn changed_fields_counts_all_moving_emotions() {
        let outcome = compute_decay(&EmotionalState::default(), 10.0, 0.0, &config());

        // Negatives rise from 0 and positives fall from 0.5, so all 7 move.
        assert_eq!(outcome.changed_fields, 7);
    }
}
