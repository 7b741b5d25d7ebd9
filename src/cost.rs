//! # Cost Model
//!
//! Additive cost function split into a per-note cost ([`note_cost`]), paid
//! once a state is chosen, and a transition cost ([`transition_cost`]), paid
//! between consecutive notes. See spec.md §4.3 for the full rationale behind
//! each term.

use crate::config::SolverConfig;
use crate::types::{DpKey, State, NO_LAST_OFFSET};

/// Per-note cost: biases toward easy, low positions and the stylistically
/// preferred finger for a given diatonic spacing.
pub fn note_cost(state: &State, config: &SolverConfig) -> f64 {
    if state.finger == 0 && state.stop == 0 {
        return config.open_string_note_cost;
    }

    let anchor = state.anchor as f64;
    let mut cost = anchor * config.anchor_linear_cost + anchor * anchor * config.anchor_quadratic_cost;
    cost += state.stop as f64 * config.stop_cost_per_semitone;
    cost += config.finger_base_cost.get(&state.finger).copied().unwrap_or(0.0);
    cost += finger_preference_cost(state.finger, state.delta_stop_minus_anchor(), config);
    cost
}

fn finger_preference_cost(finger: u8, delta: i32, config: &SolverConfig) -> f64 {
    if finger == 0 {
        return 0.0;
    }
    match config.preferred_finger_by_delta.get(&delta) {
        None => 0.0,
        Some(&preferred) if preferred == finger => config.preferred_finger_bonus,
        Some(_) => config.nonpreferred_finger_penalty,
    }
}

/// Transition cost between `prev_key` (carrying history) and `cur`, given
/// the rest span that preceded `cur`. Returns `f64::INFINITY` only when
/// `enforce_timing_feasibility` is on and the move can't physically be made
/// in time — off by default, per spec.md §4.3.6 and §9.
pub fn transition_cost(prev_key: &DpKey, cur: &State, rest_after_prev_beats: f64, config: &SolverConfig) -> f64 {
    let prev = &prev_key.state;
    let anchor_shift = (cur.anchor - prev.anchor).abs();
    let string_cross = (cur.string_idx as i32 - prev.string_idx as i32).abs();

    let mut cost = 0.0;

    // 1. String crossing.
    if string_cross <= 1 {
        cost += config.adjacent_string_cross_cost;
    } else {
        cost += (string_cross - 1) as f64 * config.skip_string_cross_cost;
    }

    // 2. Shape change with anchor held.
    if cur.anchor == prev.anchor && cur.shape != prev.shape {
        let dist = (cur.shape.o2 - prev.shape.o2).abs()
            + (cur.shape.o3 - prev.shape.o3).abs()
            + (cur.shape.o4 - prev.shape.o4).abs();
        cost += dist as f64 * config.shape_change_cost_per_semitone;
    }

    // 3. Per-finger retarget: moving a finger that was already placed
    //    elsewhere in this hand position.
    if cur.anchor == prev.anchor && matches!(cur.finger, 2 | 3 | 4) {
        let cur_offset = cur.shape.offset_for_finger(cur.finger);
        let prev_last = prev_key.last_offset_for_finger(cur.finger);
        if prev_last != NO_LAST_OFFSET && prev_last != cur_offset {
            cost += (prev_last - cur_offset).abs() as f64 * config.used_finger_retarget_cost_per_semitone;
        }
    }

    // 4. Finger change / repetition.
    if prev.finger != 0 && prev.finger == cur.finger && prev.pitch_midi != cur.pitch_midi {
        let same_place_cross_string = prev.string_idx != cur.string_idx
            && prev.anchor == cur.anchor
            && prev.shape == cur.shape
            && prev.stop == cur.stop;
        cost += if same_place_cross_string {
            config.same_finger_repeat_cross_string_same_place_penalty
        } else {
            config.same_finger_repeat_penalty
        };
    } else if prev.finger != cur.finger && prev.finger != 0 && cur.finger != 0 {
        cost += config.finger_change_cost;
    }

    // 5. Anchor shift.
    if anchor_shift > 0 {
        cost += if prev_key.settled {
            config.settled_shift_bonus
        } else {
            config.unsettled_shift_penalty
        };

        let rest_sec = rest_after_prev_beats * config.sec_per_beat();
        let shift_mult = if rest_sec >= config.long_rest_threshold_sec {
            config.long_rest_shift_multiplier
        } else {
            1.0
        };

        let mut event_cost = config.shift_event_cost * shift_mult;
        if shift_mult < 1.0 {
            event_cost = event_cost.max(config.min_shift_event_cost_after_long_rest);
        }
        cost += event_cost;
        cost += anchor_shift as f64 * config.shift_cost_per_semitone * shift_mult;
    }

    // 6. Feasibility hook — computed always, enforced only when requested.
    if config.enforce_timing_feasibility {
        let required_sec = required_time_sec(prev, cur, rest_after_prev_beats, config);
        if required_sec > config.avail_sec_sentinel + config.time_slack_sec {
            return f64::INFINITY;
        }
    }

    cost
}

/// The inert feasibility computation from spec.md §4.3.6. Preserved so the
/// `enforce_timing_feasibility` switch has something real to gate on, but
/// never consulted unless that switch is set.
fn required_time_sec(prev: &State, cur: &State, rest_after_prev_beats: f64, config: &SolverConfig) -> f64 {
    let anchor_shift = (cur.anchor - prev.anchor).abs() as f64;
    let string_cross = (cur.string_idx as i32 - prev.string_idx as i32).abs();

    let mut speed = config.shift_speed_semitones_per_sec;
    if prev.finger == 0 && prev.stop == 0 {
        speed *= config.open_string_shift_speed_multiplier;
    }
    if rest_after_prev_beats > 0.0 {
        speed *= config.rest_shift_speed_multiplier;
    }

    let cross_time = if string_cross <= 1 {
        string_cross as f64 * config.adjacent_string_cross_time_sec
    } else {
        config.adjacent_string_cross_time_sec + (string_cross - 1) as f64 * config.skip_string_cross_time_sec
    };

    anchor_shift / speed.max(1e-6) + cross_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandShape;

    fn open_a() -> State {
        State { string_idx: 2, anchor: 0, shape: HandShape { o2: 1, o3: 3, o4: 5 }, finger: 0, stop: 0, pitch_midi: 69 }
    }

    #[test]
    fn open_string_note_cost_is_flat() {
        let config = SolverConfig::new(80.0);
        assert_eq!(note_cost(&open_a(), &config), config.open_string_note_cost);
    }

    #[test]
    fn preferred_finger_gets_bonus() {
        let config = SolverConfig::new(80.0);
        // delta (stop - anchor) == 0 prefers finger 1, per the default table.
        let preferred = State { string_idx: 0, anchor: 5, shape: HandShape { o2: 1, o3: 3, o4: 5 }, finger: 1, stop: 5, pitch_midi: 60 };
        let nonpreferred = State { string_idx: 0, anchor: 5, shape: HandShape { o2: 1, o3: 3, o4: 5 }, finger: 2, stop: 5, pitch_midi: 60 };
        assert!(note_cost(&preferred, &config) < note_cost(&nonpreferred, &config));
    }

    #[test]
    fn long_rest_discounts_shift_cost() {
        let config = SolverConfig::new(80.0);
        let prev = DpKey {
            state: State { string_idx: 0, anchor: 5, shape: HandShape { o2: 1, o3: 3, o4: 5 }, finger: 1, stop: 5, pitch_midi: 60 },
            settled: true,
            last_o2: NO_LAST_OFFSET,
            last_o3: NO_LAST_OFFSET,
            last_o4: NO_LAST_OFFSET,
        };
        let cur = State { string_idx: 0, anchor: 17, shape: HandShape { o2: 1, o3: 3, o4: 5 }, finger: 1, stop: 17, pitch_midi: 72 };

        let short_rest = transition_cost(&prev, &cur, 0.5, &config);
        let long_rest = transition_cost(&prev, &cur, 100.0, &config);
        assert!(long_rest < short_rest);
    }

    #[test]
    fn cross_string_same_place_repeat_is_cheaper_than_generic_repeat() {
        let config = SolverConfig::new(80.0);
        let shape = HandShape { o2: 1, o3: 3, o4: 5 };
        let prev_state = State { string_idx: 0, anchor: 5, shape, finger: 2, stop: 6, pitch_midi: 61 };
        let prev = DpKey { state: prev_state, settled: false, last_o2: 1, last_o3: NO_LAST_OFFSET, last_o4: NO_LAST_OFFSET };

        let same_place_other_string = State { string_idx: 1, ..prev_state };
        let different_pitch_same_string = State { pitch_midi: 99, stop: 9, ..prev_state };

        let cheap = transition_cost(&prev, &same_place_other_string, 0.0, &config);
        let expensive = transition_cost(&prev, &different_pitch_same_string, 0.0, &config);
        assert!(cheap < expensive);
    }
}
