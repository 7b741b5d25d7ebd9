//! # Dynamic-Programming Solver
//!
//! Runs a layered best-cost search across successive notes. Layer `i` maps
//! [`DpKey`] (a [`State`] plus history bits) to its best cost so far, plus a
//! predecessor map for backtracking. See spec.md §4.4 for the algorithm and
//! §9 for the determinism and duplicate-key requirements this
//! implementation preserves.
//!
//! Layers are kept as `Vec<(DpKey, f64)>` with a `HashMap<DpKey, usize>`
//! index into that vector, rather than iterating a `HashMap` directly, so
//! relaxation visits keys in a fixed (insertion) order and `total_cost`
//! accumulates identically across runs — `HashMap`'s iteration order is not
//! itself stable, but insertion order here is, because every key is
//! produced from the same deterministic nested loop over `states_per_note`.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::SolverConfig;
use crate::cost::{note_cost, transition_cost};
use crate::enumerator::enumerate_states;
use crate::error::SolverError;
use crate::normalizer::{normalize, InputEvent};
use crate::shaper::{shape_output, SolveResult};
use crate::types::{DpKey, NoteRecord, State, NO_LAST_OFFSET};

/// Solve for the minimum-cost fingering plan across `events`.
///
/// Runs the full pipeline: normalize events into notes, enumerate playable
/// states per note, search the layered DP, and shape the result back into a
/// flat, render-ready event sequence.
pub fn solve(events: &[InputEvent], config: &SolverConfig) -> Result<SolveResult, SolverError> {
    let (notes, note_index_by_event) = normalize(events)?;
    debug!(note_count = notes.len(), "normalized events");

    if notes.is_empty() {
        return Ok(shape_output(events, &note_index_by_event, &[], &[], 0.0));
    }

    let states_per_note = enumerate_states(&notes, config)?;
    for (i, states) in states_per_note.iter().enumerate() {
        trace!(note_index = i, state_count = states.len(), "enumerated states");
    }

    let (path, total_cost) = run_dp(&notes, &states_per_note, config)?;
    Ok(shape_output(events, &note_index_by_event, &notes, &path, total_cost))
}

/// Derive the next `DpKey` from a predecessor key and the chosen current
/// state, applying the history-update rules of spec.md §4.3 ("History
/// update").
fn next_dp_key(prev_key: &DpKey, cur: State) -> DpKey {
    let anchor_changed = cur.anchor != prev_key.state.anchor;

    let next_settled = if anchor_changed {
        cur.is_anchor_note()
    } else {
        prev_key.settled || cur.is_anchor_note()
    };

    let (mut last_o2, mut last_o3, mut last_o4) = if anchor_changed {
        (NO_LAST_OFFSET, NO_LAST_OFFSET, NO_LAST_OFFSET)
    } else {
        (prev_key.last_o2, prev_key.last_o3, prev_key.last_o4)
    };

    match cur.finger {
        2 => last_o2 = cur.shape.o2,
        3 => last_o3 = cur.shape.o3,
        4 => last_o4 = cur.shape.o4,
        _ => {}
    }

    DpKey { state: cur, settled: next_settled, last_o2, last_o3, last_o4 }
}

fn initial_layer(states: &[State], config: &SolverConfig) -> Vec<(DpKey, f64)> {
    let mut layer: Vec<(DpKey, f64)> = Vec::new();
    let mut index: HashMap<DpKey, usize> = HashMap::new();

    for &state in states {
        let settled = state.is_anchor_note();
        let last_o2 = if state.finger == 2 { state.shape.o2 } else { NO_LAST_OFFSET };
        let last_o3 = if state.finger == 3 { state.shape.o3 } else { NO_LAST_OFFSET };
        let last_o4 = if state.finger == 4 { state.shape.o4 } else { NO_LAST_OFFSET };
        let key = DpKey { state, settled, last_o2, last_o3, last_o4 };
        let cost = note_cost(&state, config);

        // Duplicate keys can arise here (e.g. the same open-string state
        // offered once per anchor) but genuinely distinct keys sharing a
        // state must never be collapsed — see spec.md §9's open question.
        match index.get(&key) {
            Some(&pos) if layer[pos].1 <= cost => {}
            Some(&pos) => layer[pos].1 = cost,
            None => {
                index.insert(key, layer.len());
                layer.push((key, cost));
            }
        }
    }

    layer
}

fn run_dp(
    notes: &[NoteRecord],
    states_per_note: &[Vec<State>],
    config: &SolverConfig,
) -> Result<(Vec<DpKey>, f64), SolverError> {
    let mut layer = initial_layer(&states_per_note[0], config);

    let mut backptrs: Vec<HashMap<DpKey, Option<DpKey>>> = Vec::with_capacity(notes.len());
    backptrs.push(layer.iter().map(|(key, _)| (*key, None)).collect());

    for i in 1..notes.len() {
        let rest_after_prev = notes[i - 1].rest_after_beats;

        let mut next_layer: Vec<(DpKey, f64)> = Vec::new();
        let mut next_index: HashMap<DpKey, usize> = HashMap::new();
        let mut next_back: HashMap<DpKey, Option<DpKey>> = HashMap::new();

        for (prev_key, prev_cost) in &layer {
            for &cur_state in &states_per_note[i] {
                let tcost = transition_cost(prev_key, &cur_state, rest_after_prev, config);
                if !tcost.is_finite() {
                    continue;
                }

                let cur_key = next_dp_key(prev_key, cur_state);
                let total = prev_cost + tcost + note_cost(&cur_state, config);

                match next_index.get(&cur_key) {
                    // Strictly-less only: ties keep the existing predecessor.
                    Some(&pos) if next_layer[pos].1 <= total => {}
                    Some(&pos) => {
                        next_layer[pos].1 = total;
                        next_back.insert(cur_key, Some(*prev_key));
                    }
                    None => {
                        next_index.insert(cur_key, next_layer.len());
                        next_layer.push((cur_key, total));
                        next_back.insert(cur_key, Some(*prev_key));
                    }
                }
            }
        }

        trace!(note_index = i, live_keys = next_layer.len(), "relaxed dp layer");
        layer = next_layer;
        backptrs.push(next_back);
    }

    if layer.is_empty() {
        warn!("dynamic-programming search ended with an empty final layer");
        return Err(SolverError::NoFeasiblePath);
    }

    let (end_key, total_cost) = layer
        .into_iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).expect("costs are never NaN"))
        .expect("layer checked non-empty above");

    let mut path = Vec::with_capacity(notes.len());
    let mut cur = end_key;
    for i in (0..notes.len()).rev() {
        path.push(cur);
        match backptrs[i].get(&cur).copied().flatten() {
            Some(prev) => cur = prev,
            None => break,
        }
    }
    path.reverse();

    Ok((path, total_cost))
}
