//! # State Enumerator
//!
//! For a target MIDI pitch, generates every playable [`State`] across all
//! strings and all hand shapes in the config's catalogue, subject to the
//! range bounds in spec.md §3: `0 <= stop <= max_stop_semitones` and
//! `1 <= anchor <= max_anchor` for stopped fingers.
//!
//! States are deduplicated by `(string_idx, anchor, shape, finger)`. Open
//! strings are offered once per `(shape, anchor)` pair even though the sound
//! doesn't depend on anchor or shape — later transitions need to distinguish
//! which anchor/shape the hand was "parked" in while playing open (spec.md
//! §4.2).

use std::collections::HashSet;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::types::{HandShape, NoteRecord, State, NUM_STRINGS, OPEN_MIDI};

/// Every playable state for a single pitch, deduplicated.
pub fn states_for_pitch(pitch_midi: i32, config: &SolverConfig, shapes: &[HandShape]) -> Vec<State> {
    let mut states = Vec::new();
    let mut seen: HashSet<(usize, i32, HandShape, u8)> = HashSet::new();

    for string_idx in 0..NUM_STRINGS {
        let stop = pitch_midi - OPEN_MIDI[string_idx];
        if stop < 0 || stop > config.max_stop_semitones {
            continue;
        }

        if stop == 0 {
            for &shape in shapes {
                for anchor in 0..=config.max_anchor {
                    let key = (string_idx, anchor, shape, 0u8);
                    if seen.insert(key) {
                        states.push(State { string_idx, anchor, shape, finger: 0, stop, pitch_midi });
                    }
                }
            }
            continue;
        }

        for &shape in shapes {
            for finger in 1..=4u8 {
                let offset = if finger == 1 { 0 } else { shape.offset_for_finger(finger) };
                let anchor = stop - offset;
                if anchor < 1 || anchor > config.max_anchor {
                    continue;
                }
                let key = (string_idx, anchor, shape, finger);
                if seen.insert(key) {
                    states.push(State { string_idx, anchor, shape, finger, stop, pitch_midi });
                }
            }
        }
    }

    states
}

/// Enumerate states for every note, failing with [`SolverError::NoPlayableState`]
/// on the first pitch with no playable states.
pub fn enumerate_states(notes: &[NoteRecord], config: &SolverConfig) -> Result<Vec<Vec<State>>, SolverError> {
    let shapes = config.shapes();
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let states = states_for_pitch(note.pitch_midi, config, &shapes);
            if states.is_empty() {
                Err(SolverError::NoPlayableState { pitch_midi: note.pitch_midi, index })
            } else {
                Ok(states)
            }
        })
        .collect()
}
