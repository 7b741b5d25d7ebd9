//! # Output Shaper
//!
//! Walks the original event sequence and the solved DP path side by side,
//! producing the flat, render-ready [`FingeringItem`] list described in
//! spec.md §6. Rests pass through unchanged; notes are annotated with the
//! chosen [`State`](crate::types::State) and history bits from their
//! [`DpKey`](crate::types::DpKey).

use std::collections::HashMap;

use serde::Serialize;

use crate::normalizer::InputEvent;
use crate::types::{DpKey, NoteRecord};

/// One event in the shaped output: a rest, or a note carrying its full
/// chosen fingering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FingeringItem {
    R {
        duration_beats: f64,
    },
    N {
        note: String,
        pitch_midi: i32,
        duration_beats: f64,
        string: String,
        string_index: usize,
        finger: u8,
        anchor_semitones: i32,
        o2: i32,
        o3: i32,
        o4: i32,
        stop_semitones: i32,
        delta_stop_minus_anchor: i32,
        settled_since_last_shift: bool,
        last_o2_used: i32,
        last_o3_used: i32,
        last_o4_used: i32,
    },
}

/// The solver's full output: the chosen plan's total cost plus the
/// flattened, original-order event list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub total_cost: f64,
    pub events: Vec<FingeringItem>,
}

/// Rebuild the original event order, substituting each `N` event's fields
/// with its solved fingering and leaving `R` events untouched.
pub(crate) fn shape_output(
    events: &[InputEvent],
    note_index_by_event: &HashMap<usize, usize>,
    notes: &[NoteRecord],
    path: &[DpKey],
    total_cost: f64,
) -> SolveResult {
    let mut out = Vec::with_capacity(events.len());

    for (event_index, event) in events.iter().enumerate() {
        match event {
            InputEvent::Rest { beats } => out.push(FingeringItem::R { duration_beats: *beats }),
            InputEvent::Note { .. } => {
                let note_idx = note_index_by_event[&event_index];
                let note = &notes[note_idx];
                let key = &path[note_idx];
                let state = &key.state;
                out.push(FingeringItem::N {
                    note: note.note_name.clone(),
                    pitch_midi: note.pitch_midi,
                    duration_beats: note.duration_beats,
                    string: state.string_name().to_string(),
                    string_index: state.string_idx,
                    finger: state.finger,
                    anchor_semitones: state.anchor,
                    o2: state.shape.o2,
                    o3: state.shape.o3,
                    o4: state.shape.o4,
                    stop_semitones: state.stop,
                    delta_stop_minus_anchor: state.delta_stop_minus_anchor(),
                    settled_since_last_shift: key.settled,
                    last_o2_used: key.last_o2,
                    last_o3_used: key.last_o3,
                    last_o4_used: key.last_o4,
                });
            }
            InputEvent::Unknown { .. } => unreachable!("normalize() rejects unknown events before shaping"),
        }
    }

    SolveResult { total_cost, events: out }
}
