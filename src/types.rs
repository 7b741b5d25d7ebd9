//! # Core Data Types
//!
//! This module defines the value types the fingering solver operates on:
//! tuning constants, hand shapes, playable states, the DP search key, and
//! normalized note records.
//!
//! ## Type Hierarchy
//! ```text
//! NoteRecord (one per sounded note, post tie/rest merging)
//!   └── State (one per playable fingering for that note's pitch)
//!         ├── string_idx, anchor, shape, finger, stop, pitch_midi
//!         └── DpKey (State + history bits carried by the DP search)
//!               ├── settled: bool
//!               └── last_o2 / last_o3 / last_o4: i32 (-1 = unused since last shift)
//! ```
//!
//! ## Anchor vs. Stop
//! `anchor` is where the 1st finger would sit (the hand position); `stop` is
//! where the sounded pitch actually falls on the string. For fingers 2-4 the
//! two differ by the hand shape's offset for that finger; for finger 1 they
//! are equal; for finger 0 (open string) `stop` is always 0 and `anchor` is
//! irrelevant to the sound but still tracked for transition cost purposes.

use std::collections::HashMap;

/// Number of strings on the instrument.
pub const NUM_STRINGS: usize = 4;

/// Display names for each string, indexed the same as `OPEN_MIDI`.
pub const STRING_NAMES: [&str; NUM_STRINGS] = ["G", "D", "A", "E"];

/// Open-string MIDI pitch per string: G3=55, D4=62, A4=69, E5=76.
pub const OPEN_MIDI: [i32; NUM_STRINGS] = [55, 62, 69, 76];

/// Sentinel for "this finger has not been placed since the last anchor change".
pub const NO_LAST_OFFSET: i32 = -1;

/// Semitone offsets of fingers 2, 3, 4 above the anchor. Finger 1 is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandShape {
    pub o2: i32,
    pub o3: i32,
    pub o4: i32,
}

impl HandShape {
    /// Offset for a given finger (2, 3, or 4); 0 for fingers 0/1.
    pub fn offset_for_finger(&self, finger: u8) -> i32 {
        match finger {
            2 => self.o2,
            3 => self.o3,
            4 => self.o4,
            _ => 0,
        }
    }
}

/// A single playable fingering for one note: which string, where the hand
/// sits, which shape it holds, which finger stops the string, and the
/// resulting pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub string_idx: usize,
    pub anchor: i32,
    pub shape: HandShape,
    pub finger: u8,
    pub stop: i32,
    pub pitch_midi: i32,
}

impl State {
    pub fn string_name(&self) -> &'static str {
        STRING_NAMES[self.string_idx]
    }

    /// True if this is an "anchor note": finger 1 placed exactly at the anchor.
    pub fn is_anchor_note(&self) -> bool {
        self.finger == 1 && self.stop == self.anchor
    }

    pub fn delta_stop_minus_anchor(&self) -> i32 {
        self.stop - self.anchor
    }
}

/// The key the dynamic-programming search relaxes over: a `State` plus the
/// history bits needed to price the next transition (hand settlement since
/// the last shift, and each upper finger's last-used offset since then).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DpKey {
    pub state: State,
    pub settled: bool,
    pub last_o2: i32,
    pub last_o3: i32,
    pub last_o4: i32,
}

impl DpKey {
    pub fn last_offset_for_finger(&self, finger: u8) -> i32 {
        match finger {
            2 => self.last_o2,
            3 => self.last_o3,
            4 => self.last_o4,
            _ => NO_LAST_OFFSET,
        }
    }
}

/// A normalized sounded note: ties already merged upstream, with the total
/// rest span before the next note attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    pub event_index: usize,
    pub note_name: String,
    pub pitch_midi: i32,
    pub duration_beats: f64,
    pub rest_after_beats: f64,
    pub gap_beats: f64,
}

/// Build the Cartesian product of three offset catalogues into hand shapes.
pub(crate) fn cartesian_shapes(o2s: &[i32], o3s: &[i32], o4s: &[i32]) -> Vec<HandShape> {
    let mut shapes = Vec::with_capacity(o2s.len() * o3s.len() * o4s.len());
    for &o2 in o2s {
        for &o3 in o3s {
            for &o4 in o4s {
                shapes.push(HandShape { o2, o3, o4 });
            }
        }
    }
    shapes
}

/// Default preferred-finger-by-delta table, keyed by `stop - anchor`.
pub(crate) fn default_preferred_finger_by_delta() -> HashMap<i32, u8> {
    [(0, 1), (1, 2), (2, 2), (3, 3), (4, 3), (5, 4), (6, 4), (7, 4)]
        .into_iter()
        .collect()
}

/// Default per-finger base cost, indexed by finger (0=open .. 4).
pub(crate) fn default_finger_base_cost() -> HashMap<u8, f64> {
    [(0, 0.00), (1, 0.00), (2, 0.03), (3, 0.06), (4, 0.10)]
        .into_iter()
        .collect()
}
