//! # Configuration Surface
//!
//! [`SolverConfig`] collects every cost/range/timing knob the solver
//! recognizes, with the defaults from the cost model. Construct one with
//! [`SolverConfig::new`] for library use, or load overrides from a TOML file
//! with [`SolverConfig::load_overrides`] (e.g. from a CLI driver) and apply
//! them with [`SolverConfig::merge`].
//!
//! `bpm` has no universal default — it is required to convert
//! `rest_after_beats` into seconds for the long-rest shift discount — so it
//! is always supplied explicitly via `new`, never silently defaulted by a
//! config file overlay.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::types::{cartesian_shapes, default_finger_base_cost, default_preferred_finger_by_delta, HandShape};

/// All recognized solver knobs. See `SPEC_FULL.md` §6.2 for the ambient
/// config-loading story.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub bpm: f64,

    pub max_stop_semitones: i32,
    pub max_anchor: i32,

    pub finger2_offsets: Vec<i32>,
    pub finger3_offsets: Vec<i32>,
    pub finger4_offsets: Vec<i32>,

    pub shift_event_cost: f64,
    pub shift_cost_per_semitone: f64,

    pub adjacent_string_cross_cost: f64,
    pub skip_string_cross_cost: f64,

    pub anchor_linear_cost: f64,
    pub anchor_quadratic_cost: f64,
    pub stop_cost_per_semitone: f64,

    pub finger_change_cost: f64,

    pub same_finger_repeat_penalty: f64,
    pub same_finger_repeat_cross_string_same_place_penalty: f64,

    pub shape_change_cost_per_semitone: f64,
    pub used_finger_retarget_cost_per_semitone: f64,

    pub finger_base_cost: HashMap<u8, f64>,

    pub preferred_finger_by_delta: HashMap<i32, u8>,
    pub preferred_finger_bonus: f64,
    pub nonpreferred_finger_penalty: f64,

    pub open_string_note_cost: f64,

    pub unsettled_shift_penalty: f64,
    pub settled_shift_bonus: f64,

    pub long_rest_threshold_sec: f64,
    pub long_rest_shift_multiplier: f64,
    pub min_shift_event_cost_after_long_rest: f64,

    /// Preserves the feasibility-gate computation site without enforcing it
    /// by default (spec.md §9, "dead feasibility check"). Flip on to discard
    /// transitions whose `required_sec` exceeds `avail_sec_sentinel + time_slack_sec`.
    pub enforce_timing_feasibility: bool,
    pub shift_speed_semitones_per_sec: f64,
    pub open_string_shift_speed_multiplier: f64,
    pub rest_shift_speed_multiplier: f64,
    pub adjacent_string_cross_time_sec: f64,
    pub skip_string_cross_time_sec: f64,
    pub time_slack_sec: f64,
    pub avail_sec_sentinel: f64,
}

impl SolverConfig {
    /// A config with every default from spec.md §4.3/§6 except `bpm`, which
    /// the caller must always supply.
    pub fn new(bpm: f64) -> Self {
        Self { bpm, ..Self::defaults() }
    }

    fn defaults() -> Self {
        Self {
            bpm: 120.0,
            max_stop_semitones: 29,
            max_anchor: 29,
            finger2_offsets: vec![1, 2],
            finger3_offsets: vec![3, 4],
            finger4_offsets: vec![5, 6],
            shift_event_cost: 0.30,
            shift_cost_per_semitone: 0.02,
            adjacent_string_cross_cost: 0.2,
            skip_string_cross_cost: 1.0,
            anchor_linear_cost: 0.0,
            anchor_quadratic_cost: 0.0,
            stop_cost_per_semitone: 0.01,
            finger_change_cost: 0.08,
            same_finger_repeat_penalty: 0.5,
            same_finger_repeat_cross_string_same_place_penalty: 0.1,
            shape_change_cost_per_semitone: 0.2,
            used_finger_retarget_cost_per_semitone: 0.12,
            finger_base_cost: default_finger_base_cost(),
            preferred_finger_by_delta: default_preferred_finger_by_delta(),
            preferred_finger_bonus: -0.20,
            nonpreferred_finger_penalty: 1.00,
            open_string_note_cost: 0.1,
            unsettled_shift_penalty: 0.35,
            settled_shift_bonus: 0.0,
            long_rest_threshold_sec: 2.0,
            long_rest_shift_multiplier: 0.10,
            min_shift_event_cost_after_long_rest: 0.02,
            enforce_timing_feasibility: false,
            shift_speed_semitones_per_sec: 0.0,
            open_string_shift_speed_multiplier: 1.7,
            rest_shift_speed_multiplier: 1.4,
            adjacent_string_cross_time_sec: 0.0,
            skip_string_cross_time_sec: 0.0,
            time_slack_sec: 0.0,
            avail_sec_sentinel: 100.0,
        }
    }

    /// Seconds per beat at this config's `bpm`.
    pub fn sec_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// The hand-shape catalogue: the Cartesian product of the three offset
    /// tuples (spec.md §3).
    pub fn shapes(&self) -> Vec<HandShape> {
        cartesian_shapes(&self.finger2_offsets, &self.finger3_offsets, &self.finger4_offsets)
    }

    /// Parse a TOML overlay of (a subset of) these knobs. `bpm` is accepted
    /// here too for CLI convenience, but library callers should prefer
    /// passing it to [`SolverConfig::new`] explicitly.
    pub fn load_overrides(path: &Path) -> Result<ConfigOverrides, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&text).map_err(ConfigError::Toml)
    }

    /// Apply a parsed overlay onto this config, replacing only the fields
    /// the overlay set.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        macro_rules! apply {
            ($field:ident) => {
                if let Some(value) = overrides.$field {
                    self.$field = value;
                }
            };
        }
        apply!(bpm);
        apply!(max_stop_semitones);
        apply!(max_anchor);
        apply!(finger2_offsets);
        apply!(finger3_offsets);
        apply!(finger4_offsets);
        apply!(shift_event_cost);
        apply!(shift_cost_per_semitone);
        apply!(adjacent_string_cross_cost);
        apply!(skip_string_cross_cost);
        apply!(anchor_linear_cost);
        apply!(anchor_quadratic_cost);
        apply!(stop_cost_per_semitone);
        apply!(finger_change_cost);
        apply!(same_finger_repeat_penalty);
        apply!(same_finger_repeat_cross_string_same_place_penalty);
        apply!(shape_change_cost_per_semitone);
        apply!(used_finger_retarget_cost_per_semitone);
        apply!(preferred_finger_bonus);
        apply!(nonpreferred_finger_penalty);
        apply!(open_string_note_cost);
        apply!(unsettled_shift_penalty);
        apply!(settled_shift_bonus);
        apply!(long_rest_threshold_sec);
        apply!(long_rest_shift_multiplier);
        apply!(min_shift_event_cost_after_long_rest);
        apply!(enforce_timing_feasibility);
        self
    }
}

/// A partial, TOML-deserialized overlay of [`SolverConfig`]. Every field is
/// optional; only fields present in the file override the base config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub bpm: Option<f64>,
    pub max_stop_semitones: Option<i32>,
    pub max_anchor: Option<i32>,
    pub finger2_offsets: Option<Vec<i32>>,
    pub finger3_offsets: Option<Vec<i32>>,
    pub finger4_offsets: Option<Vec<i32>>,
    pub shift_event_cost: Option<f64>,
    pub shift_cost_per_semitone: Option<f64>,
    pub adjacent_string_cross_cost: Option<f64>,
    pub skip_string_cross_cost: Option<f64>,
    pub anchor_linear_cost: Option<f64>,
    pub anchor_quadratic_cost: Option<f64>,
    pub stop_cost_per_semitone: Option<f64>,
    pub finger_change_cost: Option<f64>,
    pub same_finger_repeat_penalty: Option<f64>,
    pub same_finger_repeat_cross_string_same_place_penalty: Option<f64>,
    pub shape_change_cost_per_semitone: Option<f64>,
    pub used_finger_retarget_cost_per_semitone: Option<f64>,
    pub preferred_finger_bonus: Option<f64>,
    pub nonpreferred_finger_penalty: Option<f64>,
    pub open_string_note_cost: Option<f64>,
    pub unsettled_shift_penalty: Option<f64>,
    pub settled_shift_bonus: Option<f64>,
    pub long_rest_threshold_sec: Option<f64>,
    pub long_rest_shift_multiplier: Option<f64>,
    pub min_shift_event_cost_after_long_rest: Option<f64>,
    pub enforce_timing_feasibility: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[source] toml::de::Error),
}
