//! # violin_fingering
//!
//! A dynamic-programming solver for left-hand violin fingering. Given a
//! monophonic sequence of notes and rests, it searches every playable
//! string/finger/hand-position combination for each note and returns the
//! sequence minimizing a cost model built from hand-position comfort,
//! string-crossing effort, finger repetition, and shift distance.
//!
//! ## Pipeline
//!
//! ```text
//! InputEvent list
//!   -> normalizer::normalize        (merge trailing rests, parse pitches)
//!   -> enumerator::enumerate_states (every playable fingering per note)
//!   -> solver::run_dp               (layered least-cost search)
//!   -> shaper::shape_output         (flatten back to original event order)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use violin_fingering::{solve, InputEvent, SolverConfig};
//!
//! let events = vec![
//!     InputEvent::Note { beats: 1.0, note: Some("A4".to_string()) },
//!     InputEvent::Rest { beats: 0.5 },
//! ];
//! let result = solve(&events, &SolverConfig::new(80.0)).unwrap();
//! assert_eq!(result.events.len(), 2);
//! ```
//!
//! ## Module Structure
//!
//! - [`error`] - Error types (`SolverError` variants)
//! - [`types`] (not public) - Core value types: `HandShape`, `State`, `DpKey`, `NoteRecord`
//! - [`config`] - `SolverConfig`, TOML overlay loading and merging
//! - [`normalizer`] - Event deserialization, pitch parsing, rest merging
//! - [`enumerator`] (not public) - Enumerate playable states per pitch
//! - [`cost`] (not public) - Per-note and transition cost functions
//! - [`solver`] - The dynamic-programming search (`solve`)
//! - [`shaper`] - Final output shaping (`FingeringItem`, `SolveResult`)

mod config;
mod cost;
mod enumerator;
mod error;
mod normalizer;
mod shaper;
mod solver;
mod types;

pub use config::{ConfigError, ConfigOverrides, SolverConfig};
pub use error::SolverError;
pub use normalizer::{parse_pitch, InputEvent};
pub use shaper::{FingeringItem, SolveResult};
pub use solver::solve;
pub use types::{HandShape, State, NUM_STRINGS, OPEN_MIDI, STRING_NAMES};
