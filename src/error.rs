//! # Error Types
//!
//! This module defines all error types for the violin fingering solver.
//!
//! All errors include enough location information (event index or pitch) to
//! let a caller report a precise problem back to the user.
//!
//! ## Usage
//! ```rust
//! use violin_fingering::{solve, SolverConfig, SolverError};
//!
//! let events = vec![];
//! match solve(&events, &SolverConfig::new(80.0)) {
//!     Ok(result) => println!("total cost: {}", result.total_cost),
//!     Err(SolverError::NoPlayableState { pitch_midi, index }) => {
//!         eprintln!("note {} (index {}) has no playable state", pitch_midi, index);
//!     }
//!     Err(e) => eprintln!("solve failed: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    /// A note's pitch text could not be parsed.
    ///
    /// # Example
    /// ```
    /// # use violin_fingering::SolverError;
    /// let err = SolverError::InvalidNote { text: "H4".to_string() };
    /// assert_eq!(err.to_string(), "Invalid note text: \"H4\"");
    /// ```
    #[error("Invalid note text: {text:?}")]
    InvalidNote { text: String },

    /// An input event carried a type tag other than "N" or "R".
    #[error("Unknown event type {value:?} at index {index}")]
    UnknownEventType { value: String, index: usize },

    /// No playable state satisfies the range bounds for this pitch.
    ///
    /// Recoverable by widening `max_stop_semitones`, `max_anchor`, or the
    /// hand-shape catalogue in `SolverConfig`.
    #[error("No playable state for pitch {pitch_midi} (note index {index}); widen max_stop_semitones/max_anchor/shapes")]
    NoPlayableState { pitch_midi: i32, index: usize },

    /// The dynamic-programming search ended with an empty final layer.
    ///
    /// Under the current design (no hard feasibility rejection by default)
    /// this can only happen if an upstream stage filtered all candidates.
    #[error("No feasible fingering path found across the score")]
    NoFeasiblePath,
}
