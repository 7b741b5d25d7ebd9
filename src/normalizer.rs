//! # Event Normalizer
//!
//! Turns the caller's flat event list into [`NoteRecord`]s: runs of rests
//! following a note are folded into that note's `rest_after_beats`, and each
//! note's pitch text is parsed into a MIDI number.
//!
//! Tie merging happens upstream (the score parser's job, not this solver's —
//! see spec.md §4.1); by the time events reach [`normalize`], the input is
//! already monophonic and post-tie.
//!
//! ## Input Schema
//! Accepts either wire shape per event (spec.md §6):
//! - a tuple: `["N", 1.0, "C4"]` or `["R", 0.5]`
//! - a record: `{"type": "N", "beats": 1.0, "note": "C4"}`
//!
//! Any `type` tag outside `{N, R}` is preserved through deserialization and
//! only rejected here, with the offending event's index, so the error
//! carries the same location context as the rest of the solver's errors.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::SolverError;
use crate::types::NoteRecord;

/// One event from the caller: a sounded note or a rest.
///
/// `Unknown` preserves event tags outside `{N, R}` so [`normalize`] can
/// report them with their index rather than failing opaquely at the
/// deserialization layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Note { beats: f64, note: Option<String> },
    Rest { beats: f64 },
    Unknown { value: String },
}

impl<'de> Deserialize<'de> for InputEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EventVisitor;

        impl<'de> Visitor<'de> for EventVisitor {
            type Value = InputEvent;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an event tuple [type, beats, note?] or record {type, beats, note}")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<InputEvent, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let type_: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let beats: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let note: Option<String> = seq.next_element::<Option<String>>()?.flatten();
                Ok(build_event(&type_, beats, note))
            }

            fn visit_map<A>(self, mut map: A) -> Result<InputEvent, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut type_: Option<String> = None;
                let mut beats: Option<f64> = None;
                let mut note: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "type" => type_ = Some(map.next_value()?),
                        "beats" => beats = Some(map.next_value()?),
                        "note" => note = map.next_value()?,
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let type_ = type_.ok_or_else(|| de::Error::missing_field("type"))?;
                let beats = beats.ok_or_else(|| de::Error::missing_field("beats"))?;
                Ok(build_event(&type_, beats, note))
            }
        }

        deserializer.deserialize_any(EventVisitor)
    }
}

fn build_event(type_: &str, beats: f64, note: Option<String>) -> InputEvent {
    match type_ {
        "N" => InputEvent::Note { beats, note },
        "R" => InputEvent::Rest { beats },
        other => InputEvent::Unknown { value: other.to_string() },
    }
}

/// Letter -> semitone base, per spec.md §4.1.
fn note_letter_base(letter: char) -> Option<i32> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Parse a pitch string like `"A4"`, `"C#5"`, `"Bb3"`, `"F♯♯2"` into a MIDI
/// note number. `midi = 12*(octave+1) + (base + accidentals) mod 12`.
pub fn parse_pitch(text: &str) -> Result<i32, SolverError> {
    let invalid = || SolverError::InvalidNote { text: text.to_string() };
    let trimmed = text.trim();

    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    let base = note_letter_base(letter).ok_or_else(invalid)?;

    let mut acc = 0i32;
    let mut rest = chars.as_str();
    let mut accidental_count = 0;
    loop {
        let mut it = rest.chars();
        match it.next() {
            Some('#') | Some('♯') => {
                acc += 1;
                accidental_count += 1;
                rest = it.as_str();
            }
            Some('b') | Some('♭') => {
                acc -= 1;
                accidental_count += 1;
                rest = it.as_str();
            }
            _ => break,
        }
        if accidental_count > 2 {
            return Err(invalid());
        }
    }

    if rest.is_empty() {
        return Err(invalid());
    }
    let octave: i32 = rest.parse().map_err(|_| invalid())?;

    let semitone = (base + acc).rem_euclid(12);
    Ok(12 * (octave + 1) + semitone)
}

/// Normalize a raw event list into note records plus a side index from
/// original event position to note index (spec.md §4.1).
pub fn normalize(events: &[InputEvent]) -> Result<(Vec<NoteRecord>, HashMap<usize, usize>), SolverError> {
    let mut notes = Vec::new();
    let mut note_index_by_event = HashMap::new();

    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            InputEvent::Unknown { value } => {
                return Err(SolverError::UnknownEventType { value: value.clone(), index: i });
            }
            InputEvent::Rest { .. } => {
                i += 1;
            }
            InputEvent::Note { beats, note } => {
                let text = note.as_deref().unwrap_or("");
                let pitch_midi = parse_pitch(text)?;

                let mut rest_after = 0.0;
                let mut j = i + 1;
                while let Some(InputEvent::Rest { beats: rb }) = events.get(j) {
                    rest_after += rb;
                    j += 1;
                }

                note_index_by_event.insert(i, notes.len());
                notes.push(NoteRecord {
                    event_index: i,
                    note_name: text.to_string(),
                    pitch_midi,
                    duration_beats: *beats,
                    rest_after_beats: rest_after,
                    gap_beats: beats + rest_after,
                });

                i = j;
            }
        }
    }

    Ok((notes, note_index_by_event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_natural_note() {
        assert_eq!(parse_pitch("A4").unwrap(), 69);
        assert_eq!(parse_pitch("C4").unwrap(), 60);
    }

    #[test]
    fn parses_sharp_and_flat() {
        assert_eq!(parse_pitch("C#4").unwrap(), 61);
        assert_eq!(parse_pitch("Bb3").unwrap(), 58);
    }

    #[test]
    fn parses_unicode_accidentals_and_double_accidentals() {
        assert_eq!(parse_pitch("F♯4").unwrap(), parse_pitch("F#4").unwrap());
        assert_eq!(parse_pitch("C##4").unwrap(), parse_pitch("D4").unwrap());
    }

    #[test]
    fn rejects_malformed_note() {
        assert!(matches!(parse_pitch("H4"), Err(SolverError::InvalidNote { .. })));
        assert!(matches!(parse_pitch("C"), Err(SolverError::InvalidNote { .. })));
    }

    #[test]
    fn rejects_more_than_double_accidentals() {
        // Matches the original's `([#b]{0,2})` regex cap: a 3rd accidental
        // character makes the whole pitch text invalid, not a bigger offset.
        assert!(matches!(parse_pitch("C###4"), Err(SolverError::InvalidNote { .. })));
        assert!(matches!(parse_pitch("Dbbb3"), Err(SolverError::InvalidNote { .. })));
    }

    #[test]
    fn merges_trailing_rests_into_rest_after_beats() {
        let events = vec![
            InputEvent::Note { beats: 1.0, note: Some("C4".to_string()) },
            InputEvent::Rest { beats: 0.5 },
            InputEvent::Rest { beats: 0.25 },
            InputEvent::Note { beats: 1.0, note: Some("D4".to_string()) },
        ];
        let (notes, index) = normalize(&events).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].rest_after_beats, 0.75);
        assert_eq!(notes[0].gap_beats, 1.75);
        assert_eq!(notes[1].rest_after_beats, 0.0);
        assert_eq!(index[&0], 0);
        assert_eq!(index[&3], 1);
    }

    #[test]
    fn leading_rests_are_not_attached_to_any_note() {
        let events = vec![
            InputEvent::Rest { beats: 1.0 },
            InputEvent::Note { beats: 1.0, note: Some("C4".to_string()) },
        ];
        let (notes, index) = normalize(&events).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].event_index, 1);
        assert_eq!(index[&1], 0);
    }

    #[test]
    fn unknown_event_type_is_rejected_with_index() {
        let events = vec![
            InputEvent::Note { beats: 1.0, note: Some("C4".to_string()) },
            InputEvent::Unknown { value: "X".to_string() },
        ];
        let err = normalize(&events).unwrap_err();
        match err {
            SolverError::UnknownEventType { value, index } => {
                assert_eq!(value, "X");
                assert_eq!(index, 1);
            }
            other => panic!("expected UnknownEventType, got {other:?}"),
        }
    }
}
