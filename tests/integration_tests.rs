//! Integration tests for the violin fingering solver.
//!
//! Exercises the public API end to end: JSON event parsing, the solved
//! plan's structural invariants, and the seed scenarios from spec.md §8.

use violin_fingering::{solve, FingeringItem, InputEvent, SolverConfig};

fn events_from_json(json: &str) -> Vec<InputEvent> {
    serde_json::from_str(json).expect("valid event JSON")
}

#[test]
fn accepts_both_tuple_and_record_event_forms() {
    let tuple_form = events_from_json(r#"[["N", 1.0, "A4"]]"#);
    let record_form = events_from_json(r#"[{"type": "N", "beats": 1.0, "note": "A4"}]"#);

    let config = SolverConfig::new(80.0);
    let a = solve(&tuple_form, &config).unwrap();
    let b = solve(&record_form, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn a4_alone_is_optimally_open() {
    let events = events_from_json(r#"[["N", 1.0, "A4"]]"#);
    let result = solve(&events, &SolverConfig::new(80.0)).unwrap();

    assert_eq!(result.events.len(), 1);
    match &result.events[0] {
        FingeringItem::N { string, finger, stop_semitones, .. } => {
            assert_eq!(string, "A");
            assert_eq!(*finger, 0);
            assert_eq!(*stop_semitones, 0);
        }
        other => panic!("expected a note, got {other:?}"),
    }
    assert!((result.total_cost - 0.1).abs() < 1e-9);
}

#[test]
fn c_major_scale_stays_in_first_position_with_rising_string_crossings() {
    let events = events_from_json(
        r#"[["N",1,"C4"],["N",1,"D4"],["N",1,"E4"],["N",1,"F4"],
            ["N",1,"G4"],["N",1,"A4"],["N",1,"B4"],["N",1,"C5"]]"#,
    );
    let result = solve(&events, &SolverConfig::new(80.0)).unwrap();

    let notes: Vec<_> = result
        .events
        .iter()
        .map(|e| match e {
            FingeringItem::N { anchor_semitones, string_index, .. } => (*anchor_semitones, *string_index),
            _ => unreachable!(),
        })
        .collect();

    let anchors: Vec<i32> = notes.iter().map(|(a, _)| *a).collect();
    let max_anchor = *anchors.iter().max().unwrap();
    let min_anchor = *anchors.iter().min().unwrap();
    assert!(max_anchor - min_anchor <= 3, "scale should stay in first position: {anchors:?}");

    let strings: Vec<usize> = notes.iter().map(|(_, s)| *s).collect();
    let mut nondecreasing_runs = 0;
    for w in strings.windows(2) {
        if w[1] >= w[0] {
            nondecreasing_runs += 1;
        }
    }
    assert_eq!(nondecreasing_runs, strings.len() - 1, "string index should not decrease across a rising scale: {strings:?}");
}

#[test]
fn repeated_a4_pays_no_finger_or_shift_penalty() {
    let events = events_from_json(r#"[["N",1,"A4"],["N",1,"A4"]]"#);
    let result = solve(&events, &SolverConfig::new(80.0)).unwrap();
    let config = SolverConfig::new(80.0);

    // Both notes are open strings, so the only transition term that can fire
    // is the string-crossing cost (string_cross == 0, still "adjacent").
    let expected = 2.0 * config.open_string_note_cost + config.adjacent_string_cross_cost;
    assert!((result.total_cost - expected).abs() < 1e-9);
}

#[test]
fn long_rest_strictly_discounts_a_forced_shift() {
    let short = solve(
        &events_from_json(r#"[["N",1,"C4"],["R",0.5,null],["N",1,"C5"]]"#),
        &SolverConfig::new(80.0),
    )
    .unwrap();
    let long = solve(
        &events_from_json(r#"[["N",1,"C4"],["R",5,null],["N",1,"C5"]]"#),
        &SolverConfig::new(80.0),
    )
    .unwrap();
    assert!(long.total_cost < short.total_cost);
}

#[test]
fn emitted_notes_preserve_count_order_and_pitch() {
    let events = events_from_json(r#"[["N",1,"C4"],["R",0.5,null],["N",1,"E4"],["N",0.5,"G4"]]"#);
    let result = solve(&events, &SolverConfig::new(80.0)).unwrap();

    let notes: Vec<_> = result
        .events
        .iter()
        .filter(|e| matches!(e, FingeringItem::N { .. }))
        .collect();
    assert_eq!(notes.len(), 3);

    let pitches: Vec<i32> = notes
        .iter()
        .map(|e| match e {
            FingeringItem::N { pitch_midi, .. } => *pitch_midi,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(pitches, vec![60, 64, 67]);
}

#[test]
fn every_emitted_note_satisfies_the_fingering_invariants() {
    let events = events_from_json(
        r#"[["N",1,"C4"],["N",1,"D4"],["N",1,"E#4"],["N",1,"Gb4"],["R",2,null],["N",1,"C6"]]"#,
    );
    let config = SolverConfig::new(80.0);
    let result = solve(&events, &config).unwrap();

    for item in &result.events {
        if let FingeringItem::N {
            pitch_midi,
            string_index,
            finger,
            anchor_semitones,
            stop_semitones,
            delta_stop_minus_anchor,
            ..
        } = item
        {
            let open_midi = violin_fingering::OPEN_MIDI[*string_index];
            // Invariant 1.
            assert_eq!(*pitch_midi, open_midi + stop_semitones);
            // Invariant 5.
            assert!(*stop_semitones >= 0 && *stop_semitones <= config.max_stop_semitones);
            assert!(*anchor_semitones >= 0 && *anchor_semitones <= config.max_anchor);
            // Invariant 3.
            if *finger == 1 {
                assert_eq!(*anchor_semitones, *stop_semitones);
            }
            // Invariant 4.
            if *finger == 0 {
                assert_eq!(*stop_semitones, 0);
            }
            assert_eq!(*delta_stop_minus_anchor, stop_semitones - anchor_semitones);
        }
    }
}

#[test]
fn rejects_unknown_event_type_with_index() {
    let events = events_from_json(r#"[["N",1,"A4"],["X",1,null]]"#);
    let err = solve(&events, &SolverConfig::new(80.0)).unwrap_err();
    assert_eq!(err.to_string(), "Unknown event type \"X\" at index 1");
}

#[test]
fn rejects_malformed_pitch_text() {
    let events = events_from_json(r#"[["N",1,"H4"]]"#);
    let err = solve(&events, &SolverConfig::new(80.0)).unwrap_err();
    assert_eq!(err.to_string(), "Invalid note text: \"H4\"");
}
