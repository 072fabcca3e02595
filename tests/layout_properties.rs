//! Whole score layout properties.

use pretty_assertions::assert_eq;
use tablayout::notation::{Chord, ChordRef, Measure, Note, NoteName, NoteValue, Part, Tie};
use tablayout::{
    hit_test, layout, parse_score_json, ElementKind, ElementType, LayoutConfig, LayoutElement,
    Score,
};

fn init_logger() {
    env_logger::builder()
        .is_test(true)
        .try_init()
        .unwrap_or_default();
}

fn demo_score() -> Score {
    let data = std::fs::read_to_string("test-files/demo.json").expect("Failed to read test file");
    parse_score_json(&data).expect("Failed to parse demo score")
}

fn single_note(name: NoteName, fret: u8, string: u8) -> Chord {
    Chord {
        value: NoteValue::new(name),
        notes: vec![Note::new(fret, string)],
        ..Default::default()
    }
}

fn score_of(measures: Vec<Vec<Chord>>) -> Score {
    let measures = measures
        .into_iter()
        .enumerate()
        .map(|(i, chords)| Measure {
            number: i as u32 + 1,
            chords,
            ..Default::default()
        })
        .collect();
    Score {
        title: "Properties".to_string(),
        parts: vec![Part {
            measures,
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[test]
fn test_layout_is_idempotent() {
    init_logger();
    let score = demo_score();
    let config = LayoutConfig::default();
    let first = layout(&score, &config).unwrap();
    let second = layout(&score, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sizes_are_never_negative() {
    init_logger();
    let root = layout(&demo_score(), &LayoutConfig::default()).unwrap();
    assert!(root.has_valid_sizes());
}

#[test]
fn test_measures_stay_inside_their_line() {
    init_logger();
    let root = layout(&demo_score(), &LayoutConfig::default()).unwrap();
    for path in root.find_all(ElementType::Measure) {
        let line_depth = root
            .ancestor_of_type(&path, ElementType::PageLine)
            .expect("measure outside of a line");
        let line = root.descendant(&path[..line_depth]).unwrap();
        let measure = root
            .to_ancestor_coordinate_system(&path, line_depth)
            .unwrap();
        assert!(measure.x >= 0.0);
        assert!(measure.right() <= line.bounds.width + 1e-9);
    }
}

#[test]
fn test_long_score_is_paginated() {
    init_logger();
    let measures = (0..200)
        .map(|_| vec![single_note(NoteName::Eighth, 3, 2); 8])
        .collect();
    let score = score_of(measures);
    let config = LayoutConfig::default();
    let root = layout(&score, &config).unwrap();
    let part = &root.children[0];
    let pages: Vec<&LayoutElement> = part
        .children
        .iter()
        .filter(|c| c.is_type(ElementType::Page))
        .collect();
    assert!(pages.len() > 1);
    for pair in pages.windows(2) {
        assert_eq!(pair[1].bounds.y, pair[0].bounds.bottom() + config.page_margin);
    }
    // lines never overflow the content of their page
    for page in pages {
        let content = &page.children[0];
        for line in &content.children {
            assert!(line.bounds.bottom() <= config.content_height() + 1e-9);
        }
    }
    assert_eq!(part.find_all(ElementType::Measure).len(), 200);
}

#[test]
fn test_tie_arc_width_matches_chord_centers() {
    init_logger();
    let mut chords = vec![single_note(NoteName::Quarter, 5, 3); 4];
    chords[0].notes[0].tie = Some(Tie {
        previous: None,
        next_chord: Some(ChordRef::new(0, 3)),
    });
    let score = score_of(vec![chords]);
    let root = layout(&score, &LayoutConfig::default()).unwrap();

    let chords = root.find_all(ElementType::Chord);
    assert_eq!(chords.len(), 4);
    let first = root.absolute_bounds(&chords[0]).unwrap();
    let last = root.absolute_bounds(&chords[3]).unwrap();

    let arcs = root.find_all(ElementType::Arc);
    assert_eq!(arcs.len(), 1);
    let arc = root.absolute_bounds(&arcs[0]).unwrap();
    assert!((arc.width - (last.center_x() - first.center_x())).abs() < 1e-9);
    assert!((arc.x - first.center_x()).abs() < 1e-9);
}

#[test]
fn test_hit_test_finds_note() {
    init_logger();
    let score = score_of(vec![vec![
        single_note(NoteName::Quarter, 7, 2),
        single_note(NoteName::Quarter, 9, 4),
    ]]);
    let root = layout(&score, &LayoutConfig::default()).unwrap();
    let notes = root.find_all(ElementType::Note);
    assert_eq!(notes.len(), 2);

    let target = root.absolute_bounds(&notes[1]).unwrap();
    let hit = hit_test(target.center_x(), target.center_y(), &root).unwrap();
    assert_eq!(hit.path, notes[1]);
    match &hit.element.kind {
        ElementKind::Note { label, string, .. } => {
            assert_eq!(label, "9");
            assert_eq!(*string, 4);
        }
        other => panic!("unexpected {other:?}"),
    }

    // the selection resolves to its measure
    let measure_depth = root
        .ancestor_of_type(&hit.path, ElementType::Measure)
        .unwrap();
    let measure = root.descendant(&hit.path[..measure_depth]).unwrap();
    assert_eq!(measure.kind, ElementKind::Measure { index: 0, number: 1 });
}

#[test]
fn test_duration_multiplier_widens_measures() {
    init_logger();
    let score = score_of(vec![vec![single_note(NoteName::Quarter, 0, 1); 4]; 12]);
    let narrow = layout(&score, &LayoutConfig::default()).unwrap();
    let wide_config = LayoutConfig {
        duration_width_multiplier: 8.0,
        ..Default::default()
    };
    let wide = layout(&score, &wide_config).unwrap();
    assert!(
        wide.find_all(ElementType::PageLine).len() > narrow.find_all(ElementType::PageLine).len()
    );
}
