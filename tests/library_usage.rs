//! Integration tests for tablayout library usage.
//!
//! These tests verify that the library can be used as a dependency
//! from external projects.

use tablayout::{
    hit_test, layout, parse_score_json, ElementKind, ElementType, Hit, LayoutBox, LayoutConfig,
    LayoutElement, LayoutError, LayoutMode, Score,
};

fn demo_score() -> Score {
    let data = std::fs::read_to_string("test-files/demo.json").expect("Failed to read test file");
    parse_score_json(&data).expect("Failed to parse demo score")
}

/// Test that all major types are accessible from the library.
#[test]
fn test_types_accessible() {
    // If any re-export is missing, this test will fail to compile.
    fn _assert_types() {
        let _: fn(&str) -> Result<Score, LayoutError> = parse_score_json;
        let _: fn(&Score, &LayoutConfig) -> Result<LayoutElement, LayoutError> = layout;
        let _: for<'a> fn(f64, f64, &'a LayoutElement) -> Option<Hit<'a>> = hit_test;
        let _: LayoutBox = LayoutBox::empty();
    }
}

/// Test laying out the demo score in pages.
#[test]
fn test_layout_demo_file() {
    let score = demo_score();
    assert_eq!(score.parts.len(), 2);

    let root = layout(&score, &LayoutConfig::default()).expect("Failed to lay out score");
    assert_eq!(root.kind, ElementKind::Score);
    assert_eq!(root.children.len(), 2, "One element per part");
    for (index, part) in root.children.iter().enumerate() {
        assert_eq!(part.kind, ElementKind::Part { index });
        assert!(!part.find_all(ElementType::Page).is_empty());
    }

    // every measure of the guitar part is laid out once
    let guitar = &root.children[0];
    let measures = guitar.find_all(ElementType::Measure);
    assert_eq!(measures.len(), score.parts[0].measures.len());
    assert!(guitar.find_all(ElementType::PageLine).len() > 1);

    // parts are stacked with a margin between them
    let config = LayoutConfig::default();
    let bass = &root.children[1];
    assert_eq!(bass.bounds.y, guitar.bounds.bottom() + config.page_margin);
}

/// Test the compact mode on the demo score.
#[test]
fn test_layout_compact() {
    let score = demo_score();
    let config = LayoutConfig {
        mode: LayoutMode::Compact,
        ..Default::default()
    };
    let root = layout(&score, &config).expect("Failed to lay out score");
    assert!(root.find_all(ElementType::Page).is_empty());
    let guitar = &root.children[0];
    for pair in guitar.children.windows(2) {
        assert_eq!(pair[1].bounds.y, pair[0].bounds.bottom());
    }
}

/// Test the JSON representation of the tree.
#[test]
fn test_serialized_tree() {
    let score = demo_score();
    let root = layout(&score, &LayoutConfig::default()).unwrap();
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["type"], "score");
    assert_eq!(json["children"][0]["type"], "part");
    assert!(json["bounds"]["width"].as_f64().unwrap() > 0.0);
}

/// Test hit testing a point of the produced tree.
#[test]
fn test_hit_test_page() {
    let score = demo_score();
    let root = layout(&score, &LayoutConfig::default()).unwrap();
    let config = LayoutConfig::default();
    // top left corner of the first page, inside the margin
    let hit = hit_test(config.page_margin + 1.0, config.page_margin + 1.0, &root).unwrap();
    assert_eq!(hit.element.element_type(), ElementType::Page);
    assert_eq!(hit.path, vec![0, 0]);
}

/// Test error handling for invalid data.
#[test]
fn test_parse_error() {
    let result = parse_score_json("{ \"parts\": 12 }");

    assert!(result.is_err(), "Should return error for invalid data");
    let err = result.unwrap_err();
    assert!(
        matches!(err, LayoutError::ParsingError(_)),
        "Should be a ParsingError"
    );
}

/// Test that an empty score gives an empty tree.
#[test]
fn test_empty_score() {
    let root = layout(&Score::default(), &LayoutConfig::default()).unwrap();
    assert_eq!(root.kind, ElementKind::Score);
    assert!(root.children.is_empty());
    assert_eq!(root.bounds, LayoutBox::empty());
}
