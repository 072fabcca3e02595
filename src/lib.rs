//! Tablayout - tablature layout engine
//!
//! This library provides:
//! - A serde notation model for tablature scores (parts, measures, chords, notes)
//! - A layout engine turning a score into a tree of positioned boxes,
//!   paginated on A4 pages or stacked in a continuous flow
//! - Hit testing of the produced tree
//!
//! # Example
//!
//! ```no_run
//! use tablayout::{hit_test, layout, parse_score_json, LayoutConfig};
//!
//! let data = std::fs::read_to_string("score.json").unwrap();
//! let score = parse_score_json(&data).unwrap();
//! let root = layout(&score, &LayoutConfig::default()).unwrap();
//! if let Some(hit) = hit_test(50.0, 40.0, &root) {
//!     println!("{:?} at {:?}", hit.element.element_type(), hit.path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod notation;

// Re-export main types for convenience
pub use config::{LayoutConfig, LayoutMode};
pub use error::LayoutError;
pub use layout::{
    element::{ElementKind, ElementPath, ElementType, LayoutElement},
    hit_test::{hit_test, Hit},
    layout,
    layout_box::LayoutBox,
};
pub use notation::{parse_score_json, Score};
