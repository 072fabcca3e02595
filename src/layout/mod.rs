//! Layout engine turning a score into a tree of positioned boxes.
//!
//! Measures are packed into lines, lines into pages and pages into parts.
//! Every box is expressed in the coordinate space of its parent, in millimeters.

pub mod anchored_group;
pub mod beats;
pub mod constants;
pub mod element;
pub mod flex_group;
pub mod grid_group;
pub mod hit_test;
pub mod layout_box;
pub mod measure;
pub mod non_negative_group;
pub mod page;
pub mod page_line;
pub mod text;

use std::mem;

use crate::config::LayoutConfig;
use crate::notation::{Part, Score};
use crate::LayoutError;
use anchored_group::StackedGroup;
use element::{ElementKind, LayoutElement};
use measure::{Measure, RunningState};
use page::{header, PartLayout};
use page_line::PageLine;

/// Lays out the whole score, one `Part` child per part stacked vertically.
///
/// Each call rebuilds the tree from scratch.
pub fn layout(score: &Score, config: &LayoutConfig) -> Result<LayoutElement, LayoutError> {
    let mut parts = StackedGroup::new(config.page_margin);
    for (index, part) in score.parts.iter().enumerate() {
        parts.add_element(layout_part(score, index, part, config)?);
    }
    parts.layout();
    let root = parts.into_element(ElementKind::Score);
    log::debug!(
        "score '{}' laid out: {} part(s), {}x{}",
        score.title,
        score.parts.len(),
        root.bounds.width,
        root.bounds.height
    );
    Ok(root)
}

fn layout_part(
    score: &Score,
    index: usize,
    part: &Part,
    config: &LayoutConfig,
) -> Result<LayoutElement, LayoutError> {
    let width = config.content_width();
    let line_count = part.line_count();
    let mut part_layout = PartLayout::new(index, config);
    part_layout.push_element(header(score, part, width));

    let mut state = RunningState::default();
    let mut line = PageLine::new(line_count, width);
    let mut line_total = 0;
    for measure_index in 0..part.measures.len() {
        let measure = Measure::new(part, measure_index, &mut state, config);
        if let Err(measure) = line.try_add_measure(measure) {
            let full = mem::replace(&mut line, PageLine::new(line_count, width));
            part_layout.push_element(finish_line(full, part, false)?);
            line_total += 1;
            line.add_measure(measure);
        }
    }
    if !line.is_empty() {
        part_layout.push_element(finish_line(line, part, true)?);
        line_total += 1;
    }
    log::debug!(
        "part {index}: {} measure(s) in {line_total} line(s) over {} page(s)",
        part.measures.len(),
        part_layout.page_count()
    );
    Ok(part_layout.into_element())
}

fn finish_line(
    mut line: PageLine,
    part: &Part,
    last: bool,
) -> Result<LayoutElement, LayoutError> {
    if last {
        line.close_part();
    }
    line.layout(part)?;
    Ok(line.into_element())
}
