//! Rhythm helpers for the below staff band: beat grouping, beam levels and
//! tuplet brackets.

use crate::layout::constants::{BEAM_SPACING, STEM_HEIGHT};
use crate::notation::NoteValue;
use std::ops::Range;

const EPSILON: f64 = 1e-9;

/// Splits consecutive durations in beats.
///
/// A beat closes once its cumulative duration reaches `beat`, a note that
/// would overflow the current beat starts a new one.
pub fn partition_beats(durations: &[f64], beat: f64) -> Vec<Range<usize>> {
    let mut beats = Vec::new();
    let mut start = 0;
    let mut accumulated = 0.0;
    for (index, duration) in durations.iter().enumerate() {
        if index > start && accumulated + duration > beat + EPSILON {
            beats.push(start..index);
            start = index;
            accumulated = 0.0;
        }
        accumulated += duration;
        if accumulated >= beat - EPSILON {
            beats.push(start..index + 1);
            start = index + 1;
            accumulated = 0.0;
        }
    }
    if start < durations.len() {
        beats.push(start..durations.len());
    }
    beats
}

/// Horizontal beam joining the stems `first..=last` of a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamSegment {
    /// 0 for the primary beam
    pub level: usize,
    pub first: usize,
    pub last: usize,
}

impl BeamSegment {
    /// Segment of a single stem, drawn as a stub.
    pub const fn is_stub(&self) -> bool {
        self.first == self.last
    }
}

/// Beam segments of a beat from the beam count of each of its items.
///
/// Counts are decremented level by level, every maximal run of positive
/// counts giving one segment at the current level.
pub fn beam_segments(beam_counts: &[i32]) -> Vec<BeamSegment> {
    let mut counts = beam_counts.to_vec();
    let mut segments = Vec::new();
    let mut level = 0;
    while counts.iter().any(|c| *c > 0) {
        let mut index = 0;
        while index < counts.len() {
            if counts[index] > 0 {
                let first = index;
                while index + 1 < counts.len() && counts[index + 1] > 0 {
                    index += 1;
                }
                segments.push(BeamSegment {
                    level,
                    first,
                    last: index,
                });
            }
            index += 1;
        }
        counts.iter_mut().for_each(|c| *c -= 1);
        level += 1;
    }
    segments
}

/// Stem length reaching the deepest beam of the note.
///
/// Unbeamed stems (quarters and halves) are one beam spacing longer.
pub fn stem_length(beam_count: i32) -> f64 {
    if beam_count <= 0 {
        STEM_HEIGHT + BEAM_SPACING
    } else {
        STEM_HEIGHT + f64::from(beam_count - 1) * BEAM_SPACING
    }
}

/// Consecutive items sharing a tuplet, at most `n` of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupletGroup {
    pub first: usize,
    pub last: usize,
    pub n: u8,
    /// Exactly `n` items of the same value, written as a bare number
    pub complete: bool,
}

pub fn tuplet_groups(values: &[NoteValue]) -> Vec<TupletGroup> {
    let mut groups = Vec::new();
    let mut index = 0;
    while index < values.len() {
        let Some(tuplet) = values[index].tuplet else {
            index += 1;
            continue;
        };
        let n = usize::from(tuplet.n.max(1));
        let first = index;
        while index < values.len() && values[index].tuplet == Some(tuplet) && index - first < n {
            index += 1;
        }
        let chunk = &values[first..index];
        let complete = chunk.len() == n && chunk.iter().all(|v| *v == chunk[0]);
        groups.push(TupletGroup {
            first,
            last: index - 1,
            n: tuplet.n,
            complete,
        });
    }
    groups
}
