//! Read-only notation model consumed by the layout engine.
//!
//! Scores are plain data and can be loaded from JSON.

pub mod duration;
pub mod score;

pub use duration::{beat_unit, NoteName, NoteValue, TimeSignature, Tuplet, DEFAULT_BEAT};
pub use score::{
    AccentType, BeatStrokeDirection, BendEffect, BendType, Chord, ChordDiagram, ChordRef, Clef,
    HarmonicType, Instrument, KeySignature, Marker, Measure, Note, Part, Placement, Score,
    SlideType, StaffDetails, Tempo, Tie,
};

use crate::LayoutError;

/// Parse a score from its JSON representation.
pub fn parse_score_json(data: &str) -> Result<Score, LayoutError> {
    serde_json::from_str(data).map_err(|err| {
        log::error!("Failed to parse score: {err}");
        LayoutError::ParsingError(format!("invalid score JSON: {err}"))
    })
}
