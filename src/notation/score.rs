use crate::notation::duration::{NoteValue, TimeSignature};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TUNING: [&str; 6] = ["E4", "B3", "G3", "D3", "A2", "E2"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Score {
    pub title: String,
    pub artist: String,
    pub comments: Vec<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Part {
    pub instrument: Instrument,
    pub measures: Vec<Measure>,
}

impl Part {
    /// Number of staff lines, one per string.
    pub fn line_count(&self) -> usize {
        self.instrument.tuning.len().max(1)
    }

    pub fn chord(&self, chord_ref: ChordRef) -> Option<&Chord> {
        self.measures
            .get(chord_ref.measure)
            .and_then(|m| m.chords.get(chord_ref.chord))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrument {
    pub name: String,
    /// Open string pitches, highest string first.
    pub tuning: Vec<String>,
}

impl Default for Instrument {
    fn default() -> Self {
        Instrument {
            name: "Guitar".to_string(),
            tuning: DEFAULT_TUNING.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Measure {
    pub number: u32,
    pub chords: Vec<Chord>,
    pub staff_details: StaffDetails,
    pub marker: Option<Marker>,
}

/// Staff attributes declared at the start of a measure.
///
/// Only the attributes that change are set, the running values are tracked
/// while walking the measures of a part.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffDetails {
    pub clef: Option<Clef>,
    pub key: Option<KeySignature>,
    pub time: Option<TimeSignature>,
    pub tempo: Option<Tempo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clef {
    Tab,
    Treble,
    Bass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    /// Sharps (positive) or flats (negative).
    pub fifths: i8,
    #[serde(default)]
    pub minor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    pub value: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo {
            value: 120,
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub title: String,
    #[serde(default)]
    pub color: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Chord {
    pub value: NoteValue,
    pub notes: Vec<Note>,
    pub rest: bool,
    pub text: Option<String>,
    pub tapped: bool,
    pub stroke: Option<BeatStrokeDirection>,
    pub chord_diagram: Option<ChordDiagram>,
}

impl Chord {
    pub fn is_rest(&self) -> bool {
        self.rest || self.notes.is_empty()
    }

    pub fn has_bend(&self) -> bool {
        self.notes.iter().any(|n| n.bend.is_some())
    }

    pub fn note_on_string(&self, string: u8) -> Option<&Note> {
        self.notes.iter().find(|n| n.placement.string == string)
    }
}

/// Reference to a chord of the same part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordRef {
    pub measure: usize,
    pub chord: usize,
}

impl ChordRef {
    pub const fn new(measure: usize, chord: usize) -> Self {
        Self { measure, chord }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatStrokeDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordDiagram {
    pub name: String,
    pub first_fret: u8,
    /// Fret per string, highest string first; -1 for a muted string.
    pub strings: Vec<i8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub fret: u8,
    /// 1-based string number, 1 being the highest string.
    pub string: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub placement: Placement,
    pub tie: Option<Tie>,
    pub bend: Option<BendEffect>,
    pub slide: Option<SlideType>,
    pub harmonic: Option<HarmonicType>,
    pub accent: Option<AccentType>,
    pub tremolo_picking: Option<NoteValue>,
    pub palm_mute: bool,
    pub let_ring: bool,
    pub vibrato: bool,
    pub dead: bool,
    pub ghost: bool,
}

impl Note {
    pub fn new(fret: u8, string: u8) -> Self {
        Note {
            placement: Placement { fret, string },
            ..Default::default()
        }
    }

    pub fn is_tied_from_previous(&self) -> bool {
        self.tie.as_ref().is_some_and(|t| t.previous.is_some())
    }

    /// Label written on the string.
    pub fn label(&self) -> String {
        let fret = self.placement.fret;
        if self.dead {
            "x".to_string()
        } else if self.ghost || self.is_tied_from_previous() {
            format!("({fret})")
        } else {
            fret.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tie {
    pub previous: Option<ChordRef>,
    pub next_chord: Option<ChordRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BendType {
    Bend,
    BendRelease,
    PreBend,
    PreBendRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendEffect {
    pub kind: BendType,
    /// Bend height in semitones.
    pub amplitude: f64,
}

impl BendEffect {
    pub fn label(&self) -> String {
        let quarters = (self.amplitude * 2.0).round() as i64;
        match quarters {
            4 => "full".to_string(),
            q => {
                // whole tones followed by the quarter tone fraction
                let fraction = match q.rem_euclid(4) {
                    1 => "¼",
                    2 => "½",
                    3 => "¾",
                    _ => "",
                };
                match q.div_euclid(4) {
                    0 if !fraction.is_empty() => fraction.to_string(),
                    tones => format!("{tones}{fraction}"),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    IntoFromAbove,
    IntoFromBelow,
    ShiftSlideTo,
    LegatoSlideTo,
    OutDownwards,
    OutUpWards,
}

impl SlideType {
    /// Slides connecting two consecutive chords.
    pub const fn is_between_chords(self) -> bool {
        matches!(self, Self::ShiftSlideTo | Self::LegatoSlideTo)
    }

    pub const fn is_into(self) -> bool {
        matches!(self, Self::IntoFromAbove | Self::IntoFromBelow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonicType {
    Natural,
    Artificial,
    Tapped,
    Pinch,
    Semi,
}

impl HarmonicType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Natural => "N.H.",
            Self::Artificial => "A.H.",
            Self::Tapped => "T.H.",
            Self::Pinch => "P.H.",
            Self::Semi => "S.H.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentType {
    Accentuated,
    HeavyAccentuated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_labels() {
        let mut note = Note::new(12, 1);
        assert_eq!(note.label(), "12");
        note.ghost = true;
        assert_eq!(note.label(), "(12)");
        note.dead = true;
        assert_eq!(note.label(), "x");
    }

    #[test]
    fn test_bend_labels() {
        let full = BendEffect {
            kind: BendType::Bend,
            amplitude: 2.0,
        };
        assert_eq!(full.label(), "full");
        let half = BendEffect {
            kind: BendType::Bend,
            amplitude: 1.0,
        };
        assert_eq!(half.label(), "½");
        let one_and_half = BendEffect {
            kind: BendType::BendRelease,
            amplitude: 3.0,
        };
        assert_eq!(one_and_half.label(), "1½");
        let quarter = BendEffect {
            kind: BendType::PreBend,
            amplitude: 0.5,
        };
        assert_eq!(quarter.label(), "¼");
        let two = BendEffect {
            kind: BendType::Bend,
            amplitude: 4.0,
        };
        assert_eq!(two.label(), "2");
        let two_and_three_quarters = BendEffect {
            kind: BendType::Bend,
            amplitude: 5.5,
        };
        assert_eq!(two_and_three_quarters.label(), "2¾");
    }

    #[test]
    fn test_rest_detection() {
        let chord = Chord::default();
        assert!(chord.is_rest());
        let chord = Chord {
            notes: vec![Note::new(0, 6)],
            ..Default::default()
        };
        assert!(!chord.is_rest());
        assert_eq!(chord.note_on_string(6).map(|n| n.placement.fret), Some(0));
    }
}
