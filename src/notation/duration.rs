use serde::{Deserialize, Serialize};

/// Beat used when a measure carries no time signature.
pub const DEFAULT_BEAT: f64 = 0.25;

/// Rhythmic value of a chord, expressed as a note name plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteName {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    HundredTwentyEighth,
}

impl NoteName {
    /// Denominator of the note name (whole = 1, quarter = 4, ...)
    pub const fn denominator(self) -> u16 {
        match self {
            Self::Whole => 1,
            Self::Half => 2,
            Self::Quarter => 4,
            Self::Eighth => 8,
            Self::Sixteenth => 16,
            Self::ThirtySecond => 32,
            Self::SixtyFourth => 64,
            Self::HundredTwentyEighth => 128,
        }
    }

    /// Number of beams (or flags) drawn for the note name.
    ///
    /// Values without beams are zero or negative so that the stem length can
    /// still tell them apart (whole = -2, half = -1, quarter = 0).
    pub const fn beam_count(self) -> i32 {
        match self {
            Self::Whole => -2,
            Self::Half => -1,
            Self::Quarter => 0,
            Self::Eighth => 1,
            Self::Sixteenth => 2,
            Self::ThirtySecond => 3,
            Self::SixtyFourth => 4,
            Self::HundredTwentyEighth => 5,
        }
    }
}

/// `n` notes played in the time of `d` notes of the same value (3:2 for triplets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuplet {
    pub n: u8,
    pub d: u8,
}

impl Tuplet {
    pub const fn triplet() -> Self {
        Self { n: 3, d: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteValue {
    pub name: NoteName,
    #[serde(default)]
    pub dots: u8,
    #[serde(default)]
    pub tuplet: Option<Tuplet>,
}

impl NoteValue {
    pub const fn new(name: NoteName) -> Self {
        Self {
            name,
            dots: 0,
            tuplet: None,
        }
    }

    pub const fn dotted(name: NoteName, dots: u8) -> Self {
        Self {
            name,
            dots,
            tuplet: None,
        }
    }

    pub const fn with_tuplet(mut self, tuplet: Tuplet) -> Self {
        self.tuplet = Some(tuplet);
        self
    }

    /// Duration as a fraction of a whole note.
    pub fn duration(&self) -> f64 {
        let base = 1.0 / f64::from(self.name.denominator());
        let mut duration = base;
        let mut addition = base;
        for _ in 0..self.dots {
            addition /= 2.0;
            duration += addition;
        }
        match self.tuplet {
            Some(tuplet) if tuplet.n > 0 => duration * f64::from(tuplet.d) / f64::from(tuplet.n),
            _ => duration,
        }
    }

    pub const fn beam_count(&self) -> i32 {
        self.name.beam_count()
    }

    pub const fn is_whole(&self) -> bool {
        matches!(self.name, NoteName::Whole)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub count: u8,
    pub value: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { count: 4, value: 4 }
    }
}

impl TimeSignature {
    pub const fn new(count: u8, value: u8) -> Self {
        Self { count, value }
    }

    /// Length of one beat as a fraction of a whole note.
    ///
    /// Compound meters (6/8, 9/8, 12/8) are counted in dotted quarters.
    pub fn beat(&self) -> f64 {
        if self.value == 0 {
            return DEFAULT_BEAT;
        }
        if self.value == 8 && self.count > 3 && self.count % 3 == 0 {
            3.0 / 8.0
        } else {
            1.0 / f64::from(self.value)
        }
    }
}

/// Beat unit of a measure, falling back to a quarter note.
pub fn beat_unit(time: Option<&TimeSignature>) -> f64 {
    time.map_or(DEFAULT_BEAT, TimeSignature::beat)
}
