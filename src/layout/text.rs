//! Text metrics and music glyph lookup.
//!
//! Text is measured with an average advance per character, which is good
//! enough to reserve space for labels written in the layout fonts.

use crate::layout::constants::AVERAGE_CHAR_WIDTH;
use crate::layout::layout_box::LayoutBox;
use crate::notation::{NoteName, NoteValue};

pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVERAGE_CHAR_WIDTH
}

pub fn text_box(text: &str, size: f64) -> LayoutBox {
    LayoutBox::sized(text_width(text, size), size)
}

// SMuFL rests (https://w3c.github.io/smufl/latest/tables/rests.html)
const REST_GLYPHS: [(NoteName, char); 8] = [
    (NoteName::Whole, '\u{E4E3}'),
    (NoteName::Half, '\u{E4E4}'),
    (NoteName::Quarter, '\u{E4E5}'),
    (NoteName::Eighth, '\u{E4E6}'),
    (NoteName::Sixteenth, '\u{E4E7}'),
    (NoteName::ThirtySecond, '\u{E4E8}'),
    (NoteName::SixtyFourth, '\u{E4E9}'),
    (NoteName::HundredTwentyEighth, '\u{E4EA}'),
];

// SMuFL time signature digits start at timeSig0
const TIME_SIGNATURE_ZERO: u32 = 0xE080;

pub fn rest_glyph(value: &NoteValue) -> Option<char> {
    REST_GLYPHS
        .iter()
        .find(|(name, _)| *name == value.name)
        .map(|(_, glyph)| *glyph)
}

/// Glyph string for one number of a time signature.
pub fn time_signature_glyphs(number: u8) -> Option<String> {
    number
        .to_string()
        .chars()
        .map(|digit| {
            digit
                .to_digit(10)
                .and_then(|d| char::from_u32(TIME_SIGNATURE_ZERO + d))
        })
        .collect()
}
