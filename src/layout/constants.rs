//! Layout constants, all in millimeters.

// Page & margins (A4)
pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const PAGE_MARGIN: f64 = 12.0;

// Distance between two strings of the staff
pub const STAFF_LINE_HEIGHT: f64 = 2.5;

// Stroke width of rules, stems and bar lines
pub const LINE_STROKE_WIDTH: f64 = 0.1;

// Extra vertical space between the lines of a page, their bands already pad them
pub const LINE_GAP: f64 = 0.0;

// Vertical space between the above staff / staff / below staff bands
pub const BAND_GAP: f64 = 0.5 * STAFF_LINE_HEIGHT;

// Chord widths: max(MIN_NOTE_WIDTH, QUARTER_NOTE_WIDTH * k * duration)
pub const QUARTER_NOTE_WIDTH: f64 = 3.0 * STAFF_LINE_HEIGHT;
pub const MIN_NOTE_WIDTH: f64 = 1.5 * STAFF_LINE_HEIGHT;
pub const DURATION_WIDTH_MULTIPLIER: f64 = 4.0;

// Fixed widths of the staff decorations
pub const SPACER_WIDTH: f64 = STAFF_LINE_HEIGHT;
pub const BAR_LINE_WIDTH: f64 = 0.5;
pub const DOUBLE_BAR_LINE_WIDTH: f64 = 1.5;
pub const TIME_SIGNATURE_WIDTH: f64 = 2.0 * STAFF_LINE_HEIGHT;
pub const TAB_CLEF_WIDTH: f64 = 2.0 * STAFF_LINE_HEIGHT;

// Fonts (em size) and the average advance of a glyph relative to it
pub const NOTE_FONT_SIZE: f64 = 0.9 * STAFF_LINE_HEIGHT;
pub const ANNOTATION_FONT_SIZE: f64 = 0.8 * STAFF_LINE_HEIGHT;
pub const TITLE_FONT_SIZE: f64 = 8.0;
pub const SUBTITLE_FONT_SIZE: f64 = 5.0;
pub const HEADER_FONT_SIZE: f64 = 3.5;
pub const AVERAGE_CHAR_WIDTH: f64 = 0.6;

// Above staff decorations
pub const ABOVE_STAFF_ROW_GAP: f64 = 0.5;
pub const BEND_HEIGHT: f64 = 2.0 * STAFF_LINE_HEIGHT;
pub const VIBRATO_HEIGHT: f64 = 0.6 * STAFF_LINE_HEIGHT;
pub const GLYPH_SIZE: f64 = STAFF_LINE_HEIGHT;
pub const CHORD_DIAGRAM_STRING_SPACING: f64 = 0.8;
pub const CHORD_DIAGRAM_FRET_COUNT: usize = 4;

// Staff overlay
pub const TIE_HEIGHT: f64 = 0.5 * STAFF_LINE_HEIGHT;
pub const TIE_IN_WIDTH: f64 = 2.0 * STAFF_LINE_HEIGHT;

// Below staff: stems, beams, dots and tuplets
pub const STEM_OFFSET: f64 = 0.5 * STAFF_LINE_HEIGHT;
pub const STEM_HEIGHT: f64 = 2.0 * STAFF_LINE_HEIGHT;
pub const BEAM_HEIGHT: f64 = 0.5;
pub const BEAM_SPACING: f64 = 0.8;
pub const BEAM_STUB_WIDTH: f64 = 0.6 * STAFF_LINE_HEIGHT;
pub const DOT_SIZE: f64 = 0.5;
pub const DOT_GAP: f64 = 0.5;
pub const TUPLET_FONT_SIZE: f64 = 0.8 * STAFF_LINE_HEIGHT;
