use crate::config::LayoutConfig;
use crate::layout::constants::{
    MIN_NOTE_WIDTH, NOTE_FONT_SIZE, QUARTER_NOTE_WIDTH, SPACER_WIDTH, STAFF_LINE_HEIGHT,
    TIME_SIGNATURE_WIDTH,
};
use crate::layout::element::{ElementKind, ElementType, LayoutElement, LayoutNode};
use crate::layout::flex_group::{Axis, FlexGroup};
use crate::layout::layout_box::LayoutBox;
use crate::layout::text::{rest_glyph, text_width, time_signature_glyphs};
use crate::notation::{Chord, ChordRef, Part, Tempo, TimeSignature};

/// Staff attributes in effect while walking the measures of a part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningState {
    pub time: Option<TimeSignature>,
    pub tempo: Option<Tempo>,
}

/// Height of a staff with one row per string.
pub fn staff_height(line_count: usize) -> f64 {
    line_count as f64 * STAFF_LINE_HEIGHT
}

/// Top of the row of a 1-based string number, relative to the staff top.
pub fn string_row_y(string: u8, line_count: usize) -> f64 {
    let row = usize::from(string.max(1)).min(line_count.max(1)) - 1;
    row as f64 * STAFF_LINE_HEIGHT
}

/// Minimum width of a chord or rest from its duration.
pub fn duration_width(chord: &Chord, config: &LayoutConfig) -> f64 {
    let width = MIN_NOTE_WIDTH
        .max(QUARTER_NOTE_WIDTH * config.duration_width_multiplier * chord.value.duration());
    // room for the bend curve above the staff
    if chord.has_bend() {
        width * 2.0
    } else {
        width
    }
}

/// One measure of a line: time signature, spacers, chords and rests laid out
/// horizontally.
#[derive(Debug)]
pub struct Measure {
    pub bounds: LayoutBox,
    pub index: usize,
    pub number: u32,
    time: Option<TimeSignature>,
    time_changed: bool,
    tempo: Option<Tempo>,
    tempo_changed: bool,
    line_count: usize,
    content: FlexGroup<LayoutElement>,
    /// Positions in `content` of the chord and rest elements
    chords: Vec<usize>,
}

impl Measure {
    /// Builds the measure at `index` of the part, `state` holds the attributes
    /// of the previous measures and is updated for the next one.
    pub fn new(part: &Part, index: usize, state: &mut RunningState, config: &LayoutConfig) -> Self {
        let measure = &part.measures[index];
        let line_count = part.line_count();
        let height = staff_height(line_count);

        let details = &measure.staff_details;
        let time_changed = details.time.is_some() && details.time != state.time;
        let tempo_changed = details.tempo.is_some() && details.tempo != state.tempo;
        if details.time.is_some() {
            state.time = details.time;
        }
        if details.tempo.is_some() {
            state.tempo.clone_from(&details.tempo);
        }

        let mut layout = Measure {
            bounds: LayoutBox::sized(0.0, height),
            index,
            number: measure.number,
            time: state.time,
            time_changed,
            tempo: state.tempo.clone(),
            tempo_changed,
            line_count,
            content: FlexGroup::new(LayoutBox::sized(f64::MAX, height), Axis::Horizontal),
            chords: Vec::new(),
        };

        if let Some(time) = details.time.filter(|_| time_changed) {
            let glyphs = time_signature_glyphs(time.count)
                .zip(time_signature_glyphs(time.value))
                .map(|(count, value)| format!("{count}\n{value}"));
            let kind = ElementKind::TimeSignature {
                count: time.count,
                value: time.value,
                glyphs,
            };
            layout.add_element(
                LayoutElement::new(kind, LayoutBox::sized(TIME_SIGNATURE_WIDTH, height)),
                None,
            );
        }

        // a lone rest (or nothing) is centered in the measure
        let centered = measure.chords.is_empty()
            || (measure.chords.len() == 1 && measure.chords[0].is_rest());
        let spacer_factor = if centered { Some(1.0) } else { None };

        layout.add_element(LayoutElement::space(SPACER_WIDTH, height), spacer_factor);
        for (chord_index, chord) in measure.chords.iter().enumerate() {
            let chord_ref = ChordRef::new(index, chord_index);
            let element = chord_element(chord, chord_ref, line_count, config);
            let factor = if centered {
                None
            } else {
                Some(chord.value.duration())
            };
            layout.add_element(element, factor);
        }
        layout.add_element(LayoutElement::space(SPACER_WIDTH, height), spacer_factor);

        layout.bounds.width = layout.content.natural_main_size();
        log::trace!(
            "measure {} built with {} chord(s), width {}",
            layout.number,
            layout.chords.len(),
            layout.bounds.width
        );
        layout
    }

    /// Appends to the content, keeping track of chords and rests.
    pub fn add_element(&mut self, element: LayoutElement, factor: Option<f64>) {
        if element.is_type(ElementType::Chord) || element.is_type(ElementType::Rest) {
            self.chords.push(self.content.len());
        }
        self.content.add_element(element, factor);
    }

    /// Time signature in effect for this measure.
    pub const fn time(&self) -> Option<TimeSignature> {
        self.time
    }

    pub const fn shows_time_signature(&self) -> bool {
        self.time_changed
    }

    /// Tempo to write above the measure: on tempo and time signature changes.
    pub fn tempo_marking(&self) -> Option<&Tempo> {
        if self.tempo_changed || self.time_changed {
            self.tempo.as_ref()
        } else {
            None
        }
    }

    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn chord_count(&self) -> usize {
        self.chords.len()
    }

    /// Chord and rest elements in playback order.
    pub fn chords(&self) -> impl Iterator<Item = &LayoutElement> {
        let elements: Vec<&LayoutElement> = self.content.elements().collect();
        self.chords.iter().map(move |&i| elements[i])
    }

    /// Chords, rests and spacers, in measure coordinates.
    pub fn grid_elements(&self) -> impl Iterator<Item = &LayoutElement> {
        self.content.elements().filter(|e| {
            matches!(
                e.element_type(),
                ElementType::Chord | ElementType::Rest | ElementType::Space
            )
        })
    }

    pub fn into_element(self) -> LayoutElement {
        let (_, children) = self.content.into_parts();
        let kind = ElementKind::Measure {
            index: self.index,
            number: self.number,
        };
        LayoutElement::with_children(kind, self.bounds, children)
    }
}

impl LayoutNode for Measure {
    fn bounds(&self) -> &LayoutBox {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut LayoutBox {
        &mut self.bounds
    }

    fn layout(&mut self) {
        self.content.bounds = LayoutBox::sized(self.bounds.width, self.bounds.height);
        self.content.layout();
        self.bounds.height = self.content.bounds.height;
    }
}

fn chord_element(
    chord: &Chord,
    chord_ref: ChordRef,
    line_count: usize,
    config: &LayoutConfig,
) -> LayoutElement {
    let height = staff_height(line_count);
    let mut width = duration_width(chord, config);

    if chord.is_rest() {
        let glyph = rest_glyph(&chord.value);
        if glyph.is_none() {
            log::warn!("No rest glyph for {:?}", chord.value);
        }
        let kind = ElementKind::Rest {
            value: chord.value,
            glyph,
        };
        return LayoutElement::new(kind, LayoutBox::sized(width, height));
    }

    // keep the widest label readable
    let widest_label = chord
        .notes
        .iter()
        .map(|n| text_width(&n.label(), NOTE_FONT_SIZE))
        .fold(0.0, f64::max);
    width = width.max(widest_label + NOTE_FONT_SIZE / 2.0);

    let notes = chord
        .notes
        .iter()
        .enumerate()
        .map(|(note_index, note)| {
            let string = note.placement.string;
            if string == 0 || usize::from(string) > line_count {
                log::warn!("Note on string {string} outside of a {line_count} string staff");
            }
            let kind = ElementKind::Note {
                chord: chord_ref,
                note: note_index,
                string,
                label: note.label(),
            };
            let y = string_row_y(string, line_count);
            LayoutElement::new(kind, LayoutBox::new(0.0, y, width, STAFF_LINE_HEIGHT))
        })
        .collect();
    LayoutElement::with_children(
        ElementKind::Chord { chord: chord_ref },
        LayoutBox::sized(width, height),
        notes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{
        BendEffect, BendType, Measure as NotationMeasure, Note, NoteName, NoteValue, StaffDetails,
    };

    fn chord(name: NoteName, notes: Vec<Note>) -> Chord {
        Chord {
            value: NoteValue::new(name),
            notes,
            ..Default::default()
        }
    }

    fn part_with(chords: Vec<Chord>, time: Option<TimeSignature>) -> Part {
        Part {
            measures: vec![NotationMeasure {
                number: 1,
                chords,
                staff_details: StaffDetails {
                    time,
                    ..Default::default()
                },
                marker: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_duration_widths() {
        let config = LayoutConfig::default();
        let quarter = chord(NoteName::Quarter, vec![Note::new(1, 1)]);
        assert_eq!(duration_width(&quarter, &config), QUARTER_NOTE_WIDTH);
        let sixteenth = chord(NoteName::Sixteenth, vec![Note::new(1, 1)]);
        assert_eq!(duration_width(&sixteenth, &config), MIN_NOTE_WIDTH);
        let mut bent = quarter.clone();
        bent.notes[0].bend = Some(BendEffect {
            kind: BendType::Bend,
            amplitude: 2.0,
        });
        assert_eq!(duration_width(&bent, &config), 2.0 * QUARTER_NOTE_WIDTH);
    }

    #[test]
    fn test_measure_content() {
        let config = LayoutConfig::default();
        let part = part_with(
            vec![
                chord(NoteName::Quarter, vec![Note::new(3, 6), Note::new(2, 5)]),
                chord(NoteName::Quarter, vec![]),
            ],
            Some(TimeSignature::new(4, 4)),
        );
        let mut state = RunningState::default();
        let measure = Measure::new(&part, 0, &mut state, &config);
        assert_eq!(state.time, Some(TimeSignature::new(4, 4)));
        assert_eq!(measure.chord_count(), 2);
        let types: Vec<ElementType> = measure.chords().map(LayoutElement::element_type).collect();
        assert_eq!(types, vec![ElementType::Chord, ElementType::Rest]);
        // time signature is not part of the grid
        assert_eq!(measure.grid_elements().count(), 4);
        let expected = TIME_SIGNATURE_WIDTH + 2.0 * SPACER_WIDTH + 2.0 * QUARTER_NOTE_WIDTH;
        assert!((measure.bounds.width - expected).abs() < 1e-9);
        assert_eq!(measure.bounds.height, 6.0 * STAFF_LINE_HEIGHT);

        let element = measure.into_element();
        let notes = &element.children[2].children;
        assert_eq!(notes[0].bounds.y, 5.0 * STAFF_LINE_HEIGHT);
        assert_eq!(notes[1].bounds.y, 4.0 * STAFF_LINE_HEIGHT);
    }

    #[test]
    fn test_time_signature_only_on_change() {
        let config = LayoutConfig::default();
        let part = part_with(vec![], Some(TimeSignature::new(3, 4)));
        let mut state = RunningState {
            time: Some(TimeSignature::new(3, 4)),
            tempo: None,
        };
        let measure = Measure::new(&part, 0, &mut state, &config);
        assert!(!measure.shows_time_signature());
        assert!(measure.tempo_marking().is_none());
        let element = measure.into_element();
        assert!(element.find_all(ElementType::TimeSignature).is_empty());
    }

    #[test]
    fn test_lone_rest_is_centered_when_stretched() {
        let config = LayoutConfig::default();
        let part = part_with(vec![chord(NoteName::Whole, vec![])], None);
        let mut state = RunningState::default();
        let mut measure = Measure::new(&part, 0, &mut state, &config);
        let natural = measure.bounds.width;
        measure.bounds.width = natural + 20.0;
        measure.layout();
        let rest = measure.chords().next().unwrap().bounds;
        assert!((rest.center_x() - measure.bounds.width / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_chords_stretch_with_measure() {
        let config = LayoutConfig::default();
        let part = part_with(
            vec![
                chord(NoteName::Quarter, vec![Note::new(0, 1)]),
                chord(NoteName::Half, vec![Note::new(0, 1)]),
            ],
            None,
        );
        let mut state = RunningState::default();
        let mut measure = Measure::new(&part, 0, &mut state, &config);
        let natural = measure.bounds.width;
        measure.bounds.width = natural + 30.0;
        measure.layout();
        let widths: Vec<f64> = measure.chords().map(|c| c.bounds.width).collect();
        assert!((widths[0] - (QUARTER_NOTE_WIDTH + 10.0)).abs() < 1e-9);
        assert!((widths[1] - (2.0 * QUARTER_NOTE_WIDTH + 20.0)).abs() < 1e-9);
        let element = measure.into_element();
        assert_eq!(element.children[1].children[0].bounds.width, widths[0]);
    }
}
