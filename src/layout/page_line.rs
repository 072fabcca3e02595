//! One line of tablature.
//!
//! A line is filled with measures until the next one does not fit, then laid
//! out in bands from top to bottom:
//! - decorations above the staff, packed in rows by a `GridGroup`
//! - the staff: string rules, TAB clef and the measures stretched to the line width
//! - rhythm marks below the staff (stems, beams, dots, tuplets)
//!
//! Ties and slides are drawn in an overlay on top of the staff.

use crate::layout::anchored_group::AnchoredGroup;
use crate::layout::beats::{beam_segments, partition_beats, stem_length, tuplet_groups};
use crate::layout::constants::{
    ABOVE_STAFF_ROW_GAP, ANNOTATION_FONT_SIZE, BAND_GAP, BAR_LINE_WIDTH, BEAM_HEIGHT,
    BEAM_SPACING, BEAM_STUB_WIDTH, BEND_HEIGHT, CHORD_DIAGRAM_FRET_COUNT,
    CHORD_DIAGRAM_STRING_SPACING, DOT_GAP, DOT_SIZE, DOUBLE_BAR_LINE_WIDTH, GLYPH_SIZE,
    LINE_STROKE_WIDTH, NOTE_FONT_SIZE, STAFF_LINE_HEIGHT, STEM_HEIGHT, STEM_OFFSET,
    TAB_CLEF_WIDTH, TIE_HEIGHT, TIE_IN_WIDTH, TUPLET_FONT_SIZE, VIBRATO_HEIGHT,
};
use crate::layout::element::{BarLineStyle, ElementKind, Glyph, LayoutElement, LayoutNode};
use crate::layout::flex_group::{Alignment, Axis, FlexGroup};
use crate::layout::grid_group::{Constraint, GridGroup};
use crate::layout::layout_box::LayoutBox;
use crate::layout::measure::{staff_height, string_row_y, Measure};
use crate::layout::non_negative_group::NonNegativeGroup;
use crate::layout::text::text_width;
use crate::notation::{
    beat_unit, AccentType, Chord, ChordDiagram, ChordRef, HarmonicType, Note, Part, SlideType, Tempo,
};
use crate::LayoutError;

const HARMONICS: [HarmonicType; 5] = [
    HarmonicType::Natural,
    HarmonicType::Artificial,
    HarmonicType::Tapped,
    HarmonicType::Pinch,
    HarmonicType::Semi,
];

/// Child of the staff band.
#[derive(Debug)]
pub enum StaffItem {
    Measure(Measure),
    BarLine(LayoutElement),
}

impl StaffItem {
    fn into_element(self) -> LayoutElement {
        match self {
            Self::Measure(measure) => measure.into_element(),
            Self::BarLine(element) => element,
        }
    }
}

impl LayoutNode for StaffItem {
    fn bounds(&self) -> &LayoutBox {
        match self {
            Self::Measure(measure) => &measure.bounds,
            Self::BarLine(element) => &element.bounds,
        }
    }

    fn bounds_mut(&mut self) -> &mut LayoutBox {
        match self {
            Self::Measure(measure) => &mut measure.bounds,
            Self::BarLine(element) => &mut element.bounds,
        }
    }

    fn layout(&mut self) {
        if let Self::Measure(measure) = self {
            measure.layout();
        }
    }
}

/// Chord, rest or spacer of the line, one per grid column.
#[derive(Debug, Clone, Copy)]
struct GridCell {
    chord: Option<ChordRef>,
    rest: bool,
    /// `x` in line coordinates, `y` relative to the staff top
    bounds: LayoutBox,
}

impl GridCell {
    const fn is_chord(&self) -> bool {
        self.chord.is_some() && !self.rest
    }

    /// Grid column of the cell, column 0 covering the line start.
    const fn column(index: usize) -> usize {
        index + 1
    }
}

#[derive(Debug)]
pub struct PageLine {
    pub bounds: LayoutBox,
    line_count: usize,
    staff: FlexGroup<StaffItem>,
    above: GridGroup,
    below: NonNegativeGroup,
    below_origin: (f64, f64),
    overlay: Vec<LayoutElement>,
    staff_y: f64,
}

impl PageLine {
    pub fn new(line_count: usize, width: f64) -> Self {
        let staff_x = TAB_CLEF_WIDTH + BAR_LINE_WIDTH;
        let staff_bounds = LayoutBox::new(
            staff_x,
            0.0,
            (width - staff_x).max(0.0),
            staff_height(line_count),
        );
        PageLine {
            bounds: LayoutBox::sized(width, staff_height(line_count)),
            line_count,
            staff: FlexGroup::new(staff_bounds, Axis::Horizontal),
            above: GridGroup::new(ABOVE_STAFF_ROW_GAP),
            below: NonNegativeGroup::new(),
            below_origin: (0.0, 0.0),
            overlay: Vec::new(),
            staff_y: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    pub fn measures(&self) -> impl Iterator<Item = &Measure> {
        self.staff.elements().filter_map(|item| match item {
            StaffItem::Measure(measure) => Some(measure),
            StaffItem::BarLine(_) => None,
        })
    }

    /// Adds the measure and its closing bar line if both fit.
    ///
    /// The first measure of a line is always accepted, even when wider than
    /// the line.
    pub fn try_add_measure(&mut self, measure: Measure) -> Result<(), Measure> {
        // room for the final bar line in case this measure ends the part
        if self.staff.is_empty() || self.staff.fits(measure.bounds.width + DOUBLE_BAR_LINE_WIDTH) {
            self.add_measure(measure);
            Ok(())
        } else {
            Err(measure)
        }
    }

    /// Adds the measure and its closing bar line, overflowing if needed.
    pub fn add_measure(&mut self, measure: Measure) {
        if !self.staff.fits(measure.bounds.width + DOUBLE_BAR_LINE_WIDTH) {
            log::warn!(
                "Measure {} overflows the line ({} > {})",
                measure.number,
                measure.bounds.width,
                self.staff.remaining_main_space()
            );
        }
        let factor = measure.chord_count().max(1) as f64;
        let bar_line = LayoutElement::new(
            ElementKind::BarLine {
                style: BarLineStyle::Single,
            },
            LayoutBox::sized(BAR_LINE_WIDTH, staff_height(self.line_count)),
        );
        self.staff.add_element(StaffItem::Measure(measure), Some(factor));
        self.staff.add_element(StaffItem::BarLine(bar_line), None);
    }

    /// Turns the last bar line into the final double bar.
    pub fn close_part(&mut self) {
        if let Some(StaffItem::BarLine(bar_line)) = self.staff.elements_mut().last() {
            bar_line.kind = ElementKind::BarLine {
                style: BarLineStyle::End,
            };
            bar_line.bounds.width = DOUBLE_BAR_LINE_WIDTH;
        }
    }

    /// Drops the decorations of a previous layout, the measures are kept.
    pub fn reset(&mut self) {
        self.above.reset();
        self.below.reset();
        self.overlay.clear();
        self.staff_y = 0.0;
        self.below_origin = (0.0, 0.0);
        self.bounds.height = staff_height(self.line_count);
    }

    /// Lays out all bands, can be called again after the content changed.
    pub fn layout(&mut self, part: &Part) -> Result<(), LayoutError> {
        self.reset();

        self.staff.bounds.height = staff_height(self.line_count);
        self.staff.layout();

        let cells = self.grid_cells();
        self.lay_out_overlay(part, &cells);
        self.lay_out_above(part, &cells)?;
        self.lay_out_below(part);
        self.stack_bands();
        log::debug!(
            "line of {} measure(s) laid out: {} grid column(s), height {}",
            self.measures().count(),
            cells.len() + 1,
            self.bounds.height
        );
        Ok(())
    }

    /// Chords, rests and spacers of all measures in line order.
    fn grid_cells(&self) -> Vec<GridCell> {
        let mut cells = Vec::new();
        for measure in self.measures() {
            let origin_x = self.staff.bounds.x + measure.bounds.x;
            let mut chord_index = 0;
            for element in measure.grid_elements() {
                let (chord, rest) = match element.kind {
                    ElementKind::Chord { chord } => (Some(chord), false),
                    ElementKind::Rest { .. } => {
                        (Some(ChordRef::new(measure.index, chord_index)), true)
                    }
                    _ => (None, false),
                };
                if chord.is_some() {
                    chord_index += 1;
                }
                cells.push(GridCell {
                    chord,
                    rest,
                    bounds: element.bounds.translate(origin_x, measure.bounds.y),
                });
            }
        }
        cells
    }

    /// Range of cell indexes of each measure.
    fn measure_cells(&self) -> Vec<(&Measure, usize, usize)> {
        let mut ranges = Vec::new();
        let mut offset = 0;
        for measure in self.measures() {
            let count = measure.grid_elements().count();
            if count > 0 {
                ranges.push((measure, offset, offset + count - 1));
            }
            offset += count;
        }
        ranges
    }

    fn lay_out_overlay(&mut self, part: &Part, cells: &[GridCell]) {
        let first_chord = cells.iter().position(GridCell::is_chord);
        for (index, cell) in cells.iter().enumerate() {
            let Some(chord) = cell
                .chord
                .filter(|_| !cell.rest)
                .and_then(|chord_ref| part.chord(chord_ref))
            else {
                continue;
            };
            let center = cell.bounds.center_x();
            for note in &chord.notes {
                let row_y = string_row_y(note.placement.string, self.line_count);
                if let Some(tie) = note.tie {
                    if tie.previous.is_some() && first_chord == Some(index) {
                        let start = (center - TIE_IN_WIDTH).max(self.staff.bounds.x);
                        self.overlay.push(tie_arc(start, center, row_y));
                    }
                    if let Some(target) = tie.next_chord {
                        let end = match cells[index + 1..].iter().find(|c| c.chord == Some(target))
                        {
                            Some(target_cell) => target_cell.bounds.center_x(),
                            None => {
                                log::warn!("Tie to {target:?} not found on this line, drawn to the line end");
                                self.bounds.width
                            }
                        };
                        self.overlay.push(tie_arc(center, end, row_y));
                    }
                }
                if let Some(slide) = note.slide {
                    let element = self.slide_element(part, cells, index, note, slide);
                    self.overlay.push(element);
                }
            }
        }
    }

    fn slide_element(
        &self,
        part: &Part,
        cells: &[GridCell],
        index: usize,
        note: &Note,
        slide: SlideType,
    ) -> LayoutElement {
        let cell = cells[index];
        let label_half = text_width(&note.label(), NOTE_FONT_SIZE) / 2.0;
        let center = cell.bounds.center_x();
        let string = note.placement.string;

        let (start, end, upwards) = if slide.is_between_chords() {
            let next = cells[index + 1..]
                .iter()
                .find(|c| c.is_chord())
                .and_then(|c| Some((c, part.chord(c.chord?)?)));
            match next {
                Some((next_cell, next_chord)) => {
                    let next_note = next_chord.note_on_string(string);
                    let next_half = next_note
                        .map(|n| text_width(&n.label(), NOTE_FONT_SIZE) / 2.0)
                        .unwrap_or(label_half);
                    let upwards =
                        next_note.map_or(true, |n| n.placement.fret > note.placement.fret);
                    (
                        center + label_half,
                        next_cell.bounds.center_x() - next_half,
                        upwards,
                    )
                }
                None => (center + label_half, self.bounds.width, true),
            }
        } else if slide.is_into() {
            (
                center - label_half - STAFF_LINE_HEIGHT,
                center - label_half,
                slide == SlideType::IntoFromBelow,
            )
        } else {
            (
                center + label_half,
                center + label_half + STAFF_LINE_HEIGHT,
                slide == SlideType::OutUpWards,
            )
        };
        let width = (end - start).max(0.0);
        let row_y = string_row_y(string, self.line_count);
        let mut children = vec![LayoutElement::new(
            ElementKind::Line,
            LayoutBox::sized(width, STAFF_LINE_HEIGHT),
        )];
        if slide == SlideType::LegatoSlideTo {
            children.push(LayoutElement::new(
                ElementKind::Arc { above: true },
                LayoutBox::new(0.0, -TIE_HEIGHT, width, TIE_HEIGHT),
            ));
        }
        LayoutElement::with_children(
            ElementKind::Slide {
                kind: slide,
                upwards,
            },
            LayoutBox::new(start, row_y, width, STAFF_LINE_HEIGHT),
            children,
        )
    }

    fn lay_out_above(&mut self, part: &Part, cells: &[GridCell]) -> Result<(), LayoutError> {
        let mut right_edges: Vec<f64> = cells.iter().map(|c| c.bounds.x).collect();
        if let Some(last) = cells.last() {
            right_edges.push(last.bounds.right());
        }
        self.above.set_right_edges(&right_edges);

        // per chord marks
        for (index, cell) in cells.iter().enumerate() {
            let Some(chord) = cell
                .chord
                .filter(|_| !cell.rest)
                .and_then(|chord_ref| part.chord(chord_ref))
            else {
                continue;
            };
            let column = GridCell::column(index);
            if let Some(direction) = chord.stroke {
                self.above.add_element(
                    LayoutElement::new(
                        ElementKind::Stroke { direction },
                        LayoutBox::sized(GLYPH_SIZE / 2.0, GLYPH_SIZE),
                    ),
                    Constraint::column(column)
                        .halign(Alignment::Center)
                        .group("stroke"),
                )?;
            }
            if chord.tapped {
                self.above.add_element(
                    LayoutElement::text("T", ANNOTATION_FONT_SIZE),
                    Constraint::column(column)
                        .halign(Alignment::Center)
                        .group("tap"),
                )?;
            }
            for bend in chord.notes.iter().filter_map(|n| n.bend) {
                self.above.add_element(
                    LayoutElement::new(
                        ElementKind::Bend {
                            kind: bend.kind,
                            label: bend.label(),
                        },
                        LayoutBox::sized(cell.bounds.width, BEND_HEIGHT),
                    ),
                    Constraint::column(column).bottom_row(),
                )?;
            }
            if let Some(diagram) = &chord.chord_diagram {
                self.above.add_element(
                    chord_diagram_element(diagram),
                    Constraint::column(column)
                        .halign(Alignment::Center)
                        .valign(Alignment::End)
                        .group("chord_diagram"),
                )?;
            }
            if let Some(text) = &chord.text {
                self.above.add_element(
                    LayoutElement::text(text.as_str(), ANNOTATION_FONT_SIZE),
                    Constraint::column(column)
                        .halign(Alignment::Start)
                        .group("text"),
                )?;
            }
            if chord.notes.iter().any(|n| n.tremolo_picking.is_some()) {
                self.above.add_element(
                    LayoutElement::new(
                        ElementKind::Path {
                            glyph: Glyph::TremoloPicking,
                        },
                        LayoutBox::sized(GLYPH_SIZE, GLYPH_SIZE),
                    ),
                    Constraint::column(column)
                        .halign(Alignment::Center)
                        .group("tremolo_picking"),
                )?;
            }
            let accent = chord.notes.iter().filter_map(|n| n.accent).max_by_key(|a| {
                // heavy accents win
                matches!(a, AccentType::HeavyAccentuated)
            });
            if let Some(accent) = accent {
                let glyph = match accent {
                    AccentType::Accentuated => Glyph::Accent,
                    AccentType::HeavyAccentuated => Glyph::HeavyAccent,
                };
                self.above.add_element(
                    LayoutElement::new(
                        ElementKind::Path { glyph },
                        LayoutBox::sized(GLYPH_SIZE, GLYPH_SIZE * 0.6),
                    ),
                    Constraint::column(column)
                        .halign(Alignment::Center)
                        .group("accent"),
                )?;
            }
        }

        // run length decorations
        let palm_mute = chord_runs(part, cells, |n| n.palm_mute);
        self.add_runs(&palm_mute, "P.M.", "palm_mute")?;
        let let_ring = chord_runs(part, cells, |n| n.let_ring);
        self.add_runs(&let_ring, "let ring", "let_ring")?;
        for harmonic in HARMONICS {
            let runs = chord_runs(part, cells, |n| n.harmonic == Some(harmonic));
            self.add_runs(&runs, harmonic.label(), "harmonic")?;
        }
        for (first, last) in chord_runs(part, cells, |n| n.vibrato) {
            // through the following spacer
            let end = (last + 1).min(cells.len() - 1);
            self.above.add_element(
                LayoutElement::new(ElementKind::Vibrato, LayoutBox::sized(0.0, VIBRATO_HEIGHT)),
                Constraint::span(GridCell::column(first), GridCell::column(end)).group("vibrato"),
            )?;
        }

        // per measure text
        let mut decorations = Vec::new();
        for (measure, first, last) in self.measure_cells() {
            decorations.push((
                LayoutElement::text(measure.number.to_string(), ANNOTATION_FONT_SIZE),
                // column of the cell ending right before the measure
                Constraint::column(first)
                    .halign(Alignment::End)
                    .valign(Alignment::End)
                    .bottom_row(),
            ));
            let span = Constraint::span(GridCell::column(first), GridCell::column(last))
                .halign(Alignment::Start);
            if let Some(tempo) = measure.tempo_marking() {
                decorations.push((
                    LayoutElement::text(tempo_label(tempo), ANNOTATION_FONT_SIZE),
                    span.clone().group("tempo"),
                ));
            }
            let marker = part
                .measures
                .get(measure.index)
                .and_then(|m| m.marker.as_ref());
            if let Some(marker) = marker {
                decorations.push((
                    LayoutElement::text(marker.title.as_str(), ANNOTATION_FONT_SIZE),
                    span.group("marker"),
                ));
            }
        }
        for (element, constraint) in decorations {
            self.above.add_element(element, constraint)?;
        }
        Ok(())
    }

    /// Single chord runs are written as text, longer ones as a dashed line.
    fn add_runs(
        &mut self,
        runs: &[(usize, usize)],
        label: &str,
        group: &str,
    ) -> Result<(), LayoutError> {
        for &(first, last) in runs {
            if first == last {
                self.above.add_element(
                    LayoutElement::text(label, ANNOTATION_FONT_SIZE),
                    Constraint::column(GridCell::column(first))
                        .halign(Alignment::Start)
                        .group(group),
                )?;
            } else {
                let element = LayoutElement::new(
                    ElementKind::DashedLineText {
                        text: label.to_string(),
                        size: ANNOTATION_FONT_SIZE,
                        start_tick: false,
                        end_tick: true,
                    },
                    LayoutBox::sized(text_width(label, ANNOTATION_FONT_SIZE), ANNOTATION_FONT_SIZE),
                );
                self.above.add_element(
                    element,
                    Constraint::span(GridCell::column(first), GridCell::column(last)).group(group),
                )?;
            }
        }
        Ok(())
    }

    /// Rhythm marks of each measure, grouped by beat.
    fn lay_out_below(&mut self, part: &Part) {
        let staff_x = self.staff.bounds.x;
        let measures: Vec<(f64, Vec<(LayoutBox, &Chord)>)> = self
            .measures()
            .map(|measure| {
                let items = measure
                    .chords()
                    .enumerate()
                    .filter_map(|(chord_index, element)| {
                        let chord = part.chord(ChordRef::new(measure.index, chord_index))?;
                        let bounds = element
                            .bounds
                            .translate(staff_x + measure.bounds.x, measure.bounds.y);
                        Some((bounds, chord))
                    })
                    .collect();
                (beat_unit(measure.time().as_ref()), items)
            })
            .collect();
        for (beat, items) in measures {
            let durations: Vec<f64> = items.iter().map(|(_, c)| c.value.duration()).collect();
            let mut measure_bottom = STEM_OFFSET;

            for range in partition_beats(&durations, beat) {
                let beat_items = &items[range];
                let counts: Vec<i32> = beat_items
                    .iter()
                    .map(|(_, chord)| {
                        if chord.is_rest() {
                            0
                        } else {
                            chord.value.beam_count()
                        }
                    })
                    .collect();

                let mut beat_bottom = STEM_OFFSET;
                for ((bounds, chord), count) in beat_items.iter().zip(&counts) {
                    if chord.is_rest() || chord.value.is_whole() {
                        continue;
                    }
                    let length = stem_length(*count);
                    self.below.add_element(LayoutElement::new(
                        ElementKind::Stem,
                        LayoutBox::new(
                            bounds.center_x() - LINE_STROKE_WIDTH / 2.0,
                            STEM_OFFSET,
                            LINE_STROKE_WIDTH,
                            length,
                        ),
                    ));
                    beat_bottom = beat_bottom.max(STEM_OFFSET + length);
                }

                for segment in beam_segments(&counts) {
                    let y = STEM_OFFSET + STEM_HEIGHT - BEAM_HEIGHT
                        + segment.level as f64 * BEAM_SPACING;
                    let first_center = beat_items[segment.first].0.center_x();
                    let (x, width) = if segment.is_stub() {
                        // stubs point inwards, the last item of a beat looks back
                        if segment.first == beat_items.len() - 1 && beat_items.len() > 1 {
                            (first_center - BEAM_STUB_WIDTH, BEAM_STUB_WIDTH)
                        } else {
                            (first_center, BEAM_STUB_WIDTH)
                        }
                    } else {
                        let last_center = beat_items[segment.last].0.center_x();
                        (first_center, last_center - first_center)
                    };
                    self.below.add_element(LayoutElement::new(
                        ElementKind::Beam,
                        LayoutBox::new(x, y, width, BEAM_HEIGHT),
                    ));
                }

                let dots_y = beat_bottom + DOT_GAP;
                for (bounds, chord) in beat_items {
                    for dot in 0..chord.value.dots {
                        let mut element = AnchoredGroup::new(
                            *bounds,
                            LayoutElement::new(ElementKind::Dot, LayoutBox::sized(DOT_SIZE, DOT_SIZE)),
                        )
                        .with_alignment(Alignment::Center)
                        .layout();
                        element.translate(f64::from(dot + 1) * 2.0 * DOT_SIZE, dots_y);
                        self.below.add_element(element);
                        measure_bottom = measure_bottom.max(dots_y + DOT_SIZE);
                    }
                }
                measure_bottom = measure_bottom.max(beat_bottom);
            }

            let values: Vec<_> = items.iter().map(|(_, chord)| chord.value).collect();
            let tuplet_y = measure_bottom + DOT_GAP;
            for group in tuplet_groups(&values) {
                let first_bounds = items[group.first].0;
                let last_bounds = items[group.last].0;
                let label = group.n.to_string();
                let element = if group.complete {
                    let mut number = LayoutElement::text(label, TUPLET_FONT_SIZE);
                    let middle =
                        (first_bounds.center_x() + last_bounds.center_x()) / 2.0;
                    number.translate(middle - number.bounds.width / 2.0, tuplet_y);
                    number
                } else {
                    LayoutElement::new(
                        ElementKind::DashedLineText {
                            text: label,
                            size: TUPLET_FONT_SIZE,
                            start_tick: true,
                            end_tick: true,
                        },
                        LayoutBox::new(
                            first_bounds.x,
                            tuplet_y,
                            last_bounds.right() - first_bounds.x,
                            TUPLET_FONT_SIZE,
                        ),
                    )
                };
                self.below.add_element(element);
            }
        }
    }

    /// Positions the bands from top to bottom and sizes the line.
    fn stack_bands(&mut self) {
        self.above.layout();
        self.staff_y = if self.above.is_empty() {
            0.0
        } else {
            self.above.bounds.height + BAND_GAP
        };
        self.staff.bounds.y = self.staff_y;
        self.below_origin = self.below.layout();

        let staff_bottom = self.staff_y + self.staff.bounds.height;
        self.bounds.height = if self.below.is_empty() {
            staff_bottom
        } else {
            staff_bottom + self.below_origin.1 + self.below.bounds.height
        };
    }

    pub fn into_element(self) -> LayoutElement {
        let width = self.bounds.width;
        let staff_y = self.staff_y;
        let height = staff_height(self.line_count);
        let mut children = Vec::new();

        for line in 0..self.line_count {
            let y = staff_y + (line as f64 + 0.5) * STAFF_LINE_HEIGHT;
            children.push(LayoutElement::new(
                ElementKind::Line,
                LayoutBox::new(0.0, y, width, 0.0),
            ));
        }
        children.push(tab_clef(staff_y, height));
        children.push(LayoutElement::new(
            ElementKind::BarLine {
                style: BarLineStyle::Single,
            },
            LayoutBox::new(TAB_CLEF_WIDTH, staff_y, BAR_LINE_WIDTH, height),
        ));

        let staff_bottom = staff_y + self.staff.bounds.height;
        let (staff_bounds, items) = self.staff.into_parts();
        let measures = items.into_iter().map(StaffItem::into_element).collect();
        children.push(LayoutElement::group(staff_bounds, measures));

        if !self.above.is_empty() {
            children.push(self.above.into_element());
        }
        if !self.below.is_empty() {
            let (x, y) = self.below_origin;
            let mut below = self.below.into_element();
            below.translate(x, staff_bottom + y);
            children.push(below);
        }
        if !self.overlay.is_empty() {
            children.push(LayoutElement::group(
                LayoutBox::new(0.0, staff_y, width, height),
                self.overlay,
            ));
        }
        LayoutElement::with_children(ElementKind::PageLine, self.bounds, children)
    }
}

/// Maximal runs of consecutive chords having a note matching the predicate.
///
/// Spacers neither extend nor break a run, rests break it.
fn chord_runs(part: &Part, cells: &[GridCell], predicate: impl Fn(&Note) -> bool) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (index, cell) in cells.iter().enumerate() {
        let Some(chord_ref) = cell.chord else {
            continue;
        };
        let matches = !cell.rest
            && part
                .chord(chord_ref)
                .is_some_and(|chord| chord.notes.iter().any(&predicate));
        if matches {
            current = Some(current.map_or((index, index), |(first, _)| (first, index)));
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs
}

fn tie_arc(start: f64, end: f64, row_y: f64) -> LayoutElement {
    LayoutElement::new(
        ElementKind::Arc { above: false },
        LayoutBox::new(
            start,
            row_y + STAFF_LINE_HEIGHT / 2.0,
            (end - start).max(0.0),
            TIE_HEIGHT,
        ),
    )
}

fn tempo_label(tempo: &Tempo) -> String {
    match &tempo.name {
        Some(name) => format!("{name} \u{2669} = {}", tempo.value),
        None => format!("\u{2669} = {}", tempo.value),
    }
}

fn tab_clef(staff_y: f64, height: f64) -> LayoutElement {
    let size = (height / 3.0).min(NOTE_FONT_SIZE * 1.5);
    let mut clef = FlexGroup::new(LayoutBox::sized(TAB_CLEF_WIDTH, height), Axis::Vertical)
        .with_cross_axis_alignment(Alignment::Center)
        .with_main_axis_space_distribution(Alignment::Center);
    for letter in ["T", "A", "B"] {
        clef.add_element(LayoutElement::text(letter, size), None);
    }
    clef.layout();
    let mut element = clef.into_element(ElementKind::Group);
    element.bounds.x = (TAB_CLEF_WIDTH - element.bounds.width) / 2.0;
    element.bounds.y = staff_y;
    element
}

/// Chord name over a fret grid with a dot per fretted string.
fn chord_diagram_element(diagram: &ChordDiagram) -> LayoutElement {
    let spacing = CHORD_DIAGRAM_STRING_SPACING;
    let string_count = diagram.strings.len().max(1);
    let grid_width = (string_count - 1) as f64 * spacing;
    let grid_height = CHORD_DIAGRAM_FRET_COUNT as f64 * spacing;

    let mut name = LayoutElement::text(diagram.name.as_str(), ANNOTATION_FONT_SIZE);
    let width = name.bounds.width.max(grid_width);
    name.bounds.x = (width - name.bounds.width) / 2.0;

    let grid_x = (width - grid_width) / 2.0;
    let grid_y = ANNOTATION_FONT_SIZE + ABOVE_STAFF_ROW_GAP + spacing;
    let dot = spacing * 0.8;
    let mut children = vec![name];
    for (index, fret) in diagram.strings.iter().enumerate() {
        // lowest string on the left
        let x = grid_x + (string_count - 1 - index) as f64 * spacing;
        match *fret {
            f if f < 0 => {
                let mut muted = LayoutElement::text("x", spacing);
                muted.translate(x - muted.bounds.width / 2.0, grid_y - spacing);
                children.push(muted);
            }
            0 => {}
            f => {
                let row = (f as usize)
                    .saturating_sub(usize::from(diagram.first_fret.max(1)))
                    .min(CHORD_DIAGRAM_FRET_COUNT - 1);
                let y = grid_y + (row as f64 + 0.5) * spacing;
                children.push(LayoutElement::new(
                    ElementKind::Ellipse,
                    LayoutBox::new(x - dot / 2.0, y - dot / 2.0, dot, dot),
                ));
            }
        }
    }
    LayoutElement::with_children(
        ElementKind::ChordDiagram {
            diagram: diagram.clone(),
        },
        LayoutBox::sized(width, grid_y + grid_height),
        children,
    )
}
