use crate::layout::layout_box::LayoutBox;
use crate::layout::text::text_box;
use crate::notation::{BeatStrokeDirection, BendType, ChordDiagram, ChordRef, NoteValue, SlideType};
use serde::Serialize;

/// Index of each child on the way from a root element down to a descendant.
pub type ElementPath = Vec<usize>;

/// Closed set of element types, used for dispatch and ancestor lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Arc,
    BarLine,
    Beam,
    Bend,
    Chord,
    ChordDiagram,
    DashedLineText,
    Dot,
    Ellipse,
    Group,
    Line,
    Measure,
    Note,
    Page,
    PageLine,
    Part,
    Path,
    Rest,
    Score,
    Slide,
    Space,
    Stem,
    Stroke,
    Text,
    TimeSignature,
    Vibrato,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarLineStyle {
    Single,
    /// Thin + thick bar closing the part
    End,
}

/// Glyphs drawn as filled paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Accent,
    HeavyAccent,
    TremoloPicking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Tie or legato curve, bulging downwards unless `above`.
    Arc {
        above: bool,
    },
    BarLine {
        style: BarLineStyle,
    },
    Beam,
    Bend {
        kind: BendType,
        label: String,
    },
    Chord {
        chord: ChordRef,
    },
    ChordDiagram {
        diagram: ChordDiagram,
    },
    DashedLineText {
        text: String,
        size: f64,
        start_tick: bool,
        end_tick: bool,
    },
    Dot,
    Ellipse,
    Group,
    Line,
    Measure {
        index: usize,
        number: u32,
    },
    Note {
        chord: ChordRef,
        note: usize,
        string: u8,
        label: String,
    },
    Page {
        number: usize,
    },
    PageLine,
    Part {
        index: usize,
    },
    Path {
        glyph: Glyph,
    },
    Rest {
        value: NoteValue,
        glyph: Option<char>,
    },
    Score,
    Slide {
        kind: SlideType,
        upwards: bool,
    },
    Space,
    Stem,
    Stroke {
        direction: BeatStrokeDirection,
    },
    Text {
        value: String,
        size: f64,
    },
    TimeSignature {
        count: u8,
        value: u8,
        glyphs: Option<String>,
    },
    Vibrato,
}

impl ElementKind {
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Arc { .. } => ElementType::Arc,
            Self::BarLine { .. } => ElementType::BarLine,
            Self::Beam => ElementType::Beam,
            Self::Bend { .. } => ElementType::Bend,
            Self::Chord { .. } => ElementType::Chord,
            Self::ChordDiagram { .. } => ElementType::ChordDiagram,
            Self::DashedLineText { .. } => ElementType::DashedLineText,
            Self::Dot => ElementType::Dot,
            Self::Ellipse => ElementType::Ellipse,
            Self::Group => ElementType::Group,
            Self::Line => ElementType::Line,
            Self::Measure { .. } => ElementType::Measure,
            Self::Note { .. } => ElementType::Note,
            Self::Page { .. } => ElementType::Page,
            Self::PageLine => ElementType::PageLine,
            Self::Part { .. } => ElementType::Part,
            Self::Path { .. } => ElementType::Path,
            Self::Rest { .. } => ElementType::Rest,
            Self::Score => ElementType::Score,
            Self::Slide { .. } => ElementType::Slide,
            Self::Space => ElementType::Space,
            Self::Stem => ElementType::Stem,
            Self::Stroke { .. } => ElementType::Stroke,
            Self::Text { .. } => ElementType::Text,
            Self::TimeSignature { .. } => ElementType::TimeSignature,
            Self::Vibrato => ElementType::Vibrato,
        }
    }
}

/// Node of the layout tree.
///
/// `bounds` is expressed in the coordinate space of the parent, children are
/// owned and expressed relative to this element's origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutElement {
    #[serde(flatten)]
    pub kind: ElementKind,
    pub bounds: LayoutBox,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutElement>,
}

/// Anything a container can position and stretch.
pub trait LayoutNode {
    fn bounds(&self) -> &LayoutBox;

    fn bounds_mut(&mut self) -> &mut LayoutBox;

    /// Re-positions the content after the bounds were changed by a container.
    fn layout(&mut self) {}
}

impl LayoutNode for LayoutElement {
    fn bounds(&self) -> &LayoutBox {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut LayoutBox {
        &mut self.bounds
    }

    fn layout(&mut self) {
        // notes span the whole chord so that labels stay centered when stretched
        if let ElementKind::Chord { .. } = self.kind {
            let width = self.bounds.width;
            for note in &mut self.children {
                note.bounds.x = 0.0;
                note.bounds.width = width;
            }
        }
    }
}

impl LayoutElement {
    pub const fn new(kind: ElementKind, bounds: LayoutBox) -> Self {
        Self {
            kind,
            bounds,
            children: Vec::new(),
        }
    }

    pub const fn with_children(
        kind: ElementKind,
        bounds: LayoutBox,
        children: Vec<LayoutElement>,
    ) -> Self {
        Self {
            kind,
            bounds,
            children,
        }
    }

    pub const fn group(bounds: LayoutBox, children: Vec<LayoutElement>) -> Self {
        Self::with_children(ElementKind::Group, bounds, children)
    }

    pub const fn space(width: f64, height: f64) -> Self {
        Self::new(ElementKind::Space, LayoutBox::sized(width, height))
    }

    /// Text element sized after its content.
    pub fn text(value: impl Into<String>, size: f64) -> Self {
        let value = value.into();
        let bounds = text_box(&value, size);
        Self::new(ElementKind::Text { value, size }, bounds)
    }

    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_type(&self, element_type: ElementType) -> bool {
        self.element_type() == element_type
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.bounds = self.bounds.translate(dx, dy);
    }

    pub fn descendant(&self, path: &[usize]) -> Option<&LayoutElement> {
        path.iter()
            .try_fold(self, |element, &index| element.children.get(index))
    }

    /// Depth (length of the path prefix) of the nearest strict ancestor of the given type.
    ///
    /// The root is at depth 0.
    pub fn ancestor_of_type(&self, path: &[usize], element_type: ElementType) -> Option<usize> {
        let mut chain = Vec::with_capacity(path.len());
        let mut current = self;
        chain.push(current);
        for &index in path.iter().take(path.len().saturating_sub(1)) {
            current = current.children.get(index)?;
            chain.push(current);
        }
        chain.iter().rposition(|e| e.is_type(element_type))
    }

    /// Bounds of the element at `path` expressed in the local coordinate space
    /// of its ancestor at `ancestor_depth`.
    pub fn to_ancestor_coordinate_system(
        &self,
        path: &[usize],
        ancestor_depth: usize,
    ) -> Option<LayoutBox> {
        if ancestor_depth >= path.len() {
            return None;
        }
        let mut current = self;
        let mut dx = 0.0;
        let mut dy = 0.0;
        for (i, &index) in path.iter().enumerate() {
            current = current.children.get(index)?;
            let depth = i + 1;
            // intermediate ancestors only, the target keeps its own origin
            if depth > ancestor_depth && depth < path.len() {
                dx += current.bounds.x;
                dy += current.bounds.y;
            }
        }
        Some(current.bounds.translate(dx, dy))
    }

    /// Bounds of the element at `path` in the coordinate space of this element's parent.
    pub fn absolute_bounds(&self, path: &[usize]) -> Option<LayoutBox> {
        if path.is_empty() {
            return Some(self.bounds);
        }
        self.to_ancestor_coordinate_system(path, 0)
            .map(|b| b.translate(self.bounds.x, self.bounds.y))
    }

    /// Paths of all descendants of the given type, in depth first order.
    pub fn find_all(&self, element_type: ElementType) -> Vec<ElementPath> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        self.collect_paths(element_type, &mut path, &mut found);
        found
    }

    fn collect_paths(
        &self,
        element_type: ElementType,
        path: &mut ElementPath,
        found: &mut Vec<ElementPath>,
    ) {
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            if child.is_type(element_type) {
                found.push(path.clone());
            }
            child.collect_paths(element_type, path, found);
            path.pop();
        }
    }

    /// Checks that no box of the tree has a negative size.
    pub fn has_valid_sizes(&self) -> bool {
        self.bounds.width >= 0.0
            && self.bounds.height >= 0.0
            && self.children.iter().all(LayoutElement::has_valid_sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> LayoutElement {
        let note = LayoutElement::text("3", 2.0);
        let chord = LayoutElement::with_children(
            ElementKind::Chord {
                chord: ChordRef::new(0, 0),
            },
            LayoutBox::new(5.0, 1.0, 4.0, 10.0),
            vec![note],
        );
        let measure = LayoutElement::with_children(
            ElementKind::Measure {
                index: 0,
                number: 1,
            },
            LayoutBox::new(10.0, 20.0, 40.0, 10.0),
            vec![LayoutElement::space(2.0, 10.0), chord],
        );
        LayoutElement::with_children(
            ElementKind::PageLine,
            LayoutBox::new(12.0, 12.0, 186.0, 30.0),
            vec![measure],
        )
    }

    #[test]
    fn test_descendant() {
        let root = sample_tree();
        let chord = root.descendant(&[0, 1]).unwrap();
        assert_eq!(chord.element_type(), ElementType::Chord);
        assert!(root.descendant(&[0, 5]).is_none());
        assert_eq!(root.descendant(&[]).unwrap(), &root);
    }

    #[test]
    fn test_ancestor_of_type() {
        let root = sample_tree();
        assert_eq!(root.ancestor_of_type(&[0, 1, 0], ElementType::Measure), Some(1));
        assert_eq!(root.ancestor_of_type(&[0, 1, 0], ElementType::PageLine), Some(0));
        assert_eq!(root.ancestor_of_type(&[0, 1, 0], ElementType::Page), None);
        // the element itself is not its own ancestor
        assert_eq!(root.ancestor_of_type(&[0, 1], ElementType::Chord), None);
    }

    #[test]
    fn test_to_ancestor_coordinate_system() {
        let root = sample_tree();
        // note at (0, 0) inside chord at (5, 1) inside measure at (10, 20)
        let in_measure = root.to_ancestor_coordinate_system(&[0, 1, 0], 1).unwrap();
        assert_eq!((in_measure.x, in_measure.y), (5.0, 1.0));
        let in_line = root.to_ancestor_coordinate_system(&[0, 1, 0], 0).unwrap();
        assert_eq!((in_line.x, in_line.y), (15.0, 21.0));
        let absolute = root.absolute_bounds(&[0, 1, 0]).unwrap();
        assert_eq!((absolute.x, absolute.y), (27.0, 33.0));
        assert!(root.to_ancestor_coordinate_system(&[0, 1], 2).is_none());
    }

    #[test]
    fn test_find_all() {
        let root = sample_tree();
        assert_eq!(root.find_all(ElementType::Text), vec![vec![0, 1, 0]]);
        assert_eq!(root.find_all(ElementType::Space), vec![vec![0, 0]]);
    }

    #[test]
    fn test_stretched_chord_resizes_notes() {
        let mut root = sample_tree();
        let chord = &mut root.children[0].children[1];
        chord.bounds.width = 9.0;
        chord.layout();
        assert_eq!(chord.children[0].bounds.width, 9.0);
    }
}
