use crate::layout::element::{ElementKind, LayoutElement};
use crate::layout::layout_box::LayoutBox;

/// Collects children placed anywhere, then moves them so that the group
/// starts at the origin.
#[derive(Debug, Default)]
pub struct NonNegativeGroup {
    pub bounds: LayoutBox,
    children: Vec<LayoutElement>,
}

impl NonNegativeGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: LayoutElement) {
        self.bounds = self.bounds.encompass(&element.bounds);
        self.children.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[LayoutElement] {
        &self.children
    }

    pub fn reset(&mut self) {
        self.children.clear();
        self.bounds = LayoutBox::empty();
    }

    /// Translates the children so the bounding box starts at the origin.
    ///
    /// Returns the original top left corner, where the group must be placed
    /// to keep the children at their natural position.
    pub fn layout(&mut self) -> (f64, f64) {
        let (x, y) = (self.bounds.x, self.bounds.y);
        if x != 0.0 || y != 0.0 {
            for child in &mut self.children {
                child.translate(-x, -y);
            }
            self.bounds = self.bounds.translate(-x, -y);
        }
        (x, y)
    }

    pub fn into_element(self) -> LayoutElement {
        LayoutElement::with_children(ElementKind::Group, self.bounds, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_negative_coordinates() {
        let mut group = NonNegativeGroup::new();
        let mut stem = LayoutElement::space(0.1, 5.0);
        stem.translate(4.0, -2.0);
        let mut beam = LayoutElement::space(6.0, 0.5);
        beam.translate(4.0, 2.5);
        group.add_element(stem);
        group.add_element(beam);
        assert_eq!(group.bounds, LayoutBox::new(4.0, -2.0, 6.0, 5.0));

        let origin = group.layout();
        assert_eq!(origin, (4.0, -2.0));
        assert_eq!(group.bounds, LayoutBox::new(0.0, 0.0, 6.0, 5.0));
        let children = group.children();
        assert_eq!((children[0].bounds.x, children[0].bounds.y), (0.0, 0.0));
        assert_eq!((children[1].bounds.x, children[1].bounds.y), (0.0, 4.5));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut group = NonNegativeGroup::new();
        let mut dot = LayoutElement::space(1.0, 1.0);
        dot.translate(-3.0, 1.0);
        group.add_element(dot);
        group.layout();
        let first = group.bounds;
        assert_eq!(group.layout(), (0.0, 0.0));
        assert_eq!(group.bounds, first);
    }

    #[test]
    fn test_reset() {
        let mut group = NonNegativeGroup::new();
        group.add_element(LayoutElement::space(1.0, 1.0));
        group.reset();
        assert!(group.is_empty());
        assert_eq!(group.bounds, LayoutBox::empty());
    }
}
