use crate::layout::element::{ElementKind, LayoutElement};
use crate::layout::flex_group::Alignment;
use crate::layout::layout_box::LayoutBox;

/// Places an element horizontally against an anchor laid out beforehand in
/// the same coordinate space.
#[derive(Debug)]
pub struct AnchoredGroup {
    anchor: LayoutBox,
    alignment: Alignment,
    element: LayoutElement,
}

impl AnchoredGroup {
    pub const fn new(anchor: LayoutBox, element: LayoutElement) -> Self {
        Self {
            anchor,
            alignment: Alignment::Start,
            element,
        }
    }

    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn layout(mut self) -> LayoutElement {
        let width = self.element.bounds.width;
        self.element.bounds.x = self.anchor.x + self.alignment.offset(self.anchor.width, width);
        self.element
    }
}

/// Vertical stack of children separated by a fixed spacing.
#[derive(Debug, Default)]
pub struct StackedGroup {
    pub bounds: LayoutBox,
    spacing: f64,
    alignment: Alignment,
    children: Vec<LayoutElement>,
}

impl StackedGroup {
    pub fn new(spacing: f64) -> Self {
        StackedGroup {
            spacing,
            ..Default::default()
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn add_element(&mut self, element: LayoutElement) {
        self.children.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn layout(&mut self) {
        let width = self
            .children
            .iter()
            .map(|c| c.bounds.width)
            .fold(0.0, f64::max);
        let mut y = 0.0;
        for child in &mut self.children {
            child.bounds.x = self.alignment.offset(width, child.bounds.width);
            child.bounds.y = y;
            y += child.bounds.height + self.spacing;
        }
        self.bounds.width = width;
        self.bounds.height = if self.children.is_empty() {
            0.0
        } else {
            y - self.spacing
        };
    }

    pub fn into_element(self, kind: ElementKind) -> LayoutElement {
        LayoutElement::with_children(kind, self.bounds, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_to_center() {
        let anchor = LayoutBox::new(10.0, 0.0, 6.0, 2.0);
        let dot = LayoutElement::space(1.0, 1.0);
        let placed = AnchoredGroup::new(anchor, dot)
            .with_alignment(Alignment::Center)
            .layout();
        assert_eq!(placed.bounds.x, 12.5);
        let placed = AnchoredGroup::new(anchor, LayoutElement::space(1.0, 1.0)).layout();
        assert_eq!(placed.bounds.x, 10.0);
    }

    #[test]
    fn test_stacked() {
        let mut stack = StackedGroup::new(2.0).with_alignment(Alignment::Center);
        stack.add_element(LayoutElement::space(10.0, 3.0));
        stack.add_element(LayoutElement::space(4.0, 1.0));
        stack.layout();
        let element = stack.into_element(ElementKind::Group);
        assert_eq!(element.bounds, LayoutBox::sized(10.0, 6.0));
        assert_eq!(element.children[1].bounds, LayoutBox::new(3.0, 5.0, 4.0, 1.0));
    }
}
