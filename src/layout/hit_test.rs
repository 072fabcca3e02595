use crate::layout::element::{ElementPath, ElementType, LayoutElement};

/// Element found under a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    /// Path from the root passed to `hit_test`
    pub path: ElementPath,
    pub element: &'a LayoutElement,
}

/// Finds the topmost element containing the point.
///
/// The point is expressed in the coordinate space of the root's parent.
/// Children drawn last are tested first and groups are never selected
/// themselves, only their leaves.
pub fn hit_test(x: f64, y: f64, root: &LayoutElement) -> Option<Hit<'_>> {
    let mut path = Vec::new();
    hit_element(x, y, root, &mut path).map(|element| Hit { path, element })
}

fn hit_element<'a>(
    x: f64,
    y: f64,
    element: &'a LayoutElement,
    path: &mut ElementPath,
) -> Option<&'a LayoutElement> {
    if !element.bounds.contains(x, y) {
        return None;
    }
    let (local_x, local_y) = (x - element.bounds.x, y - element.bounds.y);
    for (index, child) in element.children.iter().enumerate().rev() {
        path.push(index);
        if let Some(hit) = hit_element(local_x, local_y, child, path) {
            return Some(hit);
        }
        path.pop();
    }
    if element.is_type(ElementType::Group) {
        None
    } else {
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::ElementKind;
    use crate::layout::layout_box::LayoutBox;
    use crate::notation::ChordRef;

    fn tree() -> LayoutElement {
        let note = LayoutElement::new(
            ElementKind::Note {
                chord: ChordRef::new(0, 0),
                note: 0,
                string: 1,
                label: "3".to_string(),
            },
            LayoutBox::new(0.0, 0.0, 4.0, 2.5),
        );
        let chord = LayoutElement::with_children(
            ElementKind::Chord {
                chord: ChordRef::new(0, 0),
            },
            LayoutBox::new(10.0, 0.0, 4.0, 15.0),
            vec![note],
        );
        let group = LayoutElement::group(
            LayoutBox::new(5.0, 5.0, 50.0, 15.0),
            vec![LayoutElement::space(2.0, 15.0), chord],
        );
        LayoutElement::with_children(
            ElementKind::PageLine,
            LayoutBox::new(12.0, 12.0, 186.0, 30.0),
            vec![group],
        )
    }

    #[test]
    fn test_hit_leaf_through_nested_coordinates() {
        let root = tree();
        // line (12, 12) + group (5, 5) + chord (10, 0) + note (0, 0)
        let hit = hit_test(28.0, 18.0, &root).unwrap();
        assert_eq!(hit.path, vec![0, 1, 0]);
        assert_eq!(hit.element.element_type(), ElementType::Note);
    }

    #[test]
    fn test_point_outside_root() {
        let root = tree();
        assert!(hit_test(0.0, 0.0, &root).is_none());
    }

    #[test]
    fn test_group_is_not_selectable() {
        let root = tree();
        // inside the group only, hits the line itself
        let hit = hit_test(60.0, 30.0, &root).unwrap();
        assert!(hit.path.is_empty());
        assert_eq!(hit.element.element_type(), ElementType::PageLine);

        let group = root.children[0].clone();
        assert!(hit_test(40.0, 10.0, &group).is_none());
    }

    #[test]
    fn test_hit_inside_chord_below_notes() {
        let root = tree();
        let hit = hit_test(28.0, 28.0, &root).unwrap();
        assert_eq!(hit.path, vec![0, 1]);
        assert_eq!(hit.element.element_type(), ElementType::Chord);
    }

    #[test]
    fn test_absolute_bounds_of_hit() {
        let root = tree();
        let hit = hit_test(17.5, 30.0, &root).unwrap();
        assert_eq!(hit.element.element_type(), ElementType::Space);
        let bounds = root.absolute_bounds(&hit.path).unwrap();
        assert_eq!(bounds, LayoutBox::new(17.0, 17.0, 2.0, 15.0));
    }
}
