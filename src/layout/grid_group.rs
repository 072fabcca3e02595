use crate::layout::element::{ElementKind, LayoutElement};
use crate::layout::flex_group::Alignment;
use crate::layout::layout_box::LayoutBox;
use crate::LayoutError;

/// Placement of an element inside a `GridGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constraint {
    pub start_column: usize,
    /// Inclusive
    pub end_column: usize,
    pub must_be_bottom_row: bool,
    /// Only elements of the same group share a row.
    pub group: Option<String>,
    /// Stretch across the columns when `None`.
    pub halign: Option<Alignment>,
    /// Stretch to the row height when `None`.
    pub valign: Option<Alignment>,
}

impl Constraint {
    pub fn column(column: usize) -> Self {
        Self::span(column, column)
    }

    pub fn span(start_column: usize, end_column: usize) -> Self {
        Constraint {
            start_column,
            end_column,
            ..Default::default()
        }
    }

    pub fn bottom_row(mut self) -> Self {
        self.must_be_bottom_row = true;
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn halign(mut self, alignment: Alignment) -> Self {
        self.halign = Some(alignment);
        self
    }

    pub fn valign(mut self, alignment: Alignment) -> Self {
        self.valign = Some(alignment);
        self
    }
}

#[derive(Debug)]
struct Row {
    group: Option<String>,
    occupied: Vec<bool>,
    items: Vec<usize>,
}

impl Row {
    fn new(group: Option<String>, columns: usize) -> Self {
        Row {
            group,
            occupied: vec![false; columns],
            items: Vec::new(),
        }
    }

    fn is_free(&self, constraint: &Constraint) -> bool {
        self.occupied[constraint.start_column..=constraint.end_column]
            .iter()
            .all(|o| !o)
    }

    fn occupy(&mut self, index: usize, constraint: &Constraint) {
        self.occupied[constraint.start_column..=constraint.end_column]
            .iter_mut()
            .for_each(|o| *o = true);
        self.items.push(index);
    }
}

/// Column indexed layout packing elements in rows without overlap.
///
/// Rows are created from the bottom up: the first row created is the one
/// closest to what sits below the grid.
#[derive(Debug, Default)]
pub struct GridGroup {
    pub bounds: LayoutBox,
    row_gap: f64,
    left_edges: Vec<f64>,
    elements: Vec<(LayoutElement, Constraint)>,
    /// Rows by creation order, filled by `layout`
    rows: Vec<Row>,
}

impl GridGroup {
    pub fn new(row_gap: f64) -> Self {
        GridGroup {
            row_gap,
            left_edges: vec![0.0],
            ..Default::default()
        }
    }

    /// Column `c` spans from `left_edges[c]` to `left_edges[c + 1]`, the first
    /// column starting at the origin.
    pub fn set_right_edges(&mut self, right_edges: &[f64]) {
        self.left_edges = std::iter::once(0.0)
            .chain(right_edges.iter().copied())
            .collect();
        self.bounds.width = self.left_edges.last().copied().unwrap_or(0.0);
    }

    pub fn column_count(&self) -> usize {
        self.left_edges.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn add_element(
        &mut self,
        element: LayoutElement,
        constraint: Constraint,
    ) -> Result<(), LayoutError> {
        if constraint.start_column > constraint.end_column {
            return Err(LayoutError::InvalidConstraint(format!(
                "start column {} after end column {}",
                constraint.start_column, constraint.end_column
            )));
        }
        if constraint.end_column >= self.column_count() {
            return Err(LayoutError::InvalidConstraint(format!(
                "end column {} outside of the {} columns of the grid",
                constraint.end_column,
                self.column_count()
            )));
        }
        self.elements.push((element, constraint));
        Ok(())
    }

    /// Removes elements and rows, the column edges are kept.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.rows.clear();
        self.bounds.height = 0.0;
    }

    /// First fit packing, most recently created row first.
    fn determine_rows(&mut self) {
        let columns = self.column_count();
        let mut rows: Vec<Row> = Vec::new();

        // bottom row elements first, in rows nothing else may share
        for (index, (_, constraint)) in self.elements.iter().enumerate() {
            if !constraint.must_be_bottom_row {
                continue;
            }
            match rows.iter_mut().rev().find(|r| r.is_free(constraint)) {
                Some(row) => row.occupy(index, constraint),
                None => {
                    let mut row = Row::new(None, columns);
                    row.occupy(index, constraint);
                    rows.push(row);
                }
            }
        }
        for row in &mut rows {
            row.occupied.iter_mut().for_each(|o| *o = true);
        }

        for (index, (_, constraint)) in self.elements.iter().enumerate() {
            if constraint.must_be_bottom_row {
                continue;
            }
            let row = rows
                .iter_mut()
                .rev()
                .find(|r| r.group == constraint.group && r.is_free(constraint));
            match row {
                Some(row) => row.occupy(index, constraint),
                None => {
                    let mut row = Row::new(constraint.group.clone(), columns);
                    row.occupy(index, constraint);
                    rows.push(row);
                }
            }
        }
        self.rows = rows;
    }

    pub fn layout(&mut self) {
        self.determine_rows();
        let mut y = 0.0;
        // newest row on top
        for row in self.rows.iter().rev() {
            let row_height = row
                .items
                .iter()
                .map(|&i| self.elements[i].0.bounds.height)
                .fold(0.0, f64::max);
            for &index in &row.items {
                let (element, constraint) = &mut self.elements[index];
                let left = self.left_edges[constraint.start_column];
                let right = self.left_edges[constraint.end_column + 1];
                let span = right - left;
                let b = &mut element.bounds;
                match constraint.halign {
                    None => {
                        b.x = left;
                        b.width = span.max(0.0);
                    }
                    Some(alignment) => b.x = left + alignment.offset(span, b.width),
                }
                match constraint.valign {
                    None => {
                        b.y = y;
                        b.height = row_height;
                    }
                    Some(alignment) => b.y = y + alignment.offset(row_height, b.height),
                }
            }
            y += row_height + self.row_gap;
        }
        self.bounds.height = if self.rows.is_empty() {
            0.0
        } else {
            y - self.row_gap
        };
        log::trace!(
            "grid group: {} element(s) in {} row(s)",
            self.elements.len(),
            self.rows.len()
        );
    }

    /// Column ranges of the elements of each row, top row first.
    pub fn row_spans(&self) -> Vec<Vec<(usize, usize)>> {
        self.rows
            .iter()
            .rev()
            .map(|row| {
                row.items
                    .iter()
                    .map(|&i| {
                        let c = &self.elements[i].1;
                        (c.start_column, c.end_column)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn into_element(self) -> LayoutElement {
        let children = self.elements.into_iter().map(|(e, _)| e).collect();
        LayoutElement::with_children(ElementKind::Group, self.bounds, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: usize) -> GridGroup {
        let mut grid = GridGroup::new(0.5);
        let edges: Vec<f64> = (1..=columns).map(|c| c as f64 * 10.0).collect();
        grid.set_right_edges(&edges);
        grid
    }

    fn label(text: &str) -> LayoutElement {
        LayoutElement::text(text, 2.0)
    }

    #[test]
    fn test_invalid_constraints_rejected() {
        let mut grid = grid(3);
        let err = grid.add_element(label("a"), Constraint::span(2, 1));
        assert!(matches!(err, Err(LayoutError::InvalidConstraint(_))));
        let err = grid.add_element(label("a"), Constraint::column(3));
        assert!(matches!(err, Err(LayoutError::InvalidConstraint(_))));
        assert!(grid.add_element(label("a"), Constraint::column(2)).is_ok());
    }

    #[test]
    fn test_rows_never_overlap() {
        let mut grid = grid(8);
        let spans = [(0, 3), (2, 4), (5, 5), (4, 6), (1, 1), (0, 7), (6, 7), (3, 3)];
        for (start, end) in spans {
            grid.add_element(label("x"), Constraint::span(start, end))
                .unwrap();
        }
        grid.layout();
        for row in grid.row_spans() {
            for (i, a) in row.iter().enumerate() {
                for b in &row[i + 1..] {
                    assert!(a.1 < b.0 || b.1 < a.0, "{a:?} overlaps {b:?}");
                }
            }
        }
        let placed: usize = grid.row_spans().iter().map(Vec::len).sum();
        assert_eq!(placed, spans.len());
    }

    #[test]
    fn test_bottom_row_is_exclusive_and_lowest() {
        let mut grid = grid(4);
        grid.add_element(label("P.M."), Constraint::span(0, 1))
            .unwrap();
        grid.add_element(
            LayoutElement::space(1.0, 5.0),
            Constraint::column(3).bottom_row(),
        )
        .unwrap();
        grid.layout();
        let spans = grid.row_spans();
        assert_eq!(spans, vec![vec![(0, 1)], vec![(3, 3)]]);
        let element = grid.into_element();
        // palm mute on top, bend row below it
        assert_eq!(element.children[0].bounds.y, 0.0);
        assert_eq!(element.children[1].bounds.y, 2.5);
        assert_eq!(element.bounds.height, 7.5);
    }

    #[test]
    fn test_groups_do_not_share_rows() {
        let mut grid = grid(4);
        grid.add_element(label("let ring"), Constraint::column(0).group("let_ring"))
            .unwrap();
        grid.add_element(label("P.M."), Constraint::column(2).group("palm_mute"))
            .unwrap();
        grid.add_element(label("P.M."), Constraint::column(3).group("palm_mute"))
            .unwrap();
        grid.layout();
        assert_eq!(grid.row_spans(), vec![vec![(2, 2), (3, 3)], vec![(0, 0)]]);
    }

    #[test]
    fn test_alignment_inside_span() {
        let mut grid = grid(3);
        // 2 chars of size 2 → 2.4 wide
        grid.add_element(label("12"), Constraint::span(1, 2).halign(Alignment::End))
            .unwrap();
        grid.add_element(
            LayoutElement::space(1.0, 1.0),
            Constraint::column(0).valign(Alignment::Center),
        )
        .unwrap();
        grid.add_element(label("x"), Constraint::column(0)).unwrap();
        grid.layout();
        let element = grid.into_element();
        let number = &element.children[0];
        assert!((number.bounds.x - 27.6).abs() < 1e-9);
        assert!((number.bounds.width - 2.4).abs() < 1e-9);
        let stretched = &element.children[2];
        assert_eq!(stretched.bounds.x, 0.0);
        assert_eq!(stretched.bounds.width, 10.0);
    }
}
