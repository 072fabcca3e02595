use crate::layout::element::{ElementKind, LayoutElement, LayoutNode};
use crate::layout::layout_box::LayoutBox;

// tolerance when comparing accumulated sizes against the available space
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Offset of an item of size `size` aligned inside `available`.
    pub fn offset(self, available: f64, size: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => (available - size) / 2.0,
            Self::End => available - size,
        }
    }
}

/// Per child layout hint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexProps {
    /// Share of the leftover main axis space, `None` does not stretch.
    pub factor: Option<f64>,
}

/// One axis layout of children with stretch factors and optional wrapping.
///
/// The main axis size of `bounds` is the space available to the children,
/// the cross axis size is computed by `layout`.
#[derive(Debug, Clone)]
pub struct FlexGroup<T> {
    pub bounds: LayoutBox,
    axis: Axis,
    gap: f64,
    wrap: bool,
    cross_axis_alignment: Alignment,
    main_axis_space_distribution: Alignment,
    children: Vec<(T, FlexProps)>,
}

impl<T: LayoutNode> FlexGroup<T> {
    pub const fn new(bounds: LayoutBox, axis: Axis) -> Self {
        Self {
            bounds,
            axis,
            gap: 0.0,
            wrap: false,
            cross_axis_alignment: Alignment::Start,
            main_axis_space_distribution: Alignment::Start,
            children: Vec::new(),
        }
    }

    pub const fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub const fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub const fn with_cross_axis_alignment(mut self, alignment: Alignment) -> Self {
        self.cross_axis_alignment = alignment;
        self
    }

    pub const fn with_main_axis_space_distribution(mut self, distribution: Alignment) -> Self {
        self.main_axis_space_distribution = distribution;
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &T> {
        self.children.iter().map(|(element, _)| element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.children.iter_mut().map(|(element, _)| element)
    }

    pub fn into_parts(self) -> (LayoutBox, Vec<T>) {
        let children = self.children.into_iter().map(|(e, _)| e).collect();
        (self.bounds, children)
    }

    pub fn reset(&mut self) {
        self.children.clear();
    }

    fn main_size(&self, b: &LayoutBox) -> f64 {
        match self.axis {
            Axis::Horizontal => b.width,
            Axis::Vertical => b.height,
        }
    }

    fn cross_size(&self, b: &LayoutBox) -> f64 {
        match self.axis {
            Axis::Horizontal => b.height,
            Axis::Vertical => b.width,
        }
    }

    fn set_main(&self, b: &mut LayoutBox, position: f64, size: f64) {
        match self.axis {
            Axis::Horizontal => {
                b.x = position;
                b.width = size;
            }
            Axis::Vertical => {
                b.y = position;
                b.height = size;
            }
        }
    }

    fn set_cross_position(&self, b: &mut LayoutBox, position: f64) {
        match self.axis {
            Axis::Horizontal => b.y = position,
            Axis::Vertical => b.x = position,
        }
    }

    /// Space available along the main axis.
    pub fn available(&self) -> f64 {
        self.main_size(&self.bounds)
    }

    /// Sum of the children sizes and gaps along the main axis.
    pub fn natural_main_size(&self) -> f64 {
        self.run_size(&self.children)
    }

    fn run_size(&self, run: &[(T, FlexProps)]) -> f64 {
        let sizes: f64 = run.iter().map(|(e, _)| self.main_size(e.bounds())).sum();
        sizes + self.gap * run.len().saturating_sub(1) as f64
    }

    pub fn remaining_main_space(&self) -> f64 {
        let used = self.natural_main_size();
        if self.children.is_empty() {
            self.available()
        } else {
            self.available() - used - self.gap
        }
    }

    /// Whether a child of the given main axis size fits after the existing children.
    pub fn fits(&self, main_size: f64) -> bool {
        main_size <= self.remaining_main_space() + EPSILON
    }

    /// Appends the element right after the previous child.
    pub fn add_element(&mut self, mut element: T, factor: Option<f64>) {
        let start = match self.children.last() {
            Some((last, _)) => {
                let b = last.bounds();
                match self.axis {
                    Axis::Horizontal => b.right(),
                    Axis::Vertical => b.bottom(),
                }
            }
            None => 0.0,
        };
        let position = if self.children.is_empty() {
            start
        } else {
            start + self.gap
        };
        let size = self.main_size(element.bounds());
        self.set_main(element.bounds_mut(), position, size);
        self.set_cross_position(element.bounds_mut(), 0.0);
        self.children.push((element, FlexProps { factor }));
    }

    /// Appends the element if it fits, otherwise hands it back untouched.
    ///
    /// A wrapping group never rejects: an element that does not fit the
    /// current run starts a new one during `layout`.
    pub fn try_add_element(&mut self, element: T, factor: Option<f64>) -> Result<(), T> {
        if self.wrap || self.fits(self.main_size(element.bounds())) {
            self.add_element(element, factor);
            Ok(())
        } else {
            Err(element)
        }
    }

    /// Resizes the main axis to the natural size of the children.
    pub fn fit_to_content(&mut self) {
        let size = self.natural_main_size();
        match self.axis {
            Axis::Horizontal => self.bounds.width = size,
            Axis::Vertical => self.bounds.height = size,
        }
    }

    /// Groups the children in packing runs, as ranges of indexes.
    fn runs(&self) -> Vec<std::ops::Range<usize>> {
        if !self.wrap {
            return vec![0..self.children.len()];
        }
        let available = self.available();
        let mut runs = Vec::new();
        let mut start = 0;
        let mut run_size = 0.0;
        for (index, (element, _)) in self.children.iter().enumerate() {
            let size = self.main_size(element.bounds());
            if index == start {
                // a child too large for an empty run is still placed alone
                run_size = size;
                continue;
            }
            if run_size + self.gap + size > available + EPSILON {
                runs.push(start..index);
                start = index;
                run_size = size;
            } else {
                run_size += self.gap + size;
            }
        }
        runs.push(start..self.children.len());
        runs
    }

    pub fn layout(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let available = self.available();
        let mut cross_offset = 0.0;
        let runs = self.runs();
        let run_count = runs.len();
        for run in runs {
            let leftover = available - self.run_size(&self.children[run.clone()]);
            let factor_sum: f64 = self.children[run.clone()]
                .iter()
                .filter_map(|(_, props)| props.factor)
                .filter(|f| *f > 0.0)
                .sum();
            let mut position = if factor_sum > 0.0 {
                0.0
            } else {
                self.main_axis_space_distribution.offset(available, available - leftover)
            };
            let run_cross_size = self.children[run.clone()]
                .iter()
                .map(|(e, _)| self.cross_size(e.bounds()))
                .fold(0.0, f64::max);
            for index in run {
                let (element, props) = &mut self.children[index];
                let mut size = match self.axis {
                    Axis::Horizontal => element.bounds().width,
                    Axis::Vertical => element.bounds().height,
                };
                if factor_sum > 0.0 {
                    if let Some(factor) = props.factor.filter(|f| *f > 0.0) {
                        size = (size + leftover * factor / factor_sum).max(0.0);
                    }
                }
                let cross = match self.axis {
                    Axis::Horizontal => element.bounds().height,
                    Axis::Vertical => element.bounds().width,
                };
                let cross_position =
                    cross_offset + self.cross_axis_alignment.offset(run_cross_size, cross);
                let b = element.bounds_mut();
                match self.axis {
                    Axis::Horizontal => {
                        b.x = position;
                        b.width = size;
                        b.y = cross_position;
                    }
                    Axis::Vertical => {
                        b.y = position;
                        b.height = size;
                        b.x = cross_position;
                    }
                }
                element.layout();
                position += size + self.gap;
            }
            cross_offset += run_cross_size + self.gap;
        }
        let cross_size = cross_offset - self.gap;
        log::trace!("flex group laid out in {run_count} run(s), cross size {cross_size}");
        match self.axis {
            Axis::Horizontal => self.bounds.height = cross_size,
            Axis::Vertical => self.bounds.width = cross_size,
        }
    }
}

impl FlexGroup<LayoutElement> {
    pub fn into_element(self, kind: ElementKind) -> LayoutElement {
        let (bounds, children) = self.into_parts();
        LayoutElement::with_children(kind, bounds, children)
    }
}
