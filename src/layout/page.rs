//! Pagination of the lines of a part.

use std::mem;

use crate::config::{LayoutConfig, LayoutMode};
use crate::layout::anchored_group::StackedGroup;
use crate::layout::constants::{HEADER_FONT_SIZE, SUBTITLE_FONT_SIZE, TITLE_FONT_SIZE};
use crate::layout::element::{ElementKind, LayoutElement};
use crate::layout::flex_group::{Alignment, Axis, FlexGroup};
use crate::layout::layout_box::LayoutBox;
use crate::notation::{Part, Score};

/// A sheet with margins holding a vertical flow of lines.
#[derive(Debug)]
pub struct Page {
    pub bounds: LayoutBox,
    number: usize,
    content: FlexGroup<LayoutElement>,
}

impl Page {
    pub fn new(number: usize, x: f64, y: f64, config: &LayoutConfig) -> Self {
        let content_bounds = LayoutBox::new(
            config.page_margin,
            config.page_margin,
            config.content_width(),
            config.content_height(),
        );
        Page {
            bounds: LayoutBox::new(x, y, config.page_width, config.page_height),
            number,
            content: FlexGroup::new(content_bounds, Axis::Vertical).with_gap(config.line_gap),
        }
    }

    pub const fn number(&self) -> usize {
        self.number
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Adds the line (or header) if there is room left for it.
    pub fn try_add_element(&mut self, element: LayoutElement) -> Result<(), LayoutElement> {
        self.content.try_add_element(element, None)
    }

    /// Adds the element, overflowing the page if needed.
    pub fn add_element(&mut self, element: LayoutElement) {
        if !self.content.fits(element.bounds.height) {
            log::warn!(
                "Element of height {} overflows page {} ({} left)",
                element.bounds.height,
                self.number,
                self.content.remaining_main_space()
            );
        }
        self.content.add_element(element, None);
    }

    pub fn layout(&mut self) {
        let width = self.content.bounds.width;
        self.content.layout();
        self.content.bounds.width = width;
    }

    pub fn into_element(self) -> LayoutElement {
        let content = self.content.into_element(ElementKind::Group);
        LayoutElement::with_children(
            ElementKind::Page {
                number: self.number,
            },
            self.bounds,
            vec![content],
        )
    }
}

/// Collects the lines of a part, as pages or as a continuous flow.
#[derive(Debug)]
pub struct PartLayout {
    index: usize,
    config: LayoutConfig,
    pages: Vec<Page>,
    current: Page,
    flow: StackedGroup,
}

impl PartLayout {
    pub fn new(index: usize, config: &LayoutConfig) -> Self {
        PartLayout {
            index,
            config: config.clone(),
            pages: Vec::new(),
            current: Page::new(1, config.page_margin, config.page_margin, config),
            flow: StackedGroup::new(0.0),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Appends a finalized line or header, starting a new page when it does not fit.
    pub fn push_element(&mut self, element: LayoutElement) {
        if self.config.mode == LayoutMode::Compact {
            self.flow.add_element(element);
            return;
        }
        if self.current.is_empty() {
            self.current.add_element(element);
            return;
        }
        if let Err(element) = self.current.try_add_element(element) {
            self.seal_page();
            self.current.add_element(element);
        }
    }

    /// Lays out the current page and starts the next one right below it.
    fn seal_page(&mut self) {
        let y = self.current.bounds.bottom() + self.config.page_margin;
        let next = Page::new(
            self.current.number() + 1,
            self.config.page_margin,
            y,
            &self.config,
        );
        let mut sealed = mem::replace(&mut self.current, next);
        sealed.layout();
        log::debug!("part {}: page {} sealed", self.index, sealed.number());
        self.pages.push(sealed);
    }

    pub fn into_element(self) -> LayoutElement {
        let kind = ElementKind::Part { index: self.index };
        match self.config.mode {
            LayoutMode::Compact => {
                let mut flow = self.flow;
                flow.layout();
                flow.into_element(kind)
            }
            LayoutMode::Normal => {
                let mut pages = self.pages;
                let mut current = self.current;
                if !current.is_empty() || pages.is_empty() {
                    current.layout();
                    pages.push(current);
                }
                let pages: Vec<LayoutElement> = pages.into_iter().map(Page::into_element).collect();
                let bounds = LayoutBox::encompass_all(pages.iter().map(|p| &p.bounds))
                    .expand(self.config.page_margin);
                LayoutElement::with_children(kind, bounds, pages)
            }
        }
    }
}

/// Title block written at the top of the first page of a part.
pub fn header(score: &Score, part: &Part, width: f64) -> LayoutElement {
    let mut block = FlexGroup::new(LayoutBox::sized(width, 0.0), Axis::Vertical)
        .with_gap(HEADER_FONT_SIZE / 2.0);
    let mut centered = 0;
    if !score.title.is_empty() {
        block.add_element(LayoutElement::text(score.title.as_str(), TITLE_FONT_SIZE), None);
        centered += 1;
    }
    if !score.artist.is_empty() {
        block.add_element(
            LayoutElement::text(score.artist.as_str(), SUBTITLE_FONT_SIZE),
            None,
        );
        centered += 1;
    }
    for comment in &score.comments {
        block.add_element(LayoutElement::text(comment.as_str(), HEADER_FONT_SIZE), None);
        centered += 1;
    }
    let tuning: Vec<&str> = part
        .instrument
        .tuning
        .iter()
        .rev()
        .map(|pitch| pitch.trim_end_matches(|c: char| c.is_ascii_digit() || c == '-'))
        .collect();
    let instrument = format!("{}, Tuning: {}", part.instrument.name, tuning.join(" "));
    block.add_element(LayoutElement::text(instrument, HEADER_FONT_SIZE), None);

    block.fit_to_content();
    block.layout();
    let mut element = block.into_element(ElementKind::Group);
    element.bounds.width = width;
    for line in element.children.iter_mut().take(centered) {
        line.bounds.x = Alignment::Center.offset(width, line.bounds.width);
    }
    element
}
