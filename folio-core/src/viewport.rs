//! Scrollable document viewport

use tracing::trace;

use crate::bus::{ScrollBus, ScrollEvent};
use crate::layout::PageLayout;

/// Owns the scroll offset of the page and announces every change on its bus
#[derive(Debug)]
pub struct Viewport {
    offset: u32,
    view_height: u32,
    document_height: u32,
    layout: PageLayout,
    bus: ScrollBus,
}

impl Viewport {
    pub fn new(bus: ScrollBus) -> Self {
        Self {
            offset: 0,
            view_height: 0,
            document_height: 0,
            layout: PageLayout::new(),
            bus,
        }
    }

    pub const fn offset(&self) -> u32 {
        self.offset
    }

    pub const fn view_height(&self) -> u32 {
        self.view_height
    }

    pub const fn document_height(&self) -> u32 {
        self.document_height
    }

    pub const fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub const fn bus(&self) -> &ScrollBus {
        &self.bus
    }

    /// Largest offset that still fills the view
    pub const fn max_offset(&self) -> u32 {
        self.document_height.saturating_sub(self.view_height)
    }

    /// Replace the page geometry after a re-render or resize.
    ///
    /// The offset is re-clamped and the current position is announced so
    /// listeners see the new geometry.
    pub fn relayout(&mut self, layout: PageLayout, document_height: u32, view_height: u32) {
        self.layout = layout;
        self.document_height = document_height;
        self.view_height = view_height;
        self.offset = self.offset.min(self.max_offset());
        self.announce();
    }

    /// Move to an absolute offset; returns whether the position changed
    pub fn scroll_to(&mut self, offset: u32) -> bool {
        let clamped = offset.min(self.max_offset());
        if clamped == self.offset {
            return false;
        }
        self.offset = clamped;
        self.announce();
        true
    }

    /// Move by a signed number of rows
    pub fn scroll_by(&mut self, delta: i64) -> bool {
        let target = (i64::from(self.offset) + delta).clamp(0, i64::from(u32::MAX));
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX))
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(i64::from(self.view_height.max(1)))
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-i64::from(self.view_height.max(1)))
    }

    pub fn home(&mut self) -> bool {
        self.scroll_to(0)
    }

    pub fn end(&mut self) -> bool {
        self.scroll_to(self.max_offset())
    }

    fn announce(&self) {
        trace!(offset = self.offset, "scroll");
        self.bus.emit(&ScrollEvent {
            offset: self.offset,
            layout: &self.layout,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SectionBounds;
    use crate::section::SectionId;
    use crate::tracker::ScrollTracker;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_viewport() -> (Viewport, Rc<RefCell<Vec<u32>>>, crate::bus::Subscription) {
        let bus = ScrollBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = bus.subscribe(move |e| sink.borrow_mut().push(e.offset));
        (Viewport::new(bus), seen, subscription)
    }

    #[test]
    fn test_clamps_and_emits_only_on_change() {
        let (mut viewport, seen, _sub) = recording_viewport();
        viewport.relayout(PageLayout::new(), 100, 20);
        seen.borrow_mut().clear();

        assert!(viewport.scroll_to(500));
        assert_eq!(viewport.offset(), 80);
        assert!(!viewport.scroll_to(90));
        assert!(viewport.scroll_by(-100));
        assert_eq!(viewport.offset(), 0);
        assert!(!viewport.scroll_by(-1));

        assert_eq!(*seen.borrow(), vec![80, 0]);
    }

    #[test]
    fn test_short_document_cannot_scroll() {
        let (mut viewport, _seen, _sub) = recording_viewport();
        viewport.relayout(PageLayout::new(), 10, 40);
        assert_eq!(viewport.max_offset(), 0);
        assert!(!viewport.page_down());
    }

    #[test]
    fn test_relayout_reclamps_and_announces() {
        let (mut viewport, seen, _sub) = recording_viewport();
        viewport.relayout(PageLayout::new(), 200, 20);
        viewport.end();
        assert_eq!(viewport.offset(), 180);

        viewport.relayout(PageLayout::new(), 100, 20);
        assert_eq!(viewport.offset(), 80);
        assert_eq!(seen.borrow().last(), Some(&80));
    }

    #[test]
    fn test_paging() {
        let (mut viewport, _seen, _sub) = recording_viewport();
        viewport.relayout(PageLayout::new(), 100, 30);
        viewport.page_down();
        assert_eq!(viewport.offset(), 30);
        viewport.page_up();
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn test_tracker_sees_viewport_scrolls() {
        let bus = ScrollBus::new();
        let tracker = ScrollTracker::new(2).mount(&bus);
        let mut viewport = Viewport::new(bus);

        let layout = PageLayout::new()
            .with(SectionId::About, SectionBounds::new(0, 10))
            .with(SectionId::Skills, SectionBounds::new(10, 10))
            .with(SectionId::Projects, SectionBounds::new(20, 30));
        viewport.relayout(layout, 50, 10);

        viewport.scroll_to(8);
        assert_eq!(tracker.current(), SectionId::Skills);
        viewport.end();
        assert_eq!(tracker.current(), SectionId::Projects);
        viewport.home();
        assert_eq!(tracker.current(), SectionId::About);
    }
}
