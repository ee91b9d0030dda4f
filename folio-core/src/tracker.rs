//! Active-section tracking from the scroll position
//!
//! The probe point is the scroll offset plus a fixed lookahead, so a section
//! becomes active slightly before its top reaches the top of the viewport.
//! Sections are tested in enumeration order and the first whose interval
//! contains the probe wins; when nothing matches the previous value stays.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::bus::{ScrollBus, ScrollEvent, Subscription};
use crate::layout::SectionLayout;
use crate::section::SectionId;

/// Find the first section, in enumeration order, containing `probe`.
///
/// Sections without geometry are skipped.
pub fn locate_section<L>(probe: u64, layout: &L) -> Option<SectionId>
where
    L: SectionLayout + ?Sized,
{
    SectionId::ALL.iter().copied().find(|section| {
        layout
            .bounds(*section)
            .is_some_and(|bounds| bounds.contains(probe))
    })
}

/// Scroll tracker state: the lookahead and the last active section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTracker {
    lookahead: u32,
    active: SectionId,
}

impl ScrollTracker {
    /// Lookahead used when none is configured, in document units
    pub const DEFAULT_LOOKAHEAD: u32 = 100;

    pub const fn new(lookahead: u32) -> Self {
        Self {
            lookahead,
            active: SectionId::About,
        }
    }

    pub const fn lookahead(&self) -> u32 {
        self.lookahead
    }

    pub const fn active(&self) -> SectionId {
        self.active
    }

    /// Re-evaluate for a new scroll offset and return the active section
    pub fn on_scroll<L>(&mut self, offset: u32, layout: &L) -> SectionId
    where
        L: SectionLayout + ?Sized,
    {
        let probe = u64::from(offset) + u64::from(self.lookahead);
        if let Some(section) = locate_section(probe, layout) {
            if section != self.active {
                debug!(from = %self.active, to = %section, offset, "active section changed");
                self.active = section;
            }
        }
        self.active
    }

    /// Attach to a scroll bus.
    ///
    /// The tracker moves into the subscription's listener, which becomes the
    /// only writer of the active-section cell; readers get [`ActiveSection`]
    /// handles from the returned [`MountedTracker`].
    pub fn mount(self, bus: &ScrollBus) -> MountedTracker {
        let cell = Rc::new(Cell::new(self.active));
        let writer = Rc::clone(&cell);
        let mut tracker = self;

        let subscription = bus.subscribe(move |event: &ScrollEvent<'_>| {
            writer.set(tracker.on_scroll(event.offset, event.layout));
        });

        MountedTracker {
            active: ActiveSection { cell },
            _subscription: subscription,
        }
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOOKAHEAD)
    }
}

/// Read-only view of the active section
#[derive(Debug, Clone)]
pub struct ActiveSection {
    cell: Rc<Cell<SectionId>>,
}

impl ActiveSection {
    pub fn get(&self) -> SectionId {
        self.cell.get()
    }

    pub fn is(&self, section: SectionId) -> bool {
        self.get() == section
    }
}

/// A tracker attached to a bus; detaches when dropped
#[derive(Debug)]
pub struct MountedTracker {
    active: ActiveSection,
    _subscription: Subscription,
}

impl MountedTracker {
    /// Reader handle for navigation highlighting
    pub fn active(&self) -> ActiveSection {
        self.active.clone()
    }

    pub fn current(&self) -> SectionId {
        self.active.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PageLayout, SectionBounds};

    fn two_section_layout() -> PageLayout {
        PageLayout::new()
            .with(SectionId::About, SectionBounds::new(0, 800))
            .with(SectionId::Skills, SectionBounds::new(800, 800))
    }

    #[test]
    fn test_lookahead_moves_into_next_section() {
        let layout = two_section_layout();
        let mut tracker = ScrollTracker::new(100);

        assert_eq!(tracker.on_scroll(750, &layout), SectionId::Skills);
    }

    #[test]
    fn test_starts_on_about() {
        assert_eq!(ScrollTracker::default().active(), SectionId::About);
        assert_eq!(ScrollTracker::default().lookahead(), 100);
    }

    #[test]
    fn test_no_match_retains_previous() {
        let layout = two_section_layout();
        let mut tracker = ScrollTracker::new(100);

        tracker.on_scroll(900, &layout);
        assert_eq!(tracker.active(), SectionId::Skills);

        // probe 5100 is past every section
        assert_eq!(tracker.on_scroll(5000, &layout), SectionId::Skills);
    }

    #[test]
    fn test_overlap_first_in_order_wins() {
        let layout = PageLayout::new()
            .with(SectionId::Projects, SectionBounds::new(0, 500))
            .with(SectionId::Skills, SectionBounds::new(200, 500));
        let mut tracker = ScrollTracker::new(0);

        // skills precedes projects in enumeration order
        assert_eq!(tracker.on_scroll(300, &layout), SectionId::Skills);
        assert_eq!(tracker.on_scroll(100, &layout), SectionId::Projects);
    }

    #[test]
    fn test_missing_sections_are_skipped() {
        let layout = PageLayout::new().with(SectionId::Contact, SectionBounds::new(0, 10));
        assert_eq!(locate_section(5, &layout), Some(SectionId::Contact));
        assert_eq!(locate_section(10, &layout), None);
    }

    #[test]
    fn test_probe_does_not_overflow() {
        let layout = PageLayout::new().with(SectionId::Education, SectionBounds::new(u32::MAX, 10));
        let mut tracker = ScrollTracker::new(u32::MAX);
        assert_eq!(tracker.on_scroll(1, &layout), SectionId::Education);
    }

    #[test]
    fn test_mounted_tracker_follows_bus_and_detaches() {
        let bus = ScrollBus::new();
        let layout = two_section_layout();
        let mounted = ScrollTracker::new(100).mount(&bus);
        let reader = mounted.active();

        bus.emit(&ScrollEvent { offset: 750, layout: &layout });
        assert!(reader.is(SectionId::Skills));

        bus.emit(&ScrollEvent { offset: 0, layout: &layout });
        assert_eq!(mounted.current(), SectionId::About);

        drop(mounted);
        assert_eq!(bus.listener_count(), 0);

        // the reader outlives the mount but no longer changes
        bus.emit(&ScrollEvent { offset: 900, layout: &layout });
        assert_eq!(reader.get(), SectionId::About);
    }
}
