//! Section geometry within the scrollable document

use serde::{Deserialize, Serialize};

use crate::section::SectionId;

/// Vertical extent of a section: `[top, top + height)` in document rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub top: u32,
    pub height: u32,
}

impl SectionBounds {
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    /// Exclusive bottom edge, computed without overflow
    pub const fn bottom(self) -> u64 {
        self.top as u64 + self.height as u64
    }

    /// Whether `position` falls inside the half-open interval
    pub const fn contains(self, position: u64) -> bool {
        position >= self.top as u64 && position < self.bottom()
    }
}

/// Source of section geometry, as the host currently lays the page out.
///
/// `None` means the section has not been laid out yet.
pub trait SectionLayout {
    fn bounds(&self, section: SectionId) -> Option<SectionBounds>;
}

/// Geometry of every section, indexed by enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    sections: [Option<SectionBounds>; SectionId::COUNT],
}

impl PageLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: SectionId, bounds: SectionBounds) {
        self.sections[section.index()] = Some(bounds);
    }

    pub fn clear(&mut self, section: SectionId) {
        self.sections[section.index()] = None;
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, section: SectionId, bounds: SectionBounds) -> Self {
        self.set(section, bounds);
        self
    }

    /// Laid-out sections in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, SectionBounds)> + '_ {
        SectionId::ALL
            .iter()
            .filter_map(|section| self.bounds(*section).map(|bounds| (*section, bounds)))
    }
}

impl SectionLayout for PageLayout {
    fn bounds(&self, section: SectionId) -> Option<SectionBounds> {
        self.sections[section.index()]
    }
}

impl<L: SectionLayout + ?Sized> SectionLayout for &L {
    fn bounds(&self, section: SectionId) -> Option<SectionBounds> {
        (**self).bounds(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_interval() {
        let bounds = SectionBounds::new(800, 800);
        assert!(!bounds.contains(799));
        assert!(bounds.contains(800));
        assert!(bounds.contains(1599));
        assert!(!bounds.contains(1600));
    }

    #[test]
    fn test_zero_height_contains_nothing() {
        assert!(!SectionBounds::new(10, 0).contains(10));
    }

    #[test]
    fn test_bottom_does_not_overflow() {
        let bounds = SectionBounds::new(u32::MAX, u32::MAX);
        assert_eq!(bounds.bottom(), u64::from(u32::MAX) * 2);
        assert!(bounds.contains(u64::from(u32::MAX) + 1));
    }

    #[test]
    fn test_layout_lookup() {
        let mut layout = PageLayout::new().with(SectionId::Skills, SectionBounds::new(5, 10));
        assert_eq!(layout.bounds(SectionId::Skills), Some(SectionBounds::new(5, 10)));
        assert_eq!(layout.bounds(SectionId::About), None);

        layout.clear(SectionId::Skills);
        assert_eq!(layout.iter().count(), 0);
    }
}
