//! Navigation state: the menu toggle and scroll-to-section requests

use tracing::warn;

use crate::layout::SectionLayout;
use crate::section::SectionId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    menu_open: bool,
}

impl Navigator {
    pub const fn new() -> Self {
        Self { menu_open: false }
    }

    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Resolve a navigation click to the offset to scroll to.
    ///
    /// The menu closes either way; a section that has not been laid out is a
    /// no-op.
    pub fn scroll_to_section<L>(&mut self, section: SectionId, layout: &L) -> Option<u32>
    where
        L: SectionLayout + ?Sized,
    {
        self.close_menu();
        let bounds = layout.bounds(section);
        if bounds.is_none() {
            warn!(%section, "navigation to a section that is not laid out");
        }
        bounds.map(|bounds| bounds.top)
    }
}
