//! Page sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named regions of the portfolio page, in page order.
///
/// The declaration order is the enumeration order used for active-section
/// resolution; `ALL` mirrors it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    #[default]
    About,
    Skills,
    Projects,
    Experience,
    Education,
    Contact,
}

impl SectionId {
    pub const ALL: [Self; 6] = [
        Self::About,
        Self::Skills,
        Self::Projects,
        Self::Experience,
        Self::Education,
        Self::Contact,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in the fixed enumeration order
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable lowercase identifier
    pub const fn slug(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Contact => "contact",
        }
    }

    /// Navigation label
    pub const fn title(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Skills => "Skills",
            Self::Projects => "Projects",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Contact => "Contact",
        }
    }

    /// Following section, wrapping from the last to the first
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Preceding section, wrapping from the first to the last
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|section| section.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}
