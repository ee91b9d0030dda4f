//! Static portfolio content
//!
//! The page content is plain data: a profile, headline stats that drive the
//! animated counters, and the entries of each section. A built-in document is
//! embedded in the binary; a user file in any supported format may replace
//! it. Text fields are whitespace-normalised on load.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use folio_utils::config::{from_str, load_config};
use folio_utils::{normalize_whitespace, DocumentFormat};

use crate::counter::CounterSpec;
use crate::{Error, Result};

const BUILTIN_PORTFOLIO: &str = include_str!("../content/portfolio.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub initials: String,
    pub headline: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: String,
}

/// A headline number shown with an animated counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: u64,
    #[serde(default)]
    pub suffix: String,
}

impl Stat {
    pub fn counter_spec(&self, duration: Duration) -> CounterSpec {
        CounterSpec::new(self.value)
            .with_duration(duration)
            .with_suffix(self.suffix.clone())
    }
}

/// Styling family of a skill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Frontend,
    Backend,
    Blockchain,
    Tools,
}

impl SkillKind {
    /// Unknown category names are styled like tools
    pub fn from_category(category: &str) -> Self {
        match category.trim().to_ascii_lowercase().as_str() {
            "frontend" => Self::Frontend,
            "backend" => Self::Backend,
            "blockchain" => Self::Blockchain,
            _ => Self::Tools,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl SkillCategory {
    pub fn kind(&self) -> SkillKind {
        SkillKind::from_category(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub period: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thesis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default = "default_contact_heading")]
    pub heading: String,
    #[serde(default)]
    pub prompt: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

fn default_contact_heading() -> String {
    "Let's Connect".to_string()
}

impl Portfolio {
    /// The portfolio compiled into the binary
    pub fn builtin() -> Result<Self> {
        let portfolio: Self = from_str(BUILTIN_PORTFOLIO, DocumentFormat::Toml)?;
        Ok(portfolio.normalized())
    }

    /// Load a content file; the format follows the extension
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading portfolio content from {}", path.display());
        let portfolio: Self = load_config(path)?;
        let portfolio = portfolio.normalized();
        portfolio.validate()?;
        debug!(
            projects = portfolio.projects.len(),
            stats = portfolio.stats.len(),
            "portfolio content loaded"
        );
        Ok(portfolio)
    }

    /// The given file when present, otherwise the built-in content
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::builtin, Self::load)
    }

    /// Reject content the page cannot render sensibly
    pub fn validate(&self) -> Result<()> {
        if self.profile.name.is_empty() {
            return Err(Error::Content("profile name must not be empty".to_string()));
        }
        if self.contact.email.is_empty() {
            return Err(Error::Content("contact email must not be empty".to_string()));
        }
        if let Some(stat) = self.stats.iter().find(|stat| stat.label.is_empty()) {
            return Err(Error::Content(format!(
                "stat with value {} has no label",
                stat.value
            )));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Content(format!("JSON export failed: {e}")))
    }

    /// Write the content as pretty JSON
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)?;
        info!("Exported portfolio content to {}", path.display());
        Ok(())
    }

    pub fn footer_text(&self, year: i32) -> String {
        format!(
            "© {year} {}. Crafted with passion for innovation.",
            self.profile.name
        )
    }

    /// Counter specs for the headline stats, in display order
    pub fn counter_specs(&self, duration: Duration) -> Vec<CounterSpec> {
        self.stats
            .iter()
            .map(|stat| stat.counter_spec(duration))
            .collect()
    }

    fn normalized(mut self) -> Self {
        let clean = |text: &mut String| *text = normalize_whitespace(text);
        let clean_all = |items: &mut Vec<String>| items.iter_mut().for_each(clean);

        clean(&mut self.profile.name);
        clean(&mut self.profile.initials);
        clean(&mut self.profile.headline);
        clean(&mut self.profile.tagline);
        clean(&mut self.profile.about);

        for stat in &mut self.stats {
            clean(&mut stat.label);
            clean(&mut stat.suffix);
        }
        for category in &mut self.skills {
            clean(&mut category.category);
            clean_all(&mut category.items);
        }
        for project in &mut self.projects {
            clean(&mut project.title);
            clean(&mut project.description);
            clean_all(&mut project.details);
            if let Some(impact) = project.impact.as_mut() {
                clean(impact);
            }
            clean_all(&mut project.technologies);
        }
        for entry in &mut self.experience {
            clean(&mut entry.company);
            clean(&mut entry.position);
            clean(&mut entry.period);
            clean(&mut entry.description);
        }
        for entry in &mut self.education {
            clean(&mut entry.degree);
            clean(&mut entry.institution);
            clean(&mut entry.period);
            if let Some(thesis) = entry.thesis.as_mut() {
                clean(thesis);
            }
        }

        clean(&mut self.contact.heading);
        clean(&mut self.contact.prompt);
        clean(&mut self.contact.email);
        if let Some(phone) = self.contact.phone.as_mut() {
            clean(phone);
        }
        for link in &mut self.contact.links {
            clean(&mut link.label);
            clean(&mut link.url);
        }
        self
    }
}
