//! Page composition
//!
//! Lays the portfolio out as a column of terminal rows. Sections are stacked
//! in their fixed order with no gaps, so the section bounds handed to the
//! scroll tracker are exactly the row ranges drawn here. Each headline stat
//! takes one row whatever its counter shows, which keeps the geometry stable
//! while counters animate.

use folio_core::content::{Portfolio, SkillKind};
use folio_core::{PageLayout, SectionBounds, SectionId};
use folio_utils::text::center;
use folio_utils::{display_width, safe_truncate, wrap_to_width};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::config::Palette;

/// The composed document: rows plus the geometry of every section
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub lines: Vec<Line<'static>>,
    pub layout: PageLayout,
    pub width: usize,
}

impl ComposedPage {
    pub fn height(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Plain text with styling dropped, one row per line
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for span in &line.spans {
                out.push_str(&span.content);
            }
            out.push('\n');
        }
        out
    }
}

/// Compose the whole page at `width` columns.
///
/// `counters` holds the current text of each headline stat, in order; stats
/// without a running counter show their final value.
pub fn compose(
    portfolio: &Portfolio,
    counters: &[String],
    width: usize,
    footer_year: i32,
    palette: &Palette,
) -> ComposedPage {
    let mut page = PageBuilder::new(width, *palette);

    page.section(SectionId::About, |b| about(b, portfolio, counters));
    page.section(SectionId::Skills, |b| skills(b, portfolio));
    page.section(SectionId::Projects, |b| projects(b, portfolio));
    page.section(SectionId::Experience, |b| experience(b, portfolio));
    page.section(SectionId::Education, |b| education(b, portfolio));
    page.section(SectionId::Contact, |b| contact(b, portfolio));

    page.blank();
    let footer = portfolio.footer_text(footer_year);
    page.centered(&footer, Style::default().fg(palette.muted));

    page.finish()
}

struct PageBuilder {
    lines: Vec<Line<'static>>,
    layout: PageLayout,
    width: usize,
    palette: Palette,
}

impl PageBuilder {
    fn new(width: usize, palette: Palette) -> Self {
        Self {
            lines: Vec::new(),
            layout: PageLayout::new(),
            width: width.max(1),
            palette,
        }
    }

    fn row(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    fn section(&mut self, id: SectionId, build: impl FnOnce(&mut Self)) {
        let top = self.row();
        build(self);
        self.layout
            .set(id, SectionBounds::new(top, self.row().saturating_sub(top)));
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn push(&mut self, spans: Vec<Span<'static>>) {
        self.lines.push(Line::from(spans));
    }

    fn centered(&mut self, text: &str, style: Style) {
        for line in wrap_to_width(text, self.width) {
            self.lines
                .push(Line::from(Span::styled(center(&line, self.width), style)));
        }
    }

    fn heading(&mut self, title: &str) {
        let style = Style::default()
            .fg(self.palette.heading)
            .add_modifier(Modifier::BOLD);
        self.blank();
        self.centered(title, style);
        let rule = "─".repeat(display_width(title).min(self.width));
        self.centered(&rule, Style::default().fg(self.palette.accent));
        self.blank();
    }

    /// Wrapped paragraph; continuation rows are indented to line up under
    /// the first row's text
    fn paragraph(&mut self, lead: &str, text: &str, style: Style) {
        let indent = display_width(lead);
        let available = self.width.saturating_sub(indent).max(1);
        for (i, line) in wrap_to_width(text, available).into_iter().enumerate() {
            let prefix = if i == 0 {
                lead.to_string()
            } else {
                " ".repeat(indent)
            };
            self.push(vec![Span::raw(prefix), Span::styled(line, style)]);
        }
    }

    /// Tags such as skills or technologies, flowed across rows
    fn tags(&mut self, tags: &[String], style: Style) {
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0;
        for tag in tags {
            let label = safe_truncate(&format!("[{tag}]"), self.width);
            let tag_width = display_width(&label);
            let gap = usize::from(!row.is_empty());
            if used + gap + tag_width > self.width && !row.is_empty() {
                self.push(std::mem::take(&mut row));
                used = 0;
            }
            if !row.is_empty() {
                row.push(Span::raw(" "));
                used += 1;
            }
            row.push(Span::styled(label, style));
            used += tag_width;
        }
        if !row.is_empty() {
            self.push(row);
        }
    }

    fn finish(self) -> ComposedPage {
        ComposedPage {
            lines: self.lines,
            layout: self.layout,
            width: self.width,
        }
    }
}

fn about(b: &mut PageBuilder, portfolio: &Portfolio, counters: &[String]) {
    let palette = b.palette;
    let profile = &portfolio.profile;

    b.blank();
    if !profile.initials.is_empty() {
        b.centered(
            &format!("( {} )", profile.initials),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        );
        b.blank();
    }
    b.centered(&profile.name, Style::default().fg(palette.accent));
    b.centered(
        &profile.headline,
        Style::default().fg(palette.heading).add_modifier(Modifier::BOLD),
    );
    b.blank();
    b.centered(&profile.tagline, Style::default().fg(palette.text));
    b.blank();

    for (index, stat) in portfolio.stats.iter().enumerate() {
        let value = counters
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("{}{}", stat.value, stat.suffix));
        let value_span = Span::styled(
            format!("{value:>8}"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        );
        let label_width = b.width.saturating_sub(10);
        let label = Span::styled(
            safe_truncate(&stat.label, label_width),
            Style::default().fg(palette.muted),
        );
        b.push(vec![value_span, Span::raw("  "), label]);
    }

    if !profile.about.is_empty() {
        b.heading("About Me");
        b.paragraph("", &profile.about, Style::default().fg(palette.text));
    }
}

fn skills(b: &mut PageBuilder, portfolio: &Portfolio) {
    let palette = b.palette;
    b.heading("Technical Expertise");
    for category in &portfolio.skills {
        let color = match category.kind() {
            SkillKind::Frontend => palette.frontend,
            SkillKind::Backend => palette.backend,
            SkillKind::Blockchain => palette.blockchain,
            SkillKind::Tools => palette.tools,
        };
        b.push(vec![Span::styled(
            capitalize(&category.category),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )]);
        b.tags(&category.items, Style::default().fg(color));
        b.blank();
    }
}

fn projects(b: &mut PageBuilder, portfolio: &Portfolio) {
    let palette = b.palette;
    b.heading("Featured Projects");
    for project in &portfolio.projects {
        if project.featured {
            b.push(vec![Span::styled(
                "★ Featured Project",
                Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
            )]);
        }
        b.paragraph(
            "",
            &project.title,
            Style::default().fg(palette.heading).add_modifier(Modifier::BOLD),
        );
        b.paragraph("", &project.description, Style::default().fg(palette.text));

        if !project.details.is_empty() {
            b.blank();
            b.push(vec![Span::styled(
                "Key Aspects:",
                Style::default().fg(palette.heading).add_modifier(Modifier::BOLD),
            )]);
            for detail in &project.details {
                b.paragraph("  • ", detail, Style::default().fg(palette.text));
            }
        }
        if let Some(impact) = &project.impact {
            b.blank();
            b.paragraph("Impact: ", impact, Style::default().fg(palette.accent));
        }
        b.tags(&project.technologies, Style::default().fg(palette.tools));
        b.blank();
    }
}

fn experience(b: &mut PageBuilder, portfolio: &Portfolio) {
    let palette = b.palette;
    b.heading("Professional Experience");
    for entry in &portfolio.experience {
        b.paragraph(
            "",
            &entry.company,
            Style::default().fg(palette.heading).add_modifier(Modifier::BOLD),
        );
        b.paragraph("", &entry.position, Style::default().fg(palette.accent));
        b.paragraph("", &entry.period, Style::default().fg(palette.muted));
        b.paragraph("", &entry.description, Style::default().fg(palette.text));
        b.blank();
    }
}

fn education(b: &mut PageBuilder, portfolio: &Portfolio) {
    let palette = b.palette;
    b.heading("Education");
    for entry in &portfolio.education {
        b.paragraph(
            "",
            &entry.degree,
            Style::default().fg(palette.heading).add_modifier(Modifier::BOLD),
        );
        b.paragraph("", &entry.institution, Style::default().fg(palette.accent));
        b.paragraph("", &entry.period, Style::default().fg(palette.muted));
        if let Some(thesis) = &entry.thesis {
            b.paragraph("Thesis: ", thesis, Style::default().fg(palette.text));
        }
        b.blank();
    }
}

fn contact(b: &mut PageBuilder, portfolio: &Portfolio) {
    let palette = b.palette;
    let contact = &portfolio.contact;
    b.heading(&contact.heading);
    if !contact.prompt.is_empty() {
        b.centered(&contact.prompt, Style::default().fg(palette.text));
        b.blank();
    }
    b.paragraph("Email  ", &contact.email, Style::default().fg(palette.accent));
    if let Some(phone) = &contact.phone {
        b.paragraph("Phone  ", phone, Style::default().fg(palette.accent));
    }
    if !contact.links.is_empty() {
        b.blank();
        for link in &contact.links {
            b.paragraph(
                &format!("{}  ", link.label),
                &link.url,
                Style::default().fg(palette.muted),
            );
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorScheme;
    use folio_core::SectionLayout;

    fn builtin_page(width: usize, counters: &[String]) -> ComposedPage {
        let portfolio = Portfolio::builtin().unwrap();
        compose(&portfolio, counters, width, 2024, &ColorScheme::Dark.palette())
    }

    #[test]
    fn test_sections_are_contiguous_in_order() {
        let page = builtin_page(80, &[]);
        let mut expected_top = 0;
        for section in SectionId::ALL {
            let bounds = page.layout.bounds(section).unwrap();
            assert_eq!(bounds.top, expected_top, "{section} starts where the previous ended");
            assert!(bounds.height > 0);
            expected_top = bounds.top + bounds.height;
        }
        assert!(page.height() > expected_top);
    }

    #[test]
    fn test_rows_fit_width() {
        for width in [30, 60, 100] {
            let page = builtin_page(width, &[]);
            for line in &page.lines {
                assert!(line.width() <= width, "row wider than {width}: {line:?}");
            }
        }
    }

    #[test]
    fn test_counter_text_does_not_move_sections() {
        let initial = builtin_page(70, &["0+".into(), "0+".into(), "0+".into(), "0%".into()]);
        let finished = builtin_page(70, &[]);
        assert_eq!(initial.layout, finished.layout);
        assert!(initial.to_plain_text().contains("0%  Client Satisfaction"));
        assert!(finished.to_plain_text().contains("100%  Client Satisfaction"));
    }

    #[test]
    fn test_plain_text_has_every_section_and_footer() {
        let text = builtin_page(90, &[]).to_plain_text();
        for needle in [
            "Innovative Software Engineer",
            "Technical Expertise",
            "★ Featured Project",
            "Key Aspects:",
            "Professional Experience",
            "Thesis:",
            "Let's Connect",
            "© 2024 Chris Emetoh. Crafted with passion for innovation.",
        ] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("frontend"), "Frontend");
        assert_eq!(capitalize(""), "");
    }
}
