//! Folio TUI - terminal viewer for the portfolio page
//!
//! Hosts the page in a ratatui terminal: a header with one tab per section
//! (the active section is highlighted as you scroll), the scrollable page
//! body with animated headline counters, a section menu overlay and a help
//! footer. Frames are delivered to the core frame clock at the configured
//! interval.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

pub mod config;
pub mod page;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Datelike;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use folio_core::{
    ActiveSection, AnimatedCounter, FrameClock, MountedTracker, Navigator, Portfolio, ScrollBus,
    ScrollTracker, SectionId, SmoothScroll, Viewport,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};
use tracing::{debug, info};

pub use config::{ColorScheme, ConfigError, FolioConfig, LoggingConfig, Palette};
pub use page::{compose, ComposedPage};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved per mouse wheel notch
const WHEEL_STEP: i64 = 3;

/// Terminal viewer for one portfolio
pub struct FolioTui {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    state: AppState,
    portfolio: Portfolio,
    config: FolioConfig,
    clock: FrameClock,
    counters: Vec<AnimatedCounter>,
    viewport: Viewport,
    tracker: MountedTracker,
    page: ComposedPage,
    footer_year: i32,
}

/// Interaction state that is not owned by the core components
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub nav: Navigator,
    /// Highlighted row of the section menu
    pub menu_index: usize,
    /// Scroll animation in flight, if any
    pub smooth: Option<SmoothScroll>,
    /// Terminal size in columns and rows
    pub area: (u16, u16),
    pub should_quit: bool,
}

/// Everything one frame needs, detached from the viewer so it can be drawn
/// on any backend
#[derive(Debug, Clone)]
pub struct Screen {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    pub page_width: usize,
    pub offset: u32,
    pub active: SectionId,
    pub menu_open: bool,
    pub menu_index: usize,
    pub palette: Palette,
}

impl FolioTui {
    /// Take over the terminal: raw mode, alternate screen, mouse capture
    pub fn new(portfolio: Portfolio, config: FolioConfig) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to initialize terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        let size = terminal.size().context("Failed to read terminal size")?;

        let mut tui = Self::new_headless(portfolio, config, (size.width, size.height));
        tui.terminal = Some(terminal);
        Ok(tui)
    }

    /// A viewer without a terminal, laid out for `area` (columns, rows)
    pub fn new_headless(portfolio: Portfolio, config: FolioConfig, area: (u16, u16)) -> Self {
        let clock = FrameClock::new();
        let bus = ScrollBus::new();
        let tracker = ScrollTracker::new(config.scroll_lookahead).mount(&bus);
        let counters = portfolio
            .counter_specs(config.counter_duration())
            .into_iter()
            .map(|spec| AnimatedCounter::new(&clock, spec))
            .collect();
        let footer_year = chrono::Local::now().year();
        let page = compose(
            &portfolio,
            &[],
            body_width(area.0, &config),
            footer_year,
            &config.color_scheme.palette(),
        );

        let mut tui = Self {
            terminal: None,
            state: AppState {
                area,
                ..AppState::default()
            },
            portfolio,
            config,
            clock,
            counters,
            viewport: Viewport::new(bus),
            tracker,
            page,
            footer_year,
        };
        tui.relayout();
        tui
    }

    pub fn active_section(&self) -> SectionId {
        self.tracker.current()
    }

    /// Reader handle for the active section
    pub fn active_handle(&self) -> ActiveSection {
        self.tracker.active()
    }

    pub const fn offset(&self) -> u32 {
        self.viewport.offset()
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub const fn is_menu_open(&self) -> bool {
        self.state.nav.is_menu_open()
    }

    pub const fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    pub fn counter_texts(&self) -> Vec<String> {
        self.counters.iter().map(AnimatedCounter::text).collect()
    }

    /// The current page as plain text
    pub fn page_text(&self) -> String {
        self.current_page().to_plain_text()
    }

    /// Run the main event loop until the user quits
    pub fn run(&mut self) -> Result<()> {
        let frame_interval = self.config.frame_interval();
        let started = Instant::now();
        let mut last_frame = Instant::now();
        info!(?frame_interval, "viewer started");

        while !self.state.should_quit {
            self.draw()?;

            let timeout = frame_interval
                .checked_sub(last_frame.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                self.handle_event(event::read()?);
            }

            if last_frame.elapsed() >= frame_interval {
                self.tick(started.elapsed());
                last_frame = Instant::now();
            }
        }

        info!("viewer closed");
        Ok(())
    }

    /// Deliver one animation frame at `now`
    pub fn tick(&mut self, now: Duration) {
        self.clock.tick(now);

        if let Some(smooth) = self.state.smooth.as_mut() {
            let (offset, done) = smooth.sample(now);
            self.viewport.scroll_to(offset);
            if done {
                self.state.smooth = None;
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.state.nav.is_menu_open() {
            self.handle_menu_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.manual_scroll(1),
            KeyCode::Up | KeyCode::Char('k') => self.manual_scroll(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.state.smooth = None;
                self.viewport.page_down();
            }
            KeyCode::PageUp => {
                self.state.smooth = None;
                self.viewport.page_up();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.state.smooth = None;
                self.viewport.home();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.state.smooth = None;
                self.viewport.end();
            }
            KeyCode::Right | KeyCode::Char('l') => self.navigate(self.active_section().next()),
            KeyCode::Left | KeyCode::Char('h') => {
                self.navigate(self.active_section().previous());
            }
            KeyCode::Char(c @ '1'..='6') => self.navigate_to_digit(c),
            KeyCode::Char('m') => self.toggle_menu(),
            KeyCode::Char('r') => self.replay_counters(),
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('m') | KeyCode::Esc => self.state.nav.close_menu(),
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.menu_index = (self.state.menu_index + 1) % SectionId::COUNT;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.menu_index =
                    (self.state.menu_index + SectionId::COUNT - 1) % SectionId::COUNT;
            }
            KeyCode::Enter => {
                if let Some(section) = SectionId::from_index(self.state.menu_index) {
                    self.navigate(section);
                }
            }
            KeyCode::Char(c @ '1'..='6') => self.navigate_to_digit(c),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.manual_scroll(WHEEL_STEP),
            MouseEventKind::ScrollUp => self.manual_scroll(-WHEEL_STEP),
            _ => {}
        }
    }

    fn manual_scroll(&mut self, delta: i64) {
        self.state.smooth = None;
        self.viewport.scroll_by(delta);
    }

    fn toggle_menu(&mut self) {
        if self.state.nav.toggle_menu() {
            self.state.menu_index = self.active_section().index();
        }
    }

    fn navigate_to_digit(&mut self, digit: char) {
        let index = digit.to_digit(10).map_or(0, |d| d as usize).saturating_sub(1);
        if let Some(section) = SectionId::from_index(index) {
            self.navigate(section);
        }
    }

    /// Scroll to a section, smoothly unless smoothing is disabled
    pub fn navigate(&mut self, section: SectionId) {
        let Some(top) = self.state.nav.scroll_to_section(section, self.viewport.layout()) else {
            return;
        };
        let target = top.min(self.viewport.max_offset());
        debug!(%section, target, "navigate");

        let duration = self.config.smooth_scroll_duration();
        if duration.is_zero() {
            self.state.smooth = None;
            self.viewport.scroll_to(target);
        } else {
            self.state.smooth = Some(SmoothScroll::new(self.viewport.offset(), target, duration));
        }
    }

    /// Count every headline stat up again from zero
    pub fn replay_counters(&mut self) {
        for counter in &mut self.counters {
            counter.restart();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.state.area = (width, height);
        self.relayout();
    }

    /// Recompose at the current size and hand the new geometry to the viewport
    fn relayout(&mut self) {
        let (width, height) = self.state.area;
        self.page = self.current_page_at(body_width(width, &self.config));
        let view_height = u32::from(height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT));
        self.viewport
            .relayout(self.page.layout.clone(), self.page.height(), view_height);
        debug!(width, height, document = self.page.height(), "relayout");
    }

    fn current_page(&self) -> ComposedPage {
        self.current_page_at(self.page.width)
    }

    fn current_page_at(&self, width: usize) -> ComposedPage {
        compose(
            &self.portfolio,
            &self.counter_texts(),
            width,
            self.footer_year,
            &self.config.color_scheme.palette(),
        )
    }

    /// Snapshot of what the next frame shows
    pub fn screen(&self) -> Screen {
        let page = self.current_page();
        Screen {
            title: self.portfolio.profile.name.clone(),
            lines: page.lines,
            page_width: page.width,
            offset: self.viewport.offset(),
            active: self.active_section(),
            menu_open: self.state.nav.is_menu_open(),
            menu_index: self.state.menu_index,
            palette: self.config.color_scheme.palette(),
        }
    }

    fn draw(&mut self) -> Result<()> {
        let screen = self.screen();
        if let Some(terminal) = &mut self.terminal {
            terminal.draw(|f| render(f, &screen))?;
        }
        Ok(())
    }
}

impl Drop for FolioTui {
    fn drop(&mut self) {
        if let Some(terminal) = &mut self.terminal {
            let _ = disable_raw_mode();
            let _ = execute!(
                terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            );
            let _ = terminal.show_cursor();
        }
    }
}

fn body_width(columns: u16, config: &FolioConfig) -> usize {
    usize::from(columns.min(config.max_page_width).max(1))
}

/// Draw a frame: header tabs, page body, optional menu, help footer
pub fn render(f: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.size());

    render_header(f, chunks[0], screen);
    render_body(f, chunks[1], screen);
    render_footer(f, chunks[2], screen);

    if screen.menu_open {
        render_menu(f, chunks[1], screen);
    }
}

fn render_header(f: &mut Frame, area: Rect, screen: &Screen) {
    let palette = &screen.palette;
    let titles: Vec<Line> = SectionId::ALL
        .iter()
        .map(|section| Line::from(section.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    screen.title.clone(),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                ))
                .border_style(Style::default().fg(palette.muted)),
        )
        .style(Style::default().fg(palette.text))
        .highlight_style(
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .select(screen.active.index());

    f.render_widget(tabs, area);
}

fn render_body(f: &mut Frame, area: Rect, screen: &Screen) {
    let start = usize::try_from(screen.offset).unwrap_or(usize::MAX);
    let visible: Vec<Line> = screen
        .lines
        .iter()
        .skip(start)
        .take(usize::from(area.height))
        .cloned()
        .collect();

    let width = u16::try_from(screen.page_width)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    f.render_widget(Paragraph::new(visible), column);
}

fn render_menu(f: &mut Frame, body: Rect, screen: &Screen) {
    let palette = &screen.palette;
    let width = 22.min(body.width);
    let height = (SectionId::COUNT as u16 + 2).min(body.height);
    let area = Rect {
        x: body.x + body.width - width,
        y: body.y,
        width,
        height,
    };

    let items: Vec<ListItem> = SectionId::ALL
        .iter()
        .map(|section| {
            let marker = if *section == screen.active { "●" } else { " " };
            ListItem::new(format!("{} {} {}", marker, section.index() + 1, section.title()))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Sections")
                .border_style(Style::default().fg(palette.accent)),
        )
        .style(Style::default().fg(palette.text))
        .highlight_style(
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    let mut state = ListState::default().with_selected(Some(screen.menu_index));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_footer(f: &mut Frame, area: Rect, screen: &Screen) {
    let key = Style::default()
        .fg(screen.palette.highlight)
        .add_modifier(Modifier::BOLD);
    let help = Line::from(vec![
        Span::styled("q", key),
        Span::raw(":quit "),
        Span::styled("↑↓/jk", key),
        Span::raw(":scroll "),
        Span::styled("PgUp/PgDn", key),
        Span::raw(":page "),
        Span::styled("1-6", key),
        Span::raw(":sections "),
        Span::styled("←→", key),
        Span::raw(":prev/next "),
        Span::styled("m", key),
        Span::raw(":menu "),
        Span::styled("r", key),
        Span::raw(":replay"),
    ]);

    let footer = Paragraph::new(help).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .border_style(Style::default().fg(screen.palette.muted)),
    );
    f.render_widget(footer, area);
}

/// Load content and run the interactive viewer
pub fn run_viewer(portfolio: Portfolio, config: FolioConfig) -> Result<()> {
    let mut tui = FolioTui::new(portfolio, config)?;
    tui.run()
}

/// The whole page as plain text, counters at their final values
pub fn preview_text(portfolio: &Portfolio, width: usize, year: i32) -> String {
    compose(portfolio, &[], width, year, &ColorScheme::Dark.palette()).to_plain_text()
}
