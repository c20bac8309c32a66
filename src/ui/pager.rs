use crate::input::{handle_key, Action};
use crate::ui::theme::{Theme, ThemeVariant};
use crate::util::doc::Doc;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);
const MOUSE_STEP:   usize    = 3;

/// Scroll position over a fixed number of report lines.
#[derive(Debug, Clone)]
pub struct Pager {
    pub total:  usize,
    pub scroll: usize,
    pub theme:  ThemeVariant,
    pub quit:   bool,
}

impl Pager {
    pub fn new(total: usize, theme: ThemeVariant) -> Self {
        Pager { total, scroll: 0, theme, quit: false }
    }

    fn max_scroll(&self, page: usize) -> usize {
        self.total.saturating_sub(page)
    }

    /// Apply one action for a viewport `page` lines tall.
    pub fn apply(&mut self, action: Action, page: usize) {
        let half = (page / 2).max(1);
        match action {
            Action::Quit       => self.quit = true,
            Action::ScrollUp   => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => self.scroll += 1,
            Action::PageUp     => self.scroll = self.scroll.saturating_sub(half),
            Action::PageDown   => self.scroll += half,
            Action::JumpTop    => self.scroll = 0,
            Action::JumpBottom => self.scroll = self.max_scroll(page),
            Action::CycleTheme => self.theme = self.theme.next(),
            Action::None       => {}
        }
        self.scroll = self.scroll.min(self.max_scroll(page));
    }
}

/// Show the report in a full-screen scrollable view until the user quits.
/// The terminal is restored on every exit path, panics included.
pub fn page(doc: &Doc, title: &str, theme: ThemeVariant) -> Result<()> {
    with_panic_cleanup(|| { let _ = restore_terminal(); }, || {
        let result = run(doc, title, theme);
        let restored = restore_terminal();
        result.and(restored)
    })
}

/// Run `f` with `cleanup` chained in front of the current panic hook. The
/// previous hook is back in place once `f` returns.
fn with_panic_cleanup<T>(cleanup: fn(), f: impl FnOnce() -> T) -> T {
    let original = Arc::new(panic::take_hook());
    let chained  = Arc::clone(&original);
    panic::set_hook(Box::new(move |info| {
        cleanup();
        (**chained)(info);
    }));

    let out = f();
    drop(panic::take_hook());
    panic::set_hook(Box::new(move |info| (**original)(info)));
    out
}

fn run(doc: &Doc, title: &str, theme: ThemeVariant) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
    event_loop(&mut term, doc, title, theme)
}

fn event_loop<B: Backend>(
    term:  &mut Terminal<B>,
    doc:   &Doc,
    title: &str,
    theme: ThemeVariant,
) -> Result<()> {
    let mut pager = Pager::new(doc.lines().len(), theme);
    let mut page  = 1usize;

    debug!(lines = pager.total, "pager started");
    while !pager.quit {
        let palette = Theme::for_variant(pager.theme);
        term.draw(|f| {
            page = render(f, doc, title, &pager, &palette);
        })?;

        if !event::poll(POLL_TIMEOUT)? { continue; }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                pager.apply(handle_key(key), page);
            }
            Event::Mouse(me) => match me.kind {
                MouseEventKind::ScrollDown => {
                    for _ in 0..MOUSE_STEP { pager.apply(Action::ScrollDown, page); }
                }
                MouseEventKind::ScrollUp => {
                    for _ in 0..MOUSE_STEP { pager.apply(Action::ScrollUp, page); }
                }
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

/// Draw one frame; returns the number of report lines that fit.
fn render(f: &mut Frame, doc: &Doc, title: &str, pager: &Pager, theme: &Theme) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let page = render_body(f, chunks[0], doc, title, pager, theme);
    render_footer(f, chunks[1], pager, page, theme);
    page
}

fn render_body(f: &mut Frame, area: Rect, doc: &Doc, title: &str, pager: &Pager, theme: &Theme) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.text_dim)
        .title(Span::styled(format!(" {} ", title), theme.title));

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 { return 1; }

    let lines: Vec<Line> = doc.lines().iter()
        .map(|segs| {
            Line::from(segs.iter()
                .map(|s| Span::styled(s.text.as_str(), theme.style(s.tone)))
                .collect::<Vec<_>>())
        })
        .collect();

    let page   = inner.height as usize;
    let scroll = pager.scroll.min(pager.total.saturating_sub(page)) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
    page
}

fn render_footer(f: &mut Frame, area: Rect, pager: &Pager, page: usize, theme: &Theme) {
    const KEYS: [(&str, &str); 5] = [
        ("↑↓/jk", "Scroll"), ("Space/PgDn", "Page"), ("g/G", "Top/Bot"), ("t", "Theme"), ("q", "Quit"),
    ];

    let mut spans: Vec<Span> = vec![Span::styled(" ", theme.footer_bg)];
    for (key, desc) in KEYS {
        spans.push(Span::styled(format!(" {} ", key), theme.footer_key));
        spans.push(Span::styled(format!("{}  ", desc), theme.footer_text));
    }

    let last = (pager.scroll + page).min(pager.total);
    spans.push(Span::styled(
        format!(" {}-{}/{}  {} ", pager.scroll.min(last) + 1, last, pager.total, pager.theme.name()),
        theme.footer_text,
    ));

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.footer_bg), area);
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
