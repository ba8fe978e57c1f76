//! Ratatui demo front end
//!
//! A minimal interactive editor over a [`PlainSurface`]: keystrokes flow
//! through the mention engine, the suggestion panel is drawn as an
//! overlay hanging below the caret, and candidates can be picked with the
//! keyboard or a mouse click.

pub mod events;

use crate::engine::{Key, KeyDisposition, Mention};
use crate::surface::{PlainSurface, Surface};
use crate::MentionrError;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use events::{map_key, EditorAction, EventResult};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Demo editor state: one engine, one surface, the last drawn panel area
pub struct EditorApp {
    engine: Mention,
    surface: PlainSurface,
    panel_area: Option<Rect>,
    editor_inner: Rect,
}

impl EditorApp {
    #[must_use]
    pub fn new(engine: Mention, surface: PlainSurface) -> Self {
        Self {
            engine,
            surface,
            panel_area: None,
            editor_inner: Rect::default(),
        }
    }

    /// Give back the engine and surface, e.g. for an exit summary
    #[must_use]
    pub fn into_parts(self) -> (Mention, PlainSurface) {
        (self.engine, self.surface)
    }

    fn handle_key(
        &mut self,
        action: EditorAction,
        now: Instant,
    ) -> Result<EventResult, MentionrError> {
        match action {
            EditorAction::Quit => {
                if self.engine.panel().is_visible() {
                    // First Esc only dismisses the panel.
                    self.engine.key_up(&mut self.surface, Key::Other, now)?;
                    Ok(EventResult::Continue)
                } else {
                    Ok(EventResult::Quit)
                }
            }
            EditorAction::CaretLeft => {
                self.surface.caret_left();
                self.engine.key_up(&mut self.surface, Key::Other, now)?;
                Ok(EventResult::Continue)
            }
            EditorAction::CaretRight => {
                self.surface.caret_right();
                self.engine.key_up(&mut self.surface, Key::Other, now)?;
                Ok(EventResult::Continue)
            }
            EditorAction::Edit(key) => {
                if self.engine.key_down(key) == KeyDisposition::PassThrough {
                    match key {
                        Key::Char(c) => {
                            if self.surface.type_char(c) {
                                self.engine.notify_edit(&mut self.surface);
                            }
                        }
                        Key::Backspace => {
                            self.surface.backspace();
                            self.engine.notify_edit(&mut self.surface);
                        }
                        Key::Enter => {
                            if self.surface.type_newline() {
                                self.engine.notify_edit(&mut self.surface);
                            }
                        }
                        Key::Up | Key::Down | Key::Other => {}
                    }
                }
                self.engine.key_up(&mut self.surface, key, now)?;
                Ok(EventResult::Continue)
            }
            EditorAction::None => Ok(EventResult::Ignored),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Result<EventResult, MentionrError> {
        let Some(area) = self.panel_area else {
            return Ok(EventResult::Ignored);
        };
        if !area.contains(Position { x: column, y: row }) || row <= area.y {
            return Ok(EventResult::Ignored);
        }
        let index = usize::from(row - area.y - 1);
        if index < self.engine.panel().candidates().len() {
            self.engine.select(&mut self.surface, index)?;
        }
        Ok(EventResult::Continue)
    }
}

/// Run the demo editor until the user quits
///
/// # Errors
///
/// Returns an error when the terminal cannot be set up or an engine call
/// fails.
pub fn run(engine: Mention, surface: PlainSurface) -> Result<(Mention, PlainSurface), MentionrError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = EditorApp::new(engine, surface);
    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map(|()| app.into_parts())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut EditorApp,
) -> Result<(), MentionrError> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(POLL_TIMEOUT)? {
            let result = match event::read()? {
                Event::Key(key) => app.handle_key(map_key(key), Instant::now())?,
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        app.handle_click(mouse.column, mouse.row)?
                    }
                    _ => EventResult::Ignored,
                },
                _ => EventResult::Continue,
            };
            if result == EventResult::Quit {
                return Ok(());
            }
        }

        // Fire the debounce and apply async deliveries on the loop tick.
        app.engine.pump(Instant::now());
    }
}

fn draw(frame: &mut Frame, app: &mut EditorApp) {
    let [editor_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" mentionr demo ");
    let inner = block.inner(editor_area);
    app.editor_inner = inner;

    let editor = Paragraph::new(app.surface.value()).block(block);
    frame.render_widget(editor, editor_area);

    let caret = app.surface.caret_position();
    frame.set_cursor_position(Position {
        x: inner.x.saturating_add(caret.x),
        y: inner.y.saturating_add(caret.y),
    });

    let mentions = app.engine.mentions(&app.surface).len();
    let status = Line::from(vec![
        Span::styled(
            format!(" type {}name to mention ", app.engine.delimiter()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| ↑↓: navigate | Enter: pick | ESC: quit | "),
        Span::styled(
            format!("{mentions} mention(s)"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);

    app.panel_area = if app.engine.panel().is_visible() {
        let area = panel_rect(app, frame.area());
        render_panel(frame, app, area);
        Some(area)
    } else {
        None
    };
}

fn panel_rect(app: &EditorApp, screen: Rect) -> Rect {
    let rows = app.engine.panel_rows();
    let width = rows
        .iter()
        .map(|r| r.chars().count())
        .max()
        .unwrap_or(0)
        .max(8) as u16
        + 4;
    let height = rows.len() as u16 + 2;

    // Hang one row below the caret that triggered the query.
    let anchor = app.engine.panel_anchor();
    let x = app.editor_inner.x.saturating_add(anchor.x);
    let y = app.editor_inner.y.saturating_add(anchor.y).saturating_add(1);

    let x = x.min(screen.width.saturating_sub(width));
    let y = y.min(screen.height.saturating_sub(height));
    Rect::new(x, y, width.min(screen.width), height.min(screen.height))
}

fn render_panel(frame: &mut Frame, app: &EditorApp, area: Rect) {
    let highlighted = app.engine.panel().highlighted();
    let items: Vec<ListItem> = app
        .engine
        .panel_rows()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if idx == highlighted {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if idx == highlighted { "▶ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(row, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}
