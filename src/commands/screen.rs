//! Full-screen project view.
//!
//! Draws the merged project list with selection markers, drives the
//! [`Session`] from key presses and shows transient messages. The whole
//! screen is redrawn after every change; a terminal resize marks the screen
//! dirty and the next poll clears and redraws it from scratch.
//!
//! | Key | Action |
//! |---|---|
//! | `Space` | select or deselect the project under the cursor |
//! | `↑`/`↓`, `u`/`d`, `k`/`j` | move the cursor |
//! | `PgUp`/`PgDn` | move by one page |
//! | `s` | save the manifest |
//! | `t` | choose another tag |
//! | `q`, `Esc` | back to the main menu |

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::Duration;

use west_curate::fetch::DocumentFetcher;
use west_curate::manifest::Project;
use west_curate::output::OutputConfig;
use west_curate::selection::{Page, TagPicker};
use west_curate::session::Session;
use west_curate::signal::Dirty;
use west_curate::writer::ManifestWriter;

const POLL: Duration = Duration::from_millis(100);
const SHORT_PAUSE: Duration = Duration::from_millis(500);
const LONG_PAUSE: Duration = Duration::from_millis(1500);
const ERROR_PAUSE: Duration = Duration::from_secs(2);

/// Rows used by the header and footer.
const CHROME_ROWS: u16 = 3;
const PICKER_ROWS: usize = 10;

/// What happened while the screen was open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOutcome {
    /// At least one save changed the file on disk.
    pub saved_changes: bool,
}

/// Raw mode plus the alternate screen, restored on drop.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err).context("enter alternate screen");
        }
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

enum Flow {
    Continue,
    Exit,
}

struct Screen<'a, F: DocumentFetcher> {
    session: &'a mut Session<F>,
    writer: &'a ManifestWriter,
    output: OutputConfig,
    outcome: ScreenOutcome,
    width: u16,
    height: u16,
}

/// Show the project view until the user leaves it.
pub fn run<F: DocumentFetcher>(
    session: &mut Session<F>,
    writer: &ManifestWriter,
    output: OutputConfig,
) -> Result<ScreenOutcome> {
    let mut guard = TerminalGuard::enter()?;
    let (width, height) = terminal::size().context("read terminal size")?;
    let mut screen = Screen {
        session,
        writer,
        output,
        outcome: ScreenOutcome::default(),
        width,
        height,
    };
    screen.event_loop(&mut guard.stdout)?;
    Ok(screen.outcome)
}

impl<F: DocumentFetcher> Screen<'_, F> {
    fn event_loop(&mut self, out: &mut Stdout) -> Result<()> {
        let dirty = Dirty::new();
        dirty.notify();

        loop {
            if dirty.take() {
                let (width, height) = terminal::size()?;
                self.width = width;
                self.height = height;
                queue!(out, Clear(ClearType::All))?;
                self.draw(out)?;
            }

            if !event::poll(POLL)? {
                continue;
            }
            match event::read()? {
                Event::Resize(_, _) => dirty.notify(),
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Flow::Exit = self.handle_key(out, key)? {
                        return Ok(());
                    }
                    dirty.notify();
                }
                _ => {}
            }
        }
    }

    fn list_height(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS)).max(1)
    }

    fn handle_key(&mut self, out: &mut Stdout, key: KeyEvent) -> Result<Flow> {
        let page = isize::try_from(self.list_height()).unwrap_or(isize::MAX);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Exit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Flow::Exit)
            }
            KeyCode::Char(' ') => {
                self.session.toggle_current()?;
            }
            KeyCode::Up | KeyCode::Char('u') | KeyCode::Char('k') => {
                self.session.move_cursor(-1)?;
            }
            KeyCode::Down | KeyCode::Char('d') | KeyCode::Char('j') => {
                self.session.move_cursor(1)?;
            }
            KeyCode::PageUp => {
                self.session.move_cursor(-page)?;
            }
            KeyCode::PageDown => {
                self.session.move_cursor(page)?;
            }
            KeyCode::Char('s') => self.save(out)?,
            KeyCode::Char('t') => self.pick_tag(out)?,
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self, out: &mut Stdout) -> Result<()> {
        self.message(out, " Saving.... ", 0, Color::Blue, SHORT_PAUSE)?;
        match self.session.save(self.writer) {
            Ok(saved) => {
                self.outcome.saved_changes |= saved.changed;
                let text = format!(" Saved to: {} ", saved.path.display());
                self.message(out, &text, 2, Color::Blue, LONG_PAUSE)?;
            }
            Err(err) => {
                let text = format!(" Save failed: {} ", err);
                self.message(out, &text, 2, Color::Red, ERROR_PAUSE)?;
                self.session.resume();
            }
        }
        Ok(())
    }

    fn pick_tag(&mut self, out: &mut Stdout) -> Result<()> {
        let mut picker = self.session.begin_tag_pick()?;
        loop {
            self.draw_picker(out, &picker)?;
            if !event::poll(POLL)? {
                continue;
            }
            let key = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                Event::Resize(width, height) => {
                    self.width = width;
                    self.height = height;
                    queue!(out, Clear(ClearType::All))?;
                    self.draw(out)?;
                    continue;
                }
                _ => continue,
            };

            match key.code {
                KeyCode::Up | KeyCode::Char('u') | KeyCode::Char('k') => picker.move_by(-1),
                KeyCode::Down | KeyCode::Char('d') | KeyCode::Char('j') => picker.move_by(1),
                KeyCode::Enter => break,
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.session.cancel_tag_pick();
                    return Ok(());
                }
                _ => {}
            }
        }

        let Some(tag) = picker.highlighted().cloned() else {
            self.session.cancel_tag_pick();
            return Ok(());
        };
        if &tag != self.session.active_tag() {
            let text = format!(" Fetching manifest for {} ", tag);
            self.message(out, &text, 0, Color::Blue, Duration::ZERO)?;
            queue!(out, MoveTo(0, self.height.saturating_sub(1)))?;
            out.flush()?;
        }
        if let Err(err) = self.session.request_tag_change(&tag) {
            let text = format!(" {} ", err);
            self.message(out, &text, 2, Color::Red, ERROR_PAUSE)?;
            self.session.resume();
        }
        Ok(())
    }

    fn draw(&self, out: &mut Stdout) -> Result<()> {
        let width = usize::from(self.width);
        let store = self.session.store();
        let page = store.page(self.list_height());

        let header = format!(
            "Projects at {}  ({} of {} selected)",
            store.active_tag(),
            store.selected_count(),
            store.len()
        );
        queue!(
            out,
            MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Bold),
            Print(fit(&header, width)),
            SetAttribute(Attribute::Reset)
        )?;

        let mut row: u16 = 1;
        for index in page.rows.clone() {
            let project = &store.projects()[index];
            queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
            if index == store.cursor() {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                out,
                Print(fit(&project_line(project), width)),
                SetAttribute(Attribute::Reset)
            )?;
            row = row.saturating_add(1);
        }
        if store.is_empty() {
            queue!(out, MoveTo(0, row), Print(fit("No projects in the merged manifest", width)))?;
        }

        let footer = footer_line(store.active_tag().as_str(), &page);
        queue!(
            out,
            MoveTo(0, self.height.saturating_sub(1)),
            Clear(ClearType::CurrentLine),
            Print(fit(&footer, width))
        )?;
        out.flush()?;
        Ok(())
    }

    fn draw_picker(&self, out: &mut Stdout, picker: &TagPicker) -> Result<()> {
        let rows = PICKER_ROWS.min(usize::from(self.height.saturating_sub(4)).max(1));
        let inner = picker
            .tags()
            .iter()
            .map(|tag| tag.as_str().len())
            .max()
            .unwrap_or(0)
            .max(12)
            + 4;
        let left = self.width.saturating_sub(inner as u16 + 2) / 2;
        let top = self.height.saturating_sub(rows as u16 + 2) / 3;

        let border = format!("+{}+", "-".repeat(inner));
        queue!(out, MoveTo(left, top), Print(&border))?;

        let window = picker.window(rows);
        for line in 0..rows {
            let y = top + 1 + line as u16;
            let index = window.start + line;
            queue!(out, MoveTo(left, y), Print("|"))?;
            match picker.tags().get(index).filter(|_| index < window.end) {
                Some(tag) => {
                    let marker = if tag == self.session.active_tag() { "*" } else { " " };
                    let text = format!(" {} {:<width$}", marker, tag.as_str(), width = inner - 3);
                    if index == picker.index() {
                        queue!(
                            out,
                            SetAttribute(Attribute::Reverse),
                            Print(text),
                            SetAttribute(Attribute::Reset)
                        )?;
                    } else {
                        queue!(out, Print(text))?;
                    }
                }
                None => queue!(out, Print(" ".repeat(inner)))?,
            }
            queue!(out, Print("|"))?;
        }
        queue!(out, MoveTo(left, top + 1 + rows as u16), Print(&border))?;
        out.flush()?;
        Ok(())
    }

    /// Show `text` centred a third of the way down, then hold it for `pause`.
    fn message(
        &self,
        out: &mut Stdout,
        text: &str,
        offset: u16,
        background: Color,
        pause: Duration,
    ) -> Result<()> {
        let text = fit(text, usize::from(self.width));
        let x = self.width.saturating_sub(text.chars().count() as u16) / 2;
        let y = (self.height / 3).saturating_add(offset).min(self.height.saturating_sub(1));

        queue!(out, MoveTo(x, y))?;
        if self.output.use_color {
            queue!(out, SetBackgroundColor(background), SetForegroundColor(Color::White))?;
        } else {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, Print(text), ResetColor, SetAttribute(Attribute::Reset))?;
        out.flush()?;

        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
        Ok(())
    }
}

/// `[X] name  path` for one project row.
fn project_line(project: &Project) -> String {
    let marker = if project.selected { "[X]" } else { "[ ]" };
    match project.path() {
        Some(path) if path != project.name() => {
            format!("{} {}  ({})", marker, project.name(), path)
        }
        _ => format!("{} {}", marker, project.name()),
    }
}

fn footer_line(tag: &str, page: &Page) -> String {
    format!(
        "[s] Save  [t] Select Tag ({})  [Space] Select/Deselect  [↓↑] Navigate  [q] Back  \
         Page {}/{}",
        tag,
        page.index + 1,
        page.count
    )
}

/// Cut `text` to at most `width` characters.
fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
