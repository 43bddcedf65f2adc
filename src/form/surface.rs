//! Terminal surface capability used by the form engine.
//!
//! The engine only needs a handful of operations: blocking key reads, a check
//! for already-queued input, positioned writes, rectangular moves, cursor
//! placement and an audible alert. [`CrosstermSurface`] drives a real terminal
//! in raw mode; [`ScriptedSurface`] replays scripted key batches and records
//! what was drawn so tests (and headless CLI runs) can inspect the screen.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use super::key::{parse_key_script, KeyEvent};

/// Visual treatment for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Label,
    Focused,
    Editing,
    Submit,
    SubmitFocused,
    Error,
    Hint,
}

impl TextStyle {
    fn colors(self) -> (Option<Color>, Option<Color>) {
        match self {
            TextStyle::Normal | TextStyle::Label => (None, None),
            TextStyle::Focused => (Some(Color::Black), Some(Color::Grey)),
            TextStyle::Editing => (Some(Color::Blue), None),
            TextStyle::Submit => (Some(Color::Black), Some(Color::DarkGrey)),
            TextStyle::SubmitFocused => (Some(Color::White), Some(Color::Grey)),
            TextStyle::Error => (Some(Color::Red), None),
            TextStyle::Hint => (Some(Color::Yellow), None),
        }
    }
}

/// Rectangular region of the surface, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && row >= self.row
            && col < self.col.saturating_add(self.width)
            && row < self.row.saturating_add(self.height)
    }
}

pub trait TerminalSurface {
    /// Blocks until the next key event is available.
    fn read_key(&mut self) -> io::Result<KeyEvent>;

    /// Reports whether a key event is already queued and can be read without blocking.
    fn has_pending_key(&mut self) -> io::Result<bool>;

    /// Writes `text` at the cursor, padded with blanks up to `pad_width` cells.
    /// The cursor advances past the written cells.
    fn write_at(&mut self, text: &str, pad_width: usize, style: TextStyle) -> io::Result<()>;

    /// Copies `src` so its top-left corner lands on `dst`. Source cells not
    /// covered by the destination are blanked with `fill` when given.
    fn move_region(&mut self, src: Rect, dst: (u16, u16), fill: Option<char>) -> io::Result<()>;

    fn set_cursor(&mut self, col: u16, row: u16) -> io::Result<()>;

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    fn dimensions(&self) -> (u16, u16);

    fn alert(&mut self) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: TextStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: TextStyle::Normal,
        }
    }
}

/// Shadow copy of the visible cells.
///
/// Terminals cannot be asked what they display, so region moves are computed
/// on this grid and the touched spans are repainted.
#[derive(Debug, Clone)]
struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// Span of a single row that changed: `(row, first_col, end_col)`.
type DirtySpan = (u16, u16, u16);

impl CellGrid {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.width && row < self.height {
            Some(row as usize * self.width as usize + col as usize)
        } else {
            None
        }
    }

    fn get(&self, col: u16, row: u16) -> Cell {
        self.index(col, row)
            .map(|idx| self.cells[idx])
            .unwrap_or_default()
    }

    fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if let Some(idx) = self.index(col, row) {
            self.cells[idx] = cell;
        }
    }

    /// Writes text starting at `(col, row)`; returns the column after the last written cell.
    fn write(&mut self, col: u16, row: u16, text: &str, pad_width: usize, style: TextStyle) -> u16 {
        let mut current = col;
        let mut written = 0usize;
        for ch in text.chars() {
            if current >= self.width {
                return current;
            }
            self.set(current, row, Cell { ch, style });
            current += 1;
            written += 1;
        }
        while written < pad_width && current < self.width {
            self.set(current, row, Cell { ch: ' ', style });
            current += 1;
            written += 1;
        }
        current
    }

    fn move_region(&mut self, src: Rect, dst: (u16, u16), fill: Option<char>) -> Vec<DirtySpan> {
        let mut copied = Vec::with_capacity(src.width as usize * src.height as usize);
        for dy in 0..src.height {
            for dx in 0..src.width {
                copied.push(self.get(src.col + dx, src.row + dy));
            }
        }

        let target = Rect::new(dst.0, dst.1, src.width, src.height);
        let mut dirty = Vec::new();
        if let Some(fill) = fill {
            for dy in 0..src.height {
                let row = src.row + dy;
                for dx in 0..src.width {
                    let col = src.col + dx;
                    if !target.contains(col, row) {
                        self.set(col, row, Cell {
                            ch: fill,
                            style: TextStyle::Normal,
                        });
                    }
                }
                dirty.push((row, src.col, src.col.saturating_add(src.width)));
            }
        }

        for dy in 0..src.height {
            for dx in 0..src.width {
                let cell = copied[dy as usize * src.width as usize + dx as usize];
                self.set(dst.0 + dx, dst.1 + dy, cell);
            }
            dirty.push((dst.1 + dy, dst.0, dst.0.saturating_add(src.width)));
        }
        dirty
    }

    fn row_text(&self, row: u16) -> String {
        (0..self.width).map(|col| self.get(col, row).ch).collect()
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::default());
    }

    fn resize(&mut self, width: u16, height: u16) {
        let mut resized = CellGrid::new(width, height);
        for row in 0..height.min(self.height) {
            for col in 0..width.min(self.width) {
                resized.set(col, row, self.get(col, row));
            }
        }
        *self = resized;
    }
}

/// Real terminal surface. Raw mode and the alternate screen are held for the
/// lifetime of the value and released on drop.
pub struct CrosstermSurface {
    stdout: Stdout,
    grid: CellGrid,
    cursor: (u16, u16),
    lookahead: VecDeque<KeyEvent>,
    audible_alerts: bool,
    active: bool,
}

impl CrosstermSurface {
    pub fn activate(audible_alerts: bool) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        tracing::debug!(width, height, "terminal surface activated");
        Ok(Self {
            stdout,
            grid: CellGrid::new(width, height),
            cursor: (0, 0),
            lookahead: VecDeque::new(),
            audible_alerts,
            active: true,
        })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = queue!(
                self.stdout,
                ResetColor,
                cursor::Show,
                terminal::LeaveAlternateScreen
            );
            let _ = self.stdout.flush();
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }

    fn paint(&mut self, spans: &[DirtySpan]) -> io::Result<()> {
        for &(row, from, to) in spans {
            let to = to.min(self.grid.width);
            if from >= to {
                continue;
            }
            queue!(self.stdout, cursor::MoveTo(from, row))?;
            let mut current_style = None;
            for col in from..to {
                let cell = self.grid.get(col, row);
                if current_style != Some(cell.style) {
                    apply_style(&mut self.stdout, cell.style)?;
                    current_style = Some(cell.style);
                }
                queue!(self.stdout, Print(cell.ch))?;
            }
            queue!(self.stdout, ResetColor)?;
        }
        queue!(self.stdout, cursor::MoveTo(self.cursor.0, self.cursor.1))
    }

    /// Reads terminal events until a key press arrives, handling resizes on the way.
    fn next_press(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        loop {
            if let Some(timeout) = timeout {
                if !event::poll(timeout)? {
                    return Ok(None);
                }
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(Some(key.into()));
                }
                Event::Resize(width, height) => {
                    tracing::debug!(width, height, "terminal resized");
                    self.grid.resize(width, height);
                }
                _ => continue,
            }
        }
    }
}

fn apply_style(stdout: &mut Stdout, style: TextStyle) -> io::Result<()> {
    queue!(stdout, ResetColor)?;
    let (fg, bg) = style.colors();
    if let Some(fg) = fg {
        queue!(stdout, SetForegroundColor(fg))?;
    }
    if let Some(bg) = bg {
        queue!(stdout, SetBackgroundColor(bg))?;
    }
    Ok(())
}

impl TerminalSurface for CrosstermSurface {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        if let Some(key) = self.lookahead.pop_front() {
            return Ok(key);
        }
        self.stdout.flush()?;
        loop {
            if let Some(key) = self.next_press(None)? {
                return Ok(key);
            }
        }
    }

    fn has_pending_key(&mut self) -> io::Result<bool> {
        if !self.lookahead.is_empty() {
            return Ok(true);
        }
        match self.next_press(Some(Duration::ZERO))? {
            Some(key) => {
                self.lookahead.push_back(key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn write_at(&mut self, text: &str, pad_width: usize, style: TextStyle) -> io::Result<()> {
        let (col, row) = self.cursor;
        let end = self.grid.write(col, row, text, pad_width, style);
        self.cursor = (end, row);
        self.paint(&[(row, col, end)])
    }

    fn move_region(&mut self, src: Rect, dst: (u16, u16), fill: Option<char>) -> io::Result<()> {
        if src.width == 0 || src.height == 0 {
            return Ok(());
        }
        let spans = self.grid.move_region(src, dst, fill);
        self.paint(&spans)
    }

    fn set_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        self.cursor = (col, row);
        queue!(self.stdout, cursor::MoveTo(col, row))
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.stdout, cursor::Show)
        } else {
            queue!(self.stdout, cursor::Hide)
        }
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.grid.width, self.grid.height)
    }

    fn alert(&mut self) -> io::Result<()> {
        if self.audible_alerts {
            queue!(self.stdout, Print('\u{7}'))?;
        }
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.grid.clear();
        self.cursor = (0, 0);
        queue!(
            self.stdout,
            ResetColor,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Surface that replays scripted key batches and records the drawn screen.
///
/// Each scripted batch becomes visible to [`TerminalSurface::has_pending_key`]
/// only once its first key has been read, which mirrors a burst of typing
/// arriving between two polls.
#[derive(Debug, Clone)]
pub struct ScriptedSurface {
    batches: VecDeque<Vec<KeyEvent>>,
    current: VecDeque<KeyEvent>,
    grid: CellGrid,
    cursor: (u16, u16),
    cursor_visible: bool,
    alerts: usize,
    moves: usize,
}

impl ScriptedSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            batches: VecDeque::new(),
            current: VecDeque::new(),
            grid: CellGrid::new(width, height),
            cursor: (0, 0),
            cursor_visible: true,
            alerts: 0,
            moves: 0,
        }
    }

    pub fn with_batches(mut self, batches: impl IntoIterator<Item = Vec<KeyEvent>>) -> Self {
        self.batches.extend(batches);
        self
    }

    /// Builds a surface from a key script, see [`parse_key_script`].
    pub fn from_script(width: u16, height: u16, script: &str) -> Self {
        Self::new(width, height).with_batches(parse_key_script(script))
    }

    pub fn alerts(&self) -> usize {
        self.alerts
    }

    pub fn region_moves(&self) -> usize {
        self.moves
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Text of a screen row with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        self.grid.row_text(row).trim_end().to_string()
    }

    pub fn style_at(&self, col: u16, row: u16) -> TextStyle {
        self.grid.get(col, row).style
    }

    pub fn remaining_keys(&self) -> usize {
        self.current.len() + self.batches.iter().map(Vec::len).sum::<usize>()
    }
}

impl TerminalSurface for ScriptedSurface {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        while self.current.is_empty() {
            match self.batches.pop_front() {
                Some(batch) => self.current.extend(batch),
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "scripted key input exhausted",
                    ))
                }
            }
        }
        self.current
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "scripted key input exhausted"))
    }

    fn has_pending_key(&mut self) -> io::Result<bool> {
        Ok(!self.current.is_empty())
    }

    fn write_at(&mut self, text: &str, pad_width: usize, style: TextStyle) -> io::Result<()> {
        let (col, row) = self.cursor;
        let end = self.grid.write(col, row, text, pad_width, style);
        self.cursor = (end, row);
        Ok(())
    }

    fn move_region(&mut self, src: Rect, dst: (u16, u16), fill: Option<char>) -> io::Result<()> {
        if src.width > 0 && src.height > 0 {
            self.grid.move_region(src, dst, fill);
            self.moves += 1;
        }
        Ok(())
    }

    fn set_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        self.cursor = (col, row);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.grid.width, self.grid.height)
    }

    fn alert(&mut self) -> io::Result<()> {
        self.alerts += 1;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.grid.clear();
        self.cursor = (0, 0);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
