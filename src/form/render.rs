//! Abstract render instructions and their translation into surface calls.
//!
//! The line editor and the coordinator never touch the surface directly. They
//! push [`RenderOp`]s which the [`Renderer`] maps onto a [`FormLayout`].

use std::io;

use super::surface::{Rect, TerminalSurface, TextStyle};

/// Field-relative edit instruction emitted by a line editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Redraw the whole line and place the cursor.
    Line { text: String, cursor: usize },
    /// `inserted` was placed at `at`; `tail_len` characters that followed `at` shift right.
    Insert {
        at: usize,
        inserted: String,
        tail_len: usize,
    },
    /// `count` characters before the old cursor were removed; the new cursor is `at`.
    Delete {
        at: usize,
        count: usize,
        tail_len: usize,
    },
    Cursor(usize),
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Draw a field's committed value while navigating.
    Field {
        index: usize,
        value: String,
        focused: bool,
    },
    Edit {
        index: usize,
        op: EditOp,
    },
    Submit {
        focused: bool,
    },
    Message(String),
    ClearMessage,
    CursorVisible(bool),
    Alert,
}

/// Screen geometry of the form.
///
/// Row 0 holds the title, each field takes a label row and a value row
/// followed by a spacer, the submit control sits after the last field, and the
/// two bottom rows carry the transient message and the key hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    pub width: u16,
    pub height: u16,
    pub field_count: usize,
}

const FIRST_LABEL_ROW: usize = 2;
const ROWS_PER_FIELD: usize = 3;

impl FormLayout {
    pub fn new((width, height): (u16, u16), field_count: usize) -> Self {
        Self {
            width,
            height,
            field_count,
        }
    }

    pub fn label_row(&self, index: usize) -> u16 {
        clamp_row(FIRST_LABEL_ROW + ROWS_PER_FIELD * index)
    }

    pub fn value_row(&self, index: usize) -> u16 {
        clamp_row(FIRST_LABEL_ROW + ROWS_PER_FIELD * index + 1)
    }

    pub fn submit_row(&self) -> u16 {
        clamp_row(FIRST_LABEL_ROW + ROWS_PER_FIELD * self.field_count)
    }

    pub fn message_row(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    pub fn hint_row(&self) -> u16 {
        self.height.saturating_sub(1)
    }

    /// Longest value a field line can hold.
    pub fn line_capacity(&self) -> usize {
        self.width as usize
    }
}

fn clamp_row(row: usize) -> u16 {
    u16::try_from(row).unwrap_or(u16::MAX)
}

fn col(offset: usize) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX)
}

pub const SUBMIT_LABEL: &str = "Save changes";
pub const NAVIGATION_HINT: &str =
    "Keys: Enter=edit | Up/Down=move between fields | Esc=cancel";

/// Translates render operations for one form into surface calls.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: FormLayout,
}

impl Renderer {
    pub fn new(layout: FormLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    /// Paints the static frame: title, labels, values, submit control and hints.
    pub fn draw_frame<S>(
        &self,
        surface: &mut S,
        title: &str,
        labels: &[&str],
        values: &[String],
    ) -> io::Result<()>
    where
        S: TerminalSurface + ?Sized,
    {
        let width = self.layout.width as usize;
        surface.clear()?;
        surface.set_cursor_visible(false)?;
        surface.set_cursor(0, 0)?;
        surface.write_at(title, width, TextStyle::Label)?;
        for (index, label) in labels.iter().enumerate() {
            surface.set_cursor(0, self.layout.label_row(index))?;
            surface.write_at(&format!("{label}:"), width, TextStyle::Label)?;
            if let Some(value) = values.get(index) {
                surface.set_cursor(0, self.layout.value_row(index))?;
                surface.write_at(value, width, TextStyle::Normal)?;
            }
        }
        self.apply(surface, &RenderOp::Submit { focused: false })?;
        surface.set_cursor(0, self.layout.hint_row())?;
        surface.write_at(NAVIGATION_HINT, 0, TextStyle::Hint)?;
        surface.flush()
    }

    pub fn apply_all<S>(&self, surface: &mut S, ops: impl IntoIterator<Item = RenderOp>) -> io::Result<()>
    where
        S: TerminalSurface + ?Sized,
    {
        for op in ops {
            self.apply(surface, &op)?;
        }
        surface.flush()
    }

    pub fn apply<S>(&self, surface: &mut S, op: &RenderOp) -> io::Result<()>
    where
        S: TerminalSurface + ?Sized,
    {
        let width = self.layout.width as usize;
        match op {
            RenderOp::Field {
                index,
                value,
                focused,
            } => {
                let style = if *focused {
                    TextStyle::Focused
                } else {
                    TextStyle::Normal
                };
                surface.set_cursor(0, self.layout.value_row(*index))?;
                surface.write_at(value, width, style)
            }
            RenderOp::Edit { index, op } => self.apply_edit(surface, *index, op),
            RenderOp::Submit { focused } => {
                let style = if *focused {
                    TextStyle::SubmitFocused
                } else {
                    TextStyle::Submit
                };
                surface.set_cursor(0, self.layout.submit_row())?;
                surface.write_at(SUBMIT_LABEL, 0, style)
            }
            RenderOp::Message(message) => {
                surface.set_cursor(0, self.layout.message_row())?;
                surface.write_at(message, width, TextStyle::Error)
            }
            RenderOp::ClearMessage => {
                surface.set_cursor(0, self.layout.message_row())?;
                surface.write_at("", width, TextStyle::Normal)
            }
            RenderOp::CursorVisible(visible) => surface.set_cursor_visible(*visible),
            RenderOp::Alert => surface.alert(),
        }
    }

    fn apply_edit<S>(&self, surface: &mut S, index: usize, op: &EditOp) -> io::Result<()>
    where
        S: TerminalSurface + ?Sized,
    {
        let row = self.layout.value_row(index);
        match op {
            EditOp::Line { text, cursor } => {
                surface.set_cursor(0, row)?;
                surface.write_at(text, self.layout.width as usize, TextStyle::Editing)?;
                surface.set_cursor(col(*cursor), row)
            }
            EditOp::Insert {
                at,
                inserted,
                tail_len,
            } => {
                let shift = inserted.chars().count();
                if *tail_len > 0 {
                    surface.move_region(
                        Rect::new(col(*at), row, col(*tail_len), 1),
                        (col(at + shift), row),
                        None,
                    )?;
                }
                surface.set_cursor(col(*at), row)?;
                surface.write_at(inserted, 0, TextStyle::Editing)
            }
            EditOp::Delete {
                at,
                count,
                tail_len,
            } => {
                if *tail_len > 0 {
                    surface.move_region(
                        Rect::new(col(at + count), row, col(*tail_len), 1),
                        (col(*at), row),
                        Some(' '),
                    )?;
                }
                // Blank the cells vacated at the end of the line.
                surface.set_cursor(col(at + tail_len), row)?;
                surface.write_at("", *count, TextStyle::Editing)?;
                surface.set_cursor(col(*at), row)
            }
            EditOp::Cursor(offset) => surface.set_cursor(col(*offset), row),
            EditOp::Alert => surface.alert(),
        }
    }
}
