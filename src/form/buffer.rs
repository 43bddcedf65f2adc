//! Single-line text buffer with cursor and snapshot-based undo/redo history.

/// Characters of one line plus a cursor offset in `[0, len]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the cursor at its end.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Characters from `offset` to the end of the line.
    pub fn tail(&self, offset: usize) -> String {
        self.chars[offset.min(self.chars.len())..].iter().collect()
    }

    /// Inserts `text` at the cursor and moves the cursor past it.
    pub fn insert(&mut self, text: &[char]) {
        let at = self.cursor;
        self.chars.splice(at..at, text.iter().copied());
        self.cursor += text.len();
    }

    /// Removes up to `count` characters left of the cursor; returns how many were removed.
    pub fn delete_before(&mut self, count: usize) -> usize {
        let removed = count.min(self.cursor);
        let start = self.cursor - removed;
        self.chars.drain(start..self.cursor);
        self.cursor = start;
        removed
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            content: self.text(),
            cursor: self.cursor,
        }
    }

    pub fn restore(&mut self, entry: &HistoryEntry) {
        self.chars = entry.content.chars().collect();
        self.cursor = entry.cursor.min(self.chars.len());
    }
}

/// Immutable `(content, cursor)` pair recorded before a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub content: String,
    pub cursor: usize,
}

/// Undo and redo stacks of [`HistoryEntry`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation state. Any pending redo is discarded.
    pub fn record(&mut self, before: HistoryEntry) {
        self.undo.push(before);
        self.redo.clear();
    }

    /// Swaps the buffer with the most recent undo snapshot.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> bool {
        match self.undo.pop() {
            Some(entry) => {
                self.redo.push(buffer.snapshot());
                buffer.restore(&entry);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, buffer: &mut TextBuffer) -> bool {
        match self.redo.pop() {
            Some(entry) => {
                self.undo.push(buffer.snapshot());
                buffer.restore(&entry);
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
