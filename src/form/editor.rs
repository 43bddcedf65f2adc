//! Resumable single-line field editor.
//!
//! A [`FieldEditor`] keeps its buffer and undo/redo history between edit
//! sessions: committing a value does not reset it, so re-entering the field
//! continues where the user left off. Only cancellation replaces the editor
//! (see the coordinator).

use super::batcher::KeyBatch;
use super::buffer::{EditHistory, HistoryEntry, TextBuffer};
use super::key::{Key, KeyEvent};
use super::render::EditOp;

/// Result of feeding one key batch to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Continue,
    Committed(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FieldEditor {
    default_value: String,
    buffer: TextBuffer,
    history: EditHistory,
}

impl FieldEditor {
    pub fn new(default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            buffer: TextBuffer::new(&default_value),
            default_value,
            history: EditHistory::new(),
        }
    }

    /// Value the field held when the form was opened.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn state(&self) -> HistoryEntry {
        self.buffer.snapshot()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Instructions that show the editor's current line when editing starts.
    pub fn begin(&self, ops: &mut Vec<EditOp>) {
        ops.push(self.line_op());
    }

    /// Applies events from `batch` until it is exhausted, a commit or a cancellation.
    ///
    /// Each insertion or deletion run records one undo step, so typing spread
    /// over several polls is undone one poll at a time. Events after a commit
    /// or cancellation stay in `batch` for the caller.
    /// `capacity` is the longest line the surface can show.
    pub fn process_batch(
        &mut self,
        batch: &mut KeyBatch,
        capacity: usize,
        ops: &mut Vec<EditOp>,
    ) -> EditOutcome {
        while let Some(event) = batch.next() {
            if let Some(ch) = event.printable() {
                let mut run = vec![ch];
                while let Some(next) = batch.peek().and_then(KeyEvent::printable) {
                    run.push(next);
                    batch.next();
                }
                self.insert_run(&run, capacity, ops);
                continue;
            }

            match event.key {
                Key::Backspace => {
                    let mut count = 1;
                    while batch.peek().map(|next| next.key) == Some(Key::Backspace) {
                        count += 1;
                        batch.next();
                    }
                    self.delete_run(count, ops);
                }
                Key::Left => {
                    if self.buffer.move_left() {
                        self.cursor_moved(ops);
                    }
                }
                Key::Right => {
                    if self.buffer.move_right() {
                        self.cursor_moved(ops);
                    }
                }
                Key::Home => {
                    self.buffer.move_home();
                    self.cursor_moved(ops);
                }
                Key::End => {
                    self.buffer.move_end();
                    self.cursor_moved(ops);
                }
                Key::Down => self.undo(ops),
                Key::Up => self.redo(ops),
                Key::Char(_) if event.is_ctrl('z') => self.undo(ops),
                Key::Char(_) if event.is_ctrl('y') => self.redo(ops),
                Key::Enter | Key::Tab => return EditOutcome::Committed(self.buffer.text()),
                Key::Esc => return EditOutcome::Cancelled,
                _ => {}
            }
        }
        EditOutcome::Continue
    }

    fn insert_run(&mut self, run: &[char], capacity: usize, ops: &mut Vec<EditOp>) {
        if self.buffer.len() + run.len() > capacity {
            tracing::debug!(
                len = self.buffer.len(),
                run = run.len(),
                capacity,
                "insertion rejected: line full"
            );
            ops.push(EditOp::Alert);
            return;
        }
        self.history.record(self.buffer.snapshot());
        let at = self.buffer.cursor();
        let tail_len = self.buffer.len() - at;
        self.buffer.insert(run);
        ops.push(EditOp::Insert {
            at,
            inserted: run.iter().collect(),
            tail_len,
        });
    }

    fn delete_run(&mut self, count: usize, ops: &mut Vec<EditOp>) {
        if self.buffer.cursor() == 0 {
            ops.push(EditOp::Alert);
            return;
        }
        self.history.record(self.buffer.snapshot());
        let removed = self.buffer.delete_before(count);
        let at = self.buffer.cursor();
        ops.push(EditOp::Delete {
            at,
            count: removed,
            tail_len: self.buffer.len() - at,
        });
    }

    fn undo(&mut self, ops: &mut Vec<EditOp>) {
        if self.history.undo(&mut self.buffer) {
            ops.push(self.line_op());
        }
    }

    fn redo(&mut self, ops: &mut Vec<EditOp>) {
        if self.history.redo(&mut self.buffer) {
            ops.push(self.line_op());
        }
    }

    fn cursor_moved(&self, ops: &mut Vec<EditOp>) {
        ops.push(EditOp::Cursor(self.buffer.cursor()));
    }

    fn line_op(&self) -> EditOp {
        EditOp::Line {
            text: self.buffer.text(),
            cursor: self.buffer.cursor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: usize = 80;

    fn keys(text: &str) -> Vec<KeyEvent> {
        text.chars().map(KeyEvent::ch).collect()
    }

    fn run(editor: &mut FieldEditor, events: Vec<KeyEvent>) -> (EditOutcome, Vec<EditOp>) {
        run_with_capacity(editor, events, WIDE)
    }

    fn run_with_capacity(
        editor: &mut FieldEditor,
        events: Vec<KeyEvent>,
        capacity: usize,
    ) -> (EditOutcome, Vec<EditOp>) {
        let mut batch = KeyBatch::from(events);
        let mut ops = Vec::new();
        let outcome = editor.process_batch(&mut batch, capacity, &mut ops);
        (outcome, ops)
    }

    #[test]
    fn typed_run_is_one_history_step() {
        let mut editor = FieldEditor::new("");
        let (outcome, ops) = run(&mut editor, keys("abc"));
        assert_eq!(outcome, EditOutcome::Continue);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.undo_depth(), 1);
        assert_eq!(
            ops,
            vec![EditOp::Insert {
                at: 0,
                inserted: "abc".into(),
                tail_len: 0
            }]
        );
    }

    #[test]
    fn each_polled_keystroke_is_its_own_step() {
        let mut editor = FieldEditor::new("");
        run(&mut editor, vec![KeyEvent::ch('a')]);
        let after_first = editor.state();
        run(&mut editor, vec![KeyEvent::ch('b')]);
        assert_eq!(editor.undo_depth(), 2);

        run(&mut editor, vec![KeyEvent::plain(Key::Down)]);
        assert_eq!(editor.state(), after_first);
        assert_eq!(editor.text(), "a");
        run(&mut editor, vec![KeyEvent::plain(Key::Down)]);
        assert_eq!(editor.text(), "");
        assert_eq!(editor.undo_depth(), 0);
    }

    #[test]
    fn cursor_move_splits_insertion_runs() {
        let mut editor = FieldEditor::new("");
        run(&mut editor, keys("ab"));
        run(&mut editor, vec![KeyEvent::plain(Key::Left), KeyEvent::ch('x')]);
        assert_eq!(editor.text(), "axb");
        assert_eq!(editor.undo_depth(), 2);
    }

    #[test]
    fn insert_lands_at_the_cursor() {
        let mut editor = FieldEditor::new("ac");
        let (_, ops) = run(&mut editor, vec![KeyEvent::plain(Key::Left), KeyEvent::ch('b')]);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 2);
        assert_eq!(
            ops,
            vec![
                EditOp::Cursor(1),
                EditOp::Insert {
                    at: 1,
                    inserted: "b".into(),
                    tail_len: 1
                }
            ]
        );
    }

    #[test]
    fn undo_restores_exact_state_and_redo_reapplies() {
        let mut editor = FieldEditor::new("Smith");
        let before = editor.state();
        run(&mut editor, keys("son"));
        let after = editor.state();

        run(&mut editor, vec![KeyEvent::ctrl('z')]);
        assert_eq!(editor.state(), before);
        assert_eq!(editor.redo_depth(), 1);

        run(&mut editor, vec![KeyEvent::ctrl('y')]);
        assert_eq!(editor.state(), after);
        assert_eq!(editor.redo_depth(), 0);
    }

    #[test]
    fn up_and_down_are_redo_and_undo() {
        let mut editor = FieldEditor::new("");
        run(&mut editor, keys("ab"));
        let (_, ops) = run(&mut editor, vec![KeyEvent::plain(Key::Down)]);
        assert_eq!(
            ops,
            vec![EditOp::Line {
                text: String::new(),
                cursor: 0
            }]
        );
        run(&mut editor, vec![KeyEvent::plain(Key::Up)]);
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn new_edit_after_undo_invalidates_redo() {
        let mut editor = FieldEditor::new("");
        run(&mut editor, keys("one"));
        run(&mut editor, vec![KeyEvent::plain(Key::Down)]);
        run(&mut editor, keys("two"));
        assert_eq!(editor.redo_depth(), 0);

        let (_, ops) = run(&mut editor, vec![KeyEvent::plain(Key::Up)]);
        assert!(ops.is_empty());
        assert_eq!(editor.text(), "two");
    }

    #[test]
    fn undo_with_empty_history_is_a_no_op() {
        let mut editor = FieldEditor::new("keep");
        let (_, ops) = run(&mut editor, vec![KeyEvent::plain(Key::Down)]);
        assert!(ops.is_empty());
        assert_eq!(editor.text(), "keep");
    }

    #[test]
    fn backspace_at_start_alerts_without_history() {
        let mut editor = FieldEditor::new("abc");
        let (_, ops) = run(
            &mut editor,
            vec![KeyEvent::plain(Key::Home), KeyEvent::plain(Key::Backspace)],
        );
        assert_eq!(ops, vec![EditOp::Cursor(0), EditOp::Alert]);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.undo_depth(), 0);
    }

    #[test]
    fn queued_backspaces_delete_as_one_block() {
        let mut editor = FieldEditor::new("hello world");
        run(&mut editor, vec![KeyEvent::plain(Key::Home)]);
        for _ in 0..5 {
            run(&mut editor, vec![KeyEvent::plain(Key::Right)]);
        }
        assert_eq!(editor.cursor(), 5);

        let (_, ops) = run(&mut editor, vec![KeyEvent::plain(Key::Backspace); 3]);
        assert_eq!(editor.text(), "he world");
        assert_eq!(editor.cursor(), 2);
        assert_eq!(editor.undo_depth(), 1);
        assert_eq!(
            ops,
            vec![EditOp::Delete {
                at: 2,
                count: 3,
                tail_len: 6
            }]
        );
    }

    #[test]
    fn backspace_run_is_clamped_to_cursor() {
        let mut editor = FieldEditor::new("ab");
        run(&mut editor, vec![KeyEvent::plain(Key::Backspace); 4]);
        assert_eq!(editor.text(), "");
        assert_eq!(editor.undo_depth(), 1);
    }

    #[test]
    fn overflowing_insertion_is_rejected_whole() {
        let mut editor = FieldEditor::new("abc");
        let (_, ops) = run_with_capacity(&mut editor, keys("def"), 5);
        assert_eq!(ops, vec![EditOp::Alert]);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.undo_depth(), 0);

        run_with_capacity(&mut editor, keys("de"), 5);
        assert_eq!(editor.text(), "abcde");
    }

    #[test]
    fn commit_leaves_following_events_in_the_batch() {
        let mut editor = FieldEditor::new("");
        let mut batch = KeyBatch::from(vec![
            KeyEvent::ch('x'),
            KeyEvent::plain(Key::Enter),
            KeyEvent::plain(Key::Down),
        ]);
        let mut ops = Vec::new();
        let outcome = editor.process_batch(&mut batch, WIDE, &mut ops);
        assert_eq!(outcome, EditOutcome::Committed("x".into()));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.peek(), Some(&KeyEvent::plain(Key::Down)));
    }

    #[test]
    fn commit_keeps_history_for_the_next_session() {
        let mut editor = FieldEditor::new("");
        let (outcome, _) = run(&mut editor, vec![KeyEvent::ch('a'), KeyEvent::plain(Key::Tab)]);
        assert_eq!(outcome, EditOutcome::Committed("a".into()));

        let mut ops = Vec::new();
        editor.begin(&mut ops);
        assert_eq!(
            ops,
            vec![EditOp::Line {
                text: "a".into(),
                cursor: 1
            }]
        );
        run(&mut editor, keys("b"));
        assert_eq!(editor.undo_depth(), 2);
        run(&mut editor, vec![KeyEvent::plain(Key::Down), KeyEvent::plain(Key::Down)]);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn escape_reports_cancellation() {
        let mut editor = FieldEditor::new("Smith");
        let (outcome, _) = run(&mut editor, {
            let mut events = keys("son");
            events.push(KeyEvent::plain(Key::Esc));
            events
        });
        assert_eq!(outcome, EditOutcome::Cancelled);
        assert_eq!(editor.default_value(), "Smith");
    }
}
