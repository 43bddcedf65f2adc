//! Focus-navigation state machine composing one line editor per field.
//!
//! The coordinator starts in navigating mode on the first field. `Enter` on a
//! data field switches to editing mode, where key batches go to that field's
//! [`FieldEditor`] until it commits (validated here) or cancels. `Enter` on the
//! trailing submit control completes the form; `Esc` while navigating cancels
//! it.

use super::batcher::KeyBatch;
use super::editor::{EditOutcome, FieldEditor};
use super::key::{Key, KeyEvent};
use super::render::{FormLayout, RenderOp, Renderer};
use super::session::FormSession;
use super::surface::TerminalSurface;
use super::validation::{format_date_time, FieldKind, FieldValue};
use crate::errors::FormError;

/// Terminal outcome of a form run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(label: &'static str, kind: FieldKind) -> Self {
        Self { label, kind }
    }
}

/// Title and ordered fields of a form.
#[derive(Debug, Clone)]
pub struct FormDescriptor {
    pub title: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(title: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { title, fields }
    }
}

/// Record-specific side of a form.
///
/// Implementations describe their fields, supply the values present when the
/// form opens, and build the output record from the accepted values.
pub trait FormFlow {
    type Output;

    fn descriptor(&self) -> &FormDescriptor;

    /// One value per descriptor field, in order.
    fn initial_values(&self) -> Vec<FieldValue>;

    /// Builds the output once the form is submitted.
    fn commit(&self, values: &[FieldValue]) -> Self::Output;

    /// Submission gate. By default every required name must be present.
    fn can_submit(&self, values: &[FieldValue]) -> bool {
        self.descriptor()
            .fields
            .iter()
            .zip(values)
            .filter(|(field, _)| field.kind == FieldKind::RequiredName)
            .all(|(_, value)| value.as_text().is_some_and(|text| !text.is_empty()))
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    kind: FieldKind,
    current: String,
    value: FieldValue,
    initial: FieldValue,
    editor: FieldEditor,
}

impl FieldState {
    fn new(kind: FieldKind, value: FieldValue) -> Self {
        let current = display_text(&value);
        Self {
            kind,
            editor: FieldEditor::new(current.clone()),
            current,
            initial: value.clone(),
            value,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Text of the last accepted value, shown while the field is not being edited.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn editor(&self) -> &FieldEditor {
        &self.editor
    }

    /// Replaces the editor with a fresh one seeded with the form-entry value.
    fn revert_to_default(&mut self) {
        let default = self.editor.default_value().to_string();
        self.value = self.initial.clone();
        self.editor = FieldEditor::new(default.clone());
        self.current = default;
    }
}

fn display_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::DateTime(value) => format_date_time(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigating,
    Editing,
}

/// Fields plus the focus position; `focus == fields.len()` is the submit control.
#[derive(Debug, Clone)]
pub struct FormState {
    fields: Vec<FieldState>,
    focus: usize,
    mode: Mode,
}

impl FormState {
    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldState> {
        self.fields.get(index)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn on_submit(&self) -> bool {
        self.focus == self.fields.len()
    }

    fn values(&self) -> Vec<FieldValue> {
        self.fields.iter().map(|field| field.value.clone()).collect()
    }
}

/// Drives a [`FormFlow`] against a [`TerminalSurface`].
pub struct FormCoordinator<'a, F: FormFlow> {
    flow: &'a F,
    state: FormState,
    session: FormSession,
}

impl<'a, F: FormFlow> FormCoordinator<'a, F> {
    pub fn new(flow: &'a F) -> Self {
        let descriptor = flow.descriptor();
        let mut initial = flow.initial_values().into_iter();
        let fields = descriptor
            .fields
            .iter()
            .map(|field| FieldState::new(field.kind, initial.next().unwrap_or(FieldValue::Absent)))
            .collect();
        Self {
            flow,
            state: FormState {
                fields,
                focus: 0,
                mode: Mode::Navigating,
            },
            session: FormSession::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Runs the form until it is submitted or cancelled.
    pub fn run<S>(&mut self, surface: &mut S) -> Result<FormResult<F::Output>, FormError>
    where
        S: TerminalSurface + ?Sized,
    {
        let flow = self.flow;
        let descriptor = flow.descriptor();
        let layout = FormLayout::new(surface.dimensions(), descriptor.fields.len());
        let renderer = Renderer::new(layout);
        let labels: Vec<&str> = descriptor.fields.iter().map(|field| field.label).collect();
        let values: Vec<String> = self
            .state
            .fields
            .iter()
            .map(|field| field.current.clone())
            .collect();
        renderer.draw_frame(surface, descriptor.title, &labels, &values)?;
        self.focus_op(true);
        tracing::debug!(form = descriptor.title, "form opened");

        loop {
            self.flush(&renderer, surface)?;
            match self.state.mode {
                Mode::Navigating => {
                    let key = self.session.next_key(surface)?;
                    if let Some(result) = self.handle_navigation(key) {
                        self.flush(&renderer, surface)?;
                        return Ok(result);
                    }
                }
                Mode::Editing => {
                    let mut batch = self.session.next_batch(surface)?;
                    self.handle_edit_batch(&mut batch, layout.line_capacity());
                    self.session.requeue(batch);
                }
            }
        }
    }

    fn flush<S>(&mut self, renderer: &Renderer, surface: &mut S) -> Result<(), FormError>
    where
        S: TerminalSurface + ?Sized,
    {
        let mut ops = self.session.take_ops();
        let layout = renderer.layout();
        // On short screens the message row shares the submit row.
        if layout.message_row() == layout.submit_row() && ops.contains(&RenderOp::ClearMessage) {
            ops.push(RenderOp::Submit {
                focused: self.state.on_submit(),
            });
        }
        renderer.apply_all(surface, ops)?;
        Ok(())
    }

    fn handle_navigation(&mut self, key: KeyEvent) -> Option<FormResult<F::Output>> {
        let field_count = self.state.fields.len();
        match key.key {
            Key::Up => self.move_focus(self.state.focus.saturating_sub(1)),
            Key::Down | Key::Tab => self.move_focus((self.state.focus + 1).min(field_count)),
            Key::Enter if self.state.focus < field_count => self.start_editing(),
            Key::Enter => {
                let values = self.state.values();
                if self.flow.can_submit(&values) {
                    tracing::info!(form = self.flow.descriptor().title, "form submitted");
                    return Some(FormResult::Completed(self.flow.commit(&values)));
                }
                tracing::debug!("submit rejected: required fields missing");
                self.session.push(RenderOp::Alert);
            }
            Key::Esc => {
                tracing::info!(form = self.flow.descriptor().title, "form cancelled");
                return Some(FormResult::Cancelled);
            }
            _ => {}
        }
        None
    }

    fn handle_edit_batch(&mut self, batch: &mut KeyBatch, capacity: usize) {
        let index = self.state.focus;
        let field = &mut self.state.fields[index];
        let mut edit_ops = Vec::new();
        let outcome = field.editor.process_batch(batch, capacity, &mut edit_ops);
        self.session.push_edit(index, edit_ops);

        match outcome {
            EditOutcome::Continue => {}
            EditOutcome::Committed(text) => match field.kind.validate(&text) {
                Ok(value) => {
                    tracing::debug!(field = index, "field committed");
                    field.value = value;
                    field.current = text;
                    self.finish_editing();
                }
                Err(err) => {
                    tracing::debug!(field = index, reason = %err, "field value rejected");
                    self.session.show_message(err.message);
                }
            },
            EditOutcome::Cancelled => {
                tracing::debug!(field = index, "field edit cancelled");
                field.revert_to_default();
                self.finish_editing();
            }
        }
    }

    fn move_focus(&mut self, target: usize) {
        if target == self.state.focus {
            return;
        }
        self.focus_op(false);
        self.state.focus = target;
        self.focus_op(true);
    }

    fn start_editing(&mut self) {
        let index = self.state.focus;
        self.state.mode = Mode::Editing;
        tracing::debug!(field = index, "editing field");
        let mut ops = Vec::new();
        self.state.fields[index].editor.begin(&mut ops);
        self.session.push_edit(index, ops);
        self.session.push(RenderOp::CursorVisible(true));
    }

    fn finish_editing(&mut self) {
        self.state.mode = Mode::Navigating;
        self.session.push(RenderOp::CursorVisible(false));
        self.focus_op(true);
    }

    fn focus_op(&mut self, focused: bool) {
        let op = match self.state.fields.get(self.state.focus) {
            Some(field) => RenderOp::Field {
                index: self.state.focus,
                value: field.current.clone(),
                focused,
            },
            None => RenderOp::Submit { focused },
        };
        self.session.push(op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::key::parse_key_script;
    use crate::form::surface::{ScriptedSurface, TextStyle};

    struct PairForm {
        descriptor: FormDescriptor,
        initial: Vec<FieldValue>,
    }

    impl PairForm {
        fn new(initial: Vec<FieldValue>) -> Self {
            Self {
                descriptor: FormDescriptor::new(
                    "Pair",
                    vec![
                        FieldDescriptor::new("Name", FieldKind::RequiredName),
                        FieldDescriptor::new("ZIP", FieldKind::PostalCode),
                    ],
                ),
                initial,
            }
        }
    }

    impl FormFlow for PairForm {
        type Output = Vec<FieldValue>;

        fn descriptor(&self) -> &FormDescriptor {
            &self.descriptor
        }

        fn initial_values(&self) -> Vec<FieldValue> {
            self.initial.clone()
        }

        fn commit(&self, values: &[FieldValue]) -> Self::Output {
            values.to_vec()
        }
    }

    fn surface(script: &str) -> ScriptedSurface {
        ScriptedSurface::new(40, 12).with_batches(parse_key_script(script))
    }

    #[test]
    fn fills_fields_and_submits() {
        let form = PairForm::new(vec![FieldValue::Absent, FieldValue::Absent]);
        let mut surface = surface("ENTER|Ann|ENTER|DOWN|ENTER|12345,ENTER|DOWN|ENTER");
        let mut coordinator = FormCoordinator::new(&form);

        let result = coordinator.run(&mut surface).unwrap();
        assert_eq!(
            result,
            FormResult::Completed(vec![
                FieldValue::Text("Ann".into()),
                FieldValue::Text("12345".into())
            ])
        );
        assert_eq!(surface.row_text(3), "Ann");
        assert_eq!(surface.row_text(6), "12345");
    }

    #[test]
    fn escape_while_navigating_cancels_the_form() {
        let form = PairForm::new(vec![FieldValue::Text("Ann".into()), FieldValue::Absent]);
        let mut surface = surface("DOWN|ESC");
        let result = FormCoordinator::new(&form).run(&mut surface).unwrap();
        assert_eq!(result, FormResult::Cancelled);
    }

    #[test]
    fn focus_is_clamped_to_first_field_and_submit() {
        let form = PairForm::new(vec![FieldValue::Absent, FieldValue::Absent]);
        let mut surface = surface("UP|DOWN|DOWN|DOWN|DOWN|ESC");
        let mut coordinator = FormCoordinator::new(&form);
        coordinator.run(&mut surface).unwrap();
        assert!(coordinator.state().on_submit());
        assert_eq!(coordinator.state().focus(), 2);
        assert_eq!(surface.style_at(0, 8), TextStyle::SubmitFocused);
        assert_eq!(surface.style_at(0, 3), TextStyle::Normal);
    }

    #[test]
    fn up_and_down_are_undo_and_redo_while_editing() {
        let form = PairForm::new(vec![FieldValue::Absent, FieldValue::Absent]);
        // Down inside the edit undoes the typing instead of moving focus.
        let mut surface = surface("ENTER|Bob|DOWN|UP|ENTER|ESC");
        let mut coordinator = FormCoordinator::new(&form);
        coordinator.run(&mut surface).unwrap();
        let state = coordinator.state();
        assert_eq!(state.focus(), 0);
        assert_eq!(state.field(0).unwrap().current(), "Bob");
    }

    #[test]
    fn rejected_commit_stays_in_edit_mode() {
        let form = PairForm::new(vec![FieldValue::Text("Ann".into()), FieldValue::Absent]);
        let mut surface = surface("DOWN|ENTER|1234,ENTER|5,ENTER|ESC");
        let mut coordinator = FormCoordinator::new(&form);
        coordinator.run(&mut surface).unwrap();

        let zip = coordinator.state().field(1).unwrap();
        assert_eq!(zip.value(), &FieldValue::Text("12345".into()));
        // One undo step per polled insertion run.
        assert_eq!(zip.editor().undo_depth(), 2);
        assert_eq!(surface.alerts(), 1);
    }

    #[test]
    fn rejection_message_is_cleared_on_next_poll() {
        let form = PairForm::new(vec![FieldValue::Text("Ann".into()), FieldValue::Absent]);
        let mut surface = surface("DOWN|ENTER|12,ENTER");
        let mut coordinator = FormCoordinator::new(&form);
        let err = coordinator.run(&mut surface).unwrap_err();
        assert!(matches!(err, FormError::Io(_)));
        assert_eq!(surface.row_text(10), "ZIP code must be exactly 5 digits");
        assert_eq!(coordinator.state().mode(), Mode::Editing);

        let mut surface = self::surface("DOWN|ENTER|12,ENTER|3");
        let mut coordinator = FormCoordinator::new(&form);
        coordinator.run(&mut surface).unwrap_err();
        assert_eq!(surface.row_text(10), "");
        assert_eq!(coordinator.state().field(1).unwrap().editor().text(), "123");
    }

    #[test]
    fn submit_requires_names() {
        let form = PairForm::new(vec![FieldValue::Absent, FieldValue::Absent]);
        let mut surface = surface("DOWN|DOWN|ENTER|UP|UP|ENTER|Zoe,ENTER|DOWN|DOWN|ENTER");
        let mut coordinator = FormCoordinator::new(&form);
        let result = coordinator.run(&mut surface).unwrap();
        assert_eq!(surface.alerts(), 1);
        assert_eq!(
            result,
            FormResult::Completed(vec![FieldValue::Text("Zoe".into()), FieldValue::Absent])
        );
    }

    #[test]
    fn cancelled_edit_restores_entry_value_and_fresh_history() {
        let form = PairForm::new(vec![FieldValue::Text("Smith".into()), FieldValue::Absent]);
        let mut surface = surface("ENTER|X,ENTER|ENTER|son|ESC|ESC");
        let mut coordinator = FormCoordinator::new(&form);
        coordinator.run(&mut surface).unwrap();

        let name = coordinator.state().field(0).unwrap();
        assert_eq!(name.current(), "Smith");
        assert_eq!(name.value(), &FieldValue::Text("Smith".into()));
        assert_eq!(name.editor().text(), "Smith");
        assert_eq!(name.editor().undo_depth(), 0);
        assert_eq!(surface.row_text(3), "Smith");
    }

    #[test]
    fn leftover_keys_after_commit_drive_navigation() {
        let form = PairForm::new(vec![FieldValue::Absent, FieldValue::Absent]);
        let mut surface = surface("ENTER|Eve,ENTER,DOWN,DOWN,ENTER");
        let result = FormCoordinator::new(&form).run(&mut surface).unwrap();
        assert_eq!(
            result,
            FormResult::Completed(vec![FieldValue::Text("Eve".into()), FieldValue::Absent])
        );
    }
}
