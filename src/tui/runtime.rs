use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;

use super::renderer;
use super::theme::Theme;
use super::widgets::TextInputState;
use super::Command;
use crate::api::BecomeMethod;
use crate::dialog::{
    self, AuthorizationMode, Autofocus, CredentialDialog, DialogContext, DialogEvent, DialogView,
    FieldId, InputKind, Msg, OpenSignal, SessionId, TextField,
};

/// Keyboard focus inside the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Cancel,
    Save,
}

impl From<Autofocus> for Focus {
    fn from(autofocus: Autofocus) -> Self {
        match autofocus {
            Autofocus::Field(id) => Focus::Field(id),
            Autofocus::Cancel => Focus::Cancel,
        }
    }
}

/// Drives a `CredentialDialog`: executes its commands, polls pending async
/// work and translates key presses into messages.
pub struct DialogRuntime {
    dialog: CredentialDialog,

    /// Pending async operations (Command::Perform)
    pending_async: Vec<Pin<Box<dyn Future<Output = Msg> + Send>>>,

    /// Events published by the dialog, drained by the host
    events: Vec<DialogEvent>,

    focus: Focus,
    inputs: HashMap<TextField, TextInputState>,

    /// Session the focus and cursors were initialized for
    bound_session: Option<SessionId>,
}

impl DialogRuntime {
    pub fn new(context: DialogContext) -> Self {
        Self {
            dialog: CredentialDialog::new(context),
            pending_async: Vec::new(),
            events: Vec::new(),
            focus: Focus::Cancel,
            inputs: HashMap::new(),
            bound_session: None,
        }
    }

    pub fn dialog(&self) -> &CredentialDialog {
        &self.dialog
    }

    pub fn view(&self) -> Option<DialogView> {
        dialog::view(&self.dialog)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_async.is_empty()
    }

    pub fn open(&mut self, signal: OpenSignal) {
        self.dispatch(Msg::Open(signal));
    }

    /// Run one message through update and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        let command = dialog::update(&mut self.dialog, msg);
        self.execute(command);
        self.sync_session();
    }

    fn execute(&mut self, command: Command<Msg>) {
        for leaf in command.into_leaves() {
            match leaf {
                Command::Perform(future) => self.pending_async.push(future),
                Command::Publish(event) => self.events.push(event),
                Command::None | Command::Batch(_) => {}
            }
        }
    }

    /// Poll pending futures once without blocking; completed ones are
    /// dispatched back into the dialog.
    pub fn poll_async(&mut self) {
        if self.pending_async.is_empty() {
            return;
        }

        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        let mut completed = Vec::new();
        let mut i = 0;
        while i < self.pending_async.len() {
            if let Poll::Ready(msg) = self.pending_async[i].as_mut().poll(&mut cx) {
                drop(self.pending_async.remove(i));
                completed.push(msg);
            } else {
                i += 1;
            }
        }

        for msg in completed {
            self.dispatch(msg);
        }
    }

    /// Await every pending operation, including ones spawned by their results
    pub async fn settle(&mut self) {
        while !self.pending_async.is_empty() {
            let future = self.pending_async.remove(0);
            let msg = future.await;
            self.dispatch(msg);
        }
    }

    pub fn take_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn render(&mut self, frame: &mut Frame, theme: &Theme) {
        if let Some(view) = self.view() {
            renderer::render_dialog(frame, &view, self.focus, &mut self.inputs, theme);
        }
    }

    /// Reset cursors and focus when a new session opens, and keep focus on
    /// something visible after the layout changes.
    fn sync_session(&mut self) {
        let Some(session) = self.dialog.session() else {
            self.bound_session = None;
            self.inputs.clear();
            return;
        };

        if self.bound_session != Some(session.id) {
            self.bound_session = Some(session.id);
            self.inputs.clear();
            for field in [
                TextField::Name,
                TextField::Username,
                TextField::Password,
                TextField::SshKeyFile,
                TextField::Passphrase,
                TextField::BecomeUser,
                TextField::BecomePassword,
            ] {
                self.inputs
                    .insert(field, TextInputState::at_end_of(session.form.value(field)));
            }
            if let Some(view) = self.view() {
                self.focus = view.autofocus.into();
            }
            return;
        }

        if let Focus::Field(id) = self.focus {
            if let Some(view) = self.view() {
                if !view.is_visible(id) {
                    self.focus = focus_order(&view).first().copied().unwrap_or(Focus::Cancel);
                }
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Translate a key press into dialog messages. Returns false when the
    /// dialog is closed and the key was not consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(view) = self.view() else {
            return false;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') => self.dispatch(Msg::DismissError),
                KeyCode::Char('c') => self.dispatch(Msg::Cancel),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Esc => self.dispatch(Msg::Cancel),
            KeyCode::Tab => self.move_focus(&view, 1),
            KeyCode::BackTab => self.move_focus(&view, -1),
            KeyCode::Enter => match self.focus {
                Focus::Save => self.dispatch(Msg::Confirm),
                Focus::Cancel => self.dispatch(Msg::Cancel),
                Focus::Field(_) => self.move_focus(&view, 1),
            },
            code => match self.focus {
                Focus::Cancel | Focus::Save => {
                    if matches!(code, KeyCode::Left | KeyCode::Right) {
                        self.focus = if self.focus == Focus::Save { Focus::Cancel } else { Focus::Save };
                    }
                }
                Focus::Field(id) => self.handle_field_key(&view, id, code),
            },
        }
        true
    }

    fn handle_field_key(&mut self, view: &DialogView, id: FieldId, code: KeyCode) {
        let Some(field) = view.field(id) else {
            return;
        };

        match &field.input {
            InputKind::ReadOnly(_) => {}
            InputKind::Select { options, selected } => {
                let step = match code {
                    KeyCode::Left | KeyCode::Up => -1,
                    KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => 1,
                    _ => return,
                };
                let next = cycle(*selected, options.len(), step);
                match id {
                    FieldId::AuthorizationType => {
                        if let Some(mode) = AuthorizationMode::all().get(next) {
                            self.dispatch(Msg::SetAuthorizationMode(*mode));
                        }
                    }
                    FieldId::BecomeMethod => {
                        if let Some(method) = BecomeMethod::all().get(next) {
                            self.dispatch(Msg::SetBecomeMethod(*method));
                        }
                    }
                    _ => {}
                }
            }
            InputKind::Text { value, .. } => {
                let Some(text_field) = id.text_field() else {
                    return;
                };
                let state = self.inputs.entry(text_field).or_default();
                if let Some(new_value) = state.handle_key(code, value, None) {
                    self.dispatch(Msg::FieldChanged(text_field, new_value));
                }
            }
        }
    }

    fn move_focus(&mut self, view: &DialogView, step: isize) {
        let order = focus_order(view);
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        if let Some(next) = order.get(cycle(current, order.len(), step)) {
            self.focus = *next;
        }
    }
}

/// Focusable elements top to bottom; read-only rows are skipped
fn focus_order(view: &DialogView) -> Vec<Focus> {
    view.fields
        .iter()
        .filter(|field| !matches!(field.input, InputKind::ReadOnly(_)))
        .map(|field| Focus::Field(field.id))
        .chain([Focus::Cancel, Focus::Save])
        .collect()
}

fn cycle(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + step).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(1, 3, 1), 2);
        assert_eq!(cycle(0, 0, 1), 0);
    }
}
