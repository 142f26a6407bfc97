//! Per-form state: current field values, submission status, and change
//! notifications for render surfaces.
//!
//! The store is an explicitly constructed value owned by the application
//! root and passed by reference; there is no ambient global instance. All
//! mutation goes through the typed methods here so observers see changes in
//! a deterministic order.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{Receiver, Sender, channel};

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use super::config::FormId;
use super::field::FieldValue;

/// Submission status of one form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Ready,
    Waiting,
    Complete,
    Error,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Complete | ActionState::Error)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionState::Ready => "ready",
            ActionState::Waiting => "waiting",
            ActionState::Complete => "complete",
            ActionState::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Mutable record backing one open form.
#[derive(Debug, Clone)]
pub struct FormState {
    pub values: HashMap<String, FieldValue>,
    pub action_state: ActionState,
    pub message: String,
    /// Parsed response record of the last successful submission.
    pub result: Option<Value>,
}

impl FormState {
    fn new(values: HashMap<String, FieldValue>) -> Self {
        Self {
            values,
            action_state: ActionState::Ready,
            message: String::new(),
            result: None,
        }
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormStoreError {
    #[error("form '{0}' was never initialized")]
    UnknownForm(FormId),
    #[error("form '{form}' cannot move from {from} to {to}")]
    IllegalTransition {
        form: FormId,
        from: ActionState,
        to: ActionState,
    },
}

/// What changed about a form, delivered to watchers in emit order.
#[derive(Debug, Clone, PartialEq)]
pub enum FormChange {
    Initialized,
    ValuesPatched,
    ActionState(ActionState),
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormEvent {
    pub form_id: FormId,
    pub change: FormChange,
}

/// Holds every open form's state, keyed by [`FormId`].
#[derive(Default)]
pub struct FormStore {
    states: HashMap<FormId, FormState>,
    /// Form-type-wide defaults, keyed by `FormId::kind`.
    defaults: HashMap<String, HashMap<String, FieldValue>>,
    watchers: HashMap<FormId, Vec<Sender<FormEvent>>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers defaults applied to every new instance of `kind`. A
    /// registered default wins over a caller-supplied initial value for the
    /// keys it defines.
    pub fn register_defaults(&mut self, kind: &str, defaults: HashMap<String, FieldValue>) {
        self.defaults.insert(kind.to_string(), defaults);
    }

    /// Returns the existing state for `form_id`, creating it from `initial`
    /// merged with the form type's registered defaults on first access.
    ///
    /// Idempotent: once a form is initialized, later calls ignore `initial`
    /// and return the stored state unchanged.
    pub fn get_or_init(
        &mut self,
        form_id: &FormId,
        initial: HashMap<String, FieldValue>,
    ) -> &FormState {
        if !self.states.contains_key(form_id) {
            let mut values = initial;
            if let Some(defaults) = self.defaults.get(form_id.kind()) {
                for (key, value) in defaults {
                    values.insert(key.clone(), value.clone());
                }
            }
            debug!("initializing form state for {form_id}");
            self.states.insert(form_id.clone(), FormState::new(values));
            self.emit(form_id, FormChange::Initialized);
        }
        self.states.get(form_id).expect("state inserted above")
    }

    pub fn get(&self, form_id: &FormId) -> Option<&FormState> {
        self.states.get(form_id)
    }

    /// Shallow-merges `updates` into the form's values, last write winning
    /// per key. Patching a form that was never initialized is a hard error,
    /// never a silent write into fresh state.
    pub fn patch(
        &mut self,
        form_id: &FormId,
        updates: HashMap<String, FieldValue>,
    ) -> Result<(), FormStoreError> {
        let state = self.states.get_mut(form_id).ok_or_else(|| {
            warn!("refusing to patch unknown form {form_id}");
            FormStoreError::UnknownForm(form_id.clone())
        })?;
        for (key, value) in updates {
            state.values.insert(key, value);
        }
        self.emit(form_id, FormChange::ValuesPatched);
        Ok(())
    }

    /// ready -> waiting. Any other starting state is an illegal transition;
    /// in particular a form already `Waiting` must not re-enter submission.
    pub fn begin_submission(&mut self, form_id: &FormId) -> Result<(), FormStoreError> {
        let state = self.transition(form_id, ActionState::Waiting, |from| {
            from == ActionState::Ready
        })?;
        state.message.clear();
        self.emit(form_id, FormChange::ActionState(ActionState::Waiting));
        Ok(())
    }

    /// ready -> error, for validation failures that never reach the network.
    pub fn fail_validation(
        &mut self,
        form_id: &FormId,
        message: String,
    ) -> Result<(), FormStoreError> {
        let state = self.transition(form_id, ActionState::Error, |from| {
            from == ActionState::Ready
        })?;
        state.message = message;
        self.emit(form_id, FormChange::ActionState(ActionState::Error));
        Ok(())
    }

    /// waiting -> complete, with the success message and parsed record.
    pub fn complete_submission(
        &mut self,
        form_id: &FormId,
        message: String,
        result: Value,
    ) -> Result<(), FormStoreError> {
        let state = self.transition(form_id, ActionState::Complete, |from| {
            from == ActionState::Waiting
        })?;
        state.message = message;
        state.result = Some(result);
        self.emit(form_id, FormChange::ActionState(ActionState::Complete));
        Ok(())
    }

    /// waiting -> error, for transport failures, server rejections, and
    /// unparsable success bodies.
    pub fn fail_submission(
        &mut self,
        form_id: &FormId,
        message: String,
    ) -> Result<(), FormStoreError> {
        let state = self.transition(form_id, ActionState::Error, |from| {
            from == ActionState::Waiting
        })?;
        state.message = message;
        self.emit(form_id, FormChange::ActionState(ActionState::Error));
        Ok(())
    }

    /// Explicit reset: replaces the state with a fresh initialization. This
    /// is the only way back to `Ready` from a terminal state.
    pub fn reset(&mut self, form_id: &FormId, initial: HashMap<String, FieldValue>) {
        self.states.remove(form_id);
        self.get_or_init(form_id, initial);
    }

    /// Drops the form's state when its panel closes. Later patches fail with
    /// [`FormStoreError::UnknownForm`]; a late submission completion against
    /// a discarded id is a no-op upstream.
    pub fn discard(&mut self, form_id: &FormId) {
        if self.states.remove(form_id).is_some() {
            debug!("discarding form state for {form_id}");
            self.emit(form_id, FormChange::Discarded);
        }
        self.watchers.remove(form_id);
    }

    /// Subscribes to changes for one form. Events arrive synchronously, in
    /// the order they were emitted; a watcher draining after a submission
    /// sees `Waiting` before the terminal state.
    pub fn watch(&mut self, form_id: &FormId) -> Receiver<FormEvent> {
        let (tx, rx) = channel();
        self.watchers.entry(form_id.clone()).or_default().push(tx);
        rx
    }

    /// Checks and applies an action state change; callers finish mutating
    /// the returned state, then emit.
    fn transition(
        &mut self,
        form_id: &FormId,
        to: ActionState,
        allowed_from: impl Fn(ActionState) -> bool,
    ) -> Result<&mut FormState, FormStoreError> {
        let state = self
            .states
            .get_mut(form_id)
            .ok_or_else(|| FormStoreError::UnknownForm(form_id.clone()))?;
        let from = state.action_state;
        if !allowed_from(from) {
            warn!("illegal action state transition on {form_id}: {from} -> {to}");
            return Err(FormStoreError::IllegalTransition {
                form: form_id.clone(),
                from,
                to,
            });
        }
        state.action_state = to;
        debug!("form {form_id}: {from} -> {to}");
        Ok(state)
    }

    fn emit(&mut self, form_id: &FormId, change: FormChange) {
        if let Some(senders) = self.watchers.get_mut(form_id) {
            let event = FormEvent {
                form_id: form_id.clone(),
                change,
            };
            senders.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}
