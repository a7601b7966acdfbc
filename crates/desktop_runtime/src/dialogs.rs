//! Modal dialog service: message boxes and input dialogs resolved through one-shot futures.
//!
//! At most one message box and one input dialog are active at a time. Later requests wait in FIFO
//! order and become active when the current one resolves. Every request's future resolves exactly
//! once; dropping the service resolves anything still pending to `None`.

use std::{
    collections::VecDeque,
    fmt,
    future::Future,
    panic::{catch_unwind, AssertUnwindSafe},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use futures::channel::oneshot;
use leptos::logging;

/// Validation hook for input dialogs. `Err` carries the inline message shown to the user.
pub type InputValidator = Rc<dyn Fn(&str) -> Result<(), String>>;

const VALIDATOR_PANIC_MESSAGE: &str = "Validation failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Error,
    Question,
}

impl MessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "dialog-info",
            Self::Warning => "dialog-warning",
            Self::Error => "dialog-error",
            Self::Question => "dialog-question",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBoxRequest {
    pub title: String,
    pub message: String,
    pub kind: MessageKind,
    /// Button labels in display order. Empty means a single "OK".
    pub buttons: Vec<String>,
    /// When set, Escape and dismissal are ignored; only a button resolves the dialog.
    pub escape_disabled: bool,
}

impl MessageBoxRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: MessageKind::Info,
            buttons: Vec::new(),
            escape_disabled: false,
        }
    }

    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn buttons<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons = buttons.into_iter().map(Into::into).collect();
        self
    }

    pub fn escape_disabled(mut self) -> Self {
        self.escape_disabled = true;
        self
    }
}

#[derive(Clone)]
pub struct InputDialogRequest {
    pub title: String,
    pub message: String,
    pub default_value: String,
    pub validator: Option<InputValidator>,
}

impl fmt::Debug for InputDialogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDialogRequest")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("default_value", &self.default_value)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl InputDialogRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            default_value: String::new(),
            validator: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn validator(mut self, validator: impl Fn(&str) -> Result<(), String> + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }
}

/// Resolves to the dialog result, or `None` when dismissed or abandoned.
#[must_use = "dialog results are delivered through this future"]
#[derive(Debug)]
pub struct DialogResponse(oneshot::Receiver<Option<String>>);

impl Future for DialogResponse {
    type Output = Option<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(value),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

type Responder = oneshot::Sender<Option<String>>;

fn respond(responder: Responder, value: Option<String>) {
    // The caller may have dropped its future; nothing is waiting then.
    let _ = responder.send(value);
}

#[derive(Debug)]
pub struct ActiveMessageBox {
    pub request: MessageBoxRequest,
    pub focused: usize,
    responder: Responder,
}

impl ActiveMessageBox {
    fn new(mut request: MessageBoxRequest, responder: Responder) -> Self {
        if request.buttons.is_empty() {
            request.buttons.push("OK".to_string());
        }
        Self {
            request,
            focused: 0,
            responder,
        }
    }
}

#[derive(Debug)]
pub struct ActiveInputDialog {
    /// Distinguishes consecutive dialogs that carry identical requests.
    pub serial: u64,
    pub request: InputDialogRequest,
    pub value: String,
    pub error: Option<String>,
    responder: Responder,
}

/// Queue-backed dialog state owned by the desktop runtime.
#[derive(Debug, Default)]
pub struct DialogService {
    message_box: Option<ActiveMessageBox>,
    message_queue: VecDeque<(MessageBoxRequest, Responder)>,
    input: Option<ActiveInputDialog>,
    input_queue: VecDeque<(InputDialogRequest, Responder)>,
    inputs_shown: u64,
}

impl DialogService {
    pub fn show_message_box(&mut self, request: MessageBoxRequest) -> DialogResponse {
        let (responder, receiver) = oneshot::channel();
        if self.message_box.is_none() {
            self.message_box = Some(ActiveMessageBox::new(request, responder));
        } else {
            self.message_queue.push_back((request, responder));
        }
        DialogResponse(receiver)
    }

    pub fn show_input_dialog(&mut self, request: InputDialogRequest) -> DialogResponse {
        let (responder, receiver) = oneshot::channel();
        if self.input.is_none() {
            self.input = Some(self.activate_input(request, responder));
        } else {
            self.input_queue.push_back((request, responder));
        }
        DialogResponse(receiver)
    }

    fn activate_input(
        &mut self,
        request: InputDialogRequest,
        responder: Responder,
    ) -> ActiveInputDialog {
        self.inputs_shown += 1;
        ActiveInputDialog {
            serial: self.inputs_shown,
            value: request.default_value.clone(),
            request,
            error: None,
            responder,
        }
    }

    pub fn message_box(&self) -> Option<&ActiveMessageBox> {
        self.message_box.as_ref()
    }

    pub fn input_dialog(&self) -> Option<&ActiveInputDialog> {
        self.input.as_ref()
    }

    /// Number of requests waiting behind the active dialogs.
    pub fn queued(&self) -> usize {
        self.message_queue.len() + self.input_queue.len()
    }

    fn finish_message_box(&mut self, value: Option<String>) {
        if let Some(active) = self.message_box.take() {
            respond(active.responder, value);
        }
        self.message_box = self
            .message_queue
            .pop_front()
            .map(|(request, responder)| ActiveMessageBox::new(request, responder));
    }

    fn finish_input(&mut self, value: Option<String>) {
        if let Some(active) = self.input.take() {
            respond(active.responder, value);
        }
        self.input = match self.input_queue.pop_front() {
            Some((request, responder)) => Some(self.activate_input(request, responder)),
            None => None,
        };
    }

    /// Resolves the active message box with the button at `index`.
    pub fn choose_button(&mut self, index: usize) {
        let label = self
            .message_box
            .as_ref()
            .and_then(|active| active.request.buttons.get(index).cloned());
        if let Some(label) = label {
            self.finish_message_box(Some(label));
        }
    }

    /// Closes the active message box without a choice. Ignored when Escape is disabled.
    pub fn dismiss_message_box(&mut self) {
        if self
            .message_box
            .as_ref()
            .is_some_and(|active| !active.request.escape_disabled)
        {
            self.finish_message_box(None);
        }
    }

    /// Keyboard contract for the active message box. Returns whether the key was consumed.
    pub fn message_box_key(&mut self, key: &str, shift: bool) -> bool {
        let Some(active) = self.message_box.as_mut() else {
            return false;
        };
        let count = active.request.buttons.len();
        match key {
            "Tab" if shift => {
                active.focused = (active.focused + count - 1) % count;
                true
            }
            "Tab" | "ArrowRight" => {
                active.focused = (active.focused + 1) % count;
                true
            }
            "ArrowLeft" => {
                active.focused = (active.focused + count - 1) % count;
                true
            }
            "Enter" => {
                let focused = active.focused;
                self.choose_button(focused);
                true
            }
            "Escape" if !active.request.escape_disabled => {
                self.choose_button(count - 1);
                true
            }
            _ => false,
        }
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        if let Some(active) = self.input.as_mut() {
            active.value = value.into();
            active.error = None;
        }
    }

    /// Validates and submits the active input dialog.
    ///
    /// A validator error or panic keeps the dialog open with an inline error. Returns whether the
    /// dialog resolved.
    pub fn submit_input(&mut self) -> bool {
        let Some(active) = self.input.as_mut() else {
            return false;
        };
        if let Some(validator) = active.request.validator.clone() {
            let value = active.value.clone();
            let outcome = catch_unwind(AssertUnwindSafe(|| validator(&value)));
            let error = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(message)) => Some(message),
                Err(_) => {
                    logging::warn!("input dialog validator panicked");
                    Some(VALIDATOR_PANIC_MESSAGE.to_string())
                }
            };
            if error.is_some() {
                active.error = error;
                return false;
            }
        }
        let value = active.value.clone();
        self.finish_input(Some(value));
        true
    }

    pub fn cancel_input(&mut self) {
        if self.input.is_some() {
            self.finish_input(None);
        }
    }

    /// Enter submits, Escape cancels. Returns whether the key was consumed.
    pub fn input_key(&mut self, key: &str) -> bool {
        if self.input.is_none() {
            return false;
        }
        match key {
            "Enter" => {
                self.submit_input();
                true
            }
            "Escape" => {
                self.cancel_input();
                true
            }
            _ => false,
        }
    }
}
