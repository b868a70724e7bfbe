use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// The form the responder reads from and writes to.
///
/// Implementations use interior mutability: activations run as separate tasks
/// and share one form.
pub trait FormView: Send + Sync {
    /// Current value of the text field, untrimmed.
    fn input_text(&self) -> String;

    /// Checked state of the "use base model" toggle.
    fn use_base_model(&self) -> bool;

    /// Replace the text of the result element.
    fn set_result(&self, text: &str);
}

/// In-memory form state. Backs the console form and stands in for a page in
/// tests.
#[derive(Debug, Default)]
pub struct FormState {
    input_text: Mutex<String>,
    use_base_model: AtomicBool,
    result: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl FormState {
    pub fn new(input_text: impl Into<String>, use_base_model: bool) -> Self {
        Self {
            input_text: Mutex::new(input_text.into()),
            use_base_model: AtomicBool::new(use_base_model),
            ..Default::default()
        }
    }

    pub fn set_input_text(&self, text: impl Into<String>) {
        *self.input_text.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    pub fn set_use_base_model(&self, checked: bool) {
        self.use_base_model.store(checked, Ordering::SeqCst);
    }

    /// Flip the toggle and return the new state.
    pub fn toggle_use_base_model(&self) -> bool {
        !self.use_base_model.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn result(&self) -> String {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every text written to the result element, oldest first.
    pub fn result_history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FormView for FormState {
    fn input_text(&self) -> String {
        self.input_text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn use_base_model(&self) -> bool {
        self.use_base_model.load(Ordering::SeqCst)
    }

    fn set_result(&self, text: &str) {
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}
