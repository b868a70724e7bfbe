use anyhow::Result;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::event_loop::FormHandle;
use crate::form::{FormState, FormView};

/// A line typed into the console form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Fill the text field and press classify.
    Classify(String),
    SetBaseModel(bool),
    ToggleBaseModel,
    Quit,
}

impl ConsoleCommand {
    /// Commands must match exactly, apart from a trailing line ending. Anything
    /// else, including `:base on ` with a trailing space or ` :quit` with a
    /// leading one, is classification text and is sent verbatim.
    pub fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            ":quit" => ConsoleCommand::Quit,
            ":base" => ConsoleCommand::ToggleBaseModel,
            ":base on" => ConsoleCommand::SetBaseModel(true),
            ":base off" => ConsoleCommand::SetBaseModel(false),
            text => ConsoleCommand::Classify(text.to_string()),
        }
    }
}

/// Terminal rendition of the form: the result element is printed to stdout.
pub struct ConsoleForm {
    state: FormState,
    output: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleForm {
    pub fn new(use_base_model: bool) -> Self {
        Self::with_output(use_base_model, std::io::stdout())
    }

    /// Render the result element into `output` instead of stdout.
    pub fn with_output(use_base_model: bool, output: impl Write + Send + 'static) -> Self {
        Self {
            state: FormState::new("", use_base_model),
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }
}

impl FormView for ConsoleForm {
    fn input_text(&self) -> String {
        self.state.input_text()
    }

    fn use_base_model(&self) -> bool {
        self.state.use_base_model()
    }

    fn set_result(&self, text: &str) {
        self.state.set_result(text);
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(output, "result: {text}").and_then(|()| output.flush()) {
            tracing::warn!(error = %e, result = text, "Failed to render result");
        }
    }
}

/// Feed console lines into the form until `:quit` or end of input.
pub async fn read_commands<R>(input: R, form: Arc<ConsoleForm>, handle: FormHandle) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::ToggleBaseModel => {
                let checked = form.state().toggle_use_base_model();
                tracing::info!(use_base_model = checked, "Base model toggled");
            }
            ConsoleCommand::SetBaseModel(checked) => {
                form.state().set_use_base_model(checked);
                tracing::info!(use_base_model = checked, "Base model set");
            }
            ConsoleCommand::Classify(text) => {
                form.state().set_input_text(text);
                handle.click().await?;
            }
        }
    }
    tracing::debug!("Console input closed");
    Ok(())
}
