use serde::{Deserialize, Serialize};

/// Body of `POST /infer`. `question` is sent exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub question: String,
    pub use_base_model: bool,
}

/// Form values read at the moment the classify button was activated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub input_text: String,
    pub use_base_model: bool,
}

impl From<FormSnapshot> for ClassificationRequest {
    fn from(snapshot: FormSnapshot) -> Self {
        Self {
            question: snapshot.input_text,
            use_base_model: snapshot.use_base_model,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub infer: Option<String>,
}

impl ClassificationResponse {
    /// The label to display: `infer` trimmed, empty when absent.
    pub fn label(&self) -> &str {
        trim_js(self.infer.as_deref().unwrap_or_default())
    }
}

/// Whitespace as the browser's `String.prototype.trim` sees it: space
/// separators, tab, VT, FF, BOM and line terminators. Unlike `char::is_whitespace`
/// this includes U+FEFF and excludes U+0085.
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{FEFF}'
            | '\n'
            | '\r'
            | '\u{2028}'
            | '\u{2029}'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

pub fn trim_js(text: &str) -> &str {
    text.trim_matches(is_js_whitespace)
}

/// What the responder wrote as the final result of one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input was blank; no request was sent.
    EmptyInput,
    Classified(String),
    Unclassified,
    /// The request failed; carries the diagnostic reason.
    Failed(String),
    /// A newer activation owns the result display, so this one wrote nothing.
    Superseded,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::EmptyInput => "empty_input",
            Outcome::Classified(_) => "classified",
            Outcome::Unclassified => "unclassified",
            Outcome::Failed(_) => "failed",
            Outcome::Superseded => "superseded",
        }
    }
}
