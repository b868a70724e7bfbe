pub mod backend;
pub mod config;
pub mod console;
pub mod event_loop;
pub mod form;
pub mod http_backend;
pub mod responder;
pub mod types;

pub use backend::InferenceBackend;
pub use event_loop::{EventLoop, FormHandle};
pub use form::{FormState, FormView};
pub use http_backend::HttpBackend;
pub use responder::Responder;
pub use types::{ClassificationRequest, ClassificationResponse, Outcome};
