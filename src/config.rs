use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the inference service; requests go to `<base>/infer`
    #[arg(long, env = "BACKEND_URL", default_value = "http://127.0.0.1:8000")]
    pub backend_url: String,

    /// Initial state of the "use base model" toggle
    #[arg(long, env = "USE_BASE_MODEL")]
    pub use_base_model: bool,

    /// Classify this text once and exit instead of reading stdin
    #[arg(long, env = "QUESTION")]
    pub question: Option<String>,

    /// What happens when a new activation starts before the previous one resolved
    #[arg(long, env = "OVERLAP_POLICY", value_enum, default_value_t = OverlapPolicy::LastWriterWins)]
    pub overlap: OverlapPolicy,

    /// Request timeout in milliseconds (unset waits for as long as the client does)
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OverlapPolicy {
    /// Every activation writes its result; the last response to resolve wins.
    #[default]
    LastWriterWins,
    /// Only the most recent activation may write its final result.
    LatestOnly,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl From<&Config> for BackendConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            timeout: config.request_timeout_ms.map(Duration::from_millis),
        }
    }
}
