#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use classify_form::{ClassificationRequest, ClassificationResponse, InferenceBackend};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing_subscriber::fmt::MakeWriter;

type Reply = Box<dyn Fn(&ClassificationRequest) -> Result<ClassificationResponse> + Send + Sync>;

/// Backend that answers every request with a fixed reply and records what it saw.
pub struct ScriptedBackend {
    reply: Reply,
    requests: Mutex<Vec<ClassificationRequest>>,
}

impl ScriptedBackend {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&ClassificationRequest) -> Result<ClassificationResponse> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(infer: Option<&str>) -> Self {
        let infer = infer.map(str::to_string);
        Self::new(move |_| {
            Ok(ClassificationResponse {
                infer: infer.clone(),
            })
        })
    }

    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn infer(&self, request: ClassificationRequest) -> Result<ClassificationResponse> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)(&request)
    }
}

/// Backend whose replies are released by the test, one gate per question.
#[derive(Default)]
pub struct GatedBackend {
    gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
}

impl GatedBackend {
    /// Register a question; the returned sender releases its reply.
    pub fn gate(&self, question: &str) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(question.to_string(), rx);
        tx
    }
}

#[async_trait]
impl InferenceBackend for GatedBackend {
    async fn infer(&self, request: ClassificationRequest) -> Result<ClassificationResponse> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .remove(&request.question)
            .ok_or_else(|| anyhow::anyhow!("no gate for {:?}", request.question))?;
        let label = gate.await?;
        Ok(ClassificationResponse { infer: Some(label) })
    }
}

/// Shared in-memory sink for captured log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install a subscriber writing into this buffer for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
