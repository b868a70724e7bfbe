use metrics::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::backend::InferenceBackend;
use crate::config::OverlapPolicy;
use crate::form::FormView;
use crate::types::{ClassificationRequest, FormSnapshot, Outcome, trim_js};

pub const EMPTY_INPUT_MESSAGE: &str = "Enter some text you'd like to classify!";
pub const IN_PROGRESS_MESSAGE: &str = "Classifying..";
pub const UNCLASSIFIED_MESSAGE: &str = "We could not classify your text :(";
pub const ERROR_MESSAGE: &str = "An error occurred text classification :(";

/// One press of the classify button.
#[derive(Debug, Clone)]
pub struct Activation {
    pub snapshot: FormSnapshot,
    sequence: u64,
}

/// Handles activations of the classify button.
pub struct Responder {
    form: Arc<dyn FormView>,
    backend: Arc<dyn InferenceBackend>,
    policy: OverlapPolicy,
    // Sequence number of the most recent activation.
    latest: AtomicU64,
}

impl Responder {
    pub fn new(
        form: Arc<dyn FormView>,
        backend: Arc<dyn InferenceBackend>,
        policy: OverlapPolicy,
    ) -> Self {
        Self {
            form,
            backend,
            policy,
            latest: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Record a button press: read the form and take the next sequence number.
    pub fn activate(&self) -> Activation {
        Activation {
            snapshot: FormSnapshot {
                input_text: self.form.input_text(),
                use_base_model: self.form.use_base_model(),
            },
            sequence: self.latest.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Activate and respond in one go.
    pub async fn on_classify(&self) -> Outcome {
        let activation = self.activate();
        self.respond(activation).await
    }

    /// Validate the activation's snapshot, call the backend and write the result.
    ///
    /// The only suspension point is the backend call. Failures are logged and
    /// shown as [`ERROR_MESSAGE`]; nothing is returned as an error.
    #[tracing::instrument(
        skip(self, activation),
        fields(
            request_id = %Uuid::new_v4().simple(),
            sequence = activation.sequence,
            use_base_model = activation.snapshot.use_base_model,
        )
    )]
    pub async fn respond(&self, activation: Activation) -> Outcome {
        counter!("classify_activations_total").increment(1);
        let Activation { snapshot, sequence } = activation;

        if trim_js(&snapshot.input_text).is_empty() {
            if self.superseded(sequence) {
                return self.record(Outcome::Superseded);
            }
            self.form.set_result(EMPTY_INPUT_MESSAGE);
            return self.record(Outcome::EmptyInput);
        }

        if !self.superseded(sequence) {
            self.form.set_result(IN_PROGRESS_MESSAGE);
        }
        tracing::debug!("Sending classification request");

        let outcome = match self.backend.infer(ClassificationRequest::from(snapshot)).await {
            Ok(response) => match response.label() {
                "" => Outcome::Unclassified,
                label => Outcome::Classified(label.to_string()),
            },
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::error!(error = %reason, "Error: classification request failed");
                Outcome::Failed(reason)
            }
        };

        if self.superseded(sequence) {
            tracing::debug!("Newer activation pending, dropping result");
            return self.record(Outcome::Superseded);
        }

        match &outcome {
            Outcome::Classified(label) => self.form.set_result(label),
            Outcome::Unclassified => self.form.set_result(UNCLASSIFIED_MESSAGE),
            Outcome::Failed(_) => self.form.set_result(ERROR_MESSAGE),
            Outcome::EmptyInput | Outcome::Superseded => {}
        }
        self.record(outcome)
    }

    fn superseded(&self, sequence: u64) -> bool {
        self.policy == OverlapPolicy::LatestOnly && self.latest.load(Ordering::SeqCst) != sequence
    }

    fn record(&self, outcome: Outcome) -> Outcome {
        counter!("classify_outcomes_total", "outcome" => outcome.as_str()).increment(1);
        tracing::info!(outcome = outcome.as_str(), "Activation finished");
        outcome
    }
}
