use anyhow::Result;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

use crate::responder::{Activation, Responder};
use crate::types::Outcome;

#[derive(Debug, Clone)]
pub enum FormEvent {
    /// The classify button was activated.
    Classify(Activation),
}

/// Sending side of the form's event channel. Cloneable; the loop exits once
/// every handle is dropped.
#[derive(Clone)]
pub struct FormHandle {
    responder: Arc<Responder>,
    event_tx: flume::Sender<FormEvent>,
}

impl FormHandle {
    pub fn new(responder: Arc<Responder>) -> (Self, EventLoop) {
        let (event_tx, event_rx) = flume::unbounded();

        let event_loop = EventLoop {
            event_rx,
            responder: Arc::clone(&responder),
            in_flight: JoinSet::new(),
        };

        (
            Self {
                responder,
                event_tx,
            },
            event_loop,
        )
    }

    /// Press the classify button. The form is read here, at click time.
    pub async fn click(&self) -> Result<()> {
        let activation = self.responder.activate();
        self.event_tx
            .send_async(FormEvent::Classify(activation))
            .await
            .map_err(|_| anyhow::anyhow!("Form event loop is closed"))
    }
}

/// Drains form events. Each activation runs as its own task, so a slow
/// request never blocks later clicks.
pub struct EventLoop {
    event_rx: flume::Receiver<FormEvent>,
    responder: Arc<Responder>,
    in_flight: JoinSet<Outcome>,
}

impl EventLoop {
    /// Runs until the channel closes, then waits for in-flight activations.
    /// Returns their outcomes in completion order.
    #[tracing::instrument(skip(self), fields(policy = ?self.responder.policy()))]
    pub async fn run_forever(mut self) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();

        loop {
            tokio::select! {
                event = self.event_rx.recv_async() => {
                    match event {
                        Ok(FormEvent::Classify(activation)) => {
                            let responder = Arc::clone(&self.responder);
                            self.in_flight.spawn(async move { responder.respond(activation).await });
                            tracing::debug!(in_flight = self.in_flight.len(), "Activation dispatched");
                        }
                        Err(_) => {
                            tracing::info!(in_flight = self.in_flight.len(), "Form closed, waiting for pending activations");
                            break;
                        }
                    }
                }

                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    collect(&mut outcomes, joined);
                }
            }
        }

        while let Some(joined) = self.in_flight.join_next().await {
            collect(&mut outcomes, joined);
        }
        Ok(outcomes)
    }
}

// A failed task must not stop the drain: the remaining activations still run.
fn collect(outcomes: &mut Vec<Outcome>, joined: Result<Outcome, JoinError>) {
    match joined {
        Ok(outcome) => outcomes.push(outcome),
        Err(e) => tracing::error!(error = %e, "Activation task failed"),
    }
}
