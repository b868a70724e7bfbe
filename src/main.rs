use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;

use classify_form::config::{BackendConfig, Config};
use classify_form::console::{self, ConsoleForm};
use classify_form::{FormHandle, HttpBackend, Responder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout is the result display
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,classify_form=debug".into());
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!("Starting classify form with config: {:?}", config);

    let backend = HttpBackend::new(&BackendConfig::from(&config))?;
    tracing::info!("Classifying via {}", backend.infer_url());

    let form = Arc::new(ConsoleForm::new(config.use_base_model));
    let responder = Arc::new(Responder::new(
        form.clone(),
        Arc::new(backend),
        config.overlap,
    ));

    if let Some(question) = config.question {
        form.state().set_input_text(question);
        let outcome = responder.on_classify().await;
        tracing::debug!(?outcome, "One-shot classification finished");
        return Ok(());
    }

    let (handle, event_loop) = FormHandle::new(responder);
    let event_loop = tokio::spawn(event_loop.run_forever());

    let stdin = BufReader::new(tokio::io::stdin());
    console::read_commands(stdin, form, handle).await?;

    let outcomes = event_loop.await??;
    tracing::info!(activations = outcomes.len(), "Form closed");
    Ok(())
}
