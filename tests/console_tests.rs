mod common;

use classify_form::config::OverlapPolicy;
use classify_form::console::{self, ConsoleForm};
use classify_form::{ClassificationRequest, FormHandle, Outcome, Responder};
use common::ScriptedBackend;
use std::sync::Arc;

async fn run_script(
    script: &str,
    use_base_model: bool,
) -> (Vec<ClassificationRequest>, Vec<Outcome>) {
    let form = Arc::new(ConsoleForm::with_output(use_base_model, std::io::sink()));
    let backend = Arc::new(ScriptedBackend::answering(Some("Positive")));
    let responder = Arc::new(Responder::new(
        form.clone(),
        backend.clone(),
        OverlapPolicy::LastWriterWins,
    ));

    let (handle, event_loop) = FormHandle::new(responder);
    let event_loop = tokio::spawn(event_loop.run_forever());

    console::read_commands(script.as_bytes(), form, handle)
        .await
        .expect("reading commands failed");
    let outcomes = event_loop
        .await
        .expect("event loop panicked")
        .expect("event loop failed");

    let mut requests = backend.requests();
    requests.sort_by(|a, b| a.question.cmp(&b.question));
    (requests, outcomes)
}

fn request(question: &str, use_base_model: bool) -> ClassificationRequest {
    ClassificationRequest {
        question: question.to_string(),
        use_base_model,
    }
}

#[tokio::test]
async fn base_commands_change_the_toggle_for_later_lines() {
    let script = "first\n:base on\nsecond\n:base\nthird\n:base off\nfourth\n:base\n:quit\nafter quit\n";

    let (requests, outcomes) = run_script(script, false).await;

    assert_eq!(
        requests,
        vec![
            request("first", false),
            request("fourth", false),
            request("second", true),
            request("third", false),
        ]
    );
    assert_eq!(outcomes.len(), 4);
    assert!(
        outcomes
            .iter()
            .all(|outcome| *outcome == Outcome::Classified("Positive".to_string()))
    );
}

#[tokio::test]
async fn end_of_input_closes_the_form_and_drains() {
    let (requests, outcomes) = run_script("  only line  \n   \n", true).await;

    assert_eq!(requests, vec![request("  only line  ", true)]);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.contains(&Outcome::Classified("Positive".to_string())));
    assert!(outcomes.contains(&Outcome::EmptyInput));
}

#[tokio::test]
async fn near_miss_commands_are_classified_verbatim() {
    let (requests, _) = run_script(":base on \n :quit\n", false).await;

    assert_eq!(
        requests,
        vec![request(" :quit", false), request(":base on ", false)]
    );
}
