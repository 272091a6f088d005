use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

use cf2tf::pipeline::{self, HclTranslator, HclValidator};
use cf2tf::PipelineError;

/// Deterministic fake translator that records every source it sees.
struct FakeTranslator {
    calls: Mutex<Vec<String>>,
}

impl FakeTranslator {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HclTranslator for FakeTranslator {
    async fn translate(&self, source_text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(source_text.to_string());
        Ok(format!("# generated\n{}", source_text))
    }
}

/// Translator that reports a degenerate completion for every file.
struct ShortCompletionTranslator;

#[async_trait]
impl HclTranslator for ShortCompletionTranslator {
    async fn translate(&self, _source_text: &str) -> Result<String> {
        Err(PipelineError::InvalidCompletion { chars: 2 }.into())
    }
}

/// Validator accepting everything.
struct AcceptAll;

impl HclValidator for AcceptAll {
    fn validate(&self, _hcl: &str) -> Result<()> {
        Ok(())
    }
}

/// Validator rejecting candidates that contain a marker string.
struct RejectMarker(&'static str);

impl HclValidator for RejectMarker {
    fn validate(&self, hcl: &str) -> Result<()> {
        if hcl.contains(self.0) {
            return Err(PipelineError::ValidationFailed {
                output: format!("rejected: {}", self.0),
            }
            .into());
        }
        Ok(())
    }
}

async fn run_ok(translator: &FakeTranslator, input: &Path, output: &Path) {
    pipeline::run(translator, &AcceptAll, input, output)
        .await
        .unwrap();
}

#[tokio::test]
async fn accepted_output_is_written_byte_exact_in_sorted_order() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("b.cf"), "resource-b\n").unwrap();
    std::fs::write(input.path().join("a.cf"), "resource-a\n").unwrap();

    let translator = FakeTranslator::new();
    run_ok(&translator, input.path(), output.path()).await;

    // Lexicographic processing order
    assert_eq!(translator.seen(), vec!["resource-a\n", "resource-b\n"]);

    let a = std::fs::read_to_string(output.path().join("a.cf.tf")).unwrap();
    assert_eq!(a, "# generated\nresource-a\n");
    let b = std::fs::read_to_string(output.path().join("b.cf.tf")).unwrap();
    assert_eq!(b, "# generated\nresource-b\n");
}

#[tokio::test]
async fn rerun_with_same_completion_is_byte_identical() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("a.cf"), "resource-a\n").unwrap();

    let translator = FakeTranslator::new();
    run_ok(&translator, input.path(), output.path()).await;
    let first = std::fs::read(output.path().join("a.cf.tf")).unwrap();

    run_ok(&translator, input.path(), output.path()).await;
    let second = std::fs::read(output.path().join("a.cf.tf")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn existing_output_file_is_silently_overwritten() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("a.cf"), "resource-a\n").unwrap();
    std::fs::write(output.path().join("a.cf.tf"), "stale content").unwrap();

    let translator = FakeTranslator::new();
    run_ok(&translator, input.path(), output.path()).await;

    let a = std::fs::read_to_string(output.path().join("a.cf.tf")).unwrap();
    assert_eq!(a, "# generated\nresource-a\n");
}

#[tokio::test]
async fn short_completion_aborts_without_writing() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("a.cf"), "resource-a\n").unwrap();

    let err = pipeline::run(&ShortCompletionTranslator, &AcceptAll, input.path(), output.path())
        .await
        .unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::InvalidCompletion { .. }) => {}
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!output.path().join("a.cf.tf").exists());
}

#[tokio::test]
async fn validation_failure_is_fail_fast_and_writes_nothing_for_the_entry() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    std::fs::write(input.path().join("a.cf"), "bad-resource\n").unwrap();
    std::fs::write(input.path().join("b.cf"), "resource-b\n").unwrap();

    let translator = FakeTranslator::new();
    let err = pipeline::run(
        &translator,
        &RejectMarker("bad-resource"),
        input.path(),
        output.path(),
    )
    .await
    .unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::ValidationFailed { output }) => {
            assert!(output.contains("bad-resource"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // a.cf failed validation: no output for it, and b.cf was never processed
    assert!(!output.path().join("a.cf.tf").exists());
    assert!(!output.path().join("b.cf.tf").exists());
    assert_eq!(translator.seen(), vec!["bad-resource\n"]);
}

#[tokio::test]
async fn missing_output_folder_aborts_before_any_read() {
    let input = tempdir().unwrap();
    std::fs::write(input.path().join("a.cf"), "resource-a\n").unwrap();
    let missing = input.path().join("no-such-dir");

    let translator = FakeTranslator::new();
    let err = pipeline::run(&translator, &AcceptAll, input.path(), &missing)
        .await
        .unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MissingOutputFolder(path)) => assert_eq!(path, &missing),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(translator.seen().is_empty());
}

#[tokio::test]
async fn missing_input_folder_is_rejected() {
    let output = tempdir().unwrap();
    let missing = output.path().join("no-such-dir");

    let err = pipeline::run(&FakeTranslator::new(), &AcceptAll, &missing, output.path())
        .await
        .unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MissingInputFolder(path)) => assert_eq!(path, &missing),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_input_folder_is_a_successful_no_op() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let translator = FakeTranslator::new();
    run_ok(&translator, input.path(), output.path()).await;

    assert!(translator.seen().is_empty());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}
