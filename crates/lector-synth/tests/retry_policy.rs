//! Retry accounting and cancellation-aware backoff, on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::ScriptedSpeechPort;
use lector_core::domain::VoiceSettings;
use lector_core::ports::{SpeechError, SpeechSynthesizerPort};
use lector_synth::{RetryPolicy, RetryingSpeechClient};

fn policy(max_attempts: u32, base_secs: u64) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_secs(base_secs),
    }
}

fn voice() -> VoiceSettings {
    VoiceSettings::new("en-US-JennyNeural")
}

#[tokio::test(start_paused = true)]
async fn k_failures_then_success_takes_exactly_k_plus_one_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let port = Arc::new(ScriptedSpeechPort::new());
    port.fail_times("text", 3);

    let client = RetryingSpeechClient::new(Arc::clone(&port) as Arc<dyn SpeechSynthesizerPort>, policy(5, 2));
    let start = tokio::time::Instant::now();
    client
        .synthesize(
            "text",
            &dir.path().join("out.mp3"),
            &voice(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(port.attempts(), 4);
    // Backoff floor before success: 2s + 4s + 8s
    assert!(elapsed >= Duration::from_secs(14), "elapsed {elapsed:?}");
    // Jitter adds strictly less than one second per wait
    assert!(elapsed < Duration::from_secs(18), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn exhaustion_is_fatal_and_skips_the_final_wait() {
    let dir = tempfile::tempdir().unwrap();
    let port = Arc::new(ScriptedSpeechPort::new());
    port.fail_times("text", 99);

    let client = RetryingSpeechClient::new(Arc::clone(&port) as Arc<dyn SpeechSynthesizerPort>, policy(3, 2));
    let start = tokio::time::Instant::now();
    let err = client
        .synthesize(
            "text",
            &dir.path().join("out.mp3"),
            &voice(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(
        err,
        SpeechError::RetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(port.attempts(), 3);
    // Two waits (2s, 4s) happen; no wait follows the final attempt.
    assert!(elapsed >= Duration::from_secs(6), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(9), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn empty_artifacts_are_failures_not_silent_successes() {
    let dir = tempfile::tempdir().unwrap();
    let port = Arc::new(ScriptedSpeechPort::new());
    port.empty_times("text", 99);

    let client = RetryingSpeechClient::new(Arc::clone(&port) as Arc<dyn SpeechSynthesizerPort>, policy(2, 1));
    let err = client
        .synthesize(
            "text",
            &dir.path().join("out.mp3"),
            &voice(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(port.attempts(), 2);
    match err {
        SpeechError::RetriesExhausted { last_error, .. } => {
            assert!(last_error.contains("empty"), "got: {last_error}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_a_pending_backoff_wait() {
    let dir = tempfile::tempdir().unwrap();
    let port = Arc::new(ScriptedSpeechPort::new());
    port.fail_times("text", 99);

    // A 60s base delay would block the run for minutes if the wait were
    // not cancellation-aware.
    let client = RetryingSpeechClient::new(Arc::clone(&port) as Arc<dyn SpeechSynthesizerPort>, policy(5, 60));
    let cancel = CancellationToken::new();
    let target = dir.path().join("out.mp3");

    let handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            client
                .synthesize("text", &target, &voice(), &cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(SpeechError::Cancelled)));
    assert_eq!(port.attempts(), 1, "no retry after cancellation");
}

#[tokio::test(start_paused = true)]
async fn preset_cancellation_starts_no_remote_work() {
    let dir = tempfile::tempdir().unwrap();
    let port = Arc::new(ScriptedSpeechPort::new());

    let client = RetryingSpeechClient::new(Arc::clone(&port) as Arc<dyn SpeechSynthesizerPort>, policy(5, 2));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client
        .synthesize("text", &dir.path().join("out.mp3"), &voice(), &cancel)
        .await;

    assert!(matches!(result, Err(SpeechError::Cancelled)));
    assert_eq!(port.attempts(), 0);
}
