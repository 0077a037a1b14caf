//! One-shot load gate: run a task once the document has loaded and settled.
//!
//! Playlist items are rendered by the page's own scripts after load, so the
//! extraction waits for the `Complete` ready state and then a settle delay.

use std::time::Duration;
use tokio::sync::watch;

use super::error::PlaylistError;

/// Document ready state, in the order a page moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Runs `task` exactly once, `settle` after `ready` reports [`ReadyState::Complete`].
///
/// If the document is already complete the settle delay starts immediately.
/// If the sender is dropped before completion the task is not run.
pub async fn run_when_loaded<T, F>(
    mut ready: watch::Receiver<ReadyState>,
    settle: Duration,
    task: F,
) -> Result<T, PlaylistError>
where
    F: FnOnce() -> T,
{
    let state = *ready.borrow();
    if state == ReadyState::Complete {
        tracing::debug!("document already complete; settling for {:?}", settle);
    } else {
        tracing::debug!("document {:?}; waiting for load", state);
        ready
            .wait_for(|s| *s == ReadyState::Complete)
            .await
            .map(|_| ())
            .map_err(|_| PlaylistError::LoadAborted)?;
        tracing::debug!("document loaded; settling for {:?}", settle);
    }

    tokio::time::sleep(settle).await;
    Ok(task())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn already_complete_runs_after_settle() {
        let (_tx, rx) = watch::channel(ReadyState::Complete);
        let start = Instant::now();
        let out = run_when_loaded(rx, Duration::from_secs(10), || "done")
            .await
            .unwrap();
        assert_eq!(out, "done");
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_load_before_settling() {
        let (tx, rx) = watch::channel(ReadyState::Loading);
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let handle = tokio::spawn(run_when_loaded(rx, Duration::from_secs(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0, "must not run while loading");

        tx.send(ReadyState::Interactive).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0, "interactive is not loaded");

        tx.send(ReadyState::Complete).unwrap();
        let loaded_at = Instant::now();
        handle.await.unwrap().unwrap();
        assert!(loaded_at.elapsed() >= Duration::from_secs(10));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_signal_aborts_without_running() {
        let (tx, rx) = watch::channel(ReadyState::Loading);
        drop(tx);
        let mut ran = false;
        let res = run_when_loaded(rx, Duration::from_secs(10), || ran = true).await;
        assert!(matches!(res, Err(PlaylistError::LoadAborted)));
        assert!(!ran);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_then_dropped_still_runs() {
        let (tx, rx) = watch::channel(ReadyState::Loading);
        tx.send(ReadyState::Complete).unwrap();
        drop(tx);
        let out = run_when_loaded(rx, Duration::ZERO, || 3).await.unwrap();
        assert_eq!(out, 3);
    }
}
