//! `toolbox playlist [path]` – print download commands for a playlist page.
//!
//! The page is loaded on a blocking thread that reports its ready state as it
//! goes: `Loading`, `Interactive` after the first line, `Complete` at EOF.
//! Extraction waits for `Complete` plus the settle delay.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use toolbox_core::playlist::{
    extract_playlist, run_when_loaded, HtmlDocument, PlaylistOptions, PlaylistReport, ReadyState,
};

/// Reads the whole page, publishing ready-state transitions on `ready`.
fn load_page<R: Read>(
    source: R,
    ready: &watch::Sender<ReadyState>,
    page: &OnceLock<String>,
) -> Result<()> {
    let mut reader = BufReader::new(source);
    let mut html = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).context("read page source")? == 0 {
            break;
        }
        if html.is_empty() {
            ready.send_replace(ReadyState::Interactive);
        }
        html.push_str(&line);
    }
    tracing::debug!(bytes = html.len(), "page loaded");
    let _ = page.set(html);
    ready.send_replace(ReadyState::Complete);
    Ok(())
}

fn spawn_loader(
    path: Option<PathBuf>,
    ready: watch::Sender<ReadyState>,
    page: Arc<OnceLock<String>>,
) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || match path {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("open HTML file: {}", path.display()))?;
            load_page(file, &ready, &page)
        }
        None => load_page(io::stdin().lock(), &ready, &page),
    })
}

/// Loads the page, waits for it to settle, and extracts the playlist.
pub async fn load_and_extract(
    path: Option<PathBuf>,
    opts: PlaylistOptions,
    settle: Duration,
) -> Result<PlaylistReport> {
    let (tx, rx) = watch::channel(ReadyState::Loading);
    let page = Arc::new(OnceLock::new());
    let loader = spawn_loader(path, tx, Arc::clone(&page));

    let outcome = run_when_loaded(rx, settle, move || -> Result<PlaylistReport> {
        let html = page.get().context("page source missing after load")?;
        Ok(extract_playlist(&HtmlDocument::parse(html), &opts)?)
    })
    .await;

    // A failed load closes the signal early; report the load error itself.
    loader.await.context("page loader task")??;
    outcome?
}

pub async fn run_playlist(
    path: Option<PathBuf>,
    opts: PlaylistOptions,
    settle: Duration,
) -> Result<()> {
    let report = load_and_extract(path, opts, settle).await?;
    println!("{}", report.render());
    Ok(())
}
