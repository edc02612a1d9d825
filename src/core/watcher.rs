//! Reload the current store when the content directory changes

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::current::CurrentStore;
use super::error::{StoreError, StoreResult};
use super::store::LoadOptions;

/// Background watcher feeding reloads into a [`CurrentStore`]
///
/// Dropping it stops watching and joins the reload thread.
pub struct StoreWatcher {
    watcher: Option<RecommendedWatcher>,
    thread: Option<JoinHandle<()>>,
    dir: PathBuf,
}

impl StoreWatcher {
    /// Watch `dir` and reload `handle` once events settle for `debounce`
    ///
    /// `handle` is reloaded once as soon as the watch is armed.
    pub fn spawn(
        handle: CurrentStore,
        dir: impl Into<PathBuf>,
        options: LoadOptions,
        debounce: Duration,
    ) -> StoreResult<Self> {
        let dir = dir.into();
        let (event_tx, event_rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(event_tx)?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        // Catch changes made between the caller's load and arming the watch
        if let Err(e) = handle.reload(&dir, &options) {
            tracing::error!(
                "Initial reload of {} failed, keeping previous store: {}",
                dir.display(),
                e
            );
        }

        let thread_dir = dir.clone();
        let thread = std::thread::Builder::new()
            .name("docstore-watch".into())
            .spawn(move || reload_loop(event_rx, handle, &thread_dir, &options, debounce))
            .map_err(|e| StoreError::read(&dir, e))?;

        tracing::info!("Watching {} for changes", dir.display());

        Ok(Self {
            watcher: Some(watcher),
            thread: Some(thread),
            dir,
        })
    }

    /// Directory being watched
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for StoreWatcher {
    fn drop(&mut self) {
        // Dropping the watcher closes the channel and ends the loop
        self.watcher.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("Stopped watching {}", self.dir.display());
    }
}

fn reload_loop(
    events: Receiver<notify::Result<Event>>,
    handle: CurrentStore,
    dir: &Path,
    options: &LoadOptions,
    debounce: Duration,
) {
    while let Ok(first) = events.recv() {
        if !is_content_change(&first) {
            continue;
        }

        // Swallow the rest of the burst
        loop {
            match events.recv_timeout(debounce) {
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        if let Err(e) = handle.reload(dir, options) {
            tracing::error!(
                "Reload of {} failed, keeping previous store: {}",
                dir.display(),
                e
            );
        }
    }
}

fn is_content_change(event: &notify::Result<Event>) -> bool {
    match event {
        Ok(event) => matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
        ),
        Err(e) => {
            tracing::warn!("Watch error: {}", e);
            false
        }
    }
}
