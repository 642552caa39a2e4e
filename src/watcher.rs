// src/watcher.rs
//! Debounced re-runs after page mutations.
//!
//! [`Debouncer`] is the timer itself: every mutation pushes a single deadline
//! out by the delay, and it fires once the page has been quiet that long. It
//! takes the current instant as an argument so callers with their own clock
//! (the GUI frame loop) and tests can drive it.
//!
//! [`spawn`] wraps it in a thread fed by a channel, for hosts that report
//! mutations from elsewhere. [`watch_file`] is the usual source: a `notify`
//! watcher on the saved page.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// A mutation batch arrived: (re)start the one pending timer.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per quiet period, when the deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending run, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Mutated,
    Shutdown,
}

/// Run `on_settle` once after each burst of `Mutated` signals goes quiet for `delay`.
///
/// The thread ends on `Shutdown` or when every sender is dropped; a burst still
/// pending at that point is dropped with it.
pub fn spawn<F>(delay: Duration, rx: Receiver<Signal>, mut on_settle: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    thread::spawn(move || {
        let mut debouncer = Debouncer::new(delay);
        loop {
            let signal = match debouncer.remaining(Instant::now()) {
                Some(wait) => rx.recv_timeout(wait),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match signal {
                Ok(Signal::Mutated) => debouncer.touch(Instant::now()),
                Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
            if debouncer.fire_due(Instant::now()) {
                tracing::debug!("mutations settled, re-running");
                on_settle();
            }
        }
    })
}

/// Call `on_change` for every write to `path`. The parent directory is watched,
/// so editors that save by replacing the file are seen too. Dropping the
/// returned watcher stops it.
pub fn watch_file<F>(path: &Path, mut on_change: F) -> notify::Result<RecommendedWatcher>
where
    F: FnMut() + Send + 'static,
{
    let file_name = path.file_name().map(OsStr::to_os_string);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| match result {
        Ok(event) if touches_file(&event, file_name.as_deref()) => on_change(),
        Ok(_) => {}
        Err(error) => tracing::warn!(%error, "file watcher error"),
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::debug!(path = %path.display(), "watching file");
    Ok(watcher)
}

fn touches_file(event: &Event, file_name: Option<&OsStr>) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == file_name)
}
