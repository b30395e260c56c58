//! The watch loop: timestamp polling merged with the reload command.

use crate::console;
use crate::error::{Result, WatchError};
use crate::watch::event::ChangeEvent;
use crate::watch::input::{self, InputReader, RELOAD_COMMAND};
use crate::watch::watched_file::WatchedFile;
use std::future::Future;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Default interval between timestamp polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default pause before each input read.
pub const DEFAULT_INPUT_INTERVAL: Duration = Duration::from_millis(500);

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Produces change notifications for one file and invokes a callback on each.
///
/// Two producers feed the loop: the loop's own timestamp poll and a
/// background thread reading lines from an input stream (stdin by default).
/// A timestamp change runs the callback inside the poll loop: polling
/// resumes only once that run has finished, and the new timestamp is
/// recorded after it. A reload command spawns its run in the background, so
/// reload runs can overlap each other and the current poll run.
///
/// # Examples
///
/// ```rust,no_run
/// use hotrun::watch::ChangeSource;
///
/// # async fn example() -> hotrun::error::Result<()> {
/// ChangeSource::new("/tmp/script.py")
///     .watch(|| async {
///         println!("changed!");
///         Ok(())
///     })
///     .await
/// # }
/// ```
pub struct ChangeSource {
    file: WatchedFile,
    poll_interval: Duration,
    input_interval: Duration,
    input: Option<InputReader>,
}

impl ChangeSource {
    /// Watch `path`, listening for the reload command on stdin.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: WatchedFile::new(path),
            poll_interval: DEFAULT_POLL_INTERVAL,
            input_interval: DEFAULT_INPUT_INTERVAL,
            input: Some(Box::new(std::io::BufReader::new(std::io::stdin()))),
        }
    }

    /// Set the interval between timestamp polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the pause before each input read.
    pub fn with_input_interval(mut self, interval: Duration) -> Self {
        self.input_interval = interval;
        self
    }

    /// Read reload commands from `reader` instead of stdin.
    pub fn with_input<R: BufRead + Send + 'static>(mut self, reader: R) -> Self {
        self.input = Some(Box::new(reader));
        self
    }

    /// Do not listen for the reload command at all.
    pub fn without_input(mut self) -> Self {
        self.input = None;
        self
    }

    /// Watched path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Interval between timestamp polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run until Ctrl-C.
    ///
    /// Returns `Ok(())` on interrupt so the caller can say goodbye.
    ///
    /// # Errors
    ///
    /// See [`watch_until`](Self::watch_until).
    pub async fn watch<F, Fut>(self, callback: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.watch_until(callback, interrupted()).await
    }

    /// Run until `shutdown` completes.
    ///
    /// The first poll happens immediately and always fires, so `callback`
    /// runs once on startup. Shutdown and reload commands are still served
    /// while a poll run is in progress. On shutdown the poll run is aborted.
    ///
    /// # Errors
    ///
    /// - [`WatchError::FileAccess`] if the file cannot be stat'ed while polling
    /// - the first error returned by a callback run, whichever producer
    ///   started it: a reload run that fails (for instance because the
    ///   interpreter cannot be spawned) ends the whole watch, not just the
    ///   input listener
    /// - [`WatchError::Other`] if a callback run panics
    /// - [`WatchError::IoError`] if the input thread cannot be spawned
    pub async fn watch_until<F, Fut, S>(self, callback: F, shutdown: S) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
        S: Future<Output = ()>,
    {
        let Self {
            mut file,
            poll_interval,
            input_interval,
            input,
        } = self;

        console::info("Start watch...");

        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        if let Some(reader) = input {
            console::info(format!(
                "Enter '{RELOAD_COMMAND}' in cli and file will be reloaded!"
            ));
            input::spawn_listener(reader, input_interval, tx)?;
        } else {
            drop(tx);
        }

        info!(path = %file.path().display(), interval = ?poll_interval, "watching");

        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut runs = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!(in_flight = runs.len(), "watch interrupted");
                    return Ok(());
                }

                Some(joined) = runs.join_next() => settle(joined)?,

                Some(event) = rx.recv() => fire(&mut runs, &callback, event),

                _ = ticker.tick() => {
                    let Some(stamp) = file.changed()? else {
                        continue;
                    };
                    debug!(origin = ?ChangeEvent::timestamp().origin(), in_flight = runs.len(), "change detected");
                    let mut current = tokio::spawn(callback());
                    loop {
                        tokio::select! {
                            biased;

                            _ = &mut shutdown => {
                                current.abort();
                                info!(in_flight = runs.len() + 1, "watch interrupted");
                                return Ok(());
                            }

                            joined = &mut current => {
                                settle(joined)?;
                                break;
                            }

                            Some(joined) = runs.join_next() => settle(joined)?,

                            Some(event) = rx.recv() => fire(&mut runs, &callback, event),
                        }
                    }
                    file.record(stamp);
                }
            }
        }
    }
}

fn settle(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(WatchError::Other(format!("Reload task failed: {e}"))),
    }
}

fn fire<F, Fut>(runs: &mut JoinSet<Result<()>>, callback: &F, event: ChangeEvent)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    debug!(origin = ?event.origin(), in_flight = runs.len(), "change detected");
    runs.spawn(callback());
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
