//! Background listener for the interactive reload command.

use crate::watch::event::ChangeEvent;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// The only recognized input command.
pub const RELOAD_COMMAND: &str = "reload";

/// Boxed line source the listener reads from.
pub type InputReader = Box<dyn BufRead + Send>;

/// Whether an input line (without its terminator) is the reload command.
///
/// Matching is exact: surrounding whitespace or different case do not count.
pub fn is_reload_command(line: &str) -> bool {
    line == RELOAD_COMMAND
}

/// Spawn the dedicated input thread.
///
/// Before every read the thread sleeps for `interval`, then blocks for one
/// line. A line equal to [`RELOAD_COMMAND`] sends a [`ChangeEvent`] on `tx`;
/// anything else is ignored. The thread ends at end of input, on a read
/// error, or once the receiver is gone.
///
/// Reads block this OS thread only; a pending read must not hold up runtime
/// shutdown.
pub fn spawn_listener(
    reader: InputReader,
    interval: Duration,
    tx: mpsc::Sender<ChangeEvent>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("hotrun-input".to_string())
        .spawn(move || listen(reader, interval, tx))
}

fn listen(reader: InputReader, interval: Duration, tx: mpsc::Sender<ChangeEvent>) {
    let mut lines = reader.lines();
    loop {
        if !interval.is_zero() {
            thread::sleep(interval);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!(error = %e, "input listener stopped");
                return;
            }
            None => {
                debug!("input closed, reload command unavailable");
                return;
            }
        };

        if !is_reload_command(&line) {
            continue;
        }

        debug!("reload command received");
        if tx.blocking_send(ChangeEvent::reload_command()).is_err() {
            return;
        }
    }
}
