//! The message-passing boundary between the blocking resolve/build pipeline
//! and whatever front end renders its progress. The pipeline only ever talks
//! to a [`LogSink`]; the owning side keeps all mutable view state to itself
//! and consumes [`BuildEvent`]s on its own thread, so no locking is needed
//! around the rendered log.

use std::sync::mpsc::Sender;
use std::sync::Mutex;
use std::thread::JoinHandle;

/// Destination for streamed child-process output and progress lines.
///
/// Must be shareable across threads: the executors drain the child's
/// stderr on a secondary thread into the same sink.
pub trait LogSink: Send + Sync {
    fn line(&self, line: &str);
}

/// The CLI front end sink. Lines go straight to stdout, mirroring them
/// to nothing else.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn line(&self, line: &str) {
        println!("{line}");
    }
}

/// What a background worker reports back to the front end that spawned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// One line of relayed subprocess or progress output
    Line(String),
    /// The worker's job ran to completion; `success` carries the overall
    /// outcome of the action
    Finished { success: bool },
}

/// Sink that forwards every line as a [`BuildEvent::Line`] through a channel
pub struct ChannelSink {
    sender: Mutex<Sender<BuildEvent>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<BuildEvent>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl LogSink for ChannelSink {
    fn line(&self, line: &str) {
        // A disconnected receiver only means nobody renders the log anymore
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(BuildEvent::Line(line.to_owned()));
        }
    }
}

/// Runs `job` on a freshly spawned background thread, relaying its log lines
/// as events and closing with a [`BuildEvent::Finished`] that carries the
/// outcome.
///
/// Exactly one thread per user-initiated action. Actions started while
/// another worker runs are neither queued nor deduplicated.
pub fn spawn_worker<F>(sender: Sender<BuildEvent>, job: F) -> JoinHandle<()>
where
    F: FnOnce(&dyn LogSink) -> bool + Send + 'static,
{
    std::thread::spawn(move || {
        let sink = ChannelSink::new(sender.clone());
        let success = job(&sink);
        let _ = sender.send(BuildEvent::Finished { success });
    })
}
