//! Progress reporting and cooperative cancellation.
//!
//! Long-running operations run on short-lived worker threads and push
//! progress through a channel; the interactive context drains it
//! without blocking. Cancellation is a flag checked only at defined
//! safe points; in-flight external processes are bounded by their own
//! timeouts instead of being interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// A progress update from a worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A human-readable phase label ("Unpacking JAR", "Signing JAR").
    Phase(String),
    /// Overall fractional progress in `0.0..=1.0`, monotonic per run.
    Fraction(f64),
    /// A free-text console line for the user.
    Console(String),
}

/// Where workers push progress. Implementations must be cheap; they are
/// called from inside pipeline steps.
pub trait ProgressSink {
    fn phase(&self, label: &str);
    fn fraction(&self, value: f64);
    fn console(&self, line: &str);
}

/// Sink that discards everything.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn phase(&self, _label: &str) {}
    fn fraction(&self, _value: f64) {}
    fn console(&self, _line: &str) {}
}

/// Sink that forwards events over an mpsc channel to the interactive
/// context. Send failures are ignored; a dropped receiver just means
/// nobody is watching anymore.
pub struct ChannelSink {
    tx: Sender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn phase(&self, label: &str) {
        let _ = self.tx.send(ProgressEvent::Phase(label.to_string()));
    }

    fn fraction(&self, value: f64) {
        let _ = self.tx.send(ProgressEvent::Fraction(value));
    }

    fn console(&self, line: &str) {
        let _ = self.tx.send(ProgressEvent::Console(line.to_string()));
    }
}

/// Shared cancellation flag.
///
/// Cloned into workers; honored only at the boundary between the
/// unsign/copy phase and the sign phase. The binary itself runs
/// pipelines to completion and installs no interrupt handler; the
/// token is the seam for embedding callers that need to stop a run at
/// the safe point.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);

        sink.phase("Signing JAR");
        sink.fraction(0.5);
        sink.console("Finished");

        assert_eq!(rx.recv().unwrap(), ProgressEvent::Phase("Signing JAR".into()));
        assert_eq!(rx.recv().unwrap(), ProgressEvent::Fraction(0.5));
        assert_eq!(rx.recv().unwrap(), ProgressEvent::Console("Finished".into()));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let sink = ChannelSink::new(tx);
        sink.phase("nobody listening"); // must not panic
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
