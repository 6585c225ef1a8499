//! Progress reporting for the size search.
//!
//! The search emits [`ProgressEvent`]s in order through a [`ProgressSink`].
//! Sinks are fire-and-forget: the search never waits for them and ignores
//! whatever they do with the event.

use std::fmt;
use std::sync::mpsc::Sender;

/// One step of the search, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Resolution search started at a fixed quality.
    ResolutionSearch { quality: u8 },
    /// One candidate width was encoded.
    WidthTrial { width: u32, height: u32, bytes: usize },
    /// Quality refinement started at a fixed width.
    QualityRefinement { width: u32 },
    /// One refinement quality was encoded.
    QualityTrial { quality: u8, bytes: usize, fits: bool },
    /// A buffer under the ceiling has been chosen.
    Finished { width: u32, quality: u8, bytes: usize },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::ResolutionSearch { quality } => {
                write!(f, "Stage 1: searching for a width (fixed quality: {})...", quality)
            }
            ProgressEvent::WidthTrial { width, bytes, .. } => {
                write!(f, "Trying width: {}px, size: {:.1} KB", width, kb(*bytes))
            }
            ProgressEvent::QualityRefinement { width } => {
                write!(f, "Stage 2: refining quality (fixed width: {}px)...", width)
            }
            ProgressEvent::QualityTrial {
                quality,
                bytes,
                fits,
            } => write!(
                f,
                "Trying quality: {}, size: {:.1} KB{}",
                quality,
                kb(*bytes),
                if *fits { "" } else { " (over budget)" }
            ),
            ProgressEvent::Finished {
                width,
                quality,
                bytes,
            } => write!(
                f,
                "Selected width {}px at quality {}: {:.1} KB",
                width,
                quality,
                kb(*bytes)
            ),
        }
    }
}

pub(crate) fn kb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Sink that forwards events over a channel.
///
/// A dropped receiver is not an error; events are simply lost.
#[derive(Debug, Clone)]
pub struct ChannelProgress(pub Sender<ProgressEvent>);

impl ProgressSink for ChannelProgress {
    fn report(&mut self, event: ProgressEvent) {
        let _ = self.0.send(event);
    }
}
