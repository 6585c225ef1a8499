//! Running a file compression on a worker thread.
//!
//! The search is one long blocking unit of work. [`spawn_compress_file`]
//! moves it off the calling thread and hands back a [`CompressTask`]: a
//! progress receiver to drain, a cancel handle, and the final result on join.

use std::any::Any;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use super::output::{compress_file, CompressJob, CompressionReport};
use super::progress::{ChannelProgress, ProgressEvent};
use super::{CancelFlag, CompressError};

/// Handle to a compression running in the background.
pub struct CompressTask {
    progress: Receiver<ProgressEvent>,
    cancel: CancelFlag,
    handle: JoinHandle<Result<CompressionReport, CompressError>>,
}

/// Start `job` on its own thread.
pub fn spawn_compress_file(job: CompressJob) -> std::io::Result<CompressTask> {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelFlag::new();
    let worker_cancel = cancel.clone();

    let handle = thread::Builder::new()
        .name("fitsize-worker".to_string())
        .spawn(move || {
            let mut sink = ChannelProgress(tx);
            compress_file(&job, &mut sink, Some(worker_cancel))
        })?;

    Ok(CompressTask {
        progress: rx,
        cancel,
        handle,
    })
}

impl CompressTask {
    /// Progress events in emission order. Iteration ends when the worker is done.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Ask the worker to stop before its next trial encoding.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the worker and return its result.
    ///
    /// A panicking worker is reported as `CompressError::WorkerPanicked`.
    pub fn join(self) -> Result<CompressionReport, CompressError> {
        self.handle
            .join()
            .unwrap_or_else(|payload| Err(CompressError::WorkerPanicked(panic_message(payload))))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
