//! Errors surfaced by a size-constrained compression.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Coarse classification of a [`CompressError`], for callers that branch on
/// the failure reason rather than display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Decode,
    Resample,
    Encode,
    UnreachableTarget,
    InvalidParameters,
    Write,
    Cancelled,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable name, matching the serde representation.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::Resample => "resample",
            ErrorKind::Encode => "encode",
            ErrorKind::UnreachableTarget => "unreachable_target",
            ErrorKind::InvalidParameters => "invalid_parameters",
            ErrorKind::Write => "write",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }

    /// Human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode error",
            ErrorKind::Resample => "resample error",
            ErrorKind::Encode => "encode error",
            ErrorKind::UnreachableTarget => "unreachable target",
            ErrorKind::InvalidParameters => "invalid parameters",
            ErrorKind::Write => "write error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal error",
        }
    }
}

/// Error types for size-constrained compression.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input could not be read or decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A trial candidate could not be produced from the decoded source.
    #[error("Failed to resample candidate to {width}x{height}: {source}")]
    Resample {
        width: u32,
        height: u32,
        #[source]
        source: DecodeError,
    },

    /// The encoder failed on a candidate.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// No width at or above `min_width` fit the ceiling at the fixed quality.
    #[error(
        "cannot reach target size of {target_bytes} bytes at quality {quality} \
         without going below {min_width}px wide{}",
        smallest_tried_suffix(.smallest_bytes)
    )]
    UnreachableTarget {
        target_bytes: u64,
        min_width: u32,
        quality: u8,
        /// Size of the last (narrowest) trial, if any trial ran.
        smallest_bytes: Option<usize>,
    },

    /// Budget or search parameters out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The chosen buffer could not be written to its destination.
    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    /// The caller's cancel flag was raised between trials.
    #[error("Compression cancelled")]
    Cancelled,

    /// The background worker died without producing a result.
    #[error("Compression worker panicked: {0}")]
    WorkerPanicked(String),
}

fn smallest_tried_suffix(smallest: &Option<usize>) -> String {
    match smallest {
        Some(bytes) => format!(" (smallest attempt: {} bytes)", bytes),
        None => " (minimum width exceeds image width)".to_string(),
    }
}

impl CompressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressError::Decode(_) => ErrorKind::Decode,
            CompressError::Resample { .. } => ErrorKind::Resample,
            CompressError::Encode(_) => ErrorKind::Encode,
            CompressError::UnreachableTarget { .. } => ErrorKind::UnreachableTarget,
            CompressError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            CompressError::Write { .. } => ErrorKind::Write,
            CompressError::Cancelled => ErrorKind::Cancelled,
            CompressError::WorkerPanicked(_) => ErrorKind::Internal,
        }
    }
}
