//! Size-constrained compression.
//!
//! Given a decoded image and a budget in kilobytes, find a JPEG encoding no
//! larger than `kb * 1024` bytes, preferring resolution loss first and then
//! spending whatever room is left on quality.
//!
//! # Search
//!
//! 1. **Resolution search**: starting at the original width, encode at the
//!    fixed initial quality; on overshoot shrink by `max(50, width / 20)`
//!    pixels and retry, never going below the minimum width.
//! 2. **Quality refinement**: at the winning width, try qualities from
//!    `initial + 1` up to 95 and keep the last one that fits, stopping at the
//!    first that does not.
//!
//! The number of encodes is bounded by the width range and the quality range,
//! so a search always terminates without a timeout.
//!
//! # Examples
//!
//! ```ignore
//! use fitsize_core::compress::{compress_file, CompressJob, TargetBudget};
//!
//! let budget = TargetBudget::from_kilobytes(200)?;
//! let job = CompressJob::new("photo.png", budget);
//! let report = compress_file(&job, &mut |event| println!("{event}"), None)?;
//! println!("{report}");
//! ```

mod cancel;
mod config;
mod error;
mod output;
mod progress;
mod search;
mod task;

pub use cancel::CancelFlag;
pub use config::{
    shrink_step, SearchParameters, TargetBudget, DEFAULT_INITIAL_QUALITY, DEFAULT_MIN_WIDTH,
    MAX_REFINE_QUALITY, MIN_SHRINK_STEP,
};
pub use error::{CompressError, ErrorKind};
pub use output::{
    compress_file, derive_output_path, write_output, CompressJob, CompressionReport,
    OUTPUT_EXTENSION, OUTPUT_SUFFIX,
};
pub use progress::{ChannelProgress, NoProgress, ProgressEvent, ProgressSink};
pub use search::{CompressedImage, SizeConstrainedEncoder};
pub use task::{spawn_compress_file, CompressTask};
