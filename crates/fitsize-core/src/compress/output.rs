//! File-level pipeline: decode, search, write.
//!
//! The destination is only touched once a fitting buffer exists, and the
//! write goes through a temporary sibling that is renamed into place, so a
//! failed run never leaves a partial file behind.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use super::progress::kb;
use super::{
    CancelFlag, CompressError, CompressedImage, ProgressSink, SearchParameters,
    SizeConstrainedEncoder, TargetBudget,
};
use crate::decode::{decode_file, ColorLayout, Orientation};

/// Suffix appended to the input's stem for the default destination.
pub const OUTPUT_SUFFIX: &str = "_compressed";

/// Extension of the produced files.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// What a successful file compression produced.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub source_layout: ColorLayout,
    /// EXIF orientation applied before the search; source dimensions are after it.
    pub source_orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub bytes: u64,
    pub target_bytes: u64,
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Compressed to {:.1} KB ({}x{}, quality {}) -> {}",
            kb(self.bytes as usize),
            self.width,
            self.height,
            self.quality,
            self.output.display()
        )
    }
}

/// Default destination: `<dir>/<stem>_compressed.jpg`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION))
}

/// Write `bytes` to `path`, replacing any existing file atomically.
///
/// # Errors
///
/// Returns `CompressError::Write` if the temporary file cannot be created,
/// written or renamed into place.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CompressError> {
    let write_err = |message: String| CompressError::Write {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(bytes).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Everything needed to compress one file.
#[derive(Debug, Clone)]
pub struct CompressJob {
    pub input: PathBuf,
    /// Destination; `None` means [`derive_output_path`].
    pub output: Option<PathBuf>,
    pub budget: TargetBudget,
    pub params: SearchParameters,
}

impl CompressJob {
    pub fn new(input: impl Into<PathBuf>, budget: TargetBudget) -> Self {
        Self {
            input: input.into(),
            output: None,
            budget,
            params: SearchParameters::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_params(mut self, params: SearchParameters) -> Self {
        self.params = params;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derive_output_path(&self.input))
    }
}

/// Decode `job.input`, fit it under the budget as JPEG and write the result.
pub fn compress_file(
    job: &CompressJob,
    progress: &mut dyn ProgressSink,
    cancel: Option<CancelFlag>,
) -> Result<CompressionReport, CompressError> {
    job.params.validate()?;
    let output = job.output_path();

    log::info!(
        "compressing {} to <= {} KB",
        job.input.display(),
        job.budget.kilobytes()
    );
    let source = decode_file(&job.input)?;

    let mut search = SizeConstrainedEncoder::jpeg();
    if let Some(flag) = cancel {
        search = search.with_cancel(flag);
    }
    let result: CompressedImage = search.compress(&source.image, &job.budget, &job.params, progress)?;

    write_output(&output, &result.data)?;

    Ok(CompressionReport {
        input: job.input.clone(),
        output,
        source_width: source.image.width,
        source_height: source.image.height,
        source_layout: source.layout,
        source_orientation: source.orientation,
        width: result.width,
        height: result.height,
        quality: result.quality,
        bytes: result.len() as u64,
        target_bytes: job.budget.byte_ceiling(),
    })
}
