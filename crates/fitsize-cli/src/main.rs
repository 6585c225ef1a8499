use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fitsize_core::compress::{
    spawn_compress_file, CompressError, CompressJob, ErrorKind, SearchParameters, TargetBudget,
};
use fitsize_core::FilterType;

/// Shrink an image until its JPEG encoding fits under a size budget.
///
/// The width is reduced first (at a fixed quality) until the file fits, then
/// the quality is raised as far as the budget allows.
#[derive(Parser, Debug)]
#[command(name = "fitsize", version)]
#[command(about = "Fit an image under a target file size as JPEG")]
struct Args {
    /// Image to compress (JPEG or PNG, transparency is dropped)
    input: PathBuf,

    /// Target size in kilobytes
    #[arg(short, long = "target-kb", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(10..=1000))]
    target_kb: u32,

    /// Quality used while searching for a width [default: 75]
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Never go narrower than this many pixels [default: 600]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    min_width: Option<u32>,

    /// Output path [default: <input stem>_compressed.jpg next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resampling filter [default: lanczos3]
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// JSON file with search parameters; command-line flags win over it
    #[arg(long)]
    params: Option<PathBuf>,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl From<FilterArg> for FilterType {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => FilterType::Nearest,
            FilterArg::Bilinear => FilterType::Bilinear,
            FilterArg::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<CompressError>()
                .map(|e| exit_code(e.kind()))
                .unwrap_or(1);
            match err.downcast_ref::<CompressError>() {
                Some(e) => eprintln!("Failed ({}): {}", e.kind().as_str(), e),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let params = build_params(args)?;
    let budget = TargetBudget::from_kilobytes(args.target_kb)?;

    let mut job = CompressJob::new(&args.input, budget).with_params(params);
    if let Some(output) = &args.output {
        job = job.with_output(output);
    }

    log::info!("writing to {}", job.output_path().display());
    let task = spawn_compress_file(job).context("Failed to start worker thread")?;
    for event in task.progress().iter() {
        eprintln!("{}", event);
    }
    let report = task.join()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

/// Defaults, then the parameter file, then explicit flags.
fn build_params(args: &Args) -> Result<SearchParameters> {
    let mut params = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid parameter file {}", path.display()))?
        }
        None => SearchParameters::default(),
    };

    if let Some(quality) = args.quality {
        params.initial_quality = quality;
    }
    if let Some(min_width) = args.min_width {
        params.min_width = min_width;
    }
    if let Some(filter) = args.filter {
        params.filter = filter.into();
    }

    params.validate()?;
    Ok(params)
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Decode => 3,
        ErrorKind::UnreachableTarget => 4,
        ErrorKind::Write => 5,
        ErrorKind::Resample
        | ErrorKind::Encode
        | ErrorKind::InvalidParameters
        | ErrorKind::Cancelled
        | ErrorKind::Internal => 1,
    }
}
