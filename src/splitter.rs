//! Segment orchestrator - probes, plans and extracts every part of a split
//!
//! Execution is strictly sequential: each ffmpeg invocation blocks until it
//! exits before the next part starts. Per-part problems are recorded in the
//! report; only validation, probing and a missing ffmpeg binary abort the run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{MediaToolsError, Result, ToolError, ValidationError};
use crate::ffmpeg::transcode::{is_progress_line, parse_progress_time};
use crate::ffmpeg::MediaTools;
use crate::prompt::Confirm;
use crate::segment::{plan_segments, MediaDuration, Segment};

/// Detail recorded when the user declines to overwrite an existing part
pub const SKIP_EXISTING: &str = "File already exists";

/// Upper bound on the number of parts in one run
pub const MAX_PARTS: usize = 10_000;

/// Outcome of one part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Success,
    Skipped,
    Failed,
}

/// Result of extracting one segment
#[derive(Debug, Clone, Serialize)]
pub struct SegmentResult {
    pub segment_index: usize,
    pub status: SegmentStatus,
    pub detail: Option<String>,
    pub output_path: PathBuf,
}

impl SegmentResult {
    fn success(segment: &Segment, output_path: PathBuf) -> Self {
        Self {
            segment_index: segment.index,
            status: SegmentStatus::Success,
            detail: None,
            output_path,
        }
    }

    fn skipped(segment: &Segment, output_path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            segment_index: segment.index,
            status: SegmentStatus::Skipped,
            detail: Some(detail.into()),
            output_path,
        }
    }

    fn failed(segment: &Segment, output_path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            segment_index: segment.index,
            status: SegmentStatus::Failed,
            detail: Some(detail.into()),
            output_path,
        }
    }
}

/// An output file found on disk after the run
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub file_name: String,
    pub size_bytes: u64,
}

impl OutputFile {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Summary of a split run
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub duration: MediaDuration,
    pub parts: usize,
    pub started_at: DateTime<Local>,
    pub results: Vec<SegmentResult>,
    pub outputs: Vec<OutputFile>,
}

impl SplitReport {
    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == SegmentStatus::Success)
            .count()
    }

    /// Skipped and failed parts, in order
    pub fn problems(&self) -> impl Iterator<Item = &SegmentResult> {
        self.results
            .iter()
            .filter(|r| r.status != SegmentStatus::Success)
    }

    /// A run succeeds when at least one part was written.
    pub fn is_success(&self) -> bool {
        self.success_count() > 0
    }
}

/// What to split
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub source: PathBuf,
    /// Requested number of parts; signed so that bad input is reported
    pub parts: i64,
    pub output_dir: Option<PathBuf>,
}

/// Progress of the current part, parsed from one ffmpeg output line
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a> {
    pub part: usize,
    pub total: usize,
    pub line: &'a str,
    pub time_secs: Option<f64>,
}

/// Things the caller may want to display while a split runs
#[derive(Debug, Clone, Copy)]
pub enum SplitEvent<'a> {
    Probed {
        duration: MediaDuration,
        parts: usize,
        segment_length: f64,
    },
    SegmentStarted {
        part: usize,
        total: usize,
        output: &'a Path,
    },
    Progress(ProgressUpdate<'a>),
    SegmentFinished(&'a SegmentResult),
}

/// Check the request before any subprocess runs; returns the part count.
pub fn validate_request(request: &SplitRequest) -> std::result::Result<usize, ValidationError> {
    if !request.source.exists() {
        return Err(ValidationError::SourceMissing(request.source.clone()));
    }
    if !request.source.is_file() {
        return Err(ValidationError::NotAFile(request.source.clone()));
    }
    if request.parts <= 0 {
        return Err(ValidationError::InvalidPartCount(request.parts));
    }
    match usize::try_from(request.parts) {
        Ok(parts) if parts <= MAX_PARTS => Ok(parts),
        _ => Err(ValidationError::TooManyParts {
            requested: request.parts,
            max: MAX_PARTS,
        }),
    }
}

/// Directory the parts are written to, created when requested but missing.
pub fn resolve_output_dir(source: &Path, requested: Option<&Path>) -> std::io::Result<PathBuf> {
    match requested {
        Some(dir) => {
            if !dir.exists() {
                tracing::info!("Creating output directory {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
            Ok(dir.to_path_buf())
        }
        None => match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            _ => Ok(PathBuf::from(".")),
        },
    }
}

/// Sizes of the parts that exist in `output_dir`, in part order
pub fn collect_outputs(source: &Path, segments: &[Segment], output_dir: &Path) -> Vec<OutputFile> {
    segments
        .iter()
        .filter_map(|segment| {
            let path = segment.output_path(source, output_dir);
            let meta = std::fs::metadata(&path).ok()?;
            if !meta.is_file() {
                return None;
            }
            Some(OutputFile {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size_bytes: meta.len(),
            })
        })
        .collect()
}

/// Drives a split through a [`MediaTools`] implementation
pub struct Splitter<T> {
    tools: T,
}

impl<T: MediaTools> Splitter<T> {
    pub fn new(tools: T) -> Self {
        Self { tools }
    }

    /// Split `request.source` into `request.parts` files.
    pub fn run(
        &self,
        request: &SplitRequest,
        confirm: &mut dyn Confirm,
        observer: &mut dyn FnMut(&SplitEvent),
    ) -> Result<SplitReport> {
        let parts = validate_request(request)?;
        let source = request.source.as_path();
        let started_at = Local::now();

        tracing::info!("Getting duration of {}", source.display());
        let duration = self.tools.probe_duration(source)?;
        let segments = plan_segments(duration, parts);
        let segment_length = duration.as_secs() / parts as f64;
        tracing::info!(
            "Duration {:.2}s, {} parts of {:.2}s",
            duration.as_secs(),
            parts,
            segment_length
        );
        observer(&SplitEvent::Probed {
            duration,
            parts,
            segment_length,
        });

        let output_dir = resolve_output_dir(source, request.output_dir.as_deref())?;

        let mut results = Vec::with_capacity(parts);
        for segment in &segments {
            let result =
                self.execute_segment(source, segment, parts, &output_dir, confirm, observer)?;
            observer(&SplitEvent::SegmentFinished(&result));
            results.push(result);
        }

        let outputs = collect_outputs(source, &segments, &output_dir);
        let report = SplitReport {
            source: source.to_path_buf(),
            output_dir,
            duration,
            parts,
            started_at,
            results,
            outputs,
        };
        tracing::info!(
            "Split finished: {}/{} parts created",
            report.success_count(),
            parts
        );
        Ok(report)
    }

    /// Extract one part.
    ///
    /// Only a missing ffmpeg binary is returned as an error; every other
    /// problem becomes a `Skipped` or `Failed` result.
    pub fn execute_segment(
        &self,
        source: &Path,
        segment: &Segment,
        total: usize,
        output_dir: &Path,
        confirm: &mut dyn Confirm,
        observer: &mut dyn FnMut(&SplitEvent),
    ) -> Result<SegmentResult> {
        let output = segment.output_path(source, output_dir);

        if output.exists() {
            let question = format!("File '{}' already exists. Overwrite?", output.display());
            if !confirm.confirm(&question) {
                tracing::info!("Skipping segment {}", segment.index);
                return Ok(SegmentResult::skipped(segment, output, SKIP_EXISTING));
            }
        }

        observer(&SplitEvent::SegmentStarted {
            part: segment.index,
            total,
            output: &output,
        });
        tracing::debug!(
            "Part {}/{}: start={:.3}s length={:.3}s -> {}",
            segment.index,
            total,
            segment.start_offset,
            segment.length,
            output.display()
        );

        let mut on_line = |line: &str| {
            if is_progress_line(line) {
                observer(&SplitEvent::Progress(ProgressUpdate {
                    part: segment.index,
                    total,
                    line,
                    time_secs: parse_progress_time(line),
                }));
            }
        };

        match self
            .tools
            .extract_segment(source, segment, &output, &mut on_line)
        {
            Ok(exit) if exit.success() => Ok(SegmentResult::success(segment, output)),
            Ok(exit) => {
                tracing::warn!("Part {} failed: ffmpeg {}", segment.index, exit.describe());
                Ok(SegmentResult::failed(
                    segment,
                    output,
                    format!("external tool error ({})", exit.describe()),
                ))
            }
            Err(ToolError::NotFound(tool)) => Err(MediaToolsError::ToolMissing { tool }),
            Err(e) => {
                tracing::warn!("Part {} failed: {}", segment.index, e);
                Ok(SegmentResult::failed(segment, output, e.to_string()))
            }
        }
    }
}
