//! FFmpeg module - runs the ffprobe and ffmpeg command-line tools
//!
//! This module handles:
//! - Duration probing via ffprobe
//! - Stream-copy extraction of one time window via ffmpeg
//! - Incremental reading of ffmpeg's progress output
//!
//! The [`MediaTools`] trait is the seam the splitter depends on, so the
//! orchestration can be exercised without real binaries.

pub mod probe;
pub mod transcode;

use std::path::{Path, PathBuf};

use crate::config::ToolsConfig;
use crate::error::{ProbeError, ToolError};
use crate::segment::{MediaDuration, Segment};

/// Exit state of one external tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Process exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable status for reports
    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// External media tooling used by the splitter
pub trait MediaTools {
    /// Query the total duration of `source`.
    fn probe_duration(&self, source: &Path) -> Result<MediaDuration, ProbeError>;

    /// Copy the window described by `segment` from `source` into `output`,
    /// calling `on_line` for every line of tool output as it arrives.
    fn extract_segment(
        &self,
        source: &Path,
        segment: &Segment,
        output: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ToolExit, ToolError>;
}

/// [`MediaTools`] backed by the ffprobe and ffmpeg binaries
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTools {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            ffprobe: config.ffprobe.clone(),
        }
    }
}

impl MediaTools for FfmpegTools {
    fn probe_duration(&self, source: &Path) -> Result<MediaDuration, ProbeError> {
        probe::run_probe(&self.ffprobe, source)
    }

    fn extract_segment(
        &self,
        source: &Path,
        segment: &Segment,
        output: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ToolExit, ToolError> {
        let args = transcode::transcode_args(source, segment, output);
        transcode::run_transcode(&self.ffmpeg, &args, on_line)
    }
}
