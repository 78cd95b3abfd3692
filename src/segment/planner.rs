//! Segment planner - divides a media duration into equal windows

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Total playable length of a source file, in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct MediaDuration(f64);

impl MediaDuration {
    /// Wrap a probed value. Returns `None` for values that are not
    /// finite or not strictly positive.
    pub fn from_secs(secs: f64) -> Option<Self> {
        if secs.is_finite() && secs > 0.0 {
            Some(Self(secs))
        } else {
            None
        }
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }
}

/// One contiguous time window of the source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// 1-based part number
    pub index: usize,
    /// Seek offset in seconds
    pub start_offset: f64,
    /// Window length in seconds
    pub length: f64,
}

impl Segment {
    /// Nominal end of the window
    pub fn end_offset(&self) -> f64 {
        self.start_offset + self.length
    }

    /// Where this part is written for `source` inside `output_dir`
    pub fn output_path(&self, source: &Path, output_dir: &Path) -> PathBuf {
        output_dir.join(output_file_name(source, self.index))
    }
}

/// Split `duration` into `parts` equal windows.
///
/// Segment i (0-based) starts at `i * duration / parts`. The last window is
/// not stretched or clipped to the true end, so it may drift from the
/// probed duration by floating-point error.
pub fn plan_segments(duration: MediaDuration, parts: usize) -> Vec<Segment> {
    let length = duration.as_secs() / parts as f64;
    (0..parts)
        .map(|i| Segment {
            index: i + 1,
            start_offset: i as f64 * length,
            length,
        })
        .collect()
}

/// `<basename>_part<NN><ext>`, with NN at least two digits wide.
pub fn output_file_name(source: &Path, index: usize) -> OsString {
    let mut name = source
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(format!("_part{:02}", index));
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}
