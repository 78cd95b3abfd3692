//! Segment extraction via ffmpeg stream copy

use std::ffi::OsString;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::ToolError;
use crate::segment::Segment;

use super::ToolExit;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// ffmpeg arguments for one window.
///
/// Seeks before the input, limits the read length, copies streams and
/// shifts negative timestamps introduced by copy-mode seeking.
pub fn transcode_args(source: &Path, segment: &Segment, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        segment.start_offset.to_string().into(),
        "-i".into(),
        source.as_os_str().to_owned(),
        "-t".into(),
        segment.length.to_string().into(),
        "-c".into(),
        "copy".into(),
        "-avoid_negative_ts".into(),
        "1".into(),
        output.as_os_str().to_owned(),
    ]
}

/// Whether a line of ffmpeg output is a progress report
pub fn is_progress_line(line: &str) -> bool {
    line.contains("time=")
}

/// Position reported by a progress line, in seconds
pub fn parse_progress_time(line: &str) -> Option<f64> {
    let caps = regex!(r"time=\s*(\d+):(\d{2}):(\d{2}(?:\.\d+)?)").captures(line)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Feed every non-empty line of `reader` to `on_line`.
///
/// ffmpeg rewrites its status line with bare carriage returns, so both
/// `\r` and `\n` end a line. Invalid UTF-8 is replaced, not rejected.
pub fn for_each_line<R: BufRead>(reader: R, on_line: &mut dyn FnMut(&str)) -> std::io::Result<()> {
    for chunk in reader.split(b'\r') {
        let chunk = chunk?;
        for raw in chunk.split(|b| *b == b'\n') {
            let line = String::from_utf8_lossy(raw);
            let line = line.trim();
            if !line.is_empty() {
                on_line(line);
            }
        }
    }
    Ok(())
}

/// Run ffmpeg and block until it exits, streaming its stderr to `on_line`.
pub fn run_transcode(
    program: &Path,
    args: &[OsString],
    on_line: &mut dyn FnMut(&str),
) -> Result<ToolExit, ToolError> {
    tracing::debug!("Running {} {:?}", program.display(), args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolError::NotFound(program.display().to_string()),
            _ => ToolError::Io(e),
        })?;

    // Always reap the child, even if reading its output failed.
    let read_result = match child.stderr.take() {
        Some(stderr) => for_each_line(BufReader::new(stderr), on_line),
        None => Ok(()),
    };
    let status = child.wait()?;
    read_result?;

    Ok(ToolExit {
        code: status.code(),
    })
}
