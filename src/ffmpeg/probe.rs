//! Duration probing via ffprobe

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::ProbeError;
use crate::segment::MediaDuration;

/// ffprobe arguments selecting the container duration as a bare number
pub fn probe_args(source: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(source.as_os_str().to_owned());
    args
}

/// Parse ffprobe's stdout into a duration
pub fn parse_duration(stdout: &str) -> Result<MediaDuration, ProbeError> {
    let text = stdout.trim();
    let secs: f64 = text
        .parse()
        .map_err(|_| ProbeError::Unparseable(text.to_string()))?;
    MediaDuration::from_secs(secs).ok_or(ProbeError::InvalidDuration(secs))
}

/// Run `program` against `source` and read back the duration.
///
/// Blocks until the probe exits.
pub fn run_probe(program: &Path, source: &Path) -> Result<MediaDuration, ProbeError> {
    tracing::debug!("Probing duration of {} with {}", source.display(), program.display());

    let output = Command::new(program)
        .args(probe_args(source))
        .stdin(Stdio::null())
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProbeError::ToolMissing(program.display().to_string()),
            _ => ProbeError::Spawn {
                tool: program.display().to_string(),
                source: e,
            },
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!("{} failed ({}): {}", program.display(), output.status, stderr);
        return Err(ProbeError::ToolFailed {
            status: output.status.to_string(),
            stderr,
        });
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}
