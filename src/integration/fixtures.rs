//! Test fixtures for integration tests
//!
//! Provides scripted ffprobe/ffmpeg stand-ins so process handling can be
//! tested without FFmpeg installed.

#[cfg(unix)]
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[cfg(unix)]
use tempfile::TempDir;

#[cfg(unix)]
use crate::config::ToolsConfig;

/// Serializes tests that spawn processes.
///
/// A script executed while another thread's fork still holds its write
/// descriptor fails with ETXTBSY.
static PROCESS_LOCK: Mutex<()> = Mutex::new(());

pub fn process_lock() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// How the fake ffprobe behaves
#[cfg(unix)]
#[derive(Debug, Clone)]
pub enum ProbeBehavior {
    /// Print this text on stdout and exit 0
    Prints(&'static str),
    /// Print an error on stderr and exit 1
    Fails,
}

/// A directory holding fake tool scripts and a media source
#[cfg(unix)]
pub struct FakeToolbox {
    pub dir: TempDir,
    pub tools: ToolsConfig,
    pub source: PathBuf,
    pub ffmpeg_log: PathBuf,
}

#[cfg(unix)]
impl FakeToolbox {
    /// `fail_marker`: ffmpeg exits 1 when its output path contains it.
    pub fn new(probe: ProbeBehavior, fail_marker: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let ffmpeg_log = dir.path().join("ffmpeg-calls.log");

        let ffprobe_body = match probe {
            ProbeBehavior::Prints(out) => format!("printf '%s\\n' '{}'\nexit 0\n", out),
            ProbeBehavior::Fails => {
                "echo \"$7: Invalid data found when processing input\" >&2\nexit 1\n".to_string()
            }
        };
        let ffprobe = write_script(dir.path(), "ffprobe", &ffprobe_body);

        let fail_case = match fail_marker {
            Some(marker) => format!(
                "case \"$last\" in\n  *{}*) echo 'Conversion failed!' >&2; exit 1;;\nesac\n",
                marker
            ),
            None => String::new(),
        };
        let ffmpeg_body = format!(
            concat!(
                "for last in \"$@\"; do :; done\n",
                "printf '%s\\n' \"$*\" >> '{log}'\n",
                "printf 'Input #0, mov,mp4,m4a,3gp\\n' >&2\n",
                "printf 'size=       1kB time=00:00:01.00 bitrate=8.0kbits/s\\r' >&2\n",
                "printf 'size=       2kB time=00:00:02.00 bitrate=8.0kbits/s\\r' >&2\n",
                "{fail}",
                "printf 'segment-data' > \"$last\"\n",
                "exit 0\n"
            ),
            log = ffmpeg_log.display(),
            fail = fail_case
        );
        let ffmpeg = write_script(dir.path(), "ffmpeg", &ffmpeg_body);

        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"fake video").unwrap();

        Self {
            tools: ToolsConfig { ffmpeg, ffprobe },
            dir,
            source,
            ffmpeg_log,
        }
    }

    /// Argument lines ffmpeg was called with, one per invocation
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.ffmpeg_log)
            .map(|s| s.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
