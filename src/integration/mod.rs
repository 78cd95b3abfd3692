//! Integration tests
//!
//! Drive the splitter end to end through real child processes, using small
//! shell scripts in place of ffprobe and ffmpeg.

pub mod fixtures;

#[cfg(unix)]
mod e2e;
