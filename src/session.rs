//! Console sessions for the split and rename commands
//!
//! A session either runs once from complete command-line arguments, or
//! prompts for the inputs still missing and repeats until the input ends.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cli::{RenameArgs, SplitArgs};
use crate::error::{Result, ValidationError};
use crate::ffmpeg::MediaTools;
use crate::prompt::{AssumeAnswer, Confirm, Console};
use crate::rename::{apply_renames, plan_renames, RenameOutcome};
use crate::report::{rename_summary, render_event, rule, split_summary};
use crate::splitter::{SplitRequest, Splitter};

/// Answer to a prompt sequence
enum Prompted<T> {
    Value(T),
    Invalid(ValidationError),
    EndOfInput,
}

/// Split inputs already known before prompting, e.g. from the command line
#[derive(Debug, Clone, Default)]
pub struct SplitInputs {
    pub source: Option<PathBuf>,
    pub parts: Option<i64>,
    pub output_dir: Option<PathBuf>,
}

impl From<&SplitArgs> for SplitInputs {
    fn from(args: &SplitArgs) -> Self {
        Self {
            source: args.input.clone(),
            parts: args.parts,
            output_dir: args.output_dir.clone(),
        }
    }
}

/// Ask for whatever the next split job is still missing.
fn prompt_split<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    known: SplitInputs,
) -> io::Result<Prompted<SplitRequest>> {
    let source = match known.source {
        Some(source) => source,
        None => {
            let Some(path) =
                console.ask("\nInput the absolute path of the video file (.mp4): ")?
            else {
                return Ok(Prompted::EndOfInput);
            };
            if path.is_empty() {
                return Ok(Prompted::Invalid(ValidationError::EmptyInput("Video path")));
            }
            PathBuf::from(path)
        }
    };

    let parts = match known.parts {
        Some(parts) => parts,
        None => {
            let Some(parts) = console.ask("Input the number of parts (n): ")? else {
                return Ok(Prompted::EndOfInput);
            };
            if parts.is_empty() {
                return Ok(Prompted::Invalid(ValidationError::EmptyInput("n")));
            }
            let Ok(parts) = parts.parse::<i64>() else {
                return Ok(Prompted::Invalid(ValidationError::NotAnInteger("n")));
            };
            parts
        }
    };

    let output_dir = match known.output_dir {
        Some(dir) => Some(dir),
        None => {
            let Some(dir) = console
                .ask("Input output directory (leave empty to use same directory as video): ")?
            else {
                return Ok(Prompted::EndOfInput);
            };
            (!dir.is_empty()).then(|| PathBuf::from(dir))
        }
    };

    Ok(Prompted::Value(SplitRequest {
        source,
        parts,
        output_dir,
    }))
}

/// Run one split, rendering progress to `progress`.
///
/// Returns the report's success flag.
pub fn split_once<T, W>(
    splitter: &Splitter<T>,
    request: &SplitRequest,
    confirm: &mut dyn Confirm,
    progress: &mut dyn Write,
    out: &mut W,
    json: bool,
) -> Result<bool>
where
    T: MediaTools,
    W: Write + ?Sized,
{
    writeln!(progress, "Getting video duration...")?;
    let report = splitter.run(request, confirm, &mut |event| {
        if let Err(e) = render_event(progress, event) {
            tracing::debug!("Failed to write progress: {}", e);
        }
    })?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "\n{}", split_summary(&report))?;
    }
    Ok(report.is_success())
}

/// Prompt for split jobs until end of input.
///
/// `first` pre-fills the first round; later rounds ask for everything.
pub fn split_interactive<T, R, W>(
    splitter: &Splitter<T>,
    console: &mut Console<R, W>,
    progress: &mut dyn Write,
    first: SplitInputs,
) -> Result<()>
where
    T: MediaTools,
    R: BufRead,
    W: Write,
{
    writeln!(console.output(), "{}", rule())?;
    writeln!(
        console.output(),
        "Video Splitter - Split video into N parts using FFmpeg"
    )?;
    writeln!(console.output(), "{}", rule())?;

    let mut known = first;
    loop {
        match prompt_split(console, std::mem::take(&mut known))? {
            Prompted::EndOfInput => return Ok(()),
            Prompted::Invalid(e) => writeln!(console.output(), "ERROR: {}", e)?,
            Prompted::Value(request) => {
                // The console answers overwrite questions, so the summary is
                // buffered and printed once the run has released it.
                let mut summary = Vec::new();
                match split_once(splitter, &request, console, progress, &mut summary, false) {
                    Ok(_) => console.output().write_all(&summary)?,
                    Err(e) => writeln!(console.output(), "ERROR: {}", e)?,
                }
            }
        }
        writeln!(console.output(), "\n{}\n", rule())?;
    }
}

/// Entry point for `media-tools split`; returns whether the run succeeded.
pub fn run_split<T: MediaTools>(splitter: &Splitter<T>, args: &SplitArgs) -> Result<bool> {
    let mut stderr = io::stderr();
    let (Some(input), Some(parts)) = (&args.input, args.parts) else {
        split_interactive(splitter, &mut Console::stdio(), &mut stderr, args.into())?;
        return Ok(true);
    };

    let request = SplitRequest {
        source: input.clone(),
        parts,
        output_dir: args.output_dir.clone(),
    };
    let mut stdout = io::stdout();
    if args.yes {
        split_once(splitter, &request, &mut AssumeAnswer(true), &mut stderr, &mut stdout, args.json)
    } else {
        split_once(splitter, &request, &mut Console::stdio(), &mut stderr, &mut stdout, args.json)
    }
}

/// Rename inputs already known before prompting
#[derive(Debug, Clone, Default)]
pub struct RenameInputs {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub start: Option<u64>,
}

impl From<&RenameArgs> for RenameInputs {
    fn from(args: &RenameArgs) -> Self {
        Self {
            dir: args.dir.clone(),
            prefix: args.prefix.clone(),
            start: args.start,
        }
    }
}

/// Ask for whatever the next rename job is still missing.
fn prompt_rename<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    known: RenameInputs,
) -> io::Result<Prompted<(PathBuf, String, u64)>> {
    let dir = match known.dir {
        Some(dir) => dir,
        None => {
            let Some(dir) =
                console.ask("Input the absolute path of target files (default to use current): ")?
            else {
                return Ok(Prompted::EndOfInput);
            };
            PathBuf::from(if dir.is_empty() { "." } else { dir.as_str() })
        }
    };

    let prefix = match known.prefix {
        Some(prefix) => prefix,
        None => {
            let Some(prefix) =
                console.ask("Input the name prefix you want (such as 'btn_menu_'): ")?
            else {
                return Ok(Prompted::EndOfInput);
            };
            prefix
        }
    };
    if prefix.is_empty() {
        return Ok(Prompted::Invalid(ValidationError::EmptyInput("The prefix")));
    }

    let start = match known.start {
        Some(start) => start,
        None => {
            let Some(start) =
                console.ask("Input the starting serial number (default to use '1'): ")?
            else {
                return Ok(Prompted::EndOfInput);
            };
            if start.is_empty() {
                1
            } else {
                match start.parse::<u64>() {
                    Ok(n) => n,
                    Err(_) => {
                        return Ok(Prompted::Invalid(ValidationError::NotAnInteger(
                            "The starting serial number",
                        )))
                    }
                }
            }
        }
    };

    Ok(Prompted::Value((dir, prefix, start)))
}

/// Plan and apply one rename; returns whether it ran to completion.
pub fn rename_once<W: Write + ?Sized>(
    dir: &std::path::Path,
    prefix: &str,
    start: u64,
    extension: Option<&str>,
    confirm: &mut dyn Confirm,
    out: &mut W,
) -> Result<bool> {
    let plan = plan_renames(dir, prefix, start, extension)?;
    match apply_renames(&plan, confirm) {
        RenameOutcome::Cancelled => {
            writeln!(out, "Operation cancelled")?;
            Ok(false)
        }
        RenameOutcome::Completed(report) => {
            write!(out, "{}", rename_summary(&report))?;
            Ok(true)
        }
    }
}

/// Prompt for rename jobs until end of input.
///
/// `first` pre-fills the first round; `extension` filters every round.
pub fn rename_interactive<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    first: RenameInputs,
    extension: Option<&str>,
) -> Result<()> {
    let mut known = first;
    loop {
        match prompt_rename(console, std::mem::take(&mut known))? {
            Prompted::EndOfInput => return Ok(()),
            Prompted::Invalid(e) => writeln!(console.output(), "ERROR: {}", e)?,
            Prompted::Value((dir, prefix, start)) => {
                let mut summary = Vec::new();
                match rename_once(&dir, &prefix, start, extension, console, &mut summary) {
                    Ok(_) => console.output().write_all(&summary)?,
                    Err(e) => writeln!(console.output(), "ERROR: {}", e)?,
                }
            }
        }
    }
}

/// Entry point for `media-tools rename`
pub fn run_rename(args: &RenameArgs) -> Result<bool> {
    let extension = args.extension.as_deref();
    let (Some(dir), Some(prefix)) = (&args.dir, &args.prefix) else {
        rename_interactive(&mut Console::stdio(), args.into(), extension)?;
        return Ok(true);
    };

    let start = args.start.unwrap_or(1);
    let mut stdout = io::stdout();
    if args.yes {
        rename_once(dir, prefix, start, extension, &mut AssumeAnswer(true), &mut stdout)
    } else {
        rename_once(dir, prefix, start, extension, &mut Console::stdio(), &mut stdout)
    }
}
