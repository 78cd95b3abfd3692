//! Console rendering of split progress and run summaries

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::rename::RenameReport;
use crate::splitter::{SegmentStatus, SplitEvent, SplitReport};

const RULE_WIDTH: usize = 60;

/// Horizontal rule used around banners and summaries
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Seconds as `HH:MM:SS.mmm`; hours are not wrapped at 24.
pub fn format_timestamp(secs: f64) -> String {
    let delta = chrono::Duration::milliseconds((secs * 1000.0).round() as i64);
    let millis = delta - chrono::Duration::seconds(delta.num_seconds());
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        delta.num_hours(),
        delta.num_minutes() % 60,
        delta.num_seconds() % 60,
        millis.num_milliseconds()
    )
}

/// Write one splitter event to `out`.
///
/// Progress lines overwrite each other with a carriage return.
pub fn render_event<W: Write + ?Sized>(out: &mut W, event: &SplitEvent) -> io::Result<()> {
    match event {
        SplitEvent::Probed {
            duration,
            parts,
            segment_length,
        } => {
            writeln!(
                out,
                "Video duration: {:.2} seconds ({})",
                duration.as_secs(),
                format_timestamp(duration.as_secs())
            )?;
            writeln!(
                out,
                "Each segment will be approximately {:.2} seconds",
                segment_length
            )?;
            writeln!(out, "\nSplitting video into {} parts...", parts)?;
        }
        SplitEvent::SegmentStarted { part, total, .. } => {
            writeln!(out, "Creating part {}/{}...", part, total)?;
        }
        SplitEvent::Progress(p) => {
            write!(out, "\rPart {}/{} - {}", p.part, p.total, p.line)?;
        }
        SplitEvent::SegmentFinished(result) => match result.status {
            SegmentStatus::Success => writeln!(
                out,
                "\n✓ Part {} created: {}",
                result.segment_index,
                result.output_path.display()
            )?,
            SegmentStatus::Failed => writeln!(
                out,
                "\n✗ Part {} failed: {}",
                result.segment_index,
                result.detail.as_deref().unwrap_or("unknown error")
            )?,
            SegmentStatus::Skipped => {
                writeln!(out, "Skipping segment {}", result.segment_index)?
            }
        },
    }
    out.flush()
}

/// Final summary of a split run
pub fn split_summary(report: &SplitReport) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{}", rule());
    let _ = writeln!(
        s,
        "Splitting completed: {}/{} parts created",
        report.success_count(),
        report.parts
    );

    let mut problems = report.problems().peekable();
    if problems.peek().is_some() {
        let _ = writeln!(s, "\nFailed segments:");
        for result in problems {
            let _ = writeln!(
                s,
                "  Part {}: {}",
                result.segment_index,
                result.detail.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if report.is_success() {
        let _ = writeln!(s, "\nOutput directory: {}", report.output_dir.display());
        for output in &report.outputs {
            let _ = writeln!(s, "  {}: {:.2} MB", output.file_name, output.size_mb());
        }
    }
    s
}

/// Final summary of a rename run
pub fn rename_summary(report: &RenameReport) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Renaming completed {}/{}", report.renamed, report.total);
    for failure in &report.failures {
        let _ = writeln!(
            s,
            "Failed to rename '{}': {}",
            failure.old_name, failure.reason
        );
    }
    s
}
