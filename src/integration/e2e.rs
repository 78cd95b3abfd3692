//! End-to-end split runs against scripted tools

use crate::error::{MediaToolsError, ProbeError};
use crate::ffmpeg::FfmpegTools;
use crate::integration::fixtures::{process_lock, FakeToolbox, ProbeBehavior};
use crate::splitter::{SegmentStatus, SplitEvent, SplitRequest, Splitter};

fn request(toolbox: &FakeToolbox, parts: i64) -> SplitRequest {
    SplitRequest {
        source: toolbox.source.clone(),
        parts,
        output_dir: None,
    }
}

fn no_overwrite(q: &str) -> bool {
    panic!("unexpected confirmation: {}", q)
}

#[test]
fn test_split_with_scripted_tools() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Prints("120.000000"), None);
    let splitter = Splitter::new(FfmpegTools::new(&toolbox.tools));

    let mut times = Vec::new();
    let report = splitter
        .run(&request(&toolbox, 4), &mut no_overwrite, &mut |e| {
            if let SplitEvent::Progress(p) = e {
                times.push((p.part, p.time_secs));
            }
        })
        .unwrap();

    assert_eq!(report.success_count(), 4);
    assert_eq!(report.duration.as_secs(), 120.0);
    assert_eq!(report.outputs.len(), 4);
    assert!(report.outputs.iter().all(|o| o.size_bytes == 12));

    // two carriage-return separated progress lines per part
    assert_eq!(times.len(), 8);
    assert_eq!(times[0], (1, Some(1.0)));
    assert_eq!(times[7], (4, Some(2.0)));

    let calls = toolbox.ffmpeg_calls();
    assert_eq!(calls.len(), 4);
    let part2 = toolbox.dir.path().join("clip_part02.mp4");
    assert_eq!(
        calls[1],
        format!(
            "-y -ss 30 -i {} -t 30 -c copy -avoid_negative_ts 1 {}",
            toolbox.source.display(),
            part2.display()
        )
    );
    assert!(calls[3].starts_with("-y -ss 90 "));
}

#[test]
fn test_failing_part_does_not_stop_run() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Prints("120.0"), Some("part03"));
    let splitter = Splitter::new(FfmpegTools::new(&toolbox.tools));

    let report = splitter
        .run(&request(&toolbox, 4), &mut no_overwrite, &mut |_| {})
        .unwrap();

    assert_eq!(report.success_count(), 3);
    assert_eq!(report.results[2].status, SegmentStatus::Failed);
    assert_eq!(
        report.results[2].detail.as_deref(),
        Some("external tool error (exit status 1)")
    );
    assert_eq!(report.results[3].status, SegmentStatus::Success);
    assert_eq!(toolbox.ffmpeg_calls().len(), 4);
}

#[test]
fn test_existing_part_declined() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Prints("40"), None);
    std::fs::write(toolbox.dir.path().join("clip_part02.mp4"), b"old").unwrap();
    let splitter = Splitter::new(FfmpegTools::new(&toolbox.tools));

    let report = splitter
        .run(&request(&toolbox, 4), &mut |_: &str| false, &mut |_| {})
        .unwrap();

    assert_eq!(report.results[1].status, SegmentStatus::Skipped);
    assert_eq!(report.results[1].detail.as_deref(), Some("File already exists"));
    assert_eq!(toolbox.ffmpeg_calls().len(), 3);
}

#[test]
fn test_probe_failure_is_fatal() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Fails, None);
    let splitter = Splitter::new(FfmpegTools::new(&toolbox.tools));

    let err = splitter
        .run(&request(&toolbox, 4), &mut no_overwrite, &mut |_| {})
        .unwrap_err();

    match err {
        MediaToolsError::Probe(ProbeError::ToolFailed { stderr, .. }) => {
            assert!(stderr.contains("Invalid data found"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(toolbox.ffmpeg_calls().is_empty());
}

#[test]
fn test_unparseable_probe_output() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Prints("N/A"), None);
    let splitter = Splitter::new(FfmpegTools::new(&toolbox.tools));

    let err = splitter
        .run(&request(&toolbox, 2), &mut no_overwrite, &mut |_| {})
        .unwrap_err();

    assert!(matches!(
        err,
        MediaToolsError::Probe(ProbeError::Unparseable(_))
    ));
    assert!(toolbox.ffmpeg_calls().is_empty());
}

#[test]
fn test_missing_binaries() {
    let _guard = process_lock();
    let toolbox = FakeToolbox::new(ProbeBehavior::Prints("10"), None);

    let mut tools = toolbox.tools.clone();
    tools.ffmpeg = toolbox.dir.path().join("no-such-ffmpeg");
    let err = Splitter::new(FfmpegTools::new(&tools))
        .run(&request(&toolbox, 2), &mut no_overwrite, &mut |_| {})
        .unwrap_err();
    assert!(matches!(err, MediaToolsError::ToolMissing { .. }));

    let mut tools = toolbox.tools.clone();
    tools.ffprobe = toolbox.dir.path().join("no-such-ffprobe");
    let err = Splitter::new(FfmpegTools::new(&tools))
        .run(&request(&toolbox, 2), &mut no_overwrite, &mut |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        MediaToolsError::Probe(ProbeError::ToolMissing(_))
    ));
}
