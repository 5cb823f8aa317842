//! Pipeline execution tests against stub ffmpeg/ffprobe scripts on PATH.
//!
//! The stubs honor the tool contracts (ffprobe prints JSON, ffmpeg
//! writes its last argument) without transcoding anything, so the full
//! cut/concat flow and process lifetime can be exercised in CI.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;

use shorts_models::{Job, JobConfig, JobId, JobStatus, SegmentationMode, TimeRange};
use shorts_speech::{SpeechResult, Transcriber, Transcription};
use shorts_worker::{JobExecutor, JobStore, WorkerConfig};

// PATH is process-global; stub-using tests take this lock and restore
// PATH before releasing it.
static PATH_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn path_lock() -> std::sync::MutexGuard<'static, ()> {
    PATH_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

const FFPROBE_STUB: &str = concat!(
    "#!/bin/sh\n",
    "echo '{\"format\":{\"duration\":\"600.0\"},",
    "\"streams\":[{\"codec_type\":\"video\",\"codec_name\":\"h264\",",
    "\"width\":1920,\"height\":1080}]}'\n"
);

/// ffmpeg always receives the output path as its final argument.
const FFMPEG_TOUCH_STUB: &str = "#!/bin/sh\nfor a; do out=\"$a\"; done\n: > \"$out\"\n";

fn write_stub(dir: &Path, name: &str, script: &str) {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn prepend_path(dir: &Path) -> String {
    let old = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", dir.display(), old));
    old
}

struct NoSpeech;

#[async_trait]
impl Transcriber for NoSpeech {
    async fn transcribe(&self, _audio: &Path) -> SpeechResult<Transcription> {
        Ok(Transcription {
            language: "en".to_string(),
            segments: Vec::new(),
            words: Vec::new(),
        })
    }
}

async fn wait_terminal(store: &JobStore, id: &JobId) -> Job {
    for _ in 0..500 {
        if let Some(job) = store.get(id).await {
            if job.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job never reached a terminal state");
}

#[tokio::test]
async fn merge_job_concatenates_and_removes_part_files() {
    let _guard = path_lock();

    let bin = tempfile::tempdir().unwrap();
    write_stub(bin.path(), "ffprobe", FFPROBE_STUB);
    write_stub(bin.path(), "ffmpeg", FFMPEG_TOUCH_STUB);
    let old_path = prepend_path(bin.path());

    let dirs = tempfile::tempdir().unwrap();
    let video = dirs.path().join("source.mp4");
    fs::write(&video, b"").unwrap();

    let mut config = WorkerConfig::default();
    config.work_dir = dirs.path().join("work");
    config.output_dir = dirs.path().join("out");
    let work_dir = config.work_dir.clone();

    let executor = JobExecutor::new(config, Arc::new(NoSpeech));
    let mut submission = JobConfig::auto(&video);
    submission.mode = SegmentationMode::Merge;
    submission.merge_ranges = vec![
        TimeRange::new("00:10", "00:20"),
        TimeRange::new("01:00", "01:05"),
    ];

    let id = executor.submit(submission).await;
    let job = wait_terminal(&executor.store(), &id).await;

    std::env::set_var("PATH", old_path);

    assert_eq!(job.status, JobStatus::Completed, "error: {:?}", job.error);

    // Two sub-ranges reduce to exactly one output clip
    assert_eq!(job.output_files.len(), 1);
    let output = &job.output_files[0];
    assert!(output.ends_with(format!("{}_clip_1.mp4", id)), "got {:?}", output);
    assert!(output.exists());

    // Temporary segment files are deleted after the concat
    let leftovers: Vec<String> = fs::read_dir(&work_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.contains("_part_"))
        .collect();
    assert!(leftovers.is_empty(), "leftover part files: {:?}", leftovers);
}

#[tokio::test]
async fn job_timeout_kills_the_inflight_ffmpeg() {
    let _guard = path_lock();

    let bin = tempfile::tempdir().unwrap();
    write_stub(bin.path(), "ffprobe", FFPROBE_STUB);
    // An ffmpeg that outlives the job timeout and records whether it
    // was ever allowed to finish.
    let marker = bin.path().join("survived");
    write_stub(
        bin.path(),
        "ffmpeg",
        &format!("#!/bin/sh\nsleep 2\n: > \"{}\"\n", marker.display()),
    );
    let old_path = prepend_path(bin.path());

    let dirs = tempfile::tempdir().unwrap();
    let video = dirs.path().join("source.mp4");
    fs::write(&video, b"").unwrap();

    let mut config = WorkerConfig::default();
    config.work_dir = dirs.path().join("work");
    config.output_dir = dirs.path().join("out");
    config.job_timeout = Duration::from_millis(300);

    let executor = JobExecutor::new(config, Arc::new(NoSpeech));
    let id = executor.submit(JobConfig::auto(&video)).await;
    let job = wait_terminal(&executor.store(), &id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().starts_with("cancelled:"));

    // Past the point where an orphaned child would have finished
    tokio::time::sleep(Duration::from_millis(2500)).await;
    std::env::set_var("PATH", old_path);

    assert!(!marker.exists(), "ffmpeg child outlived the timed-out job");
}
