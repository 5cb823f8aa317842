//! The per-job processing pipeline.
//!
//! A job reduces to a sequence of work units. Each unit holds one or
//! more source sub-ranges and produces exactly one base clip: a single
//! range is cut directly, several ranges are cut and concatenated.
//! After the base clip exists, upscaling and captioning apply the same
//! way regardless of how it was produced.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use shorts_media::{
    burn_subtitles, concat_clips, cut_clip, extract_audio, probe_video, upscale_to_4k,
    FfmpegRunner, UPSCALE_HEIGHT,
};
use shorts_models::{plan_clips, ClipPlan, JobConfig, JobId, JobStatus};
use shorts_speech::{chunk_words, chunks_from_segments, write_srt, Transcriber};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::store::JobStore;

/// Caption font size at 1080p output height.
const FONT_SIZE_BASE: u32 = 26;
const BASE_HEIGHT: u32 = 1080;

/// Shared state the pipeline needs for every job.
pub struct PipelineContext {
    pub config: WorkerConfig,
    pub store: JobStore,
    pub runner: FfmpegRunner,
    pub transcriber: Arc<dyn Transcriber>,
}

/// One unit of work: the sub-ranges that reduce to one base clip.
#[derive(Debug, Clone, PartialEq)]
struct WorkUnit {
    /// 1-based clip number
    index: usize,
    /// Total clips in the job
    total: usize,
    /// Source sub-ranges in seconds; more than one means concatenation
    ranges: Vec<(f64, f64)>,
}

fn work_units(plan: &ClipPlan) -> Vec<WorkUnit> {
    match plan {
        ClipPlan::Clips(specs) => {
            let total = specs.len();
            specs
                .iter()
                .map(|spec| WorkUnit {
                    index: spec.index,
                    total,
                    ranges: vec![(spec.start, spec.end)],
                })
                .collect()
        }
        ClipPlan::Merge(ranges) => vec![WorkUnit {
            index: 1,
            total: 1,
            ranges: ranges.clone(),
        }],
    }
}

/// Scale the caption font with the output height so burned text takes
/// up the same fraction of the frame at any resolution.
pub fn caption_font_size(output_height: u32) -> u32 {
    if output_height == 0 {
        return FONT_SIZE_BASE;
    }
    FONT_SIZE_BASE * output_height / BASE_HEIGHT
}

/// Run one job to completion.
///
/// The caller owns failure handling: any error returned here must be
/// turned into a `failed` status on the store.
pub async fn run_job(ctx: &PipelineContext, job_id: &JobId) -> WorkerResult<()> {
    let logger = JobLogger::new(job_id, "process_job");

    let job = ctx
        .store
        .get(job_id)
        .await
        .ok_or_else(|| WorkerError::invalid_input(format!("unknown job: {}", job_id)))?;
    let config = job.config;

    ctx.store.set_status(job_id, JobStatus::Processing).await;
    logger.log_start(&format!("processing {}", config.video_path.display()));

    if !config.video_path.exists() {
        return Err(WorkerError::invalid_input(format!(
            "video not found: {}",
            config.video_path.display()
        )));
    }

    let info = probe_video(&config.video_path).await?;
    if info.duration <= 0.0 {
        return Err(WorkerError::invalid_input(
            "could not determine video duration",
        ));
    }

    let plan = plan_clips(info.duration, &config)?;
    if plan.is_empty() {
        return Err(WorkerError::invalid_input(
            "segmentation produced no clips",
        ));
    }

    tokio::fs::create_dir_all(&ctx.config.work_dir).await?;
    tokio::fs::create_dir_all(&ctx.config.output_dir).await?;

    let units = work_units(&plan);
    for unit in &units {
        let output = process_unit(ctx, job_id, &config, unit, info.height, &logger).await?;
        ctx.store.push_output(job_id, output).await;
    }

    ctx.store.complete(job_id).await;
    logger.log_completion(&format!("{} clip(s) produced", units.len()));
    Ok(())
}

/// Produce one finished clip: cut (or cut-and-concat), then optionally
/// upscale, then optionally caption. Returns the path of the final
/// artifact for this unit.
async fn process_unit(
    ctx: &PipelineContext,
    job_id: &JobId,
    config: &JobConfig,
    unit: &WorkUnit,
    source_height: u32,
    logger: &JobLogger,
) -> WorkerResult<PathBuf> {
    ctx.store
        .set_status(
            job_id,
            JobStatus::Cutting {
                current: unit.index,
                total: unit.total,
            },
        )
        .await;

    let base = ctx
        .config
        .output_dir
        .join(format!("{}_clip_{}.mp4", job_id, unit.index));

    if let [(start, end)] = unit.ranges[..] {
        cut_clip(&ctx.runner, &config.video_path, &base, start, end).await?;
    } else {
        let mut parts = Vec::with_capacity(unit.ranges.len());
        for (k, &(start, end)) in unit.ranges.iter().enumerate() {
            let part = ctx
                .config
                .work_dir
                .join(format!("{}_part_{}.mp4", job_id, k + 1));
            cut_clip(&ctx.runner, &config.video_path, &part, start, end).await?;
            parts.push(part);
        }
        concat_clips(&ctx.runner, &parts, &base).await?;
        for part in &parts {
            remove_quietly(part).await;
        }
    }
    logger.log_progress(&format!("cut clip {}/{}", unit.index, unit.total));

    let mut current = base;
    let mut output_height = source_height;

    if config.enhance_4k {
        ctx.store
            .set_status(
                job_id,
                JobStatus::Upscaling {
                    current: unit.index,
                },
            )
            .await;
        let upscaled = with_name_suffix(&current, "_4k");
        upscale_to_4k(&ctx.runner, &current, &upscaled).await?;
        remove_quietly(&current).await;
        current = upscaled;
        output_height = UPSCALE_HEIGHT;
        logger.log_progress(&format!("upscaled clip {}", unit.index));
    }

    if config.captions {
        ctx.store
            .set_status(
                job_id,
                JobStatus::Transcribing {
                    current: unit.index,
                },
            )
            .await;
        current = caption_clip(ctx, job_id, unit, &current, output_height, logger).await?;
    }

    Ok(current)
}

/// Transcribe a clip and burn karaoke captions into it.
///
/// A clip with no detectable speech is passed through unchanged.
async fn caption_clip(
    ctx: &PipelineContext,
    job_id: &JobId,
    unit: &WorkUnit,
    clip: &Path,
    output_height: u32,
    logger: &JobLogger,
) -> WorkerResult<PathBuf> {
    let audio = ctx
        .config
        .work_dir
        .join(format!("{}_clip_{}.wav", job_id, unit.index));
    extract_audio(&ctx.runner, clip, &audio).await?;

    let transcription = ctx.transcriber.transcribe(&audio).await;
    remove_quietly(&audio).await;
    let transcription = transcription?;

    let chunks = if transcription.has_word_timestamps() {
        chunk_words(&transcription.words, &ctx.config.chunk_policy)
    } else {
        logger.log_warning("no word timestamps in transcript, using segment granularity");
        chunks_from_segments(&transcription.segments)
    };

    if chunks.is_empty() {
        logger.log_progress(&format!(
            "no speech detected in clip {}, skipping caption burn-in",
            unit.index
        ));
        return Ok(clip.to_path_buf());
    }

    let srt = ctx
        .config
        .work_dir
        .join(format!("{}_clip_{}.srt", job_id, unit.index));
    write_srt(&chunks, &srt).await?;

    let captioned = with_name_suffix(clip, "_captioned");
    let burn = burn_subtitles(
        &ctx.runner,
        clip,
        &srt,
        &captioned,
        caption_font_size(output_height),
    )
    .await;
    remove_quietly(&srt).await;
    burn?;
    remove_quietly(clip).await;

    logger.log_progress(&format!(
        "burned {} caption chunks into clip {}",
        chunks.len(),
        unit.index
    ));
    Ok(captioned)
}

/// `/a/b/clip_1.mp4` + `"_4k"` -> `/a/b/clip_1_4k.mp4`.
fn with_name_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(format!("{}{}{}", stem, suffix, ext))
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove intermediate file {}: {}", path.display(), e);
    }
}
