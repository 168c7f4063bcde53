//! Recognition orchestration
//!
//! Download → windows → slice → recognize → melt → persist. Collaborators are
//! injected as trait objects so the flow runs without network or audio I/O
//! in tests.
//!
//! A segment whose recognition fails, times out, or finds nothing becomes an
//! `Unknown`/`Unknown` record; only download, decode and persistence errors
//! abort a run.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{OutputConfig, RecognitionConfig};
use crate::download::Downloader;
use crate::error::{CoreError, PipelineError};
use crate::melt::melt;
use crate::model::{RecognitionRecord, Run};
use crate::recognizer::Recognizer;
use crate::segmentation::{segment_windows, SegmentWindow};

/// Source audio decoded and ready to be cut
pub trait LoadedAudio: Send + Sync {
    /// Length of the source in whole seconds
    fn duration_seconds(&self) -> u64;

    /// Write one file per window into `dest_dir`, in window order.
    /// Blocking; called from the blocking pool.
    fn write_segments(
        &self,
        windows: &[SegmentWindow],
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError>;
}

/// Audio segmentation collaborator
#[async_trait]
pub trait SegmentSlicer: Send + Sync {
    async fn load(&self, source: &Path) -> Result<Arc<dyn LoadedAudio>, PipelineError>;
}

/// Segment file removed when dropped
#[derive(Debug)]
pub struct SegmentArtifact {
    path: PathBuf,
}

impl SegmentArtifact {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SegmentArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub chunk_seconds: u64,
    pub recognition_timeout: Duration,
    pub concurrency: usize,
    /// Work directory; a temporary directory is used when unset
    pub work_dir: Option<PathBuf>,
    pub keep_download: bool,
    /// Also persist the raw per-segment track list here
    pub track_list_path: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&RecognitionConfig::default(), &OutputConfig::default())
    }
}

impl PipelineOptions {
    pub fn from_config(recognition: &RecognitionConfig, output: &OutputConfig) -> Self {
        Self {
            chunk_seconds: recognition.chunk_seconds,
            recognition_timeout: Duration::from_secs(recognition.timeout_secs),
            concurrency: recognition.concurrency.max(1),
            work_dir: recognition.work_dir.clone(),
            keep_download: recognition.keep_download,
            track_list_path: output.track_list_path.clone(),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub source_url: String,
    pub segments: usize,
    pub recognized: usize,
    pub setlist_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_list_path: Option<PathBuf>,
    pub runs: Vec<Run>,
}

/// Recognition orchestrator
pub struct Pipeline {
    downloader: Box<dyn Downloader>,
    slicer: Box<dyn SegmentSlicer>,
    recognizer: Box<dyn Recognizer>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        downloader: Box<dyn Downloader>,
        slicer: Box<dyn SegmentSlicer>,
        recognizer: Box<dyn Recognizer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            downloader,
            slicer,
            recognizer,
            options,
        }
    }

    /// Download `source_url`, recognize it segment by segment and write the
    /// melted setlist to `output_path`
    pub async fn run(&self, source_url: &str, output_path: &Path) -> Result<PipelineReport, PipelineError> {
        let temp_dir;
        let work_dir = match &self.options.work_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                dir.clone()
            }
            None => {
                temp_dir = tempfile::tempdir()?;
                temp_dir.path().to_path_buf()
            }
        };

        let source = self.downloader.download(source_url, &work_dir).await?;
        let records = self.recognize_file(&source, &work_dir).await;

        if !self.options.keep_download {
            if let Err(e) = tokio::fs::remove_file(&source).await {
                log::warn!("Failed to remove download {}: {}", source.display(), e);
            }
        }
        let records = records?;

        let runs = melt(&records);
        let entries: Vec<_> = runs.iter().map(Run::to_entry).collect();
        setlist_format::save_setlist(output_path, &entries)?;
        log::info!("Setlist with {} runs saved to {}", runs.len(), output_path.display());

        if let Some(track_list_path) = &self.options.track_list_path {
            let entries: Vec<_> = records.iter().map(RecognitionRecord::to_entry).collect();
            setlist_format::save_track_list(track_list_path, &entries)?;
            log::info!("Track list saved to {}", track_list_path.display());
        }

        Ok(PipelineReport {
            source_url: source_url.to_string(),
            segments: records.len(),
            recognized: records.iter().filter(|r| !r.is_unknown()).count(),
            setlist_path: output_path.to_path_buf(),
            track_list_path: self.options.track_list_path.clone(),
            runs,
        })
    }

    /// Recognize a local file, returning one record per window sorted by start
    pub async fn recognize_file(
        &self,
        source: &Path,
        work_dir: &Path,
    ) -> Result<Vec<RecognitionRecord>, PipelineError> {
        let audio = self.slicer.load(source).await?;
        let windows = segment_windows(audio.duration_seconds(), self.options.chunk_seconds)?;

        log::info!(
            "Segmenting {}s of audio into {} windows of {}s",
            audio.duration_seconds(),
            windows.len(),
            self.options.chunk_seconds
        );

        let paths = {
            let audio = Arc::clone(&audio);
            let windows = windows.clone();
            let dest_dir = work_dir.to_path_buf();
            tokio::task::spawn_blocking(move || audio.write_segments(&windows, &dest_dir))
                .await
                .map_err(|e| anyhow::anyhow!("Segment writer task failed: {}", e))?
        };

        let paths = match paths {
            Ok(paths) => paths,
            Err(e) => {
                remove_partial_segments(&windows, work_dir);
                return Err(e);
            }
        };
        let artifacts: Vec<SegmentArtifact> = paths.into_iter().map(SegmentArtifact::new).collect();

        if artifacts.len() != windows.len() {
            return Err(CoreError::InvalidRecord {
                index: artifacts.len().min(windows.len()),
                reason: format!(
                    "slicer produced {} segments for {} windows",
                    artifacts.len(),
                    windows.len()
                ),
            }
            .into());
        }

        let total = windows.len();
        let mut records: Vec<RecognitionRecord> = stream::iter(windows.into_iter().zip(artifacts))
            .map(|(window, artifact)| self.recognize_window(window, artifact, total))
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        records.sort_by_key(|r| r.segment_start);
        Ok(records)
    }

    async fn recognize_window(
        &self,
        window: SegmentWindow,
        artifact: SegmentArtifact,
        total: usize,
    ) -> RecognitionRecord {
        let source_path = artifact.path().display().to_string();
        log::info!("Processing segment {}/{}: {}", window.index + 1, total, source_path);

        let outcome = tokio::time::timeout(
            self.options.recognition_timeout,
            self.recognizer.recognize(artifact.path()),
        )
        .await;

        let record = match outcome {
            Ok(Ok(Some(recognition))) => {
                log::info!("Recognized: {} by {}", recognition.title, recognition.artist);
                RecognitionRecord::new(
                    window.start,
                    window.end,
                    recognition.title,
                    recognition.artist,
                    source_path,
                )
            }
            Ok(Ok(None)) => {
                log::info!("No match for segment {}s - {}s", window.start, window.end);
                RecognitionRecord::unknown(window.start, window.end, source_path)
            }
            Ok(Err(e)) => {
                log::warn!("Recognition failed for {}: {}", source_path, e);
                RecognitionRecord::unknown(window.start, window.end, source_path)
            }
            Err(_) => {
                log::warn!(
                    "Recognition timed out after {:?} for {}",
                    self.options.recognition_timeout,
                    source_path
                );
                RecognitionRecord::unknown(window.start, window.end, source_path)
            }
        };

        drop(artifact);
        record
    }
}

fn remove_partial_segments(windows: &[SegmentWindow], work_dir: &Path) {
    for window in windows {
        let path = work_dir.join(window.file_name());
        if path.exists() {
            drop(SegmentArtifact::new(path));
        }
    }
}

/// Melt a persisted raw track list into a setlist file
pub fn melt_track_list_file(track_list_path: &Path, setlist_path: &Path) -> Result<Vec<Run>, PipelineError> {
    let entries = setlist_format::load_track_list(track_list_path)?;
    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RecognitionRecord::from_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let runs = melt(&records);
    let setlist: Vec<_> = runs.iter().map(Run::to_entry).collect();
    setlist_format::save_setlist(setlist_path, &setlist)?;
    Ok(runs)
}
