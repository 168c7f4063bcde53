//! Source audio download
//!
//! [`YtDlpDownloader`] shells out to `yt-dlp`, which understands SoundCloud
//! URLs and handles stream selection and transcoding.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::PipelineError;

/// Fetches the audio behind a source URL into a local file
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, source_url: &str, dest_dir: &Path) -> Result<PathBuf, PipelineError>;
}

/// Downloader backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: String,
    format: Option<String>,
}

impl YtDlpDownloader {
    pub fn new(format: Option<String>) -> Self {
        Self {
            program: "yt-dlp".to_string(),
            format,
        }
    }

    /// Use a specific executable instead of `yt-dlp` from `PATH`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self, source_url: &str, output: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(format) = &self.format {
            args.push("--format".to_string());
            args.push(format.clone());
        }
        args.extend([
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "192K".to_string(),
            "--no-playlist".to_string(),
            "--output".to_string(),
            output.with_extension("%(ext)s").display().to_string(),
            source_url.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, source_url: &str, dest_dir: &Path) -> Result<PathBuf, PipelineError> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let output = dest_dir.join("track.mp3");

        log::info!("Downloading {} with {}", source_url, self.program);

        let result = Command::new(&self.program)
            .args(self.args(source_url, &output))
            .output()
            .await
            .map_err(|e| PipelineError::Download(format!("failed to run {}: {}", self.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PipelineError::Download(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(PipelineError::Download(format!(
                "{} finished but {} was not produced",
                self.program,
                output.display()
            )));
        }

        log::info!("Downloaded to {}", output.display());
        Ok(output)
    }
}
