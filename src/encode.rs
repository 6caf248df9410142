use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::EncodeError;

/// External encoder abstraction: combine a still image and an audio track
/// into a playable video file
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn encode(&self, slide: &Path, audio: &Path, output: &Path) -> Result<(), EncodeError>;
}

/// Encoder shelling out to ffmpeg.
///
/// Requires ffmpeg on PATH; see https://ffmpeg.org for installation.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: String,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Argument list for one encode run: loop the slide indefinitely, stop at
/// the end of the audio, H.264 video at constant quality, AAC audio.
fn ffmpeg_args(slide: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-loop".into(),
        "1".into(),
        "-i".into(),
        slide.into(),
        "-i".into(),
        audio.into(),
        "-shortest".into(),
    ];
    args.extend([
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-crf".into(),
        "18".into(),
    ]);
    args.push(output.into());
    args
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(&self, slide: &Path, audio: &Path, output: &Path) -> Result<(), EncodeError> {
        // ffmpeg's own output goes straight to the console so encoding
        // progress stays visible.
        let status = Command::new(&self.program)
            .args(ffmpeg_args(slide, audio, output))
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| EncodeError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(EncodeError::ExitStatus {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}
