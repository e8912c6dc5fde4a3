use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::command::Command;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Encoder speed/quality preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Slow preset, low CRF, 320k audio.
    High,
    /// Balanced defaults.
    #[default]
    Medium,
    /// Fastest preset, high CRF, 128k audio.
    Low,
}

impl Quality {
    /// Video and audio codec flags for this preset.
    pub fn codec_args(self) -> [&'static str; 10] {
        let (preset, crf, audio_bitrate) = match self {
            Quality::High => ("slow", "18", "320k"),
            Quality::Medium => ("medium", "23", "192k"),
            Quality::Low => ("ultrafast", "28", "128k"),
        };
        [
            "-c:v",
            "libx264",
            "-preset",
            preset,
            "-crf",
            crf,
            "-c:a",
            "aac",
            "-b:a",
            audio_bitrate,
        ]
    }
}

impl FromStr for Quality {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            "low" => Ok(Quality::Low),
            other => Err(ReelError::validation(format!(
                "unknown quality '{other}' (expected high, medium or low)"
            ))),
        }
    }
}

/// Output container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// MPEG-4 Part 14.
    #[default]
    Mp4,
    /// Audio Video Interleave.
    Avi,
    /// QuickTime.
    Mov,
}

impl Format {
    /// Muxer name passed to `-f`.
    pub fn muxer(self) -> &'static str {
        match self {
            Format::Mp4 => "mp4",
            Format::Avi => "avi",
            Format::Mov => "mov",
        }
    }
}

impl FromStr for Format {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(Format::Mp4),
            "avi" => Ok(Format::Avi),
            "mov" => Ok(Format::Mov),
            other => Err(ReelError::validation(format!(
                "unknown format '{other}' (expected mp4, avi or mov)"
            ))),
        }
    }
}

/// Caller-facing render configuration.
///
/// Only `output_path`, `quality` and `format` shape the command; `dry_run` and `verbose` are
/// consumed by the executor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Destination file.
    pub output_path: PathBuf,
    /// Assemble and log the command without spawning `ffmpeg`.
    pub dry_run: bool,
    /// Echo the command and the process output.
    pub verbose: bool,
    /// Encoder preset.
    pub quality: Quality,
    /// Container format.
    pub format: Format,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output.mp4"),
            dry_run: false,
            verbose: false,
            quality: Quality::default(),
            format: Format::default(),
        }
    }
}

impl RenderOptions {
    /// Default options writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Codec flags followed by the container flag.
    pub fn codec_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .quality
            .codec_args()
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push("-f".to_string());
        args.push(self.format.muxer().to_string());
        args
    }

    /// Replace whatever outputs `cmd` has with the single destination these options describe.
    ///
    /// Calling this repeatedly leaves exactly one output.
    pub fn configure_output(&self, cmd: &mut Command) -> ReelResult<()> {
        let path = self.output_path.to_str().ok_or_else(|| {
            ReelError::validation(format!(
                "output path '{}' is not valid UTF-8",
                self.output_path.display()
            ))
        })?;
        if path.is_empty() {
            return Err(ReelError::validation("output path must be non-empty"));
        }
        cmd.clear_outputs();
        cmd.add_output(path, self.codec_args());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/options.rs"]
mod tests;
