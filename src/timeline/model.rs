use crate::foundation::core::{Pos, Size, check_trim, check_window};
use crate::foundation::error::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A complete timeline project.
///
/// A project is a pure data model that can be:
/// - built programmatically (see [`crate::ProjectBuilder`])
/// - serialized/deserialized via Serde (JSON)
///
/// Compiling a project into an `ffmpeg` invocation is done by [`crate::Translator`].
pub struct Project {
    /// Output canvas size.
    pub size: Size,
    /// Output frame rate, must be > 0.
    pub fps: f64,
    /// Tracks in declaration order. Layering is decided by [`Track::z`], not by position here.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Project {
    /// Parse a project from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse project JSON: {e}")))
    }

    /// Parse a project from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::serde(format!("open project JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReelError::serde(format!("serialize project JSON: {e}")))
    }

    /// Check project-level invariants (canvas and frame rate).
    pub fn validate_header(&self) -> ReelResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ReelError::invalid_input(format!(
                "project fps must be > 0, got {}",
                self.fps
            )));
        }
        if !self.size.is_specified() {
            return Err(ReelError::invalid_input(
                "project canvas width/height must be set",
            ));
        }
        self.size
            .validate("canvas")
            .map_err(|e| ReelError::invalid_input(e.to_string()))
    }

    /// Check every invariant, including per-node ones.
    ///
    /// Node failures are reported as [`ReelError::TrackTranslation`] naming the track.
    pub fn validate(&self) -> ReelResult<()> {
        self.validate_header()?;
        for track in &self.tracks {
            track
                .validate()
                .map_err(|e| ReelError::track(track.name(), e))?;
        }
        Ok(())
    }

    /// Latest destination end across all nodes, in seconds (0 for an empty project).
    pub fn duration_secs(&self) -> f64 {
        self.tracks
            .iter()
            .map(Track::end_secs)
            .fold(0.0, f64::max)
    }

    /// Return `true` when at least one video track is declared.
    pub fn has_video_track(&self) -> bool {
        self.tracks.iter().any(|t| matches!(t, Track::Video(_)))
    }
}

/// One layer of the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Track {
    /// Video clips read from files.
    Video(VideoTrack),
    /// Audio clips read from files.
    Audio(AudioTrack),
    /// Still images held for a time window.
    Image(ImageTrack),
    /// Text drawn on top of whatever lies below.
    Text(TextTrack),
}

impl Track {
    /// Display name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Track::Video(t) => &t.name,
            Track::Audio(t) => &t.name,
            Track::Image(t) => &t.name,
            Track::Text(t) => &t.name,
        }
    }

    /// Layering key; higher values composite on top.
    pub fn z(&self) -> i32 {
        match self {
            Track::Video(t) => t.z,
            Track::Audio(t) => t.z,
            Track::Image(t) => t.z,
            Track::Text(t) => t.z,
        }
    }

    /// Short lowercase kind name (`video`, `audio`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Track::Video(_) => "video",
            Track::Audio(_) => "audio",
            Track::Image(_) => "image",
            Track::Text(_) => "text",
        }
    }

    /// Number of nodes in the track.
    pub fn len(&self) -> usize {
        match self {
            Track::Video(t) => t.clips.len(),
            Track::Audio(t) => t.clips.len(),
            Track::Image(t) => t.images.len(),
            Track::Text(t) => t.texts.len(),
        }
    }

    /// Return `true` when the track has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check per-node invariants.
    pub fn validate(&self) -> ReelResult<()> {
        match self {
            Track::Video(t) => t.clips.iter().try_for_each(VideoNode::validate),
            Track::Audio(t) => t.clips.iter().try_for_each(AudioNode::validate),
            Track::Image(t) => t.images.iter().try_for_each(ImageNode::validate),
            Track::Text(t) => t.texts.iter().try_for_each(TextNode::validate),
        }
    }

    fn end_secs(&self) -> f64 {
        let ends: Box<dyn Iterator<Item = f64> + '_> = match self {
            Track::Video(t) => Box::new(t.clips.iter().map(|n| n.end)),
            Track::Audio(t) => Box::new(t.clips.iter().map(|n| n.end)),
            Track::Image(t) => Box::new(t.images.iter().map(|n| n.end)),
            Track::Text(t) => Box::new(t.texts.iter().map(|n| n.end)),
        };
        ends.fold(0.0, f64::max)
    }
}

/// Track of video clips.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoTrack {
    /// Track name for authoring/debugging.
    pub name: String,
    /// Layering key.
    #[serde(default)]
    pub z: i32,
    /// Clips in declaration order.
    #[serde(default)]
    pub clips: Vec<VideoNode>,
}

/// Track of audio clips.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Track name for authoring/debugging.
    pub name: String,
    /// Layering key.
    #[serde(default)]
    pub z: i32,
    /// Clips in declaration order.
    #[serde(default)]
    pub clips: Vec<AudioNode>,
}

/// Track of still images.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageTrack {
    /// Track name for authoring/debugging.
    pub name: String,
    /// Layering key.
    #[serde(default)]
    pub z: i32,
    /// Images in declaration order.
    #[serde(default)]
    pub images: Vec<ImageNode>,
}

/// Track of text overlays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTrack {
    /// Track name for authoring/debugging.
    pub name: String,
    /// Layering key.
    #[serde(default)]
    pub z: i32,
    /// Text items in declaration order.
    #[serde(default)]
    pub texts: Vec<TextNode>,
}

/// A trimmed, placed and optionally scaled piece of a video file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoNode {
    /// Node identity.
    pub id: String,
    /// Source file path.
    pub path: String,
    /// Source trim start in seconds.
    #[serde(default)]
    pub src_start: f64,
    /// Source trim end in seconds; `None` reads to the end of the source.
    #[serde(default)]
    pub src_end: Option<f64>,
    /// Destination start on the output timeline.
    #[serde(default)]
    pub start: f64,
    /// Destination end on the output timeline.
    #[serde(default)]
    pub end: f64,
    /// Top-left placement on the canvas.
    #[serde(default)]
    pub pos: Pos,
    /// Output size; `None` keeps the source size.
    #[serde(default)]
    pub size: Option<Size>,
}

impl VideoNode {
    /// Return `true` when a source trim window is set.
    pub fn has_trim(&self) -> bool {
        self.src_start > 0.0 || self.src_end.is_some()
    }

    fn validate(&self) -> ReelResult<()> {
        let what = format!("video clip '{}'", self.id);
        if self.path.is_empty() {
            return Err(ReelError::validation(format!("{what} has an empty path")));
        }
        check_trim(self.src_start, self.src_end, &what)?;
        check_window(self.start, self.end, &what)?;
        if let Some(size) = &self.size {
            size.validate(&what)?;
        }
        Ok(())
    }
}

/// A still image shown over a destination window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Node identity.
    pub id: String,
    /// Source file path.
    pub path: String,
    /// Destination start on the output timeline.
    #[serde(default)]
    pub start: f64,
    /// Destination end on the output timeline.
    #[serde(default)]
    pub end: f64,
    /// Top-left placement on the canvas.
    #[serde(default)]
    pub pos: Pos,
    /// Output size; `None` keeps the source size.
    #[serde(default)]
    pub size: Option<Size>,
}

impl ImageNode {
    /// Destination window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    fn validate(&self) -> ReelResult<()> {
        let what = format!("image '{}'", self.id);
        if self.path.is_empty() {
            return Err(ReelError::validation(format!("{what} has an empty path")));
        }
        check_window(self.start, self.end, &what)?;
        if let Some(size) = &self.size {
            size.validate(&what)?;
        }
        Ok(())
    }
}

/// A trimmed piece of an audio file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioNode {
    /// Node identity.
    pub id: String,
    /// Source file path.
    pub path: String,
    /// Source trim start in seconds.
    #[serde(default)]
    pub src_start: f64,
    /// Source trim end in seconds; `None` reads to the end of the source.
    #[serde(default)]
    pub src_end: Option<f64>,
    /// Destination start on the output timeline.
    #[serde(default)]
    pub start: f64,
    /// Destination end on the output timeline.
    #[serde(default)]
    pub end: f64,
    /// Linear gain, 1.0 leaves the signal unchanged.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Repeat the source until the destination window is filled.
    #[serde(default)]
    pub looped: bool,
}

fn default_volume() -> f64 {
    1.0
}

impl Default for AudioNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            path: String::new(),
            src_start: 0.0,
            src_end: None,
            start: 0.0,
            end: 0.0,
            volume: default_volume(),
            looped: false,
        }
    }
}

impl AudioNode {
    /// The closed trim window `(start, duration)`, if the source end is set.
    pub fn closed_trim(&self) -> Option<(f64, f64)> {
        match self.src_end {
            Some(end) if end > 0.0 => Some((self.src_start, end - self.src_start)),
            _ => None,
        }
    }

    fn validate(&self) -> ReelResult<()> {
        let what = format!("audio clip '{}'", self.id);
        if self.path.is_empty() {
            return Err(ReelError::validation(format!("{what} has an empty path")));
        }
        check_trim(self.src_start, self.src_end, &what)?;
        check_window(self.start, self.end, &what)?;
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(ReelError::validation(format!(
                "{what} volume must be >= 0, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

/// Literal text drawn at an absolute position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    /// Node identity.
    pub id: String,
    /// Text to draw.
    pub content: String,
    /// Destination start on the output timeline.
    #[serde(default)]
    pub start: f64,
    /// Destination end on the output timeline.
    #[serde(default)]
    pub end: f64,
    /// Anchor position; see [`TextAlign`] for how x is interpreted.
    #[serde(default)]
    pub pos: Pos,
    /// Font and color.
    #[serde(default)]
    pub style: TextStyle,
}

impl TextNode {
    fn validate(&self) -> ReelResult<()> {
        let what = format!("text '{}'", self.id);
        check_window(self.start, self.end, &what)?;
        if !self.style.size.is_finite() || self.style.size <= 0.0 {
            return Err(ReelError::validation(format!(
                "{what} font size must be > 0, got {}",
                self.style.size
            )));
        }
        Ok(())
    }
}

/// Text appearance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family; `None` leaves the tool default.
    #[serde(default)]
    pub font: Option<String>,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub size: f64,
    /// Color name or `#rrggbb`; `None` leaves the tool default.
    #[serde(default)]
    pub color: Option<String>,
    /// Horizontal alignment relative to `pos.x`.
    #[serde(default)]
    pub align: TextAlign,
}

fn default_font_size() -> f64 {
    24.0
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: None,
            size: default_font_size(),
            color: None,
            align: TextAlign::Left,
        }
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// `pos.x` is the left edge.
    #[default]
    Left,
    /// `pos.x` is the horizontal center.
    Center,
    /// `pos.x` is the right edge.
    Right,
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
