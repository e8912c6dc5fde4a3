use crate::foundation::core::{Pos, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::model::{
    AudioNode, AudioTrack, ImageNode, ImageTrack, Project, TextAlign, TextNode, TextTrack, Track,
    VideoNode, VideoTrack,
};

/// Builder for [`Project`](crate::Project).
pub struct ProjectBuilder {
    size: Size,
    fps: f64,
    tracks: Vec<Track>,
}

impl ProjectBuilder {
    /// Create a builder for a new project.
    pub fn new(size: Size, fps: f64) -> Self {
        Self {
            size,
            fps,
            tracks: Vec::new(),
        }
    }

    /// Append a track. Declaration order only matters between tracks with equal `z`.
    pub fn track(mut self, track: impl Into<Track>) -> Self {
        self.tracks.push(track.into());
        self
    }

    /// Build and validate the final [`Project`](crate::Project).
    pub fn build(self) -> ReelResult<Project> {
        if let Some(dup) = first_duplicate(self.tracks.iter().map(Track::name)) {
            return Err(ReelError::validation(format!(
                "duplicate track name '{dup}'"
            )));
        }
        let project = Project {
            size: self.size,
            fps: self.fps,
            tracks: self.tracks,
        };
        project.validate()?;
        Ok(project)
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::BTreeSet::new();
    names.into_iter().find(|n| !seen.insert(*n))
}

macro_rules! impl_into_track {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Track {
                fn from(t: $ty) -> Self {
                    Track::$variant(t)
                }
            }
        )*
    };
}

impl_into_track!(
    VideoTrack => Video,
    AudioTrack => Audio,
    ImageTrack => Image,
    TextTrack => Text,
);

impl VideoTrack {
    /// Create an empty video track.
    pub fn new(name: impl Into<String>, z: i32) -> Self {
        Self {
            name: name.into(),
            z,
            clips: Vec::new(),
        }
    }

    /// Append a clip.
    pub fn clip(mut self, clip: VideoNode) -> Self {
        self.clips.push(clip);
        self
    }
}

impl AudioTrack {
    /// Create an empty audio track.
    pub fn new(name: impl Into<String>, z: i32) -> Self {
        Self {
            name: name.into(),
            z,
            clips: Vec::new(),
        }
    }

    /// Append a clip.
    pub fn clip(mut self, clip: AudioNode) -> Self {
        self.clips.push(clip);
        self
    }
}

impl ImageTrack {
    /// Create an empty image track.
    pub fn new(name: impl Into<String>, z: i32) -> Self {
        Self {
            name: name.into(),
            z,
            images: Vec::new(),
        }
    }

    /// Append an image.
    pub fn image(mut self, image: ImageNode) -> Self {
        self.images.push(image);
        self
    }
}

impl TextTrack {
    /// Create an empty text track.
    pub fn new(name: impl Into<String>, z: i32) -> Self {
        Self {
            name: name.into(),
            z,
            texts: Vec::new(),
        }
    }

    /// Append a text item.
    pub fn text(mut self, text: TextNode) -> Self {
        self.texts.push(text);
        self
    }
}

impl VideoNode {
    /// Create a clip that reads `path` untrimmed, unplaced and unscaled.
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Read the source from `src_start`, up to `src_end` when given.
    pub fn trim(mut self, src_start: f64, src_end: Option<f64>) -> Self {
        self.src_start = src_start;
        self.src_end = src_end;
        self
    }

    /// Place the clip on the output timeline.
    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Place the clip's top-left corner on the canvas.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.pos = Pos::new(x, y);
        self
    }

    /// Scale the clip.
    pub fn sized(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

impl ImageNode {
    /// Create an image shown for no time at the canvas origin.
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Show the image over `[start, end)`.
    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Place the image's top-left corner on the canvas.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.pos = Pos::new(x, y);
        self
    }

    /// Scale the image.
    pub fn sized(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

impl AudioNode {
    /// Create a clip that plays `path` untrimmed at unit gain.
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Read the source from `src_start`, up to `src_end` when given.
    pub fn trim(mut self, src_start: f64, src_end: Option<f64>) -> Self {
        self.src_start = src_start;
        self.src_end = src_end;
        self
    }

    /// Place the clip on the output timeline.
    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Set linear gain.
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Repeat the source to fill the destination window.
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }
}

impl TextNode {
    /// Create a text item with default styling.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Show the text over `[start, end)`.
    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Anchor the text on the canvas.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.pos = Pos::new(x, y);
        self
    }

    /// Set the font family.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.style.font = Some(font.into());
        self
    }

    /// Set the font size in pixels.
    pub fn font_size(mut self, size: f64) -> Self {
        self.style.size = size;
        self
    }

    /// Set the text color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    /// Set horizontal alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.style.align = align;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/dsl.rs"]
mod tests;
