use crate::foundation::core::{Pos, fmt_secs};
use crate::graph::command::{Command, Params};
use crate::graph::escape::quote_graph;

/// What a track contributes to composition, in the order it was produced.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Layer {
    /// Part of the picture, stacked in Z order.
    Picture(PictureLayer),
    /// An audio stream label, mixed separately from the picture.
    Audio(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PictureLayer {
    /// A video or image stream placed on the canvas by `overlay`.
    Stream(StreamLayer),
    /// A prepared `drawtext`, applied to whatever lies below it.
    Text(TextLayer),
}

impl PictureLayer {
    pub(crate) fn label(&self) -> &str {
        match self {
            PictureLayer::Stream(s) => &s.label,
            PictureLayer::Text(t) => &t.label,
        }
    }

    pub(crate) fn is_text(&self) -> bool {
        matches!(self, PictureLayer::Text(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StreamLayer {
    pub(crate) label: String,
    pub(crate) pos: Pos,
    /// Destination window; an empty window is always visible.
    pub(crate) start: f64,
    pub(crate) end: f64,
    /// Video scaled to the canvas size and placed at the origin.
    pub(crate) fills_frame: bool,
}

impl StreamLayer {
    pub(crate) fn gate(&self) -> Option<String> {
        time_gate(self.start, self.end)
    }

    /// Whether this stream alone can stand in for the canvas over `[0, duration)`.
    pub(crate) fn covers(&self, duration: f64) -> bool {
        self.fills_frame && self.start <= 0.0 && (self.end <= self.start || self.end >= duration)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextLayer {
    pub(crate) label: String,
    pub(crate) params: Params,
}

/// `enable` expression for `[start, end)`, or `None` for an empty window (always on).
pub(crate) fn time_gate(start: f64, end: f64) -> Option<String> {
    (end > start).then(|| {
        quote_graph(&format!(
            "gte(t,{})*lt(t,{})",
            fmt_secs(start),
            fmt_secs(end)
        ))
    })
}

/// `setpts`/`asetpts` argument that restarts timestamps at `offset` seconds.
pub(crate) fn pts_from(offset: f64) -> String {
    if offset > 0.0 {
        format!("PTS-STARTPTS+{}/TB", fmt_secs(offset))
    } else {
        "PTS-STARTPTS".to_string()
    }
}

/// Emit `steps` as a linear chain from `input` to `output`.
///
/// Intermediate labels are derived from `output`, so chains of different nodes never collide.
/// An empty chain becomes a single `passthrough` filter to keep the label connected.
pub(crate) fn emit_chain(
    cmd: &mut Command,
    input: String,
    output: &str,
    steps: Vec<(&'static str, Params)>,
    passthrough: &'static str,
) {
    if steps.is_empty() {
        cmd.add_filter(passthrough, vec![input], output, Params::new());
        return;
    }

    let stem = output.trim_start_matches('[').trim_end_matches(']');
    let last = steps.len() - 1;
    let mut current = input;
    for (i, (name, params)) in steps.into_iter().enumerate() {
        let next = if i == last {
            output.to_string()
        } else {
            format!("[{stem}_{i}]")
        };
        cmd.add_filter(name, vec![current], next.clone(), params);
        current = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/layers.rs"]
mod tests;
