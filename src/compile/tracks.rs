use crate::compile::inputs::InputRegistry;
use crate::compile::layers::{
    Layer, PictureLayer, StreamLayer, TextLayer, emit_chain, pts_from, time_gate,
};
use crate::foundation::core::{Pos, Size, fmt_gain, fmt_num, fmt_secs};
use crate::foundation::error::ReelResult;
use crate::graph::command::{Command, Params};
use crate::graph::escape::{escape_option, quote_text};
use crate::timeline::model::{
    AudioTrack, ImageTrack, TextAlign, TextNode, TextTrack, Track, VideoTrack,
};

/// Largest `aloop` buffer, in samples.
const ALOOP_MAX_SAMPLES: &str = "2147483647";

/// Per-track emission state shared by the four track kinds.
pub(crate) struct TrackCtx<'a> {
    pub(crate) cmd: &'a mut Command,
    pub(crate) inputs: &'a mut InputRegistry,
    /// Position of the track after the Z-order sort.
    pub(crate) track_index: usize,
    pub(crate) canvas: &'a Size,
    /// Latest destination end in the project, 0 when no node has a window.
    pub(crate) timeline_secs: f64,
}

/// Validate `track`, emit its per-node filters, and return its layers in node order.
pub(crate) fn translate_track(track: &Track, ctx: &mut TrackCtx<'_>) -> ReelResult<Vec<Layer>> {
    track.validate()?;
    let layers = match track {
        Track::Video(t) => video(t, ctx),
        Track::Audio(t) => audio(t, ctx),
        Track::Image(t) => image(t, ctx),
        Track::Text(t) => text(t, ctx),
    };
    Ok(layers)
}

fn video(track: &VideoTrack, ctx: &mut TrackCtx<'_>) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(track.clips.len());
    for (clip_index, clip) in track.clips.iter().enumerate() {
        let idx = ctx.inputs.register(ctx.cmd, &clip.path, Vec::new);
        let input = format!("[{idx}:v]");
        let output = format!("[v{}_{clip_index}]", ctx.track_index);

        let mut steps = Vec::new();
        if clip.has_trim() {
            let mut trim = Params::new().with("start", fmt_secs(clip.src_start));
            if let Some(end) = clip.src_end
                && end > 0.0
            {
                trim.push("duration", fmt_secs(end - clip.src_start));
            }
            steps.push(("trim", trim));
            steps.push(("setpts", Params::positional(pts_from(clip.start))));
        } else if clip.start > 0.0 {
            steps.push(("setpts", Params::positional(pts_from(clip.start))));
        }
        if let Some(size) = clip.size.as_ref().filter(|s| s.is_specified()) {
            steps.push(("scale", Params::positional(size.scale_arg())));
        }
        emit_chain(ctx.cmd, input, &output, steps, "null");

        layers.push(Layer::Picture(PictureLayer::Stream(StreamLayer {
            label: output,
            pos: clip.pos,
            start: clip.start,
            end: clip.end,
            fills_frame: clip.pos == Pos::default() && clip.size.as_ref() == Some(ctx.canvas),
        })));
    }
    layers
}

fn audio(track: &AudioTrack, ctx: &mut TrackCtx<'_>) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(track.clips.len());
    for (clip_index, clip) in track.clips.iter().enumerate() {
        let idx = ctx.inputs.register(ctx.cmd, &clip.path, Vec::new);
        let input = format!("[{idx}:a]");
        let output = format!("[a{}_{clip_index}]", ctx.track_index);

        let mut steps = Vec::new();
        if let Some((start, duration)) = clip.closed_trim() {
            steps.push((
                "atrim",
                Params::new()
                    .with("start", fmt_secs(start))
                    .with("duration", fmt_secs(duration)),
            ));
            steps.push(("asetpts", Params::positional(pts_from(0.0))));
        }
        if clip.looped && clip.end > clip.start {
            steps.push((
                "aloop",
                Params::new()
                    .with("loop", "-1")
                    .with("size", ALOOP_MAX_SAMPLES),
            ));
            steps.push((
                "atrim",
                Params::new().with("duration", fmt_secs(clip.end - clip.start)),
            ));
        }
        if clip.volume != 1.0 {
            steps.push(("volume", Params::positional(fmt_gain(clip.volume))));
        }
        if clip.start > 0.0 {
            let ms = (clip.start * 1000.0).round() as u64;
            steps.push((
                "adelay",
                Params::new()
                    .with("delays", ms.to_string())
                    .with("all", "1"),
            ));
        }
        emit_chain(ctx.cmd, input, &output, steps, "anull");

        layers.push(Layer::Audio(output));
    }
    layers
}

fn image(track: &ImageTrack, ctx: &mut TrackCtx<'_>) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(track.images.len());
    for (clip_index, image) in track.images.iter().enumerate() {
        let hold = if image.duration() > 0.0 {
            image.duration()
        } else {
            ctx.timeline_secs
        };
        let idx = ctx.inputs.register(ctx.cmd, &image.path, || {
            let mut options = vec!["-loop".to_string(), "1".to_string()];
            if hold > 0.0 {
                options.push("-t".to_string());
                options.push(fmt_secs(hold));
            }
            options
        });
        let input = format!("[{idx}:v]");
        let output = format!("[i{}_{clip_index}]", ctx.track_index);

        let mut steps = Vec::new();
        if let Some(size) = image.size.as_ref().filter(|s| s.is_specified()) {
            steps.push(("scale", Params::positional(size.scale_arg())));
        }
        if image.start > 0.0 {
            steps.push(("setpts", Params::positional(pts_from(image.start))));
        }
        emit_chain(ctx.cmd, input, &output, steps, "null");

        layers.push(Layer::Picture(PictureLayer::Stream(StreamLayer {
            label: output,
            pos: image.pos,
            start: image.start,
            end: image.end,
            fills_frame: false,
        })));
    }
    layers
}

fn text(track: &TextTrack, ctx: &mut TrackCtx<'_>) -> Vec<Layer> {
    track
        .texts
        .iter()
        .enumerate()
        .map(|(node_index, node)| {
            Layer::Picture(PictureLayer::Text(TextLayer {
                label: format!("[t{}_{node_index}]", ctx.track_index),
                params: drawtext_params(node),
            }))
        })
        .collect()
}

fn drawtext_params(node: &TextNode) -> Params {
    let x = node.pos.x.to_string();
    let x = match node.style.align {
        TextAlign::Left => x,
        TextAlign::Center => format!("{x}-text_w/2"),
        TextAlign::Right => format!("{x}-text_w"),
    };

    let mut params = Params::new()
        .with("text", quote_text(&node.content))
        .with("x", x)
        .with("y", node.pos.y.to_string())
        .with("fontsize", fmt_num(node.style.size));
    if let Some(font) = node.style.font.as_deref().filter(|f| !f.is_empty()) {
        params.push("font", quote_text(font));
    }
    if let Some(color) = node.style.color.as_deref().filter(|c| !c.is_empty()) {
        params.push("fontcolor", escape_option(color));
    }
    if let Some(gate) = time_gate(node.start, node.end) {
        params.push("enable", gate);
    }
    params
}
