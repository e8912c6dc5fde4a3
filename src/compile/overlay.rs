use crate::compile::layers::{Layer, PictureLayer};
use crate::foundation::core::{fmt_num, fmt_secs};
use crate::graph::command::{Command, Params};
use crate::timeline::model::Project;

/// Label of the synthetic canvas.
pub const BASE_LABEL: &str = "[base]";
/// Label of the composited picture.
pub const FINAL_LABEL: &str = "[final]";
/// Label of the mixed audio when more than one audio layer exists.
pub const AUDIO_MIX_LABEL: &str = "[aout]";

/// Stack visual layers in order, mix audio layers, and route the results to the outputs.
pub(crate) fn compose(cmd: &mut Command, project: &Project, layers: Vec<Layer>) {
    let mut picture = Vec::new();
    let mut audio = Vec::new();
    for layer in layers {
        match layer {
            Layer::Picture(p) => picture.push(p),
            Layer::Audio(label) => audio.push(label),
        }
    }

    if let Some(label) = compose_picture(cmd, project, &picture) {
        cmd.map(label);
    }
    if let Some(label) = mix_audio(cmd, &audio) {
        cmd.map(label);
    }
}

fn compose_picture(
    cmd: &mut Command,
    project: &Project,
    visual: &[PictureLayer],
) -> Option<String> {
    let first = visual.first()?;
    let duration = project.duration_secs();
    let base = match first {
        PictureLayer::Stream(stream) if stream.covers(duration) => Some(stream),
        _ => None,
    };

    let (mut current, rest) = match base {
        Some(stream) if visual.len() == 1 => return Some(stream.label.clone()),
        Some(stream) => (stream.label.clone(), &visual[1..]),
        None => {
            emit_canvas(cmd, project, duration);
            (BASE_LABEL.to_string(), visual)
        }
    };
    // An unbounded canvas ends with the first stream placed on it.
    let mut bound_to_first = base.is_none() && duration <= 0.0;

    let last = rest.len().saturating_sub(1);
    let mut tmp = 0usize;
    for (i, layer) in rest.iter().enumerate() {
        match layer {
            PictureLayer::Stream(stream) => {
                let out = if i == last {
                    FINAL_LABEL.to_string()
                } else {
                    let label = format!("[tmp{tmp}]");
                    tmp += 1;
                    label
                };
                let mut params = Params::new()
                    .with("x", stream.pos.x.to_string())
                    .with("y", stream.pos.y.to_string());
                if let Some(gate) = stream.gate() {
                    params.push("enable", gate);
                }
                if bound_to_first {
                    params.push("shortest", "1");
                    bound_to_first = false;
                }
                cmd.add_filter(
                    "overlay",
                    vec![current, stream.label.clone()],
                    out.clone(),
                    params,
                );
                current = out;
            }
            PictureLayer::Text(text) => {
                let out = if i == last {
                    FINAL_LABEL.to_string()
                } else {
                    text.label.clone()
                };
                cmd.add_filter("drawtext", vec![current], out.clone(), text.params.clone());
                current = out;
            }
        }
    }
    Some(current)
}

fn emit_canvas(cmd: &mut Command, project: &Project, duration: f64) {
    let mut params = Params::new()
        .with("c", "black")
        .with("size", project.size.video_size_arg())
        .with("r", fmt_num(project.fps));
    if duration > 0.0 {
        params.push("d", fmt_secs(duration));
    }
    cmd.add_filter("color", Vec::new(), BASE_LABEL, params);
}

fn mix_audio(cmd: &mut Command, audio: &[String]) -> Option<String> {
    match audio {
        [] => None,
        [only] => Some(only.clone()),
        many => {
            cmd.add_filter(
                "amix",
                many.to_vec(),
                AUDIO_MIX_LABEL,
                Params::new()
                    .with("inputs", many.len().to_string())
                    .with("duration", "longest"),
            );
            Some(AUDIO_MIX_LABEL.to_string())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/overlay.rs"]
mod tests;
