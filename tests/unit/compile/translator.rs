use super::*;
use crate::foundation::core::Size;
use crate::timeline::dsl::ProjectBuilder;
use crate::timeline::model::{
    AudioNode, AudioTrack, ImageNode, ImageTrack, TextAlign, TextNode, TextTrack, VideoNode,
    VideoTrack,
};
use std::collections::HashSet;

fn hd() -> ProjectBuilder {
    ProjectBuilder::new(Size::new(1280, 720), 30.0)
}

fn translate(project: &Project) -> Command {
    Translator::new(project).translate().unwrap()
}

fn names(cmd: &Command) -> Vec<&str> {
    cmd.filters.iter().map(|f| f.name.as_str()).collect()
}

/// Every output label is produced once and every consumed label exists before it is used.
fn assert_connected(cmd: &Command) {
    let mut produced = HashSet::new();
    for f in &cmd.filters {
        for input in &f.inputs {
            let is_stream = input
                .trim_start_matches('[')
                .split(':')
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .is_some_and(|n| n < cmd.inputs.len());
            assert!(
                is_stream || produced.contains(input),
                "dangling label {input} in {}",
                f.render()
            );
        }
        assert!(produced.insert(f.output.clone()), "label {} reused", f.output);
    }
    for label in &cmd.maps {
        assert!(produced.contains(label), "mapped label {label} never produced");
    }
}

#[test]
fn full_frame_video_passes_through() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0).clip(
                VideoNode::new("c0", "a.mp4")
                    .window(0.0, 10.0)
                    .sized(Size::new(1280, 720)),
            ),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(cmd.inputs.len(), 1);
    assert_eq!(names(&cmd), ["scale"]);
    assert_eq!(cmd.filters[0].inputs, ["[0:v]"]);
    assert!(!names(&cmd).contains(&"overlay"));
    assert_eq!(cmd.maps, ["[v0_0]"]);
    assert_connected(&cmd);
}

#[test]
fn trimmed_clip_is_retimed_and_scaled() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0).clip(
                VideoNode::new("c0", "a.mp4")
                    .trim(2.0, Some(5.0))
                    .window(1.0, 4.0)
                    .sized(Size::new(640, 360)),
            ),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert!(cmd.filter_graph().starts_with(
        "[0:v]trim=start=2.000:duration=3.000[v0_0_0];\
         [v0_0_0]setpts=PTS-STARTPTS+1.000/TB[v0_0_1];\
         [v0_0_1]scale=640:360[v0_0];"
    ));
    assert_connected(&cmd);
}

#[test]
fn text_only_project_draws_on_canvas() {
    let project = hd()
        .track(TextTrack::new("title", 0).text(TextNode::new("t0", "Hello").window(0.0, 3.0)))
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert!(cmd.inputs.is_empty());
    assert_eq!(names(&cmd), ["color", "drawtext"]);
    assert_eq!(cmd.filters[0].output, "[base]");
    assert_eq!(cmd.filters[0].params.get("size"), Some("1280x720"));
    assert_eq!(cmd.filters[0].params.get("d"), Some("3.000"));
    assert_eq!(cmd.filters[1].inputs, ["[base]"]);
    assert_eq!(cmd.filters[1].output, "[final]");
    assert_eq!(cmd.maps, ["[final]"]);
    assert_connected(&cmd);
}

#[test]
fn audio_volume_and_trim_are_applied_once() {
    let project = hd()
        .track(
            AudioTrack::new("music", 0)
                .clip(AudioNode::new("a0", "m.mp3").trim(0.0, Some(10.0)).volume(0.5)),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    let count = |name: &str| cmd.filters.iter().filter(|f| f.name == name).count();
    assert_eq!(count("volume"), 1);
    assert_eq!(count("atrim"), 1);
    assert_eq!(cmd.filters[0].inputs, ["[0:a]"]);
    assert_eq!(
        cmd.filters[0].render(),
        "[0:a]atrim=start=0.000:duration=10.000[a0_0_0]"
    );
    assert_eq!(cmd.filters.last().unwrap().render(), "[a0_0_1]volume=0.5[a0_0]");
    assert_eq!(cmd.maps, ["[a0_0]"]);
    assert_connected(&cmd);
}

#[test]
fn delayed_looped_audio() {
    let project = hd()
        .track(
            AudioTrack::new("bed", 0)
                .clip(AudioNode::new("a0", "loop.wav").window(1.5, 6.5).looped(true)),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(names(&cmd), ["aloop", "atrim", "adelay"]);
    assert_eq!(cmd.filters[1].params.get("duration"), Some("5.000"));
    assert_eq!(cmd.filters[2].params.get("delays"), Some("1500"));
    assert_eq!(cmd.filters[2].params.get("all"), Some("1"));
}

#[test]
fn inputs_are_deduplicated_by_path() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0)
                .clip(VideoNode::new("c0", "a.mp4").window(0.0, 5.0))
                .clip(VideoNode::new("c1", "a.mp4").trim(5.0, None).window(5.0, 10.0)),
        )
        .track(AudioTrack::new("sound", 0).clip(AudioNode::new("a0", "a.mp4")))
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(cmd.inputs.len(), 1);
    let consumed: Vec<&str> = cmd
        .filters
        .iter()
        .flat_map(|f| f.inputs.iter().map(String::as_str))
        .filter(|l| l.starts_with("[0:"))
        .collect();
    assert_eq!(consumed, ["[0:v]", "[0:v]", "[0:a]"]);
    assert_connected(&cmd);
}

#[test]
fn image_inputs_loop_for_their_window() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0).clip(
                VideoNode::new("c0", "a.mp4")
                    .window(0.0, 10.0)
                    .sized(Size::new(1280, 720)),
            ),
        )
        .track(
            ImageTrack::new("logo", 1).image(
                ImageNode::new("i0", "logo.png")
                    .window(2.0, 4.5)
                    .at(20, 30)
                    .sized(Size::new(100, 50)),
            ),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(cmd.inputs[1].path, "logo.png");
    assert_eq!(cmd.inputs[1].options, ["-loop", "1", "-t", "2.500"]);

    let overlay = cmd.filters.iter().find(|f| f.name == "overlay").unwrap();
    assert_eq!(overlay.inputs, ["[v0_0]", "[i1_0]"]);
    assert_eq!(overlay.output, "[final]");
    assert_eq!(overlay.params.get("x"), Some("20"));
    assert_eq!(overlay.params.get("y"), Some("30"));
    assert_eq!(overlay.params.get("enable"), Some("'gte(t,2.000)*lt(t,4.500)'"));
    assert_connected(&cmd);
}

#[test]
fn tracks_are_layered_by_z_with_stable_ties() {
    let project = hd()
        .track(ImageTrack::new("top", 5).image(ImageNode::new("i0", "top.png").window(0.0, 1.0)))
        .track(
            VideoTrack::new("bottom", -1)
                .clip(VideoNode::new("c0", "a.mp4").sized(Size::new(1280, 720))),
        )
        .track(ImageTrack::new("mid-a", 2).image(ImageNode::new("i1", "a.png").window(0.0, 1.0)))
        .track(ImageTrack::new("mid-b", 2).image(ImageNode::new("i2", "b.png").window(0.0, 1.0)))
        .build()
        .unwrap();

    let order: Vec<&str> = z_sorted(&project.tracks).iter().map(|t| t.name()).collect();
    assert_eq!(order, ["bottom", "mid-a", "mid-b", "top"]);

    let cmd = translate(&project);
    let paths: Vec<&str> = cmd.inputs.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, ["a.mp4", "a.png", "b.png", "top.png"]);

    let overlays: Vec<_> = cmd.filters.iter().filter(|f| f.name == "overlay").collect();
    assert_eq!(overlays.len(), 3);
    assert_eq!(overlays[0].inputs, ["[v0_0]", "[i1_0]"]);
    assert_eq!(overlays[1].inputs, ["[tmp0]", "[i2_0]"]);
    assert_eq!(overlays[2].inputs, ["[tmp1]", "[i3_0]"]);
    assert_eq!(overlays[2].output, "[final]");
    assert_connected(&cmd);
}

#[test]
fn full_project_routes_picture_and_audio() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0).clip(
                VideoNode::new("c0", "a.mp4")
                    .window(0.0, 10.0)
                    .sized(Size::new(1280, 720)),
            ),
        )
        .track(AudioTrack::new("music", 0).clip(AudioNode::new("a0", "m.mp3").volume(0.3)))
        .track(AudioTrack::new("voice", 0).clip(AudioNode::new("a1", "v.wav").window(2.0, 8.0)))
        .track(ImageTrack::new("logo", 1).image(ImageNode::new("i0", "logo.png").window(0.0, 10.0)))
        .track(
            TextTrack::new("title", 2)
                .text(TextNode::new("t0", "Hi").window(1.0, 3.0).at(640, 80).align(TextAlign::Center)),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    let amix = cmd.filters.iter().find(|f| f.name == "amix").unwrap();
    assert_eq!(amix.inputs, ["[a1_0]", "[a2_0]"]);
    assert_eq!(amix.params.get("inputs"), Some("2"));
    assert_eq!(amix.params.get("duration"), Some("longest"));

    let drawtext = cmd.filters.iter().find(|f| f.name == "drawtext").unwrap();
    assert_eq!(drawtext.inputs, ["[tmp0]"]);
    assert_eq!(drawtext.output, "[final]");
    assert_eq!(drawtext.params.get("x"), Some("640-text_w/2"));

    assert_eq!(cmd.maps, ["[final]", "[aout]"]);
    assert!(!names(&cmd).contains(&"color"));
    assert_connected(&cmd);
}

#[test]
fn text_content_is_escaped_for_both_levels() {
    let project = hd()
        .track(
            TextTrack::new("t", 0).text(
                TextNode::new("t0", "It's 50% off: now")
                    .at(1200, 10)
                    .font("DejaVu Sans")
                    .font_size(36.0)
                    .color("#ffcc00")
                    .align(TextAlign::Right),
            ),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    let drawtext = &cmd.filters[1];
    assert_eq!(drawtext.params.get("text"), Some(r"'It\'\''s 50% off\: now'"));
    assert_eq!(drawtext.params.get("x"), Some("1200-text_w"));
    assert_eq!(drawtext.params.get("fontsize"), Some("36"));
    assert_eq!(drawtext.params.get("font"), Some("'DejaVu Sans'"));
    assert_eq!(drawtext.params.get("fontcolor"), Some("#ffcc00"));
    assert_eq!(drawtext.params.get("enable"), None);
}

#[test]
fn translation_is_deterministic() {
    let project = hd()
        .track(VideoTrack::new("main", 0).clip(VideoNode::new("c0", "a.mp4").window(0.0, 4.0)))
        .track(ImageTrack::new("a", 1).image(ImageNode::new("i0", "a.png").window(0.0, 1.0)))
        .track(ImageTrack::new("b", 1).image(ImageNode::new("i1", "b.png").window(1.0, 2.0)))
        .track(AudioTrack::new("m", 0).clip(AudioNode::new("a0", "m.mp3")))
        .build()
        .unwrap();

    let translator = Translator::new(&project);
    let first = translator.translate().unwrap();
    let second = translator.translate().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
}

#[test]
fn invalid_node_names_its_track() {
    let mut project = hd().build().unwrap();
    project.tracks.push(
        VideoTrack::new("broll", 0)
            .clip(VideoNode::new("c0", "a.mp4").window(5.0, 1.0))
            .into(),
    );

    let err = Translator::new(&project).translate().unwrap_err();
    match err {
        ReelError::TrackTranslation { ref track, .. } => assert_eq!(track, "broll"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("broll"));
}

#[test]
fn zero_fps_is_invalid_input() {
    let project = Project {
        size: Size::new(1280, 720),
        fps: 0.0,
        tracks: Vec::new(),
    };
    let err = Translator::new(&project).translate().unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)), "{err}");
}

#[test]
fn empty_project_has_no_filters() {
    let project = hd().build().unwrap();
    let cmd = translate(&project);
    assert!(cmd.inputs.is_empty());
    assert!(cmd.filters.is_empty());
    assert!(cmd.maps.is_empty());
    assert!(cmd.outputs.is_empty());
}

#[test]
fn sequential_clips_keep_placement_and_full_length() {
    let project = ProjectBuilder::new(Size::new(1920, 1080), 30.0)
        .track(
            VideoTrack::new("main", 0)
                .clip(
                    VideoNode::new("c0", "a.mp4")
                        .window(0.0, 5.0)
                        .at(100, 50)
                        .sized(Size::new(640, 360)),
                )
                .clip(VideoNode::new("c1", "b.mp4").trim(0.0, Some(5.0)).window(5.0, 10.0)),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    let canvas = cmd.filters.iter().find(|f| f.name == "color").unwrap();
    assert_eq!(canvas.params.get("size"), Some("1920x1080"));
    assert_eq!(canvas.params.get("d"), Some("10.000"));

    let overlays: Vec<_> = cmd.filters.iter().filter(|f| f.name == "overlay").collect();
    assert_eq!(overlays.len(), 2);
    assert_eq!(overlays[0].inputs, ["[base]", "[v0_0]"]);
    assert_eq!(overlays[0].params.get("x"), Some("100"));
    assert_eq!(overlays[0].params.get("y"), Some("50"));
    assert_eq!(overlays[0].params.get("enable"), Some("'gte(t,0.000)*lt(t,5.000)'"));
    assert_eq!(overlays[1].inputs, ["[tmp0]", "[v0_1]"]);
    assert_eq!(overlays[1].params.get("enable"), Some("'gte(t,5.000)*lt(t,10.000)'"));
    assert_eq!(cmd.maps, ["[final]"]);
    assert_connected(&cmd);
}

#[test]
fn image_above_an_empty_video_track_uses_the_canvas() {
    let project = hd()
        .track(VideoTrack::new("v", 0))
        .track(
            ImageTrack::new("logo", 1).image(
                ImageNode::new("i0", "logo.png")
                    .window(0.0, 4.0)
                    .sized(Size::new(200, 100)),
            ),
        )
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(cmd.filters.iter().filter(|f| f.name == "color").count(), 1);
    assert_eq!(cmd.filters[cmd.filters.len() - 2].params.get("size"), Some("1280x720"));
    let overlay = cmd.filters.last().unwrap();
    assert_eq!(overlay.inputs, ["[base]", "[i1_0]"]);
    assert_eq!(cmd.maps, ["[final]"]);
}

#[test]
fn untimed_image_holds_for_the_whole_timeline() {
    let project = hd()
        .track(
            VideoTrack::new("main", 0).clip(
                VideoNode::new("c0", "a.mp4")
                    .window(0.0, 10.0)
                    .sized(Size::new(1280, 720)),
            ),
        )
        .track(ImageTrack::new("logo", 1).image(ImageNode::new("l", "logo.png").at(10, 10)))
        .build()
        .unwrap();
    let cmd = translate(&project);

    assert_eq!(cmd.inputs[1].options, ["-loop", "1", "-t", "10.000"]);
    let overlay = cmd.filters.iter().find(|f| f.name == "overlay").unwrap();
    assert_eq!(overlay.inputs, ["[v0_0]", "[i1_0]"]);
    assert_eq!(overlay.params.get("enable"), None);
}

#[test]
fn untimed_image_without_timeline_is_not_cut() {
    let project = hd()
        .track(ImageTrack::new("still", 0).image(ImageNode::new("s", "still.png")))
        .build()
        .unwrap();
    let cmd = translate(&project);
    assert_eq!(cmd.inputs[0].options, ["-loop", "1"]);
}

#[test]
fn small_volumes_are_not_rounded_away() {
    let project = hd()
        .track(AudioTrack::new("quiet", 0).clip(AudioNode::new("a0", "m.mp3").volume(0.004)))
        .build()
        .unwrap();
    let cmd = translate(&project);
    assert_eq!(cmd.filter_graph(), "[0:a]volume=0.004[a0_0]");
}
