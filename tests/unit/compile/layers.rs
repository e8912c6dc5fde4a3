use super::*;

#[test]
fn gate_is_absent_for_empty_windows() {
    assert_eq!(time_gate(0.0, 0.0), None);
    assert_eq!(time_gate(3.0, 3.0), None);
    assert_eq!(
        time_gate(1.0, 2.5).as_deref(),
        Some("'gte(t,1.000)*lt(t,2.500)'")
    );
}

#[test]
fn pts_offsets() {
    assert_eq!(pts_from(0.0), "PTS-STARTPTS");
    assert_eq!(pts_from(1.25), "PTS-STARTPTS+1.250/TB");
}

#[test]
fn empty_chain_is_a_passthrough() {
    let mut cmd = Command::new();
    emit_chain(&mut cmd, "[0:a]".to_string(), "[a0_0]", Vec::new(), "anull");
    assert_eq!(cmd.filter_graph(), "[0:a]anull[a0_0]");
}

#[test]
fn chain_intermediates_derive_from_output() {
    let mut cmd = Command::new();
    emit_chain(
        &mut cmd,
        "[2:v]".to_string(),
        "[v1_3]",
        vec![
            ("trim", Params::new().with("start", "1.000")),
            ("setpts", Params::positional("PTS-STARTPTS")),
            ("scale", Params::positional("640:360")),
        ],
        "null",
    );
    assert_eq!(
        cmd.filter_graph(),
        "[2:v]trim=start=1.000[v1_3_0];[v1_3_0]setpts=PTS-STARTPTS[v1_3_1];[v1_3_1]scale=640:360[v1_3]"
    );
}

#[test]
fn picture_layer_accessors() {
    let text = PictureLayer::Text(TextLayer {
        label: "[t0_0]".into(),
        params: Params::new(),
    });
    let stream = PictureLayer::Stream(StreamLayer {
        label: "[v1_0]".into(),
        pos: Pos::default(),
        start: 0.0,
        end: 0.0,
        fills_frame: true,
    });
    assert!(text.is_text());
    assert!(!stream.is_text());
    assert_eq!(stream.label(), "[v1_0]");
}

#[test]
fn coverage_needs_full_frame_and_full_time() {
    let layer = |start: f64, end: f64, fills_frame: bool| StreamLayer {
        label: "[v0_0]".into(),
        pos: Pos::default(),
        start,
        end,
        fills_frame,
    };
    assert!(layer(0.0, 0.0, true).covers(10.0));
    assert!(layer(0.0, 10.0, true).covers(10.0));
    assert!(!layer(0.0, 5.0, true).covers(10.0));
    assert!(!layer(1.0, 10.0, true).covers(10.0));
    assert!(!layer(0.0, 10.0, false).covers(10.0));
    assert_eq!(layer(2.0, 3.0, true).gate().as_deref(), Some("'gte(t,2.000)*lt(t,3.000)'"));
}
