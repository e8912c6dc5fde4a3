use super::*;

#[test]
fn render_contains_inputs_graph_and_outputs() {
    let mut cmd = Command::new();
    cmd.add_input("input.mp4", Vec::<String>::new());
    cmd.add_filter(
        "scale",
        vec!["[0:v]".to_string()],
        "[scaled]",
        Params::positional("1920:1080"),
    );
    cmd.add_output("output.mp4", ["-c:v", "libx264"]);

    let s = cmd.render();
    assert!(s.starts_with("ffmpeg "));
    assert!(s.contains("-i input.mp4"));
    assert!(s.contains("'[0:v]scale=1920:1080[scaled]'"));
    assert!(s.ends_with("-c:v libx264 output.mp4"));
    assert_eq!(s, cmd.to_string());
}

#[test]
fn add_input_keeps_options_in_order() {
    let mut cmd = Command::new();
    cmd.add_input("test.mp4", ["-ss", "10"]);

    assert_eq!(cmd.inputs.len(), 1);
    assert_eq!(cmd.inputs[0].path, "test.mp4");
    assert_eq!(cmd.inputs[0].options, vec!["-ss", "10"]);
    assert_eq!(cmd.args(), vec!["-ss", "10", "-i", "test.mp4"]);
}

#[test]
fn add_input_does_not_deduplicate() {
    let mut cmd = Command::new();
    cmd.add_input("a.mp4", Vec::<String>::new());
    cmd.add_input("a.mp4", Vec::<String>::new());
    assert_eq!(cmd.inputs.len(), 2);
}

#[test]
fn params_render_in_insertion_order() {
    let f = Filter {
        name: "scale".to_string(),
        params: Params::new().with("w", "1920").with("h", "1080"),
        inputs: vec!["[0:v]".to_string()],
        output: "[out]".to_string(),
    };
    assert_eq!(f.render(), "[0:v]scale=w=1920:h=1080[out]");

    let g = Filter {
        params: Params::new().with("h", "1080").with("w", "1920"),
        ..f
    };
    assert_eq!(g.render(), "[0:v]scale=h=1080:w=1920[out]");
}

#[test]
fn params_bare_key_and_bare_value() {
    let f = Filter {
        name: "overlay".to_string(),
        params: Params::new().with("shortest", "").with("", "x=10"),
        inputs: vec!["[a]".to_string(), "[b]".to_string()],
        output: "[c]".to_string(),
    };
    assert_eq!(f.render(), "[a][b]overlay=shortest:x=10[c]");
}

#[test]
fn filter_without_params_or_labels_renders_name_only() {
    let f = Filter {
        name: "null".to_string(),
        ..Filter::default()
    };
    assert_eq!(f.render(), "null");
}

#[test]
fn graph_joins_filters_with_semicolons() {
    let mut cmd = Command::new();
    cmd.add_filter("null", vec!["[0:v]".into()], "[a]", Params::new());
    cmd.add_filter("null", vec!["[a]".into()], "[b]", Params::new());
    assert_eq!(cmd.filter_graph(), "[0:v]null[a];[a]null[b]");
}

#[test]
fn args_place_maps_before_each_output() {
    let mut cmd = Command::new();
    cmd.add_input("a.mp4", Vec::<String>::new());
    cmd.add_filter("null", vec!["[0:v]".into()], "[final]", Params::new());
    cmd.map("[final]");
    cmd.add_output("out.mp4", ["-f", "mp4"]);

    assert_eq!(
        cmd.args(),
        vec![
            "-i",
            "a.mp4",
            "-filter_complex",
            "[0:v]null[final]",
            "-map",
            "[final]",
            "-f",
            "mp4",
            "out.mp4"
        ]
    );
}

#[test]
fn no_filters_means_no_filter_complex() {
    let mut cmd = Command::new();
    cmd.add_input("a.mp4", Vec::<String>::new());
    cmd.add_output("b.mp4", Vec::<String>::new());
    assert!(!cmd.args().iter().any(|a| a == "-filter_complex"));
}

#[test]
fn clear_outputs_drops_everything() {
    let mut cmd = Command::new();
    cmd.add_output("a.mp4", Vec::<String>::new());
    cmd.add_output("b.mp4", Vec::<String>::new());
    cmd.clear_outputs();
    assert!(cmd.outputs.is_empty());
}

#[test]
fn params_lookup_and_collect() {
    let p: Params = [("c", "black"), ("size", "64x64")].into_iter().collect();
    assert_eq!(p.len(), 2);
    assert_eq!(p.get("size"), Some("64x64"));
    assert_eq!(p.get("r"), None);
    assert_eq!(p.iter().next(), Some(("c", "black")));
}
