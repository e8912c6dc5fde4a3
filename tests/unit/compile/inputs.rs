use super::*;

#[test]
fn repeated_paths_share_one_index() {
    let mut cmd = Command::new();
    let mut reg = InputRegistry::default();

    assert_eq!(reg.register(&mut cmd, "a.mp4", Vec::new), 0);
    assert_eq!(reg.register(&mut cmd, "b.mp4", Vec::new), 1);
    assert_eq!(reg.register(&mut cmd, "a.mp4", Vec::new), 0);

    assert_eq!(reg.len(), 2);
    assert_eq!(cmd.inputs.len(), 2);
    assert_eq!(cmd.inputs[1].path, "b.mp4");
}

#[test]
fn options_come_from_the_first_registration_only() {
    let mut cmd = Command::new();
    let mut reg = InputRegistry::default();

    reg.register(&mut cmd, "logo.png", || vec!["-loop".into(), "1".into()]);
    reg.register(&mut cmd, "logo.png", || panic!("options must not be rebuilt"));

    assert_eq!(cmd.inputs[0].options, vec!["-loop", "1"]);
}
