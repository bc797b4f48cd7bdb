use std::{
    path::PathBuf,
    process::{Command, Output},
};

fn pharcobial(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pharcobial"))
        .args(args)
        .output()
        .expect("failed to run the pharcobial binary")
}

fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

#[test]
fn help_lists_every_flag() {
    let output = pharcobial(&["--help"]);
    let help = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for flag in [
        "--config",
        "--map",
        "--assets",
        "--fullscreen",
        "--fps",
        "--seed",
        "--no-hud",
        "--verbose",
    ] {
        assert!(help.contains(flag), "help should mention {flag}:\n{help}");
    }
}

#[test]
fn malformed_seed_is_rejected_by_the_parser() {
    let output = pharcobial(&["--seed", "forty-two"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--seed"));
}

#[test]
fn missing_options_file_fails_before_opening_a_window() {
    let output = pharcobial(&["--config", "no/such/options.toml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("no/such/options.toml"), "{stderr}");
}

#[test]
fn unknown_map_fails_setup() {
    let assets = assets_dir();
    let output = pharcobial(&[
        "--assets",
        assets.to_str().expect("assets path should be UTF-8"),
        "--map",
        "nowhere",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("failed to set up the game"), "{stderr}");
}
