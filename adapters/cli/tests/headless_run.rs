use std::process::Command;

fn run_headless(seed: &str) -> toml::Table {
    let output = Command::new(env!("CARGO_BIN_EXE_shamble"))
        .args([
            "--headless",
            "--rounds",
            "3",
            "--width",
            "24",
            "--height",
            "24",
            "--enemies",
            "4",
            "--seed",
            seed,
        ])
        .output()
        .expect("failed to launch the shamble binary");

    assert!(output.status.success(), "headless run should exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("summary is utf-8");
    stdout.parse().expect("summary is valid toml")
}

#[test]
fn headless_run_prints_a_toml_summary() {
    let summary = run_headless("42");

    assert_eq!(summary["seed"].as_str(), Some("0x000000000000002a"));
    assert_eq!(summary["rounds"].as_integer(), Some(3));
    assert!(summary["enemies"].as_integer().is_some_and(|count| count <= 4));
    assert!(summary["draw_calls"].as_integer().is_some_and(|calls| calls > 0));
}

#[test]
fn headless_runs_replay_from_the_seed() {
    assert_eq!(run_headless("7"), run_headless("7"));
}

#[test]
fn invalid_flags_fail_before_running() {
    let status = Command::new(env!("CARGO_BIN_EXE_shamble"))
        .args(["--headless", "--width", "0"])
        .output()
        .expect("failed to launch the shamble binary")
        .status;
    assert!(!status.success());
}
