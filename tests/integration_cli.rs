use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ballistics-cli"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_trajectory_basic() {
    let output = run_cli(&[
        "trajectory",
        "--velocity", "300",
        "--angle", "30",
        "--drag", "0.3",
        "--mass", "10",
        "--caliber", "100",
        "--seed", "1",
    ]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TRAJECTORY") && stdout.contains("Range"),
            "Should contain trajectory output: {}", stdout);
}

#[test]
fn test_cli_trajectory_json_vacuum_range() {
    let output = run_cli(&[
        "trajectory",
        "--velocity", "500",
        "--angle", "45",
        "--drag", "0",
        "--seed", "7",
        "--output", "json",
    ]);

    assert!(output.status.success(), "Command should succeed");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .expect("Output should be valid JSON");
    let range = json["record"]["max_distance"].as_f64().unwrap();
    assert!((range - 25484.0).abs() < 30.0, "range was {}", range);
    assert_eq!(json["landed"], true);
    assert_eq!(json["record"]["termination"], "Landed");
}

#[test]
fn test_cli_same_seed_same_output() {
    let args = [
        "trajectory",
        "--velocity", "250",
        "--turbulence", "high",
        "--seed", "99",
        "--output", "csv",
    ];
    let first = run_cli(&args);
    let second = run_cli(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_cli_output_format_csv() {
    let output = run_cli(&["trajectory", "--velocity", "100", "--output", "csv"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("time,x,y,z,velocity"));
    assert!(lines.next().unwrap().starts_with("0.01,"));
}

#[test]
fn test_cli_series_command() {
    let output = run_cli(&[
        "series",
        "--velocity", "250",
        "--angle", "35",
        "--azimuth", "10",
        "--shots", "6",
        "--seed", "5",
    ]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SERIES") && stdout.contains("Grouping"),
            "Should contain series results: {}", stdout);
}

#[test]
fn test_cli_series_parallel_matches_sequential() {
    let base = [
        "series", "--shots", "8", "--seed", "21",
        "--randomize", "wind-speed,temperature", "--output", "csv",
    ];
    let sequential = run_cli(&base);
    let mut parallel_args = base.to_vec();
    parallel_args.push("--parallel");
    let parallel = run_cli(&parallel_args);

    assert!(sequential.status.success());
    assert!(parallel.status.success());
    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn test_cli_series_single_shot_reports_insufficient_data() {
    let output = run_cli(&["series", "--shots", "1", "--seed", "3", "--output", "json"]);

    assert!(output.status.success(), "Command should succeed");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dispersion"]["InsufficientData"]["landed_shots"], 1);
}

#[test]
fn test_cli_preset_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("ballistics-cli-preset-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"name":"howitzer","speed":400.0,"angle":40.0,"drag":0.25,"mass":15.0,"caliber_mm":105.0}"#,
    )
    .unwrap();

    let output = run_cli(&[
        "trajectory",
        "--preset", path.to_str().unwrap(),
        "--seed", "2",
        "--output", "json",
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success(), "Command should succeed");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["record"]["preset_name"], "howitzer");
    assert_eq!(json["record"]["initial_speed"], 400.0);
}

#[test]
fn test_cli_rejects_invalid_mass() {
    let output = run_cli(&["trajectory", "--mass", "0"]);

    assert!(!output.status.success(), "Zero mass should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mass"), "Error should name the parameter: {}", stderr);
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("trajectory"), "Should list trajectory command");
    assert!(stdout.contains("series"), "Should list series command");
    assert!(stdout.contains("info"), "Should list info command");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_cli(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
}

#[test]
fn test_cli_info() {
    let output = run_cli(&["info"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("BALLISTICS KERNEL"));
}
