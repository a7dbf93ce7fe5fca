use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "tributes-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_groups_writes_output() {
    let exe = env!("CARGO_BIN_EXE_tributes");
    let output_path = temp_path("groups");
    let status = Command::new(exe)
        .args(["--list-groups", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available groups"));
    assert!(content.contains("districts"));
}

#[test]
fn cli_json_report_names_a_winner_per_game() {
    let exe = env!("CARGO_BIN_EXE_tributes");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--seed", "42", "--games", "2", "--tributes", "8", "--report", "json", "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let records: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let records = records.as_array().expect("array of games");
    assert_eq!(records.len(), 2);
    for record in records {
        assert_eq!(record["roster"].as_array().map(Vec::len), Some(8));
        assert!(record["winner"]["winner"].is_string());
        assert_eq!(record["rounds"][0]["round"], "bloodbath");
    }
}

#[test]
fn cli_seeded_runs_are_reproducible() {
    let exe = env!("CARGO_BIN_EXE_tributes");
    let run = |label: &str| {
        let output_path = temp_path(label);
        let status = Command::new(exe)
            .args(["--seed", "7", "--report", "markdown", "--title", "Replay", "--output"])
            .arg(&output_path)
            .status()
            .expect("run cli");
        assert!(status.success());
        std::fs::read_to_string(output_path).expect("read output")
    };
    let first = run("replay-a");
    let second = run("replay-b");
    assert!(first.starts_with("# Replay"));
    assert_eq!(first, second);
}

#[test]
fn cli_named_tributes_and_console_report() {
    let exe = env!("CARGO_BIN_EXE_tributes");
    let output = Command::new(exe)
        .args(["--seed", "3", "--names", "Katniss,Peeta", "--tributes", "2"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tributes Simulator"));
    assert!(stdout.contains("Katniss") && stdout.contains("Peeta"));
    assert!(stdout.contains("The winner is"));
}

#[test]
fn cli_rejects_unreadable_catalog() {
    let exe = env!("CARGO_BIN_EXE_tributes");
    let output = Command::new(exe)
        .args(["--catalog", "/definitely/not/here.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("here.json"));
}
