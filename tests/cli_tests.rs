use std::fs;
use std::process::Command;

fn tabgraph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tabgraph"))
}

#[test]
fn default_run_writes_both_charts() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("tab_data");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("data-5.json"),
        r#"{"tab_infos":[{"cpu_usage": 37.5, "rss": 204800}]}"#,
    )
    .unwrap();

    let output = tabgraph().current_dir(dir.path()).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in ["cpu_usage_graph.png", "rss_values_graph.png"] {
        let bytes = fs::read(dir.path().join(name)).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", name);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 present, 199 missing"));
}

#[test]
fn default_run_without_data_still_writes_charts() {
    let dir = tempfile::tempdir().unwrap();

    let output = tabgraph()
        .current_dir(dir.path())
        .arg("--no-summary")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("cpu_usage_graph.png").exists());
    assert!(dir.path().join("rss_values_graph.png").exists());
}

#[test]
fn malformed_snapshot_fails_without_chart() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("tab_data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("data-0.json"), "{ broken").unwrap();

    let output = tabgraph().current_dir(dir.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("data-0.json"));
    assert!(!dir.path().join("cpu_usage_graph.png").exists());
}

#[test]
fn output_requires_single_metric() {
    let dir = tempfile::tempdir().unwrap();

    let output = tabgraph()
        .current_dir(dir.path())
        .args(["-o", "chart.png"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let output = tabgraph()
        .current_dir(dir.path())
        .args(["-m", "rss", "-o", "chart.svg", "--no-summary"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("chart.svg").exists());
}
