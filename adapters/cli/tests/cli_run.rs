use std::{fs, path::Path, process::Command};

fn gremlin_maze(config: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gremlin-maze"))
        .arg("--config")
        .arg(config)
        .args(extra)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch gremlin-maze")
}

#[test]
fn scripted_run_reaches_the_door() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("level.txt"), "XXXXXX\nXW..EX\nXXXXXX\n").expect("layout");
    fs::write(
        dir.path().join("config.json"),
        r#"{ "lives": 3, "levels": [{ "layout": "level.txt" }] }"#,
    )
    .expect("config");
    let script = dir.path().join("inputs.txt");
    fs::write(&script, "R3\n").expect("script");

    let output = gremlin_maze(
        &dir.path().join("config.json"),
        &[
            "--inputs",
            script.to_str().expect("utf8 path"),
            "--frames",
            "100",
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("GAME OVER!!! Press R to Restart"), "{stdout}");
    assert!(stdout.contains("Level 1/1, Lives: 3, outcome won"), "{stdout}");
    assert!(stdout.contains("frames 3 "), "{stdout}");
}

#[test]
fn idle_run_renders_periodically() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("level.txt"), "XXXXX\nXW.EX\nXXXXX").expect("layout");
    fs::write(
        dir.path().join("config.json"),
        r#"{ "lives": 2, "levels": [{ "layout": "level.txt" }] }"#,
    )
    .expect("config");

    let output = gremlin_maze(
        &dir.path().join("config.json"),
        &["--frames", "10", "--render-every", "5"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert_eq!(stdout.matches("Lives: 2    Level 1/1").count(), 3, "{stdout}");
    assert!(stdout.contains("X<.EX"), "{stdout}");
    assert!(stdout.contains("outcome in progress"), "{stdout}");
}

#[test]
fn missing_configuration_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = gremlin_maze(&dir.path().join("absent.json"), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read configuration"), "{stderr}");
}

#[test]
fn layout_without_door_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("level.txt"), "XW.X").expect("layout");
    fs::write(
        dir.path().join("config.json"),
        r#"{ "lives": 1, "levels": [{ "layout": "level.txt" }] }"#,
    )
    .expect("config");

    let output = gremlin_maze(&dir.path().join("config.json"), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("level 1 has no door"), "{stderr}");
}
