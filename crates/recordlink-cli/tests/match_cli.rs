use std::process::Command;

use tempfile::tempdir;

#[test]
fn matches_two_csv_files_end_to_end() {
    let dir = tempdir().expect("temp dir");
    let left_path = dir.path().join("left.csv");
    let right_path = dir.path().join("right.csv");
    let plan_path = dir.path().join("plan.json");
    let output_path = dir.path().join("out.csv");

    std::fs::write(&left_path, "name,city\nWill,NYC\nCal,LA\n").expect("write left");
    std::fs::write(&right_path, "person,town\nWill,NYC\nDana,SF\n").expect("write right");
    std::fs::write(
        &plan_path,
        r#"{"fields1": ["name"], "fields2": ["person"], "method": "literal"}"#,
    )
    .expect("write plan");

    let status = Command::new(env!("CARGO_BIN_EXE_recordlink"))
        .args([
            left_path.to_str().expect("left path"),
            right_path.to_str().expect("right path"),
            "--plan",
            plan_path.to_str().expect("plan path"),
            "--output",
            output_path.to_str().expect("output path"),
            "--quiet",
        ])
        .status()
        .expect("run CLI");

    assert!(status.success());
    let rendered = std::fs::read_to_string(&output_path).expect("output exists");
    assert!(rendered.contains("Will"));
    assert!(!rendered.contains("Dana"));
    assert!(!rendered.contains("Cal"));
}

#[test]
fn matches_using_the_array_of_block_objects_plan_shape() {
    let dir = tempdir().expect("temp dir");
    let left_path = dir.path().join("left.csv");
    let right_path = dir.path().join("right.csv");
    let plan_path = dir.path().join("plan.json");
    let output_path = dir.path().join("out.csv");

    std::fs::write(&left_path, "name,city\nWill,NYC\nCal,LA\n").expect("write left");
    std::fs::write(&right_path, "person,town\nWill,NYC\nDana,SF\n").expect("write right");
    std::fs::write(
        &plan_path,
        r#"[{"fields": [{"1": "name", "2": "person"}], "method": "literal"}]"#,
    )
    .expect("write plan");

    let status = Command::new(env!("CARGO_BIN_EXE_recordlink"))
        .args([
            left_path.to_str().expect("left path"),
            right_path.to_str().expect("right path"),
            "--plan",
            plan_path.to_str().expect("plan path"),
            "--output",
            output_path.to_str().expect("output path"),
            "--quiet",
        ])
        .status()
        .expect("run CLI");

    assert!(status.success());
    let rendered = std::fs::read_to_string(&output_path).expect("output exists");
    assert!(rendered.contains("Will"));
    assert!(!rendered.contains("Dana"));
}

#[test]
fn rejects_unknown_method_with_nonzero_exit() {
    let dir = tempdir().expect("temp dir");
    let left_path = dir.path().join("left.csv");
    let right_path = dir.path().join("right.csv");
    let plan_path = dir.path().join("plan.json");

    std::fs::write(&left_path, "name\nWill\n").expect("write left");
    std::fs::write(&right_path, "person\nWill\n").expect("write right");
    std::fs::write(
        &plan_path,
        r#"{"fields1": ["name"], "fields2": ["person"], "method": "soundex"}"#,
    )
    .expect("write plan");

    let status = Command::new(env!("CARGO_BIN_EXE_recordlink"))
        .args([
            left_path.to_str().expect("left path"),
            right_path.to_str().expect("right path"),
            "--plan",
            plan_path.to_str().expect("plan path"),
            "--quiet",
        ])
        .status()
        .expect("run CLI");

    assert!(!status.success());
}
