use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn write_window(path: &Path, n: usize) {
    let mut s = String::from("month\theight_cm\tweight_kg\tmuac_cm\n");
    for i in 0..n {
        s.push_str(&format!("{}\t{:.1}\t10.0\t15.0\n", i + 1, 75.0 + i as f64));
    }
    fs::write(path, s).unwrap();
}

#[test]
fn validate_command_ok() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("window.tsv");
    write_window(&input, 12);

    let mut cmd = Command::cargo_bin("kira-growthqc").unwrap();
    cmd.arg("validate").arg("--input").arg(&input).arg("--age-months").arg("24");
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("records: 12"));
    assert!(stdout.contains("height_cm: 75.0..86.0"));
}

#[test]
fn validate_command_rejects_short_window() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("window.tsv");
    write_window(&input, 11);

    let mut cmd = Command::cargo_bin("kira-growthqc").unwrap();
    cmd.arg("validate").arg("--input").arg(&input);
    cmd.assert().failure();
}

#[test]
fn validate_command_rejects_young_age() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("window.tsv");
    write_window(&input, 12);

    let mut cmd = Command::cargo_bin("kira-growthqc").unwrap();
    cmd.arg("validate").arg("--input").arg(&input).arg("--age-months").arg("9");
    cmd.assert().failure();
}
