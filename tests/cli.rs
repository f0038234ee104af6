//! CLI behavior tests: exit codes, output formats, init.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const FIXTURE: &str = "tests/fixtures/bicycle.json";

fn kano_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kano"));
    cmd.env_remove("KANO_LOG");
    cmd
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = kano_cmd();
    cmd.assert().failure().code(2);
}

#[test]
fn evaluate_linear_quality() {
    let mut cmd = kano_cmd();
    cmd.args(["evaluate", "3", "LQ", "--no-color"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("novelty = 3.000, area = 9.000, quadrant = Q1"));
}

#[test]
fn evaluate_accepts_negative_quality() {
    let mut cmd = kano_cmd();
    cmd.args(["evaluate", "-2", "MB", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["novelty"], -2.414);
    assert_eq!(value["area"], 4.828);
}

#[test]
fn evaluate_out_of_range_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["evaluate", "7", "LQ"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn evaluate_precision_above_maximum_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["evaluate", "3", "LQ", "--precision", "400"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("400"));
}

#[test]
fn evaluate_invalid_category_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["evaluate", "1", "XYZ"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid category 'XYZ'"));
}

#[test]
fn rescale_prints_json_array() {
    let mut cmd = kano_cmd();
    cmd.args(["rescale", "10", "20", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let values: Vec<f64> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values, vec![-2.0, 2.0]);
}

#[test]
fn rescale_scale_factor_and_huge_values() {
    let mut cmd = kano_cmd();
    cmd.args(["rescale", "10", "20", "--scale-factor", "1", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let values: Vec<f64> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values, vec![-1.0, 1.0]);

    let mut cmd = kano_cmd();
    cmd.args(["rescale", "1e200", "0", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let values: Vec<f64> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values, vec![2.0, -2.0]);
}

#[test]
fn rescale_zero_variance_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["rescale", "5"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("zero variance"));
}

#[test]
fn assess_console_report() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "--product", "1", "--no-color"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Innovation Assessment: Bicycle 1"))
        .stdout(predicate::str::contains("Design error field (Q3):"))
        .stdout(predicate::str::contains("Feature Name = MaxSpeed"))
        .stdout(predicate::str::contains("no features in this quadrant"));
}

#[test]
fn assess_json_output_valid() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "--product", "Bicycle 2", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["results"][0]["product"]["id"], 2);
    assert_eq!(value["results"][0]["records"].as_array().unwrap().len(), 3);
    assert!(value["meta"]["generatedAt"].is_string());
}

#[test]
fn assess_all_quiet() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "--all", "--quiet"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Bicycle 4 (bicycle)"))
        .stdout(predicate::str::contains("Bicycle 1 (bicycle): effective innovation = -"));
}

#[test]
fn assess_inverse_flag() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "-p", "1", "--inverse", "Weight", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"][0]["records"][0]["quadrant"], "Q2");
}

#[test]
fn assess_writes_svg_chart() {
    let dir = tempfile::TempDir::new().unwrap();
    let chart = dir.path().join("chart.svg");
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "-p", "3", "--legend", "--svg"])
        .arg(&chart);
    cmd.assert().success();
    let svg = fs::read_to_string(&chart).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Comfort: N=2.41"));
}

#[test]
fn assess_unknown_product_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", FIXTURE, "--product", "Unicycle"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unicycle"));
}

#[test]
fn file_not_found_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["assess", "nonexistent.json", "--all"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to read dataset"));
}

#[test]
fn assess_honors_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let dataset = dir.path().join("bicycle.json");
    fs::copy(FIXTURE, &dataset).unwrap();
    fs::write(
        dir.path().join(".kanorc.json"),
        r#"{ "precision": 1, "inverse": ["Weight"] }"#,
    )
    .unwrap();

    let mut cmd = kano_cmd();
    cmd.arg("assess").arg(&dataset).args(["-p", "1", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &value["results"][0];
    assert_eq!(result["precision"], 1);
    assert_eq!(result["records"][0]["novelty"], -0.4);
}

#[test]
fn generate_then_assess_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let dataset = dir.path().join("cars.json");
    let mut cmd = kano_cmd();
    cmd.args(["generate", "car", "--products", "12", "--seed", "42", "--out"])
        .arg(&dataset);
    cmd.assert().success();

    let mut cmd = kano_cmd();
    cmd.arg("assess").arg(&dataset).args(["--product", "Car 5", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"][0]["records"].as_array().unwrap().len(), 10);
}

#[test]
fn distribution_reports_fit_and_writes_chart() {
    let dir = tempfile::TempDir::new().unwrap();
    let chart = dir.path().join("weight.svg");
    let mut cmd = kano_cmd();
    cmd.args(["distribution", FIXTURE, "Weight", "--no-color", "--svg"])
        .arg(&chart);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Distribution: Weight in bicycle (4 values)"))
        .stdout(predicate::str::contains("mu = 15.000, sigma = 1.000"));
    let svg = fs::read_to_string(&chart).unwrap();
    assert!(svg.contains("Probability Plot"));
    assert_eq!(svg.matches(r#"class="quantile""#).count(), 4);
}

#[test]
fn distribution_json_and_unknown_feature() {
    let mut cmd = kano_cmd();
    cmd.args(["distribution", FIXTURE, "MaxSpeed", "--bins", "3", "--json"]);
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!((value["fit"]["mean"].as_f64().unwrap() - 30.0).abs() < 1e-9);
    assert_eq!(value["histogram"].as_array().unwrap().len(), 3);

    let mut cmd = kano_cmd();
    cmd.args(["distribution", FIXTURE, "Gears"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a column"));
}

#[test]
fn generate_unknown_catalog_exit_2() {
    let mut cmd = kano_cmd();
    cmd.args(["generate", "boat"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown catalog"));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".kanorc.json");
    let mut cmd = kano_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert().success();
    assert!(config_path.exists(), ".kanorc.json should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("precision"));
    assert!(content.contains("chart"));
}
