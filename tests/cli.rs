use std::fs;
use std::path::Path;

use assert_cmd::{assert::Assert, Command};
use predicates::prelude::*;

mod stubs;

fn contracts(args: &[&str]) -> Assert {
    let mut cmd = Command::cargo_bin("contracts").unwrap();
    cmd.args(args).assert()
}

fn validate_assert(dto: &str, path: &Path) -> Assert {
    let mut cmd = Command::cargo_bin("contracts").unwrap();
    cmd.arg("validate").arg(dto).arg(path).assert()
}

#[test]
fn encode_float_array() {
    contracts(&["encode", "Float32Array", "[1.5,2.0]"])
        .success()
        .stdout("[1.5, 2]");
}

#[test]
fn encode_is_case_insensitive() {
    contracts(&["encode", "uint8", "255"]).success().stdout("255");
}

#[test]
fn encode_rejects_out_of_range_value() {
    contracts(&["encode", "Uint8", "256"])
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn value_types_lists_every_kind() {
    contracts(&["value-types"])
        .success()
        .stdout(predicate::str::contains("Bool\n").and(predicate::str::contains("Float64Array\n")));
}

#[test]
fn validate_good_reading() {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("reading.json");
    fs::write(&path, stubs::dtos::READING).unwrap();

    validate_assert("reading", &path).success().stdout("valid\n");
}

#[test]
fn validate_bad_reading() {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("reading.json");
    fs::write(&path, stubs::dtos::BAD_READING).unwrap();

    validate_assert("reading", &path)
        .failure()
        .stderr(predicate::str::contains("Origin is required; Device name must consist"));
}

#[test]
fn validate_yaml_device_profile() {
    let tempdir = tempfile::tempdir().unwrap();
    let good = tempdir.path().join("meter.yaml");
    let bad = tempdir.path().join("camera.yml");
    fs::write(&good, stubs::dtos::PROFILE_YAML).unwrap();
    fs::write(&bad, stubs::dtos::WRITABLE_BINARY_PROFILE_YAML).unwrap();

    validate_assert("device-profile", &good).success().stdout("valid\n");
    validate_assert("device-profile", &bad)
        .failure()
        .stderr(predicate::str::contains("does not support write access"));
}

#[test]
fn validate_unknown_dto_fails() {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("thing.json");
    fs::write(&path, "{}").unwrap();

    validate_assert("thing", &path)
        .failure()
        .stderr(predicate::str::contains("Unknown DTO 'thing'"));
}

#[test]
fn unknown_subcommand_fails() {
    contracts(&["frobnicate"])
        .failure()
        .stderr(predicate::str::contains("Subcommand must be one of"));
}
