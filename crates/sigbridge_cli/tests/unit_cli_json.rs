#![allow(missing_docs)]

use std::process::{Command, Output};

use serde_json::{Value, json};
use sigbridge_testkit::{fixture_json, fixture_path};

#[test]
fn parse_json_reports_native_expansion() {
	let json = run_json(&["parse", "a{s[Point]}", "--json", "--registry", &registry_arg()]);

	assert_eq!(json["signature"], "a{s[Point]}");
	assert_eq!(json["complete_types"], 1);
	assert_eq!(json["tokens"][0]["native"], "a{s(ii)}");
	assert_eq!(json["tokens"][0]["resource_kind"], "object");
	assert!(json["tokens"][0]["children"].is_array(), "expected child tokens");
}

#[test]
fn to_resource_prints_resource_json() {
	let ints = run_json(&["to-resource", "--sig", "ai", r#"{"Array":{"element":"i","items":[{"Int32":1},{"Int32":2}]}}"#]);
	assert_eq!(ints, json!([1, 2]));

	let bytes = run_json(&["to-resource", "--sig", "ay", r#"{"Bytes":[1,2,3]}"#]);
	assert_eq!(bytes, json!({"$bytes": "AQID"}));
}

#[test]
fn to_bus_uses_registry_dict_hints() {
	let state = fixture_json("lamp_state.json").to_string();
	let json = run_json(&["to-bus", "--sig", "[LampState]", "--registry", &registry_arg(), &state]);

	assert_eq!(json["Array"]["element"], "{sv}");
	let items = json["Array"]["items"].as_array().expect("dict items");
	assert_eq!(items.len(), 6);
	assert_eq!(items[1]["DictEntry"][0], json!({"String": "level"}));
	assert_eq!(items[1]["DictEntry"][1], json!({"Variant": {"Uint16": 42}}));
}

#[test]
fn to_bus_hint_selects_variant_content() {
	let json = run_json(&["to-bus", "--sig", "v", "--hint", "y", "7"]);
	assert_eq!(json, json!({"Variant": {"Byte": 7}}));
}

#[test]
fn infer_prints_signature() {
	let output = run(&["infer", r#"{"on": true, "grid": [[1.0, 2.0], [3.0, 4.0]]}"#]);
	assert!(output.status.success(), "command should succeed");
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "a{sv}");
}

#[test]
fn range_violation_exits_with_error() {
	let output = run(&["to-bus", "--sig", "y", "256"]);
	assert!(!output.status.success(), "command should fail");
	assert!(output.stdout.is_empty(), "stdout should stay empty");
	assert!(String::from_utf8_lossy(&output.stderr).contains("error:"), "expected error message on stderr");
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_sigbridge")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(output.status.success(), "command should succeed: {}", String::from_utf8_lossy(&output.stderr));
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn registry_arg() -> String {
	fixture_path("lamp_registry.json").display().to_string()
}
