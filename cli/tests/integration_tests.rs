use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

const CODE_XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Document" type="Code"/>
  <xs:simpleType name="Code">
    <xs:restriction base="xs:string">
      <xs:enumeration value="A"/>
      <xs:enumeration value="B"/>
    </xs:restriction>
  </xs:simpleType>
</xs:schema>
"#;

const AMOUNT_XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Amt" type="Amount"/>
  <xs:simpleType name="Ccy">
    <xs:restriction base="xs:string">
      <xs:pattern value="[A-Z]{3}"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:complexType name="Amount">
    <xs:sequence>
      <xs:element name="Value" type="xs:decimal"/>
    </xs:sequence>
    <xs:attribute name="Ccy" type="Ccy" use="required"/>
    <xs:attribute name="Note" type="xs:string"/>
  </xs:complexType>
</xs:schema>
"#;

fn xsd2json(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_xsd2json"));
    cmd.args(args).env_remove("RUST_LOG");
    cmd
}

fn write_xsd(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn run_in_out(input: &Path, output: &Path, extra: &[&str], epoch: &str) -> Output {
    let mut args = vec!["--in", input.to_str().unwrap(), "--out", output.to_str().unwrap()];
    args.extend_from_slice(extra);
    xsd2json(&args)
        .env("SOURCE_DATE_EPOCH", epoch)
        .output()
        .expect("failed to run xsd2json")
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("output should exist");
    serde_json::from_str(&text).expect("output should be valid JSON")
}

#[test]
fn converts_enum_root() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "code.xsd", CODE_XSD);
    let output = dir.path().join("code.json");

    let out = run_in_out(&input, &output, &[], "1559556000");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let schema = read_json(&output);
    assert_eq!(schema["$id"], "https://example.com/code.json");
    assert_eq!(schema["$schema"], "http://json-schema.org/draft-04/schema#");
    assert_eq!(schema["title"], "code.json");
    assert_eq!(
        schema["description"],
        "Derived from code.xsd by 'xsd2json' on Mon, 03 Jun 2019 10:00:00 GMT."
    );
    assert_eq!(schema["enum"], serde_json::json!(["A", "B"]));
    assert_eq!(schema["definitions"]["Code"]["type"], "string");
}

#[test]
fn required_and_optional_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "amount.xsd", AMOUNT_XSD);
    let output = dir.path().join("amount.json");

    let out = run_in_out(&input, &output, &["--dom", "https://iso.example"], "0");
    assert!(out.status.success());

    let schema = read_json(&output);
    assert_eq!(schema["$id"], "https://iso.example/amount.json");
    assert_eq!(schema["required"], serde_json::json!(["@Ccy", "Value"]));
    assert_eq!(schema["properties"]["@Ccy"]["$ref"], "#/definitions/Ccy");
    assert_eq!(schema["properties"]["@Note"]["type"], "string");
    assert_eq!(schema["additionalProperties"], false);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "amount.xsd", AMOUNT_XSD);
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    assert!(run_in_out(&input, &first, &[], "1700000000").status.success());
    assert!(run_in_out(&input, &second, &[], "1700000000").status.success());

    let first = fs::read_to_string(first).unwrap();
    let second = fs::read_to_string(second).unwrap();
    // titles differ by file name only
    assert_eq!(first.replace("first.json", "x"), second.replace("second.json", "x"));
    assert!(first.starts_with("{\n   \"$id\""));
}

#[test]
fn config_file_sets_format_and_indent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "code.xsd", CODE_XSD);
    let output = dir.path().join("code.json");
    let config = dir.path().join("xsd2json.yml");
    fs::write(
        &config,
        "domain: https://cfg.example\nindent: 2\ngenerated_at: 2020-01-01T00:00:00Z\n",
    )
    .unwrap();

    let out = run_in_out(&input, &output, &["--config", config.to_str().unwrap()], "0");
    assert!(out.status.success());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("{\n  \"$id\": \"https://cfg.example/code.json\""));
    assert!(text.contains("on Wed, 01 Jan 2020 00:00:00 GMT."));
}

#[test]
fn yaml_output_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "code.xsd", CODE_XSD);
    let output = dir.path().join("code.yaml");
    let report = dir.path().join("report.json");

    let out = run_in_out(
        &input,
        &output,
        &["--format", "yaml", "--report", report.to_str().unwrap()],
        "0",
    );
    assert!(out.status.success());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("title: code.yaml"));

    let report = read_json(&report);
    assert_eq!(report["input"], "code.xsd");
    assert_eq!(report["root"], "Document");
    assert_eq!(report["simple_types"], 1);
    assert_eq!(report["success"], true);
    assert_eq!(report["source_sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn diagnostics_do_not_change_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(
        dir.path(),
        "dangling.xsd",
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="doc" type="Doc"/>
  <xs:complexType name="Doc">
    <xs:complexContent>
      <xs:extension base="Later"/>
    </xs:complexContent>
  </xs:complexType>
</xs:schema>"#,
    );
    let output = dir.path().join("dangling.json");

    let out = run_in_out(&input, &output, &[], "0");
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("base type 'Later' not found"), "stderr: {stderr}");
    assert!(stderr.contains("1 warnings"), "stderr: {stderr}");
    assert!(output.exists());
}

#[test]
fn missing_arguments_exit_1() {
    let out = xsd2json(&["--in", "only.xsd"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn help_exits_0() {
    let out = xsd2json(&["--help"]).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--dom"));
}

#[test]
fn bad_config_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "code.xsd", CODE_XSD);
    let config = dir.path().join("bad.yml");
    fs::write(&config, "indent: lots\n").unwrap();

    let out = run_in_out(
        &input,
        &dir.path().join("out.json"),
        &["--config", config.to_str().unwrap()],
        "0",
    );
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unreadable_input_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in_out(&dir.path().join("absent.xsd"), &dir.path().join("out.json"), &[], "0");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read"));
}

#[test]
fn unwritable_output_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "code.xsd", CODE_XSD);
    let output = dir.path().join("no-such-dir").join("out.json");

    let out = run_in_out(&input, &output, &[], "0");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to write"));
}

#[test]
fn malformed_xml_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_xsd(dir.path(), "broken.xsd", "<xs:schema><xs:element></xs:schema>");
    let output = dir.path().join("out.json");

    let out = run_in_out(&input, &output, &[], "0");
    assert_eq!(out.status.code(), Some(3));
    assert!(!output.exists());
}
