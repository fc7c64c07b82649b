//! Output formatting for documents and reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::report::ConversionReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Renders a schema document.
///
/// JSON is pretty-printed with `indent` spaces per level and ends with a
/// newline.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use xsd2json_convert::{OutputFormat, format_document};
///
/// let text = format_document(&json!({"type": "string"}), OutputFormat::Json, 3).unwrap();
/// assert_eq!(text, "{\n   \"type\": \"string\"\n}\n");
/// ```
pub fn format_document(document: &Value, format: OutputFormat, indent: usize) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut text = pretty_json(document, indent)?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
    }
}

/// Renders a conversion report.
pub fn format_report(report: &ConversionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
    }
}

fn pretty_json(value: &impl Serialize, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_indent_width_is_configurable() {
        let document = json!({"a": {"b": 1}});
        assert_eq!(
            format_document(&document, OutputFormat::Json, 2).unwrap(),
            "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n"
        );
        assert_eq!(
            format_document(&document, OutputFormat::Json, 0).unwrap(),
            "{\n\"a\": {\n\"b\": 1\n}\n}\n"
        );
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let document = json!({"$id": "x", "$schema": "y", "definitions": {}});
        let text = format_document(&document, OutputFormat::Json, 3).unwrap();
        let id = text.find("$id").unwrap();
        let schema = text.find("$schema").unwrap();
        assert!(id < schema);
    }

    #[test]
    fn test_yaml_output() {
        let document = json!({"title": "out.json", "required": ["a"]});
        let text = format_document(&document, OutputFormat::Yaml, 3).unwrap();
        assert_eq!(text, "title: out.json\nrequired:\n- a\n");
    }

    #[test]
    fn test_format_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OutputFormat::Yaml).unwrap(), "\"yaml\"");
        let format: OutputFormat = serde_yaml::from_str("json").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
