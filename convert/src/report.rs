//! Structured summary of one conversion.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::diagnostics::{DiagnosticRecord, Severity};

/// Per-run conversion report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    /// Hex SHA-256 of the input text.
    pub source_sha256: String,
    pub simple_types: usize,
    pub complex_types: usize,
    /// Name of the root element, if one was declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub diagnostics: Vec<DiagnosticRecord>,
    /// `true` when no diagnostic has [`Severity::Error`].
    pub success: bool,
}

impl ConversionReport {
    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|record| record.severity == severity)
            .count()
    }

    /// One-line summary for logs.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsd2json_convert::ConversionReport;
    ///
    /// let report = ConversionReport {
    ///     input: "in.xsd".into(),
    ///     output: "out.json".into(),
    ///     source_sha256: String::new(),
    ///     simple_types: 3,
    ///     complex_types: 2,
    ///     root: Some("Document".into()),
    ///     diagnostics: vec![],
    ///     success: true,
    /// };
    /// assert_eq!(report.summary(), "in.xsd -> out.json: 3 simple, 2 complex types; 0 errors, 0 warnings");
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {} simple, {} complex types; {} errors, {} warnings",
            self.input,
            self.output,
            self.simple_types,
            self.complex_types,
            self.count(Severity::Error),
            self.count(Severity::Warning),
        )
    }
}

/// Hex-encoded SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_counts_by_severity() {
        let record = |severity| DiagnosticRecord {
            severity,
            code: "x".to_string(),
            message: String::new(),
        };
        let report = ConversionReport {
            input: "a.xsd".to_string(),
            output: "a.json".to_string(),
            source_sha256: String::new(),
            simple_types: 0,
            complex_types: 1,
            root: None,
            diagnostics: vec![
                record(Severity::Warning),
                record(Severity::Error),
                record(Severity::Warning),
            ],
            success: false,
        };
        assert_eq!(report.count(Severity::Warning), 2);
        assert_eq!(report.count(Severity::Error), 1);
        assert!(report.summary().ends_with("1 errors, 2 warnings"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("root").is_none());
        assert_eq!(json["diagnostics"][1]["severity"], "error");
    }
}
