//! Conversion of XML Schema (XSD) documents into JSON Schema draft-04.
//!
//! The pipeline runs in two passes. [`events::TagEvents`] reads the XSD and
//! [`builder::SchemaBuilder`] turns its tags into a
//! [`TypeRegistry`](xsd2json_core::TypeRegistry), resolving derivation as it
//! goes. [`emitter::SchemaEmitter`] then writes the registry out as a JSON
//! Schema document.
//!
//! # Main entry points
//!
//! - [`convert_str`]: XSD text in, document and report out.
//! - [`build_registry`]: only the first pass, with its diagnostics.
//! - [`format_document`]: render a document as JSON or YAML.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use xsd2json_convert::{ConvertConfig, convert_str};
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="Document" type="Code"/>
//!   <xs:simpleType name="Code">
//!     <xs:restriction base="xs:string">
//!       <xs:enumeration value="A"/>
//!       <xs:enumeration value="B"/>
//!     </xs:restriction>
//!   </xs:simpleType>
//! </xs:schema>"#;
//!
//! let config = ConvertConfig::default()
//!     .with_names("code.xsd", "code.json")
//!     .with_generated_at(Utc.with_ymd_and_hms(2019, 6, 3, 10, 0, 0).unwrap());
//! let conversion = convert_str(xsd, &config).unwrap();
//!
//! assert_eq!(conversion.document["$id"], "https://example.com/code.json");
//! assert_eq!(conversion.document["enum"], serde_json::json!(["A", "B"]));
//! assert!(conversion.report.success);
//! ```

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod events;
pub mod output;
pub mod report;

use serde_json::Value;
use tracing::debug;
use xsd2json_core::validate_registry;

pub use builder::{BuildOutcome, SchemaBuilder};
pub use config::ConvertConfig;
pub use diagnostics::{Diagnostic, DiagnosticRecord, Severity};
pub use emitter::{SchemaEmitter, SchemaHeader};
pub use error::{ConvertError, Result};
pub use output::{OutputFormat, format_document, format_report};
pub use report::ConversionReport;

/// A converted document and the report of its run.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Value,
    pub diagnostics: Vec<Diagnostic>,
    pub report: ConversionReport,
}

impl Conversion {
    /// Renders the document as configured.
    pub fn render(&self, config: &ConvertConfig) -> Result<String> {
        format_document(&self.document, config.format, config.indent)
    }
}

/// Builds and validates the type registry of an XSD document.
///
/// Builder diagnostics come first, followed by validation findings.
///
/// # Errors
///
/// Returns [`ConvertError::Xml`] if the document is not well-formed.
pub fn build_registry(xsd: &str) -> Result<BuildOutcome> {
    let mut builder = SchemaBuilder::new();
    for event in events::TagEvents::new(xsd) {
        builder.handle(&event?);
    }
    let mut outcome = builder.finish();
    for finding in validate_registry(&outcome.registry) {
        let diagnostic = Diagnostic::from(finding);
        tracing::warn!(code = diagnostic.code(), "{diagnostic}");
        outcome.diagnostics.push(diagnostic);
    }
    Ok(outcome)
}

/// Converts XSD text into a JSON Schema document.
///
/// # Errors
///
/// Returns [`ConvertError::Xml`] if the document is not well-formed.
/// Everything else the converter cannot handle is reported as a
/// [`Diagnostic`] and does not fail the conversion.
pub fn convert_str(xsd: &str, config: &ConvertConfig) -> Result<Conversion> {
    let BuildOutcome {
        registry,
        diagnostics,
    } = build_registry(xsd)?;
    debug!(
        simple = registry.simple_count(),
        complex = registry.complex_count(),
        "registry built"
    );

    let header = SchemaHeader::new(
        &config.domain,
        &config.input_name,
        &config.output_name,
        &config.generator,
        config.timestamp(),
    );
    let document = SchemaEmitter::new(&registry).emit(&header);

    let records: Vec<DiagnosticRecord> = diagnostics.iter().map(DiagnosticRecord::from).collect();
    let report = ConversionReport {
        input: config.input_name.clone(),
        output: config.output_name.clone(),
        source_sha256: report::sha256_hex(xsd.as_bytes()),
        simple_types: registry.simple_count(),
        complex_types: registry.complex_count(),
        root: registry.root().map(|root| root.name.clone()),
        success: records.iter().all(|record| record.severity != Severity::Error),
        diagnostics: records,
    };

    Ok(Conversion {
        document,
        diagnostics,
        report,
    })
}
