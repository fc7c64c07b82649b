//! Non-fatal findings recorded while converting.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xsd2json_core::ValidationError;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The construct was ignored or emitted best-effort.
    Warning,
    /// A type was dropped from the output.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A finding from building or validating the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Extension or restriction of a type that is not registered (yet).
    #[error("'{owner}': base type '{base}' not found")]
    UnresolvedBase { owner: String, base: String },
    /// A tag the converter does not model.
    #[error("unrecognized tag <{tag}>{}", format_attributes(.attributes))]
    UnrecognizedTag {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    /// An attribute the converter does not model.
    #[error("<{tag}>: unrecognized attribute {name}=\"{value}\"")]
    UnrecognizedAttribute {
        tag: String,
        name: String,
        value: String,
    },
    /// A facet without exactly one attribute.
    #[error("'{owner}': malformed <{facet}>: expected exactly one attribute, found {found}")]
    MalformedFacet {
        owner: String,
        facet: String,
        found: usize,
    },
    /// A type dropped because of an earlier malformed construct.
    #[error("type '{name}' discarded after malformed input")]
    TypeDiscarded { name: String },
    /// An integer facet whose value does not parse.
    #[error("'{owner}': <{facet}> value '{value}' is not an integer; ignored")]
    InvalidFacetValue {
        owner: String,
        facet: String,
        value: String,
    },
    /// A `minOccurs`/`maxOccurs` value that does not parse.
    #[error("element '{element}': {attribute}=\"{value}\" is not a valid occurrence; ignored")]
    InvalidOccurs {
        element: String,
        attribute: String,
        value: String,
    },
    /// A construct that needs an open type found none.
    #[error("<{tag}> outside of any type definition; ignored")]
    OrphanConstruct { tag: String },
    /// A type definition nested inside another open type.
    #[error("<{tag}> nested inside '{owner}' is not supported; skipped")]
    NestedTypeSkipped { owner: String, tag: String },
    /// A type definition at schema level without a name.
    #[error("anonymous <{tag}> outside an element; skipped")]
    AnonymousType { tag: String },
    /// A pattern the `regex` crate cannot compile.
    #[error("'{owner}': pattern '{pattern}' may not be portable: {reason}")]
    PatternNotPortable {
        owner: String,
        pattern: String,
        reason: String,
    },
    /// An unresolved reference left in the completed registry.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl Diagnostic {
    /// Severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MalformedFacet { .. } | Self::TypeDiscarded { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Stable snake_case code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedBase { .. } => "unresolved_base",
            Self::UnrecognizedTag { .. } => "unrecognized_tag",
            Self::UnrecognizedAttribute { .. } => "unrecognized_attribute",
            Self::MalformedFacet { .. } => "malformed_facet",
            Self::TypeDiscarded { .. } => "type_discarded",
            Self::InvalidFacetValue { .. } => "invalid_facet_value",
            Self::InvalidOccurs { .. } => "invalid_occurs",
            Self::OrphanConstruct { .. } => "orphan_construct",
            Self::NestedTypeSkipped { .. } => "nested_type_skipped",
            Self::AnonymousType { .. } => "anonymous_type",
            Self::PatternNotPortable { .. } => "pattern_not_portable",
            Self::Validation(err) => match err {
                ValidationError::MissingRoot => "missing_root",
                ValidationError::UnresolvedRootType { .. } => "unresolved_root_type",
                ValidationError::DanglingElementType { .. } => "dangling_element_type",
                ValidationError::DanglingAttributeType { .. } => "dangling_attribute_type",
                ValidationError::DanglingSimpleBase { .. } => "dangling_simple_base",
                ValidationError::DuplicateTypeName { .. } => "duplicate_type_name",
            },
        }
    }
}

fn format_attributes(attributes: &[(String, String)]) -> String {
    attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{value}\""))
        .collect()
}

/// Serializable form of a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            severity: diagnostic.severity(),
            code: diagnostic.code().to_string(),
            message: diagnostic.to_string(),
        }
    }
}
