//! Conversion settings.
//!
//! Every field has a default, so a YAML file only needs the keys it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! domain: https://schemas.example.org
//! generator: xsd2json
//! indent: 2
//! format: json
//! generated_at: 2019-06-03T10:00:00Z
//! ```

use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::OutputFormat;

/// Domain used for `$id` when none is configured.
pub const DEFAULT_DOMAIN: &str = "https://example.com";

/// Generator name quoted in the `description` header.
pub const DEFAULT_GENERATOR: &str = "xsd2json";

/// Indent width of pretty-printed JSON.
pub const DEFAULT_INDENT: usize = 3;

/// Settings for one conversion.
///
/// `input_name` and `output_name` are the file names quoted in the header;
/// callers set them per run rather than in the file.
///
/// # Examples
///
/// ```
/// use xsd2json_convert::{ConvertConfig, OutputFormat};
///
/// let config: ConvertConfig = serde_yaml::from_str("indent: 2").unwrap();
/// assert_eq!(config.indent, 2);
/// assert_eq!(config.domain, "https://example.com");
/// assert_eq!(config.format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Base of the `$id` URI.
    pub domain: String,
    /// Tool name quoted in the `description` header.
    pub generator: String,
    /// Spaces per nesting level in JSON output.
    pub indent: usize,
    pub format: OutputFormat,
    /// Fixed generation time; the current time when absent.
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub input_name: String,
    #[serde(skip)]
    pub output_name: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            generator: DEFAULT_GENERATOR.to_string(),
            indent: DEFAULT_INDENT,
            format: OutputFormat::default(),
            generated_at: None,
            input_name: String::new(),
            output_name: String::new(),
        }
    }
}

impl ConvertConfig {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ConvertError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::ConvertError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn with_names(
        mut self,
        input_name: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        self.input_name = input_name.into();
        self.output_name = output_name.into();
        self
    }

    /// Overrides the domain unless `domain` is empty.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        if !domain.is_empty() {
            self.domain = domain;
        }
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// The configured generation time, or now.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}
