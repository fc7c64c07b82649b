//! Type model for schemas read from XSD.
//!
//! These types describe the subset of XML Schema that the converter
//! understands: elements, attributes, simple types with their facets and
//! complex types with a content model. They are plain data; the builder in
//! `xsd2json-convert` populates them and the emitter reads them back.

use serde::{Deserialize, Serialize};

/// Upper occurrence bound of an element.
///
/// # Examples
///
/// ```
/// use xsd2json_core::MaxOccurs;
///
/// assert_eq!("unbounded".parse::<MaxOccurs>(), Ok(MaxOccurs::Unbounded));
/// assert_eq!("5".parse::<MaxOccurs>(), Ok(MaxOccurs::Bounded(5)));
/// assert!(MaxOccurs::Bounded(5).is_repeated());
/// assert!(!MaxOccurs::Bounded(1).is_repeated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxOccurs {
    /// A finite bound.
    Bounded(u64),
    /// The literal `unbounded`.
    Unbounded,
}

impl MaxOccurs {
    /// Returns `true` if more than one occurrence is allowed.
    pub fn is_repeated(self) -> bool {
        match self {
            Self::Bounded(n) => n > 1,
            Self::Unbounded => true,
        }
    }
}

impl std::str::FromStr for MaxOccurs {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "unbounded" {
            return Ok(Self::Unbounded);
        }
        s.trim().parse().map(Self::Bounded)
    }
}

/// An element declaration.
///
/// `min_occurs` and `max_occurs` stay `None` when the XSD leaves them out,
/// which is different from an explicit `0`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    /// Type name as written, possibly with a namespace prefix.
    pub type_ref: String,
    pub min_occurs: Option<u64>,
    pub max_occurs: Option<MaxOccurs>,
}

impl Element {
    /// Creates an element with unspecified occurrence bounds.
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            min_occurs: None,
            max_occurs: None,
        }
    }

    /// Sets `minOccurs`.
    pub fn with_min_occurs(mut self, min: u64) -> Self {
        self.min_occurs = Some(min);
        self
    }

    /// Sets `maxOccurs`.
    pub fn with_max_occurs(mut self, max: MaxOccurs) -> Self {
        self.max_occurs = Some(max);
        self
    }

    /// Returns `true` unless `minOccurs` is explicitly `0`.
    ///
    /// XSD defaults `minOccurs` to 1, so an element without the attribute is
    /// required.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsd2json_core::Element;
    ///
    /// assert!(Element::new("a", "xs:string").is_required());
    /// assert!(!Element::new("a", "xs:string").with_min_occurs(0).is_required());
    /// ```
    pub fn is_required(&self) -> bool {
        self.min_occurs != Some(0)
    }

    /// Returns `true` if the element may occur more than once.
    pub fn is_repeated(&self) -> bool {
        self.max_occurs.is_some_and(MaxOccurs::is_repeated)
    }
}

/// An attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub type_ref: String,
    pub default_value: Option<String>,
    pub fixed_value: Option<String>,
    /// `true` iff declared with `use="required"`.
    pub required: bool,
}

impl Attribute {
    /// Creates an optional attribute.
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            ..Self::default()
        }
    }

    /// Marks the attribute as `use="required"`.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Value of the `whiteSpace` facet.
///
/// Unknown spellings are kept verbatim; the facet is only ever copied into
/// an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteSpace {
    Preserve,
    Replace,
    Collapse,
    Other(String),
}

impl WhiteSpace {
    /// Parses the facet value without validating it.
    pub fn parse(value: &str) -> Self {
        match value {
            "preserve" => Self::Preserve,
            "replace" => Self::Replace,
            "collapse" => Self::Collapse,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the facet value as written in XSD.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preserve => "preserve",
            Self::Replace => "replace",
            Self::Collapse => "collapse",
            Self::Other(value) => value,
        }
    }
}

/// Integer-valued facets of a simple type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntFacet {
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    TotalDigits,
    FractionDigits,
    Length,
    MinLength,
    MaxLength,
}

impl IntFacet {
    /// Every integer facet, in declaration order.
    pub const ALL: [IntFacet; 9] = [
        Self::MinInclusive,
        Self::MaxInclusive,
        Self::MinExclusive,
        Self::MaxExclusive,
        Self::TotalDigits,
        Self::FractionDigits,
        Self::Length,
        Self::MinLength,
        Self::MaxLength,
    ];

    /// Maps an XSD tag name to its facet.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsd2json_core::IntFacet;
    ///
    /// assert_eq!(IntFacet::from_tag("maxLength"), Some(IntFacet::MaxLength));
    /// assert_eq!(IntFacet::from_tag("pattern"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.tag() == tag)
    }

    /// XSD tag name of this facet.
    pub fn tag(self) -> &'static str {
        match self {
            Self::MinInclusive => "minInclusive",
            Self::MaxInclusive => "maxInclusive",
            Self::MinExclusive => "minExclusive",
            Self::MaxExclusive => "maxExclusive",
            Self::TotalDigits => "totalDigits",
            Self::FractionDigits => "fractionDigits",
            Self::Length => "length",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
        }
    }
}

/// A simple type: a scalar base plus facets.
///
/// `attributes` is only populated when a complex type with simple content
/// was folded into this simple type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimpleType {
    pub name: String,
    pub base: String,
    pub attributes: Vec<Attribute>,
    pub enumeration: Vec<String>,
    pub min_inclusive: Option<i64>,
    pub max_inclusive: Option<i64>,
    pub min_exclusive: Option<i64>,
    pub max_exclusive: Option<i64>,
    pub total_digits: Option<i64>,
    pub fraction_digits: Option<i64>,
    pub length: Option<i64>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub white_space: Option<WhiteSpace>,
    /// Regex source exactly as written in the XSD.
    pub pattern: Option<String>,
}

impl SimpleType {
    /// Creates an empty simple type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the base type.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Appends an enumeration literal.
    pub fn with_enum_value(mut self, value: impl Into<String>) -> Self {
        self.enumeration.push(value.into());
        self
    }

    /// Returns the slot holding an integer facet.
    pub fn facet_mut(&mut self, facet: IntFacet) -> &mut Option<i64> {
        match facet {
            IntFacet::MinInclusive => &mut self.min_inclusive,
            IntFacet::MaxInclusive => &mut self.max_inclusive,
            IntFacet::MinExclusive => &mut self.min_exclusive,
            IntFacet::MaxExclusive => &mut self.max_exclusive,
            IntFacet::TotalDigits => &mut self.total_digits,
            IntFacet::FractionDigits => &mut self.fraction_digits,
            IntFacet::Length => &mut self.length,
            IntFacet::MinLength => &mut self.min_length,
            IntFacet::MaxLength => &mut self.max_length,
        }
    }
}

/// Content model of a complex type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentModel {
    #[default]
    Unspecified,
    Sequence,
    Choice,
    All,
}

/// A complex type: attributes plus child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplexType {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub content_model: ContentModel,
    /// Child elements, unique by name.
    pub elements: Vec<Element>,
    /// Scalar value carrier for simple content with attributes.
    pub simple_base: Option<SimpleType>,
    /// Set by an `any` particle.
    pub allows_wildcard: bool,
}

impl ComplexType {
    /// Creates an empty complex type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Inserts an element, replacing one with the same name in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use xsd2json_core::{ComplexType, Element};
    ///
    /// let mut ty = ComplexType::new("Party");
    /// ty.upsert_element(Element::new("Nm", "xs:string"));
    /// ty.upsert_element(Element::new("Id", "xs:string"));
    /// ty.upsert_element(Element::new("Nm", "Max140Text"));
    ///
    /// assert_eq!(ty.elements.len(), 2);
    /// assert_eq!(ty.elements[0].type_ref, "Max140Text");
    /// ```
    pub fn upsert_element(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.name == element.name) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    /// Builder-style [`upsert_element`](Self::upsert_element).
    pub fn with_element(mut self, element: Element) -> Self {
        self.upsert_element(element);
        self
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Shape shared by simple and complex types: a name and an attribute list.
pub trait TypeShape {
    fn name(&self) -> &str;
    fn attributes(&self) -> &[Attribute];
}

impl TypeShape for SimpleType {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl TypeShape for ComplexType {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}
