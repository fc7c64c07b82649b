//! Incremental construction of the type registry from tag events.
//!
//! The builder holds at most one open type at a time. Child tags fill in
//! that type and its closing tag moves it into the [`TypeRegistry`]. Type
//! derivation is resolved immediately against what is already registered,
//! so a base type must be declared before the types deriving from it.
//!
//! # Example
//!
//! ```
//! use xsd2json_convert::builder::SchemaBuilder;
//! use xsd2json_convert::events::TagEvents;
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="doc" type="Code"/>
//!   <xs:simpleType name="Code">
//!     <xs:restriction base="xs:string">
//!       <xs:enumeration value="A"/>
//!       <xs:enumeration value="B"/>
//!     </xs:restriction>
//!   </xs:simpleType>
//! </xs:schema>"#;
//!
//! let mut builder = SchemaBuilder::new();
//! for event in TagEvents::new(xsd) {
//!     builder.handle(&event.unwrap());
//! }
//! let outcome = builder.finish();
//! let code = outcome.registry.simple("Code").unwrap();
//! assert_eq!(code.enumeration, vec!["A", "B"]);
//! assert!(outcome.diagnostics.is_empty());
//! ```

use regex::Regex;
use tracing::{debug, warn};
use xsd2json_core::{
    Attribute, ComplexType, ContentModel, Element, IntFacet, IntrinsicType, SimpleType,
    TypeRegistry, WhiteSpace, derive_complex, derive_simple, intrinsic_type, is_builtin,
};

use crate::diagnostics::Diagnostic;
use crate::events::{StartTag, TagEvent};

/// What the builder is currently filling in.
#[derive(Debug, Default)]
enum OpenType {
    #[default]
    Idle,
    /// The root element is open and no type is.
    Element,
    /// `from_complex` marks a complex type folded into its simple base.
    SimpleType { ty: SimpleType, from_complex: bool },
    ComplexType(ComplexType),
}

impl OpenType {
    fn type_name(&self) -> Option<&str> {
        match self {
            Self::SimpleType { ty, .. } => Some(&ty.name),
            Self::ComplexType(ty) => Some(&ty.name),
            Self::Idle | Self::Element => None,
        }
    }
}

/// Registry and diagnostics produced by one build.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub registry: TypeRegistry,
    pub diagnostics: Vec<Diagnostic>,
}

/// State machine turning tag events into a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    state: OpenType,
    in_simple_content: bool,
    // Depth inside a subtree being ignored; 0 when processing normally.
    skip_depth: usize,
    // Set by a malformed facet; the open type is dropped at its close.
    poisoned: bool,
    registry: TypeRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one event.
    pub fn handle(&mut self, event: &TagEvent) {
        match event {
            TagEvent::Start(tag) => self.start_tag(tag),
            TagEvent::End(name) => self.end_tag(name),
        }
    }

    /// Ends the build. A type left open by truncated input is dropped and
    /// reported.
    pub fn finish(mut self) -> BuildOutcome {
        if let Some(name) = self.state.type_name().map(str::to_string) {
            self.report(Diagnostic::TypeDiscarded { name });
        }
        BuildOutcome {
            registry: self.registry,
            diagnostics: self.diagnostics,
        }
    }

    pub fn start_tag(&mut self, tag: &StartTag) {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        match tag.name.as_str() {
            "element" => self.open_element(tag),
            "attribute" => self.open_attribute(tag),
            "sequence" => self.set_content_model(tag, ContentModel::Sequence),
            "choice" => self.set_content_model(tag, ContentModel::Choice),
            "all" => self.set_content_model(tag, ContentModel::All),
            "restriction" | "extension" => self.open_derivation(tag),
            "enumeration" => self.add_enumeration(tag),
            "whiteSpace" | "whitespace" => self.set_white_space(tag),
            "pattern" => self.set_pattern(tag),
            "simpleType" | "complexType" => self.open_type(tag),
            "any" => self.set_wildcard(tag),
            "simpleContent" => self.in_simple_content = true,
            "complexContent" | "schema" => {}
            "annotation" => self.skip_depth = 1,
            name => match IntFacet::from_tag(name) {
                Some(facet) => self.set_int_facet(tag, facet),
                None => self.report(Diagnostic::UnrecognizedTag {
                    tag: tag.name.clone(),
                    attributes: tag.attributes.clone(),
                }),
            },
        }
    }

    pub fn end_tag(&mut self, name: &str) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match name {
            "simpleType" | "complexType" => self.close_type(),
            "simpleContent" => self.in_simple_content = false,
            "element" => {
                if matches!(self.state, OpenType::Element) {
                    self.state = OpenType::Idle;
                }
            }
            _ => {}
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(code = diagnostic.code(), severity = %diagnostic.severity(), "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn orphan(&mut self, tag: &StartTag) {
        self.report(Diagnostic::OrphanConstruct {
            tag: tag.name.clone(),
        });
    }

    fn open_element(&mut self, tag: &StartTag) {
        let mut element = Element::new(tag.attr("name").unwrap_or_default(), "");
        for (name, value) in &tag.attributes {
            match name.as_str() {
                "name" => {}
                "type" => element.type_ref = value.clone(),
                "minOccurs" => match value.trim().parse() {
                    Ok(min) => element.min_occurs = Some(min),
                    Err(_) => self.invalid_occurs(&element, name, value),
                },
                "maxOccurs" => match value.parse() {
                    Ok(max) => element.max_occurs = Some(max),
                    Err(_) => self.invalid_occurs(&element, name, value),
                },
                _ => self.report(Diagnostic::UnrecognizedAttribute {
                    tag: tag.name.clone(),
                    name: name.clone(),
                    value: value.clone(),
                }),
            }
        }

        match &mut self.state {
            OpenType::ComplexType(ty) => ty.upsert_element(element),
            OpenType::SimpleType { .. } => self.orphan(tag),
            OpenType::Idle | OpenType::Element => {
                self.registry.set_root(element);
                self.state = OpenType::Element;
            }
        }
    }

    fn invalid_occurs(&mut self, element: &Element, attribute: &str, value: &str) {
        self.report(Diagnostic::InvalidOccurs {
            element: element.name.clone(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }

    fn open_attribute(&mut self, tag: &StartTag) {
        let mut attribute = Attribute::default();
        for (name, value) in &tag.attributes {
            match name.as_str() {
                "name" => attribute.name = value.clone(),
                "type" => attribute.type_ref = value.clone(),
                "default" => attribute.default_value = Some(value.clone()),
                "fixed" => attribute.fixed_value = Some(value.clone()),
                "use" => attribute.required = value == "required",
                _ => self.report(Diagnostic::UnrecognizedAttribute {
                    tag: tag.name.clone(),
                    name: name.clone(),
                    value: value.clone(),
                }),
            }
        }

        match &mut self.state {
            OpenType::SimpleType { ty, .. } => ty.attributes.push(attribute),
            OpenType::ComplexType(ty) => match ty.simple_base.as_mut() {
                Some(simple) => simple.attributes.push(attribute),
                None => ty.attributes.push(attribute),
            },
            OpenType::Idle | OpenType::Element => self.orphan(tag),
        }
    }

    fn set_content_model(&mut self, tag: &StartTag, model: ContentModel) {
        match &mut self.state {
            OpenType::ComplexType(ty) => ty.content_model = model,
            _ => self.orphan(tag),
        }
    }

    fn set_wildcard(&mut self, tag: &StartTag) {
        match &mut self.state {
            OpenType::ComplexType(ty) => ty.allows_wildcard = true,
            _ => self.orphan(tag),
        }
    }

    fn open_type(&mut self, tag: &StartTag) {
        if let Some(owner) = self.state.type_name() {
            let diagnostic = Diagnostic::NestedTypeSkipped {
                owner: owner.to_string(),
                tag: tag.name.clone(),
            };
            self.report(diagnostic);
            self.skip_depth = 1;
            return;
        }

        let name = match tag.attr("name") {
            Some(name) => name.to_string(),
            None => match (&self.state, self.registry.root_mut()) {
                // one level of anonymous type, named after the root element
                (OpenType::Element, Some(root)) => {
                    if root.type_ref.is_empty() {
                        root.type_ref = root.name.clone();
                    }
                    root.name.clone()
                }
                _ => {
                    self.report(Diagnostic::AnonymousType {
                        tag: tag.name.clone(),
                    });
                    self.skip_depth = 1;
                    return;
                }
            },
        };

        self.poisoned = false;
        self.in_simple_content = false;
        self.state = if tag.name == "simpleType" {
            OpenType::SimpleType {
                ty: SimpleType::new(name),
                from_complex: false,
            }
        } else {
            OpenType::ComplexType(ComplexType::new(name))
        };
    }

    fn close_type(&mut self) {
        let poisoned = std::mem::replace(&mut self.poisoned, false);
        self.in_simple_content = false;
        let state = std::mem::take(&mut self.state);
        if poisoned {
            if let Some(name) = state.type_name() {
                let name = name.to_string();
                self.report(Diagnostic::TypeDiscarded { name });
            }
            return;
        }
        match state {
            OpenType::SimpleType { ty, from_complex } => {
                if from_complex {
                    debug!(name = %ty.name, base = %ty.base, "complex type folded into simple type");
                }
                self.registry.register_simple(ty);
            }
            OpenType::ComplexType(ty) => {
                self.registry.register_complex(ty);
            }
            OpenType::Idle | OpenType::Element => {}
        }
    }

    fn open_derivation(&mut self, tag: &StartTag) {
        let base = tag.attr("base").unwrap_or_default();
        self.state = match std::mem::take(&mut self.state) {
            OpenType::SimpleType { mut ty, from_complex } => {
                ty.base = base.to_string();
                OpenType::SimpleType { ty, from_complex }
            }
            OpenType::ComplexType(ty) => self.derive_from(ty, base),
            other => {
                self.orphan(tag);
                other
            }
        };
    }

    /// Resolves the base of a complex type's extension or restriction.
    fn derive_from(&mut self, ty: ComplexType, base: &str) -> OpenType {
        if let Some(simple) = self.registry.simple(base) {
            return OpenType::SimpleType {
                ty: derive_simple(simple, &ty.name),
                from_complex: true,
            };
        }
        if let Some(complex) = self.registry.complex(base) {
            return OpenType::ComplexType(derive_complex(complex, &ty.name));
        }
        if intrinsic_type(base) == Some(IntrinsicType::Any) {
            return OpenType::ComplexType(ty);
        }
        if self.in_simple_content && is_builtin(base) {
            let mut ty = ty;
            ty.simple_base = Some(SimpleType::new(ty.name.clone()).with_base(base));
            return OpenType::ComplexType(ty);
        }
        self.report(Diagnostic::UnresolvedBase {
            owner: ty.name.clone(),
            base: base.to_string(),
        });
        OpenType::ComplexType(ty)
    }

    /// The simple type that facets apply to, if any.
    fn facet_target(&mut self) -> Option<&mut SimpleType> {
        match &mut self.state {
            OpenType::SimpleType { ty, .. } => Some(ty),
            OpenType::ComplexType(ty) => ty.simple_base.as_mut(),
            OpenType::Idle | OpenType::Element => None,
        }
    }

    /// Reads a facet's sole attribute.
    fn facet_value(&mut self, tag: &StartTag) -> Option<String> {
        if self.facet_target().is_none() {
            self.orphan(tag);
            return None;
        }
        match tag.attributes.as_slice() {
            [(_, value)] => Some(value.clone()),
            attributes => {
                let diagnostic = Diagnostic::MalformedFacet {
                    owner: self.state.type_name().unwrap_or_default().to_string(),
                    facet: tag.name.clone(),
                    found: attributes.len(),
                };
                self.report(diagnostic);
                self.poisoned = true;
                None
            }
        }
    }

    fn add_enumeration(&mut self, tag: &StartTag) {
        let Some(value) = self.facet_value(tag) else {
            return;
        };
        if let Some(target) = self.facet_target() {
            target.enumeration.push(value);
        }
    }

    fn set_int_facet(&mut self, tag: &StartTag, facet: IntFacet) {
        let Some(value) = self.facet_value(tag) else {
            return;
        };
        match value.trim().parse::<i64>() {
            Ok(parsed) => {
                if let Some(target) = self.facet_target() {
                    *target.facet_mut(facet) = Some(parsed);
                }
            }
            Err(_) => {
                let diagnostic = Diagnostic::InvalidFacetValue {
                    owner: self.state.type_name().unwrap_or_default().to_string(),
                    facet: tag.name.clone(),
                    value,
                };
                self.report(diagnostic);
            }
        }
    }

    fn set_white_space(&mut self, tag: &StartTag) {
        let Some(value) = self.facet_value(tag) else {
            return;
        };
        if let Some(target) = self.facet_target() {
            target.white_space = Some(WhiteSpace::parse(&value));
        }
    }

    fn set_pattern(&mut self, tag: &StartTag) {
        let Some(pattern) = self.facet_value(tag) else {
            return;
        };
        if let Err(err) = Regex::new(&pattern) {
            let diagnostic = Diagnostic::PatternNotPortable {
                owner: self.state.type_name().unwrap_or_default().to_string(),
                pattern: pattern.clone(),
                reason: err.to_string(),
            };
            self.report(diagnostic);
        }
        if let Some(target) = self.facet_target() {
            target.pattern = Some(pattern);
        }
    }
}
