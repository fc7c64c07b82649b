//! JSON Schema draft-04 emission.
//!
//! [`SchemaEmitter`] reads a completed [`TypeRegistry`] and builds the
//! output document as a [`serde_json::Value`]. The document holds the
//! header, the root element's type body inlined at the top level, and a
//! `definitions` object with every simple type followed by every complex
//! type, each group sorted by name.
//!
//! Element and attribute references point into `definitions`:
//!
//! ```text
//! {"$ref": "#/definitions/Max35Text"}
//! ```
//!
//! Attributes appear as `@name` properties. A simple type carrying
//! attributes becomes an object whose scalar value is the `#value` property.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::{Map, Number, Value, json};
use xsd2json_core::{
    ComplexType, ContentModel, Element, IntrinsicType, JsonPrimitive, MaxOccurs, SimpleType,
    TypeRegistry, TypeShape, builtin_primitive, intrinsic_type, is_builtin, local_name,
    map_type_name,
};

/// `$schema` of every emitted document.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// Timestamp layout of the `description` header (RFC 1123).
pub const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Top-level identification of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaHeader {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl SchemaHeader {
    /// Builds the header for converting `input_name` into `output_name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use xsd2json_convert::emitter::SchemaHeader;
    ///
    /// let at = Utc.with_ymd_and_hms(2019, 6, 3, 10, 0, 0).unwrap();
    /// let header = SchemaHeader::new("https://example.com/", "pain.xsd", "pain.json", "xsd2json", at);
    /// assert_eq!(header.id, "https://example.com/pain.json");
    /// assert_eq!(
    ///     header.description,
    ///     "Derived from pain.xsd by 'xsd2json' on Mon, 03 Jun 2019 10:00:00 GMT."
    /// );
    /// ```
    pub fn new(
        domain: &str,
        input_name: &str,
        output_name: &str,
        generator: &str,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}/{output_name}", domain.trim_end_matches('/')),
            title: output_name.to_string(),
            description: format!(
                "Derived from {input_name} by '{generator}' on {}.",
                generated_at.format(TIMESTAMP_FORMAT)
            ),
        }
    }
}

/// Builds JSON Schema values from a registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEmitter<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> SchemaEmitter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Emits the whole document.
    pub fn emit(&self, header: &SchemaHeader) -> Value {
        let mut document = Map::new();
        document.insert("$id".into(), header.id.clone().into());
        document.insert("$schema".into(), DRAFT_04.into());
        document.insert("title".into(), header.title.clone().into());
        document.insert("description".into(), header.description.clone().into());
        document.extend(self.root_body());
        document.insert("definitions".into(), Value::Object(self.definitions()));
        Value::Object(document)
    }

    /// Body of the root element's type.
    ///
    /// Tries the complex types, the simple types, then the built-ins, and
    /// finally a complex type named like the root element. Empty when the
    /// root is missing or nothing resolves.
    pub fn root_body(&self) -> Map<String, Value> {
        let Some(root) = self.registry.root() else {
            return Map::new();
        };
        let type_ref = root.type_ref.as_str();
        if !type_ref.is_empty() {
            if let Some(ty) = self.registry.complex(type_ref) {
                return self.complex_body(ty);
            }
            if let Some(ty) = self.registry.simple(type_ref) {
                return self.simple_body(ty);
            }
            if is_builtin(type_ref) {
                if let Value::Object(body) = self.type_reference(type_ref) {
                    return body;
                }
            }
        }
        match self.registry.complex(&root.name) {
            Some(ty) => self.complex_body(ty),
            None => Map::new(),
        }
    }

    /// All type definitions, simple types first.
    pub fn definitions(&self) -> Map<String, Value> {
        let simple: Vec<&SimpleType> = self.registry.simple_types().collect();
        let complex: Vec<&ComplexType> = self.registry.complex_types().collect();

        let simple_bodies: Vec<(String, Value)> = simple
            .par_iter()
            .map(|ty| (ty.name.clone(), Value::Object(self.simple_body(ty))))
            .collect();
        let complex_bodies: Vec<(String, Value)> = complex
            .par_iter()
            .map(|ty| (ty.name.clone(), Value::Object(self.complex_body(ty))))
            .collect();

        simple_bodies.into_iter().chain(complex_bodies).collect()
    }

    /// Body of a simple type definition.
    pub fn simple_body(&self, ty: &SimpleType) -> Map<String, Value> {
        if ty.attributes.is_empty() {
            return self.scalar_body(ty);
        }

        let mut properties = Map::new();
        properties.insert("#value".into(), Value::Object(self.scalar_body(ty)));
        let mut required = vec!["#value".to_string()];
        self.attribute_properties(ty, &mut properties, &mut required);

        let mut body = Map::new();
        body.insert("type".into(), "object".into());
        body.insert("properties".into(), Value::Object(properties));
        body.insert("required".into(), json!(required));
        body.insert("additionalProperties".into(), false.into());
        body
    }

    /// Body of a complex type definition.
    pub fn complex_body(&self, ty: &ComplexType) -> Map<String, Value> {
        if let Some(simple) = &ty.simple_base {
            return self.simple_body(simple);
        }

        let choice = ty.content_model == ContentModel::Choice;
        let mut properties = Map::new();
        let mut required = Vec::new();
        self.attribute_properties(ty, &mut properties, &mut required);
        for element in &ty.elements {
            properties.insert(element.name.clone(), self.element_property(element));
            if !choice && element.is_required() {
                required.push(element.name.clone());
            }
        }

        let mut body = Map::new();
        let mut notes = Notes::default();
        body.insert("type".into(), "object".into());
        body.insert("properties".into(), Value::Object(properties));
        if choice && !ty.elements.is_empty() {
            let alternatives: Vec<Value> = ty
                .elements
                .iter()
                .map(|element| json!({ "required": [element.name] }))
                .collect();
            body.insert("oneOf".into(), Value::Array(alternatives));
        }
        if !required.is_empty() {
            body.insert("required".into(), json!(required));
        }
        if ty.allows_wildcard {
            notes.push("XSD allows 'any', so properties not restricted");
        } else {
            body.insert("additionalProperties".into(), false.into());
        }
        notes.apply(&mut body);
        body
    }

    /// Scalar type and facets of a simple type.
    fn scalar_body(&self, ty: &SimpleType) -> Map<String, Value> {
        let mut body = Map::new();
        let mut notes = Notes::default();

        let base = ty.base.as_str();
        let mut numeric = false;
        if self.registry.simple(base).is_some() {
            body.insert("allOf".into(), json!([reference(base)]));
        } else if let Some(primitive) = builtin_primitive(base) {
            numeric = primitive == JsonPrimitive::Number;
            body.insert("type".into(), primitive.as_str().into());
            notes.push(format!("XML datatype was {base}"));
        } else {
            match intrinsic_type(base) {
                Some(IntrinsicType::String | IntrinsicType::AnySimple) => {
                    body.insert("type".into(), "string".into());
                }
                Some(IntrinsicType::Boolean) => {
                    body.insert("type".into(), "boolean".into());
                }
                Some(IntrinsicType::Any) => {}
                None if base.is_empty() => {}
                None => {
                    body.insert("allOf".into(), json!([reference(base)]));
                }
            }
        }

        let min_length = ty.length.or(ty.min_length);
        let max_length = ty.length.or(ty.max_length);
        if let Some(min) = min_length {
            body.insert("minLength".into(), min.into());
        }
        if let Some(max) = max_length {
            body.insert("maxLength".into(), max.into());
        }
        if !ty.enumeration.is_empty() {
            let values: Vec<Value> = ty
                .enumeration
                .iter()
                .map(|value| literal(value, numeric))
                .collect();
            body.insert("enum".into(), Value::Array(values));
        }
        if let Some(pattern) = &ty.pattern {
            body.insert("pattern".into(), pattern.clone().into());
        }

        // draft-04 expresses exclusive bounds as flags on minimum/maximum
        match (ty.min_exclusive, ty.min_inclusive) {
            (Some(min), _) => {
                body.insert("minimum".into(), min.into());
                body.insert("exclusiveMinimum".into(), true.into());
            }
            (None, Some(min)) => {
                body.insert("minimum".into(), min.into());
            }
            (None, None) => {}
        }
        match (ty.max_exclusive, ty.max_inclusive) {
            (Some(max), _) => {
                body.insert("maximum".into(), max.into());
                body.insert("exclusiveMaximum".into(), true.into());
            }
            (None, Some(max)) => {
                body.insert("maximum".into(), max.into());
            }
            (None, None) => {}
        }

        if let Some(digits) = ty.total_digits {
            notes.push(format!("XML specified totalDigits={digits}"));
        }
        if let Some(digits) = ty.fraction_digits {
            notes.push(format!("XML specified fractionDigits={digits}"));
        }
        if let Some(white_space) = &ty.white_space {
            notes.push(format!("XML specified whiteSpace={}", white_space.as_str()));
        }
        notes.apply(&mut body);
        body
    }

    /// Adds an `@name` property per attribute and collects the required ones.
    fn attribute_properties(
        &self,
        shape: &dyn TypeShape,
        properties: &mut Map<String, Value>,
        required: &mut Vec<String>,
    ) {
        for attribute in shape.attributes() {
            let key = format!("@{}", attribute.name);
            if attribute.required {
                required.push(key.clone());
            }

            let mut body = Map::new();
            let mut notes = Notes::default();
            let type_ref = attribute.type_ref.as_str();
            let numeric = if self.registry.simple(type_ref).is_some() {
                body.insert("$ref".into(), definition_ref(type_ref).into());
                false
            } else {
                let json_type = match map_type_name(type_ref).0.as_str() {
                    // untyped attributes are anySimpleType
                    "" | "anySimpleType" => "string".to_string(),
                    mapped => mapped.to_string(),
                };
                let numeric = json_type == "number";
                body.insert("type".into(), json_type.into());
                numeric
            };
            if let Some(default) = &attribute.default_value {
                body.insert("default".into(), literal(default, numeric));
            }
            if let Some(fixed) = &attribute.fixed_value {
                notes.push(format!("XML specified fixed value {fixed}"));
            }
            notes.apply(&mut body);
            properties.insert(key, Value::Object(body));
        }
    }

    /// Property schema of an element, wrapped in an array when repeated.
    fn element_property(&self, element: &Element) -> Value {
        let item = self.type_reference(&element.type_ref);
        let Some(max) = element.max_occurs.filter(|max| max.is_repeated()) else {
            return item;
        };

        let mut array = Map::new();
        array.insert("type".into(), "array".into());
        array.insert("items".into(), item);
        if let Some(min) = element.min_occurs.filter(|min| *min > 1) {
            array.insert("minItems".into(), min.into());
        }
        if let MaxOccurs::Bounded(max) = max {
            array.insert("maxItems".into(), max.into());
        }
        Value::Object(array)
    }

    /// Schema for a type named by an element.
    fn type_reference(&self, type_ref: &str) -> Value {
        if self.registry.lookup(type_ref).is_some() {
            return reference(type_ref);
        }
        if let Some(primitive) = builtin_primitive(type_ref) {
            return json!({
                "type": primitive.as_str(),
                "$comment": format!("XML datatype was {type_ref}"),
            });
        }
        match intrinsic_type(type_ref) {
            Some(IntrinsicType::String | IntrinsicType::AnySimple) => json!({ "type": "string" }),
            Some(IntrinsicType::Boolean) => json!({ "type": "boolean" }),
            Some(IntrinsicType::Any) => json!({}),
            None if type_ref.is_empty() => json!({}),
            None => reference(type_ref),
        }
    }
}

/// Annotations for one schema object, written as a single `$comment`.
#[derive(Debug, Default)]
struct Notes(Vec<String>);

impl Notes {
    fn push(&mut self, note: impl Into<String>) {
        self.0.push(note.into());
    }

    fn apply(self, body: &mut Map<String, Value>) {
        if !self.0.is_empty() {
            body.insert("$comment".into(), self.0.join("; ").into());
        }
    }
}

fn definition_ref(type_ref: &str) -> String {
    format!("#/definitions/{}", local_name(type_ref))
}

fn reference(type_ref: &str) -> Value {
    json!({ "$ref": definition_ref(type_ref) })
}

/// A literal from the XSD, as a JSON number when the type is numeric and
/// the number prints back as the same text. Anything else stays a string.
fn literal(value: &str, numeric: bool) -> Value {
    let text = value.trim();
    if numeric {
        if let Ok(int) = text.parse::<i64>() {
            return int.into();
        }
        if let Ok(int) = text.parse::<u64>() {
            return int.into();
        }
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            if number.to_string() == text {
                return Value::Number(number);
            }
        }
    }
    value.into()
}
