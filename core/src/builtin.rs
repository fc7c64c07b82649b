//! Mapping of XSD built-in datatypes onto JSON Schema primitives.

/// JSON Schema primitive that an XSD built-in maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonPrimitive {
    Number,
    String,
}

impl JsonPrimitive {
    /// Name used for the JSON Schema `type` keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// XSD built-ins that need translating. `string` and `boolean` are absent on
/// purpose: JSON Schema spells them the same way.
pub const BUILTIN_TYPES: [(&str, JsonPrimitive); 45] = [
    // numeric
    ("decimal", JsonPrimitive::Number),
    ("float", JsonPrimitive::Number),
    ("double", JsonPrimitive::Number),
    ("integer", JsonPrimitive::Number),
    ("positiveInteger", JsonPrimitive::Number),
    ("negativeInteger", JsonPrimitive::Number),
    ("nonPositiveInteger", JsonPrimitive::Number),
    ("nonNegativeInteger", JsonPrimitive::Number),
    ("long", JsonPrimitive::Number),
    ("int", JsonPrimitive::Number),
    ("short", JsonPrimitive::Number),
    ("byte", JsonPrimitive::Number),
    ("unsignedLong", JsonPrimitive::Number),
    ("unsignedInt", JsonPrimitive::Number),
    ("unsignedShort", JsonPrimitive::Number),
    ("unsignedByte", JsonPrimitive::Number),
    // date, time and duration
    ("dateTime", JsonPrimitive::String),
    ("dateTimeStamp", JsonPrimitive::String),
    ("date", JsonPrimitive::String),
    ("time", JsonPrimitive::String),
    ("gYearMonth", JsonPrimitive::String),
    ("gYear", JsonPrimitive::String),
    ("duration", JsonPrimitive::String),
    ("dayTimeDuration", JsonPrimitive::String),
    ("yearMonthDuration", JsonPrimitive::String),
    ("gMonthDay", JsonPrimitive::String),
    ("gDay", JsonPrimitive::String),
    ("gMonth", JsonPrimitive::String),
    // string family
    ("normalizedString", JsonPrimitive::String),
    ("token", JsonPrimitive::String),
    ("language", JsonPrimitive::String),
    ("NMTOKEN", JsonPrimitive::String),
    ("NMTOKENS", JsonPrimitive::String),
    ("Name", JsonPrimitive::String),
    ("NCName", JsonPrimitive::String),
    // ID family
    ("ID", JsonPrimitive::String),
    ("IDREF", JsonPrimitive::String),
    ("IDREFS", JsonPrimitive::String),
    ("ENTITY", JsonPrimitive::String),
    ("ENTITIES", JsonPrimitive::String),
    // everything else
    ("QName", JsonPrimitive::String),
    ("hexBinary", JsonPrimitive::String),
    ("base64Binary", JsonPrimitive::String),
    ("anyURI", JsonPrimitive::String),
    ("notation", JsonPrimitive::String),
];

/// Strips a `prefix:` from a qualified name.
///
/// # Examples
///
/// ```
/// use xsd2json_core::local_name;
///
/// assert_eq!(local_name("xs:date"), "date");
/// assert_eq!(local_name("Code"), "Code");
/// ```
pub fn local_name(name: &str) -> &str {
    name.split_once(':').map_or(name, |(_, local)| local)
}

/// Looks up the JSON primitive of a built-in, prefix stripped.
pub fn builtin_primitive(name: &str) -> Option<JsonPrimitive> {
    let local = local_name(name);
    BUILTIN_TYPES
        .iter()
        .find(|(xsd, _)| *xsd == local)
        .map(|(_, primitive)| *primitive)
}

/// Maps an XSD type name to a JSON Schema type name.
///
/// Returns the mapped name and whether the table matched. Unknown names,
/// which are usually user-defined types, come back unchanged apart from the
/// stripped prefix.
///
/// # Examples
///
/// ```
/// use xsd2json_core::map_type_name;
///
/// assert_eq!(map_type_name("xs:decimal"), ("number".to_string(), true));
/// assert_eq!(map_type_name("xs:gYear"), ("string".to_string(), true));
/// assert_eq!(map_type_name("xs:string"), ("string".to_string(), false));
/// assert_eq!(map_type_name("Max35Text"), ("Max35Text".to_string(), false));
/// ```
pub fn map_type_name(name: &str) -> (String, bool) {
    match builtin_primitive(name) {
        Some(primitive) => (primitive.as_str().to_string(), true),
        None => (local_name(name).to_string(), false),
    }
}

/// Built-ins with a direct JSON counterpart that the table does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicType {
    String,
    Boolean,
    /// `anySimpleType`: any scalar, emitted as a string.
    AnySimple,
    /// `anyType`: no constraint at all.
    Any,
}

/// Recognizes `string`, `boolean`, `anySimpleType` and `anyType`.
pub fn intrinsic_type(name: &str) -> Option<IntrinsicType> {
    match local_name(name) {
        "string" => Some(IntrinsicType::String),
        "boolean" => Some(IntrinsicType::Boolean),
        "anySimpleType" => Some(IntrinsicType::AnySimple),
        "anyType" => Some(IntrinsicType::Any),
        _ => None,
    }
}

/// Returns `true` for any XSD built-in the converter knows about.
pub fn is_builtin(name: &str) -> bool {
    builtin_primitive(name).is_some() || intrinsic_type(name).is_some()
}
