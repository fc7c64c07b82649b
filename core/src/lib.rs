//! Core types for converting XML Schema (XSD) into JSON Schema.
//!
//! This crate holds the pieces of the conversion that do not depend on how
//! the XSD is read or how the JSON Schema is written:
//!
//! - [`Element`], [`Attribute`], [`SimpleType`], [`ComplexType`]: the type
//!   model built from an XSD document.
//! - [`map_type_name`]: the table mapping XSD built-in datatypes onto JSON
//!   Schema primitives.
//! - [`TypeRegistry`]: completed types keyed by name, plus the document root.
//! - [`derive_simple`] / [`derive_complex`]: deep copies used for
//!   extension and restriction.
//! - [`validate_registry`]: unresolved references left after building.
//!
//! # Example
//!
//! ```
//! use xsd2json_core::*;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_simple(
//!     SimpleType::new("Code").with_base("xs:token").with_enum_value("A"),
//! );
//! registry.register_complex(
//!     ComplexType::new("Doc")
//!         .with_element(Element::new("code", "Code"))
//!         .with_attribute(Attribute::new("id", "xs:ID").required()),
//! );
//! registry.set_root(Element::new("doc", "Doc"));
//!
//! assert_eq!(map_type_name("xs:token"), ("string".to_string(), true));
//! assert!(validate_registry(&registry).is_empty());
//! ```

mod builtin;
mod inherit;
mod registry;
mod types;
mod validate;

pub use builtin::{
    BUILTIN_TYPES, IntrinsicType, JsonPrimitive, builtin_primitive, intrinsic_type, is_builtin,
    local_name, map_type_name,
};
pub use inherit::{derive_complex, derive_simple};
pub use registry::{TypeRef, TypeRegistry};
pub use types::*;
pub use validate::{ValidationError, validate_registry};
