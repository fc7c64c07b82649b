//! Copy-on-derive inheritance.
//!
//! An XSD extension or restriction starts from a full, independent copy of
//! its base and keeps building on top of it. The derived type never shares
//! its attribute, enumeration or element lists with the base, so the
//! registry's copy of the base cannot be changed through a derivation.
//!
//! # Example
//!
//! ```
//! use xsd2json_core::*;
//!
//! let base = ComplexType::new("Base").with_element(Element::new("x", "xs:string"));
//!
//! let mut derived = derive_complex(&base, "Derived");
//! derived.upsert_element(Element::new("y", "xs:int"));
//!
//! assert_eq!(base.elements.len(), 1);
//! assert_eq!(derived.elements.len(), 2);
//! assert_eq!(derived.name, "Derived");
//! ```

use crate::{ComplexType, SimpleType};

/// Deep copy of a simple type under a new name.
///
/// Attributes and enumeration literals are copied, so later additions to the
/// derived type leave `base` untouched.
pub fn derive_simple(base: &SimpleType, name: &str) -> SimpleType {
    let mut derived = base.clone();
    derived.name = name.to_string();
    derived
}

/// Deep copy of a complex type under a new name.
///
/// Attributes and elements are copied; the content model, the wildcard flag
/// and any simple-content base are inherited.
pub fn derive_complex(base: &ComplexType, name: &str) -> ComplexType {
    let mut derived = base.clone();
    derived.name = name.to_string();
    if let Some(simple) = derived.simple_base.as_mut() {
        simple.name = name.to_string();
    }
    derived
}
