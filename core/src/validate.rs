//! Registry validation.
//!
//! Reports references the emitter cannot resolve: a missing root element,
//! element and attribute types that are neither registered nor built in,
//! simple types restricting an unknown base, and names shared by a simple
//! and a complex type (the complex definition shadows the simple one in the
//! output). None of these stop a
//! conversion; the emitter still writes a best-effort document.
//!
//! # Examples
//!
//! ```
//! use xsd2json_core::*;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_complex(
//!     ComplexType::new("Doc").with_element(Element::new("amount", "Amount")),
//! );
//! registry.set_root(Element::new("doc", "Doc"));
//!
//! let errors = validate_registry(&registry);
//! assert!(matches!(errors.as_slice(), [ValidationError::DanglingElementType { .. }]));
//! ```

use thiserror::Error;

use crate::builtin::is_builtin;
use crate::{ComplexType, TypeRegistry, TypeShape};

/// Unresolvable references found in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No element was declared outside a complex type.
    #[error("no root element declared")]
    MissingRoot,
    /// The root element's type is neither registered nor built in.
    #[error("root element '{element}' has unknown type '{type_ref}'")]
    UnresolvedRootType { element: String, type_ref: String },
    /// A child element's type is neither registered nor built in.
    #[error("element '{element}' of '{owner}' has unknown type '{type_ref}'")]
    DanglingElementType {
        owner: String,
        element: String,
        type_ref: String,
    },
    /// An attribute's type is neither a registered simple type nor built in.
    #[error("attribute '{attribute}' of '{owner}' has unknown type '{type_ref}'")]
    DanglingAttributeType {
        owner: String,
        attribute: String,
        type_ref: String,
    },
    /// A simple type's base is neither a registered simple type nor built in.
    #[error("simple type '{owner}' has unknown base '{base}'")]
    DanglingSimpleBase { owner: String, base: String },
    /// A simple and a complex type share a name.
    #[error("'{name}' names both a simple and a complex type; the complex type wins")]
    DuplicateTypeName { name: String },
}

/// Validates every reference held by the registry.
///
/// Findings are returned in a stable order: root first, then shared names,
/// then simple types and complex types by name.
pub fn validate_registry(registry: &TypeRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match registry.root() {
        None => errors.push(ValidationError::MissingRoot),
        Some(root) => {
            let resolved = if root.type_ref.is_empty() {
                registry.complex(&root.name).is_some()
            } else {
                is_builtin(&root.type_ref) || registry.lookup(&root.type_ref).is_some()
            };
            if !resolved {
                errors.push(ValidationError::UnresolvedRootType {
                    element: root.name.clone(),
                    type_ref: root.type_ref.clone(),
                });
            }
        }
    }

    errors.extend(
        registry
            .simple_types()
            .filter(|simple| registry.complex(&simple.name).is_some())
            .map(|simple| ValidationError::DuplicateTypeName {
                name: simple.name.clone(),
            }),
    );

    for simple in registry.simple_types() {
        if !simple.base.is_empty()
            && !is_builtin(&simple.base)
            && registry.simple(&simple.base).is_none()
        {
            errors.push(ValidationError::DanglingSimpleBase {
                owner: simple.name.clone(),
                base: simple.base.clone(),
            });
        }
        errors.extend(validate_attributes(registry, simple));
    }

    for complex in registry.complex_types() {
        errors.extend(validate_attributes(registry, complex));
        if let Some(simple) = &complex.simple_base {
            errors.extend(validate_attributes(registry, simple));
        }
        errors.extend(validate_elements(registry, complex));
    }

    errors
}

fn validate_attributes(registry: &TypeRegistry, ty: &dyn TypeShape) -> Vec<ValidationError> {
    ty.attributes()
        .iter()
        .filter(|attr| {
            !attr.type_ref.is_empty()
                && !is_builtin(&attr.type_ref)
                && registry.simple(&attr.type_ref).is_none()
        })
        .map(|attr| ValidationError::DanglingAttributeType {
            owner: ty.name().to_string(),
            attribute: attr.name.clone(),
            type_ref: attr.type_ref.clone(),
        })
        .collect()
}

fn validate_elements(registry: &TypeRegistry, complex: &ComplexType) -> Vec<ValidationError> {
    complex
        .elements
        .iter()
        .filter(|el| {
            !el.type_ref.is_empty()
                && !is_builtin(&el.type_ref)
                && registry.lookup(&el.type_ref).is_none()
        })
        .map(|el| ValidationError::DanglingElementType {
            owner: complex.name.clone(),
            element: el.name.clone(),
            type_ref: el.type_ref.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, Element, SimpleType};

    fn registry_with_root() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_complex(ComplexType::new("Doc"));
        registry.set_root(Element::new("doc", "Doc"));
        registry
    }

    #[test]
    fn test_empty_registry_reports_missing_root() {
        assert_eq!(
            validate_registry(&TypeRegistry::new()),
            vec![ValidationError::MissingRoot]
        );
    }

    #[test]
    fn test_clean_registry_has_no_findings() {
        let mut registry = registry_with_root();
        registry.register_simple(SimpleType::new("Code").with_base("xs:token"));
        registry.register_complex(
            ComplexType::new("Party")
                .with_element(Element::new("code", "tns:Code"))
                .with_element(Element::new("name", "xs:string"))
                .with_element(Element::new("any", ""))
                .with_attribute(Attribute::new("id", "xs:ID")),
        );
        assert!(validate_registry(&registry).is_empty());
    }

    #[test]
    fn test_root_with_builtin_or_named_fallback_resolves() {
        let mut registry = TypeRegistry::new();
        registry.set_root(Element::new("doc", "xs:string"));
        assert!(validate_registry(&registry).is_empty());

        let mut registry = registry_with_root();
        registry.set_root(Element::new("Doc", ""));
        assert!(validate_registry(&registry).is_empty());
    }

    #[test]
    fn test_unknown_root_type_is_reported() {
        let mut registry = TypeRegistry::new();
        registry.set_root(Element::new("doc", "Later"));
        assert_eq!(
            validate_registry(&registry),
            vec![ValidationError::UnresolvedRootType {
                element: "doc".to_string(),
                type_ref: "Later".to_string(),
            }]
        );
    }

    #[test]
    fn test_dangling_references_are_all_collected() {
        let mut registry = registry_with_root();
        registry.register_simple(SimpleType::new("Code").with_base("Missing"));
        registry.register_complex(
            ComplexType::new("Party")
                .with_attribute(Attribute::new("kind", "Party"))
                .with_element(Element::new("addr", "Address")),
        );

        let errors = validate_registry(&registry);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(matches!(errors[0], ValidationError::DanglingSimpleBase { .. }));
        // complex types are not valid attribute types
        assert!(matches!(errors[1], ValidationError::DanglingAttributeType { .. }));
        assert!(matches!(errors[2], ValidationError::DanglingElementType { .. }));
    }

    #[test]
    fn test_shared_type_name_is_reported_once() {
        let mut registry = registry_with_root();
        registry.register_simple(SimpleType::new("Same").with_base("xs:string"));
        registry.register_complex(ComplexType::new("Same"));
        registry.register_simple(SimpleType::new("Doc").with_base("xs:string"));

        assert_eq!(
            validate_registry(&registry),
            vec![
                ValidationError::DuplicateTypeName { name: "Doc".to_string() },
                ValidationError::DuplicateTypeName { name: "Same".to_string() },
            ]
        );
    }
}
