//! Name-keyed store of completed types.
//!
//! Simple and complex types live in separate sorted maps, so iterating the
//! registry always yields the same order regardless of declaration order.
//! Lookups strip namespace prefixes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builtin::local_name;
use crate::{ComplexType, Element, SimpleType};

/// A registered type of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef<'a> {
    Simple(&'a SimpleType),
    Complex(&'a ComplexType),
}

/// Completed simple and complex types plus the document root element.
///
/// # Examples
///
/// ```
/// use xsd2json_core::*;
///
/// let mut registry = TypeRegistry::new();
/// registry.register_simple(SimpleType::new("Code").with_base("xs:string"));
/// registry.register_complex(ComplexType::new("Doc"));
/// registry.set_root(Element::new("doc", "Doc"));
///
/// assert!(registry.simple("tns:Code").is_some());
/// assert!(matches!(registry.lookup("Doc"), Some(TypeRef::Complex(_))));
/// assert_eq!(registry.root().map(|e| e.name.as_str()), Some("doc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    simple_types: BTreeMap<String, SimpleType>,
    complex_types: BTreeMap<String, ComplexType>,
    root: Option<Element>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a simple type, returning the one it replaced.
    pub fn register_simple(&mut self, ty: SimpleType) -> Option<SimpleType> {
        debug!(name = %ty.name, "registered simple type");
        self.simple_types.insert(ty.name.clone(), ty)
    }

    /// Registers a complex type, returning the one it replaced.
    pub fn register_complex(&mut self, ty: ComplexType) -> Option<ComplexType> {
        debug!(name = %ty.name, "registered complex type");
        self.complex_types.insert(ty.name.clone(), ty)
    }

    /// Designates the document root element.
    pub fn set_root(&mut self, element: Element) {
        if let Some(previous) = &self.root {
            debug!(previous = %previous.name, root = %element.name, "root element replaced");
        }
        self.root = Some(element);
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    /// Finds a simple type by (possibly prefixed) name.
    pub fn simple(&self, name: &str) -> Option<&SimpleType> {
        self.simple_types.get(local_name(name))
    }

    /// Finds a complex type by (possibly prefixed) name.
    pub fn complex(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.get(local_name(name))
    }

    /// Finds a type of either kind, simple types first.
    pub fn lookup(&self, name: &str) -> Option<TypeRef<'_>> {
        self.simple(name)
            .map(TypeRef::Simple)
            .or_else(|| self.complex(name).map(TypeRef::Complex))
    }

    /// Simple types sorted by name.
    pub fn simple_types(&self) -> impl Iterator<Item = &SimpleType> {
        self.simple_types.values()
    }

    /// Complex types sorted by name.
    pub fn complex_types(&self) -> impl Iterator<Item = &ComplexType> {
        self.complex_types.values()
    }

    pub fn simple_count(&self) -> usize {
        self.simple_types.len()
    }

    pub fn complex_count(&self) -> usize {
        self.complex_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simple_types.is_empty() && self.complex_types.is_empty() && self.root.is_none()
    }
}
