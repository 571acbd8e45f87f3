//! Type descriptors and the lookups the annotation readers need from them.
//!
//! A `Reflector` hands out `TypeDescriptor`s by fully-qualified name. Each
//! descriptor only names its direct parent, interfaces and traits; the
//! transitive views (dependency closure, member lookup) are graph walks on
//! top of `Reflector::reflect`.

pub mod closure;
pub mod manifest;
pub mod registry;

pub use closure::dependency_closure;
pub use manifest::{ManifestFormat, TypeManifest};
pub use registry::TypeRegistry;

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

use crate::annotation::Annotation;
use crate::error::{ReflectionError, Result};

pub const NAMESPACE_SEPARATOR: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Trait,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Trait => "trait",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeDescriptor {
    /// Fully-qualified name, without a leading separator
    pub name: String,

    #[serde(default)]
    pub kind: TypeKind,

    /// File the type is declared in. `None` for built-in types.
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub parent: Option<String>,

    /// Implemented interfaces; for an interface, the interfaces it extends
    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub traits: Vec<String>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub methods: BTreeMap<String, Vec<Annotation>>,

    #[serde(default)]
    pub properties: BTreeMap<String, Vec<Annotation>>,
}

impl TypeDescriptor {
    pub fn new(name: impl AsRef<str>, kind: TypeKind) -> Self {
        Self {
            name: normalize_name(name.as_ref()).to_string(),
            kind,
            source: None,
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            annotations: Vec::new(),
            methods: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn class(name: impl AsRef<str>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl AsRef<str>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn trait_type(name: impl AsRef<str>) -> Self {
        Self::new(name, TypeKind::Trait)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn extends(mut self, parent: impl AsRef<str>) -> Self {
        self.parent = Some(normalize_name(parent.as_ref()).to_string());
        self
    }

    pub fn implements(mut self, interface: impl AsRef<str>) -> Self {
        self.interfaces.push(normalize_name(interface.as_ref()).to_string());
        self
    }

    pub fn uses(mut self, trait_name: impl AsRef<str>) -> Self {
        self.traits.push(normalize_name(trait_name.as_ref()).to_string());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        self.methods.insert(name.into(), annotations);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        self.properties.insert(name.into(), annotations);
        self
    }

    /// Direct dependencies: parent, then interfaces, then traits.
    pub fn direct_dependencies(&self) -> impl Iterator<Item = &str> {
        self.parent
            .iter()
            .chain(self.interfaces.iter())
            .chain(self.traits.iter())
            .map(String::as_str)
    }

    pub(crate) fn normalize(&mut self) {
        self.name = normalize_name(&self.name).to_string();
        if let Some(parent) = self.parent.as_mut() {
            *parent = normalize_name(parent).to_string();
        }
        for name in self.interfaces.iter_mut().chain(self.traits.iter_mut()) {
            *name = normalize_name(name).to_string();
        }
    }
}

/// Strip the leading namespace separator from a fully-qualified name.
pub fn normalize_name(name: &str) -> &str {
    name.trim_start_matches(NAMESPACE_SEPARATOR)
}

pub trait Reflector {
    fn reflect(&self, name: &str) -> Result<&TypeDescriptor>;

    /// Annotations of `method` as seen from `class`: declared on the class,
    /// imported from its traits, inherited from its parents, or declared by
    /// an interface, in that order.
    fn find_method(&self, class: &str, method: &str) -> Result<&[Annotation]> {
        find_member(self, class, |ty| ty.methods.get(method))?.ok_or_else(|| {
            ReflectionError::method_not_found(normalize_name(class), method).into()
        })
    }

    fn find_property(&self, class: &str, property: &str) -> Result<&[Annotation]> {
        find_member(self, class, |ty| ty.properties.get(property))?.ok_or_else(|| {
            ReflectionError::property_not_found(normalize_name(class), property).into()
        })
    }
}

impl<R: Reflector + ?Sized> Reflector for &R {
    fn reflect(&self, name: &str) -> Result<&TypeDescriptor> {
        (**self).reflect(name)
    }
}

impl<R: Reflector + ?Sized> Reflector for Rc<R> {
    fn reflect(&self, name: &str) -> Result<&TypeDescriptor> {
        (**self).reflect(name)
    }
}

fn find_member<'r, R, F>(
    reflector: &'r R,
    class: &str,
    select: F,
) -> Result<Option<&'r [Annotation]>>
where
    R: Reflector + ?Sized,
    F: Fn(&TypeDescriptor) -> Option<&Vec<Annotation>>,
{
    let mut visited = HashSet::new();
    find_member_in(reflector, normalize_name(class), &select, &mut visited)
}

fn find_member_in<'r, R, F>(
    reflector: &'r R,
    name: &str,
    select: &F,
    visited: &mut HashSet<String>,
) -> Result<Option<&'r [Annotation]>>
where
    R: Reflector + ?Sized,
    F: Fn(&TypeDescriptor) -> Option<&Vec<Annotation>>,
{
    if !visited.insert(name.to_string()) {
        return Ok(None);
    }

    let ty = reflector.reflect(name)?;
    if let Some(annotations) = select(ty) {
        return Ok(Some(annotations.as_slice()));
    }

    let lookup_order = ty
        .traits
        .iter()
        .chain(ty.parent.iter())
        .chain(ty.interfaces.iter());

    for next in lookup_order {
        if let Some(found) = find_member_in(reflector, next, select, visited)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
