use std::collections::HashSet;

use tracing::trace;

use super::Reader;
use crate::annotation::Annotation;
use crate::error::Result;
use crate::reflection::Reflector;

/// Documentation tags that are never returned as annotations.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    "author",
    "deprecated",
    "inheritDoc",
    "internal",
    "param",
    "return",
    "see",
    "since",
    "throws",
    "todo",
    "var",
];

/// Reads the annotations declared on types known to a `Reflector`.
pub struct DeclaredAnnotationReader<X> {
    reflector: X,
    ignored_names: HashSet<String>,
}

impl<X: Reflector> DeclaredAnnotationReader<X> {
    pub fn new(reflector: X) -> Self {
        Self {
            reflector,
            ignored_names: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn add_ignored_name(&mut self, name: impl Into<String>) {
        self.ignored_names.insert(name.into());
    }

    pub fn with_ignored_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_ignored_name(name);
        }
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_names.contains(name)
    }

    pub fn reflector(&self) -> &X {
        &self.reflector
    }

    fn collect(&self, declared: &[Annotation]) -> Vec<Annotation> {
        declared
            .iter()
            .filter(|annotation| !self.is_ignored(&annotation.name))
            .cloned()
            .collect()
    }
}

impl<X: Reflector> Reader for DeclaredAnnotationReader<X> {
    fn class_annotations(&self, class: &str) -> Result<Vec<Annotation>> {
        let ty = self.reflector.reflect(class)?;
        trace!(class = %ty.name, declared = ty.annotations.len(), "reading class annotations");
        Ok(self.collect(&ty.annotations))
    }

    fn method_annotations(&self, class: &str, method: &str) -> Result<Vec<Annotation>> {
        let declared = self.reflector.find_method(class, method)?;
        Ok(self.collect(declared))
    }

    fn property_annotations(&self, class: &str, property: &str) -> Result<Vec<Annotation>> {
        let declared = self.reflector.find_property(class, property)?;
        Ok(self.collect(declared))
    }
}
