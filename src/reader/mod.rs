//! Annotation readers.
//!
//! `Reader` is the interface callers use. `DeclaredAnnotationReader`
//! returns the annotations declared on registered types; `CachedReader`
//! wraps any reader with a staleness-checked cache.

pub mod cached;
pub mod declared;

pub use cached::CachedReader;
pub use declared::DeclaredAnnotationReader;

use crate::annotation::Annotation;
use crate::error::Result;

pub trait Reader {
    fn class_annotations(&self, class: &str) -> Result<Vec<Annotation>>;

    fn method_annotations(&self, class: &str, method: &str) -> Result<Vec<Annotation>>;

    fn property_annotations(&self, class: &str, property: &str) -> Result<Vec<Annotation>>;

    /// First class annotation called `name`.
    fn class_annotation(&self, class: &str, name: &str) -> Result<Option<Annotation>> {
        Ok(first_named(self.class_annotations(class)?, name))
    }

    fn method_annotation(
        &self,
        class: &str,
        method: &str,
        name: &str,
    ) -> Result<Option<Annotation>> {
        Ok(first_named(self.method_annotations(class, method)?, name))
    }

    fn property_annotation(
        &self,
        class: &str,
        property: &str,
        name: &str,
    ) -> Result<Option<Annotation>> {
        Ok(first_named(self.property_annotations(class, property)?, name))
    }
}

fn first_named(annotations: Vec<Annotation>, name: &str) -> Option<Annotation> {
    annotations.into_iter().find(|annotation| annotation.is_named(name))
}

impl<R: Reader + ?Sized> Reader for &R {
    fn class_annotations(&self, class: &str) -> Result<Vec<Annotation>> {
        (**self).class_annotations(class)
    }

    fn method_annotations(&self, class: &str, method: &str) -> Result<Vec<Annotation>> {
        (**self).method_annotations(class, method)
    }

    fn property_annotations(&self, class: &str, property: &str) -> Result<Vec<Annotation>> {
        (**self).property_annotations(class, property)
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn class_annotations(&self, class: &str) -> Result<Vec<Annotation>> {
        (**self).class_annotations(class)
    }

    fn method_annotations(&self, class: &str, method: &str) -> Result<Vec<Annotation>> {
        (**self).method_annotations(class, method)
    }

    fn property_annotations(&self, class: &str, property: &str) -> Result<Vec<Annotation>> {
        (**self).property_annotations(class, property)
    }
}
