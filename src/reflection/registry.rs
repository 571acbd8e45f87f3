use std::collections::HashMap;

use tracing::trace;

use super::{normalize_name, Reflector, TypeDescriptor};
use crate::error::{ReflectionError, Result};

/// In-memory `Reflector` keyed by fully-qualified type name.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self> {
        let mut registry = Self::new();
        for ty in types {
            registry.register(ty)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, mut ty: TypeDescriptor) -> Result<()> {
        ty.normalize();
        if self.types.contains_key(&ty.name) {
            return Err(ReflectionError::duplicate_type(ty.name).into());
        }

        trace!(name = %ty.name, kind = ty.kind.as_str(), "registered type");
        self.types.insert(ty.name.clone(), ty);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl Reflector for TypeRegistry {
    fn reflect(&self, name: &str) -> Result<&TypeDescriptor> {
        let name = normalize_name(name);
        self.types
            .get(name)
            .ok_or_else(|| ReflectionError::type_not_found(name).into())
    }
}
