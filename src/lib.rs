/// Annotation Reader
///
/// Reads the annotations declared on classes, methods and properties and
/// caches them, invalidating a cached result whenever the class or anything
/// it inherits from (parents, interfaces, traits) changed after it was
/// stored.
pub mod annotation;
pub mod cache;
pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod reader;
pub mod reflection;
pub mod timestamps;

pub use annotation::Annotation;
pub use cache::{ArrayCache, CacheKey, CacheProvider, CacheValue, FilesystemCache, SimpleCache};
pub use error::{Error, Result};
pub use reader::{CachedReader, DeclaredAnnotationReader, Reader};
pub use reflection::{Reflector, TypeDescriptor, TypeKind, TypeManifest, TypeRegistry};
pub use timestamps::{FileTimestamps, FixedTimestamps, TimestampSource};
