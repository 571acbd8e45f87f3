use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{TypeDescriptor, TypeRegistry};
use crate::error::{IoError, ReflectionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match extension {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ReflectionError::unsupported_manifest_format(extension).into()),
        }
    }
}

/// Declared types and reader settings, loaded from a JSON or YAML file.
///
/// ```yaml
/// ignored_annotations: [Annotation]
/// types:
///   - name: App\Controller
///     source: src/Controller.php
///     parent: App\AbstractController
///     traits: [App\Traits\SecretRouteTrait]
///     annotations:
///       - name: Route
///         values: { pattern: /someprefix }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeManifest {
    /// Annotation names the declared reader skips, on top of its defaults
    #[serde(default)]
    pub ignored_annotations: Vec<String>,

    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl TypeManifest {
    /// Load a manifest, resolving relative `source` paths against the
    /// manifest's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::file_not_found(path).into());
        }

        let format = ManifestFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;

        let mut manifest = Self::parse(&content, format, path)?;
        if let Some(base_dir) = path.parent() {
            manifest.resolve_sources(base_dir);
        }

        debug!(
            path = %path.display(),
            types = manifest.types.len(),
            "loaded type manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest text. `origin` only labels errors.
    pub fn parse(content: &str, format: ManifestFormat, origin: &Path) -> Result<Self> {
        let parsed = match format {
            ManifestFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ReflectionError::manifest_parse(origin, message).into())
    }

    fn resolve_sources(&mut self, base_dir: &Path) {
        for ty in &mut self.types {
            if let Some(source) = ty.source.as_mut() {
                if source.is_relative() {
                    *source = base_dir.join(&*source);
                }
            }
        }
    }

    pub fn into_registry(self) -> Result<TypeRegistry> {
        TypeRegistry::from_types(self.types)
    }
}
