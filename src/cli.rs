use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::annotation::Annotation;
use crate::reader::Reader;
use crate::reflection::normalize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "annotation-reader")]
#[command(about = "Read class, method and property annotations through a dependency-aware cache", long_about = None)]
pub struct Args {
    /// Type manifest describing the declared types (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Fully-qualified class to read (e.g. App\Controller)
    #[arg(long, value_name = "CLASS")]
    pub class: String,

    /// Read the annotations of this method instead of the class
    #[arg(long, value_name = "METHOD", conflicts_with = "property")]
    pub method: Option<String>,

    /// Read the annotations of this property instead of the class
    #[arg(long, value_name = "PROPERTY")]
    pub property: Option<String>,

    /// Cache directory (defaults to ~/.cache/annotation-reader)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the cache entirely
    #[arg(long, conflicts_with_all = ["cache_dir", "clear_cache"])]
    pub no_cache: bool,

    /// Remove every cached entry before reading
    #[arg(long)]
    pub clear_cache: bool,

    /// Re-check source modification times on every cached read
    #[arg(long)]
    pub debug: bool,

    /// Output format (json, text)
    #[arg(short = 'f', long, default_value = "json")]
    pub format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        validate_manifest(&self.manifest)?;

        if normalize_name(&self.class).is_empty() {
            anyhow::bail!("Class name must not be empty");
        }

        if let Some(ref dir) = self.cache_dir {
            if dir.exists() && !dir.is_dir() {
                anyhow::bail!("Cache path is not a directory: {}", dir.display());
            }
        }
        Ok(())
    }

    pub fn target(&self) -> Target {
        let class = normalize_name(&self.class).to_string();
        match (&self.method, &self.property) {
            (Some(method), _) => Target::Method {
                class,
                method: method.clone(),
            },
            (None, Some(property)) => Target::Property {
                class,
                property: property.clone(),
            },
            (None, None) => Target::Class(class),
        }
    }
}

/// The element whose annotations were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Class(String),
    Method { class: String, method: String },
    Property { class: String, property: String },
}

impl Target {
    pub fn read<R: Reader + ?Sized>(&self, reader: &R) -> crate::error::Result<Vec<Annotation>> {
        match self {
            Target::Class(class) => reader.class_annotations(class),
            Target::Method { class, method } => reader.method_annotations(class, method),
            Target::Property { class, property } => reader.property_annotations(class, property),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Class(class) => write!(f, "{class}"),
            Target::Method { class, method } => write!(f, "{class}::{method}()"),
            Target::Property { class, property } => write!(f, "{class}::${property}"),
        }
    }
}

pub fn validate_manifest(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Manifest does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("Manifest is not a file: {}", path.display());
    }

    std::fs::metadata(path)
        .with_context(|| format!("Cannot read manifest: {}", path.display()))?;

    Ok(())
}
