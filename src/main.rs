use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use tracing::{debug, info};

use annotation_reader::cli;
use annotation_reader::logging::{self, Verbosity};
use annotation_reader::output::OutputFormatter;
use annotation_reader::{CachedReader, DeclaredAnnotationReader, FilesystemCache, TypeManifest};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    let manifest = TypeManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest: {}", args.manifest.display()))?;
    let ignored = manifest.ignored_annotations.clone();
    let registry = manifest.into_registry().context("Invalid type manifest")?;
    debug!(types = registry.len(), "type registry ready");

    let declared = DeclaredAnnotationReader::new(&registry).with_ignored_names(ignored);
    let target = args.target();

    let result = if args.no_cache {
        info!(%target, "reading annotations without cache");
        target.read(&declared)
    } else {
        let cache_dir = match args.cache_dir.clone() {
            Some(dir) => dir,
            None => FilesystemCache::default_dir()?,
        };
        let cache = FilesystemCache::new(cache_dir);

        if args.clear_cache {
            let removed = cache.clear().context("Failed to clear cache")?;
            info!(removed, dir = %cache.dir().display(), "cleared cache");
        }

        info!(%target, dir = %cache.dir().display(), debug = args.debug, "reading annotations");
        let reader = CachedReader::from_simple_cache(declared, cache, &registry, args.debug);
        target.read(&reader)
    };
    let annotations =
        result.with_context(|| format!("Failed to read annotations of {target}"))?;

    println!("{}", OutputFormatter::format(&target, &annotations, args.format)?);

    Ok(())
}
