//! Cantrell: per-target source selection and definitions header generation.

mod cli;

use std::path::PathBuf;

use anyhow::Context;
use cantrell_catalog::{Platform, SourceCatalog};
use cantrell_resolve::{Resolver, ResolverConfig};
use clap::Parser;
use cli::{Cli, Command, TargetArgs};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	match cli.command {
		Command::Select { target } => {
			for path in select(&target)? {
				println!("{}", path.display());
			}
		}
		Command::Resolve { target, out, config } => {
			let resolver = match config {
				Some(path) => ResolverConfig::load(&path)
					.and_then(ResolverConfig::into_resolver)
					.with_context(|| format!("invalid resolver config {}", path.display()))?,
				None => Resolver::default(),
			};
			let files = select(&target)?;
			let report = resolver
				.resolve(&out, &files)
				.with_context(|| format!("failed to generate {}", out.display()))?;
			info!(
				hash_block_len = report.limits.hash_block_len,
				hash_digest_len = report.limits.hash_digest_len,
				block_block_len = report.limits.block_block_len,
				"Definitions resolved"
			);
		}
	}

	Ok(())
}

fn select(target: &TargetArgs) -> anyhow::Result<Vec<PathBuf>> {
	let (platform, arch) = (target.platform(), target.arch());

	if !target.src.is_dir() {
		warn!(src = %target.src.display(), "Source tree not found, nothing will be selected");
	}
	if platform == Platform::Generic {
		info!("Targeting the generic platform, platform services such as os_random are unavailable");
	}

	let catalog = SourceCatalog::scan(target.src.clone())
		.with_context(|| format!("failed to scan {}", target.src.display()))?;
	Ok(catalog.select(platform, arch, target.features.iter().copied()).into_paths())
}
