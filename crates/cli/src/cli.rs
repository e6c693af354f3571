use std::path::PathBuf;

use cantrell_catalog::{Arch, Feature, Platform};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cantrell")]
#[command(about = "Selects Ordo sources for a target and generates its definitions header")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the source files selected for a target
	Select {
		#[command(flatten)]
		target: TargetArgs,
	},
	/// Select sources for a target and write the definitions header
	Resolve {
		#[command(flatten)]
		target: TargetArgs,

		/// Header to (re)generate
		#[arg(long, short, value_name = "FILE", default_value = "include/ordo/definitions.h")]
		out: PathBuf,

		/// Resolver configuration overriding the built-in registry
		#[arg(long, value_name = "FILE")]
		config: Option<PathBuf>,
	},
}

/// Target description shared by every subcommand.
#[derive(Args, Debug)]
pub struct TargetArgs {
	/// Root of the library source tree
	#[arg(long, value_name = "DIR", default_value = "src")]
	pub src: PathBuf,

	/// Target platform (defaults to the host)
	#[arg(long)]
	pub platform: Option<Platform>,

	/// Target architecture (defaults to generic, portable sources)
	#[arg(long)]
	pub arch: Option<Arch>,

	/// Enable a CPU feature, may be repeated
	#[arg(long = "feature", value_name = "FEATURE")]
	pub features: Vec<Feature>,
}

impl TargetArgs {
	pub fn platform(&self) -> Platform {
		self.platform.unwrap_or_else(Platform::host)
	}

	pub fn arch(&self) -> Arch {
		self.arch.unwrap_or(Arch::Generic)
	}
}
