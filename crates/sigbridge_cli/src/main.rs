#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "sigbridge", about = "Bus signature and resource value conversion tools")]
struct Cli {
	/// Registry JSON document with named struct and dictionary definitions.
	#[arg(long, global = true)]
	registry: Option<PathBuf>,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Args)]
struct LimitArgs {
	/// Use the bus grammar's own nesting limit.
	#[arg(long)]
	strict: bool,
	#[arg(long)]
	max_depth: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
	Parse {
		signature: String,
		#[arg(long)]
		json: bool,
	},
	Infer {
		value: String,
	},
	ToResource {
		#[arg(long)]
		sig: String,
		value: String,
		#[command(flatten)]
		limits: LimitArgs,
	},
	ToBus {
		#[arg(long)]
		sig: String,
		#[arg(long)]
		hint: Option<String>,
		value: String,
		#[command(flatten)]
		limits: LimitArgs,
	},
}

fn main() {
	init_tracing();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_env("SIGBRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn run() -> cmd::Result<()> {
	let cli = Cli::parse();
	let registry = cmd::util::load_registry(cli.registry.as_deref())?;

	match cli.command {
		Commands::Parse { signature, json } => cmd::parse::run(&registry, &signature, json),
		Commands::Infer { value } => cmd::infer::run(&value),
		Commands::ToResource { sig, value, limits } => {
			let opt = cmd::util::translate_options(limits.strict, limits.max_depth);
			cmd::convert::to_resource(&registry, &sig, &value, &opt)
		}
		Commands::ToBus { sig, hint, value, limits } => {
			let opt = cmd::util::translate_options(limits.strict, limits.max_depth);
			cmd::convert::to_bus(&registry, &sig, hint.as_deref(), &value, &opt)
		}
	}
}
