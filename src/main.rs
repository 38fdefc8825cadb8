use clap::{Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::path::{Path, PathBuf};

use lockstep::config::Config;
use lockstep::logging::*;
use lockstep::settings::{SavedConfiguration, Settings};
use lockstep::strategies::{SettingsKey, SyncStrategy};
use lockstep::sync::{SyncAction, SyncOptions};
use lockstep::tree::DeltaTree;
use lockstep::types::{DiffResult, DirectoryPair};
use lockstep::worker::{Completion, OperationRunner, Outcome};

fn cli() -> Command {
	let pair_args = [
		Arg::new("src").help("Source (left) directory"),
		Arg::new("dst").help("Destination (right) directory"),
		Arg::new("config")
			.short('c')
			.long("config")
			.value_name("NAME")
			.help("Use a saved configuration for src, dst and strategy"),
		Arg::new("strategy")
			.short('s')
			.long("strategy")
			.value_name("LABEL")
			.help("Sync strategy: One-way, Two-way or Update"),
	];

	Command::new("Lockstep")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Compare two directory trees and keep them in lockstep")
		.subcommand_required(true)
		.arg(
			Arg::new("dir")
				.short('d')
				.long("dir")
				.value_name("DIR")
				.global(true)
				.help("Settings directory (default ~/.lockstep)"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.value_name("LEVEL")
				.global(true)
				.help("Log level (trace, debug, info, warn, error)"),
		)
		.subcommand(
			Command::new("diff")
				.about("Show entries present on one side only")
				.args(pair_args.clone())
				.arg(
					Arg::new("flat")
						.long("flat")
						.action(ArgAction::SetTrue)
						.help("Print sorted full paths instead of trees"),
				),
		)
		.subcommand(
			Command::new("sync")
				.about("Synchronize the destination with the source")
				.args(pair_args)
				.arg(
					Arg::new("purge")
						.long("purge")
						.action(ArgAction::SetTrue)
						.conflicts_with("no-purge")
						.help("Delete destination entries missing from the source"),
				)
				.arg(
					Arg::new("no-purge")
						.long("no-purge")
						.action(ArgAction::SetTrue)
						.help("Never delete, whatever the saved setting says"),
				)
				.arg(
					Arg::new("dry-run")
						.short('n')
						.long("dry-run")
						.action(ArgAction::SetTrue)
						.help("Print the planned operations without applying them"),
				),
		)
		.subcommand(
			Command::new("config")
				.about("Manage saved configurations")
				.subcommand_required(true)
				.subcommand(Command::new("list").about("List saved configurations"))
				.subcommand(Command::new("show").about("Show one configuration").arg(Arg::new("name").required(true)))
				.subcommand(
					Command::new("save")
						.about("Save a configuration")
						.arg(Arg::new("name").required(true))
						.arg(Arg::new("src").required(true))
						.arg(Arg::new("dst").required(true))
						.arg(Arg::new("strategy").short('s').long("strategy").value_name("LABEL").required(true)),
				),
		)
		.subcommand(
			Command::new("purge")
				.about("Show or change the saved purge setting")
				.arg(Arg::new("state").value_parser(["on", "off"])),
		)
}

/// Source, destination and strategy label from explicit args or a saved configuration
fn resolve_pair(
	matches: &ArgMatches,
	settings: &Settings,
	config: &Config,
) -> Result<(PathBuf, PathBuf, String), Box<dyn Error>> {
	let saved = match matches.get_one::<String>("config") {
		Some(name) => Some(settings.configuration(name).ok_or_else(|| format!("No saved configuration named {:?}", name))?),
		None => None,
	};

	let src = matches
		.get_one::<String>("src")
		.cloned()
		.or_else(|| saved.map(|s| s.src.clone()))
		.ok_or("source directory required")?;
	let dst = matches
		.get_one::<String>("dst")
		.cloned()
		.or_else(|| saved.map(|s| s.dst.clone()))
		.ok_or("destination directory required")?;
	let label = matches
		.get_one::<String>("strategy")
		.cloned()
		.or_else(|| saved.map(|s| s.sync.label().to_string()))
		.unwrap_or_else(|| config.default_strategy.label().to_string());

	Ok((PathBuf::from(src), PathBuf::from(dst), label))
}

fn print_delta(result: &DiffResult, left: &Path, right: &Path, flat: bool) {
	let result = result.sorted();
	if result.is_empty() {
		println!("Directories are in lockstep");
		return;
	}
	if flat {
		for path in &result.left_only {
			println!("+ {}", path);
		}
		for path in &result.right_only {
			println!("- {}", path);
		}
		return;
	}

	let (left_rel, right_rel) = result.strip_roots(left, right);
	println!("Only in {}:", left.display());
	println!("{}", DeltaTree::from_paths(&left_rel).render('+'));
	println!();
	println!("Only in {}:", right.display());
	println!("{}", DeltaTree::from_paths(&right_rel).render('-'));
}

async fn wait_for(rx: &mut lockstep::worker::CompletionReceiver) -> Result<Completion, Box<dyn Error>> {
	let completion = rx.recv().await.ok_or("worker exited without reporting")?;
	debug!("{:?} for operation {}", completion.event(), completion.id);
	Ok(completion)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = cli().get_matches();

	let mut config = Config::load(matches.get_one::<String>("dir").map(Path::new))?;
	if let Some(level) = matches.get_one::<String>("log-level") {
		config.log_level = level.clone();
	}
	init_tracing(&config.log_level);

	let mut settings = Settings::load(&config.lockstep_dir)?;
	let ignore = config.ignore_list()?;

	match matches.subcommand() {
		Some(("diff", sub)) => {
			let (src, dst, label) = resolve_pair(sub, &settings, &config)?;
			let pair = DirectoryPair::new(&src, &dst);
			pair.validate()?;

			let (runner, mut rx) = OperationRunner::with_ignore(tokio::runtime::Handle::current(), ignore);
			runner.submit_diff(pair, &label)?;
			match wait_for(&mut rx).await?.outcome {
				Outcome::Diff(result) => print_delta(&result?, &src, &dst, sub.get_flag("flat")),
				Outcome::Sync(_) => return Err("unexpected sync completion".into()),
			}
		}
		Some(("sync", sub)) => {
			let (src, dst, label) = resolve_pair(sub, &settings, &config)?;
			let purge = if sub.get_flag("purge") {
				true
			} else if sub.get_flag("no-purge") {
				false
			} else {
				settings.snapshot().enable_purge
			};
			let pair = DirectoryPair::new(&src, &dst);
			pair.validate()?;

			if sub.get_flag("dry-run") {
				let strategy = SyncStrategy::from_label(&label).ok_or_else(|| {
					warn!("Received unexpected sync strategy: {:?}", label);
					format!("Unknown sync strategy: {:?}", label)
				})?;
				let options = SyncOptions::new(strategy, purge).ignore(ignore);
				let plan = SyncAction::new().plan(&src, &dst, &options)?;
				if plan.is_empty() {
					println!("Nothing to do");
				}
				for op in &plan.ops {
					println!("{}", op);
				}
				return Ok(());
			}

			let (runner, mut rx) = OperationRunner::with_ignore(tokio::runtime::Handle::current(), ignore);
			runner.submit_sync(pair, &label, purge)?;
			match wait_for(&mut rx).await?.outcome {
				Outcome::Sync(report) => println!("{}", report?),
				Outcome::Diff(_) => return Err("unexpected diff completion".into()),
			}
		}
		Some(("config", sub)) => match sub.subcommand() {
			Some(("list", _)) => {
				for name in settings.configuration_names() {
					println!("{}", name);
				}
			}
			Some(("show", args)) => {
				let name = args.get_one::<String>("name").ok_or("config show: name required")?;
				let saved = settings.configuration(name).ok_or_else(|| format!("No saved configuration named {:?}", name))?;
				println!("src:  {}\ndst:  {}\nsync: {}", saved.src, saved.dst, saved.sync);
			}
			Some(("save", args)) => {
				let name = args.get_one::<String>("name").ok_or("config save: name required")?;
				let src = args.get_one::<String>("src").ok_or("config save: src required")?;
				let dst = args.get_one::<String>("dst").ok_or("config save: dst required")?;
				let label = args.get_one::<String>("strategy").ok_or("config save: strategy required")?;
				let sync: SyncStrategy = label.parse()?;
				settings.save_configuration(name, SavedConfiguration { src: src.clone(), dst: dst.clone(), sync })?;
			}
			_ => unreachable!("subcommand_required"),
		},
		Some(("purge", sub)) => match sub.get_one::<String>("state").map(String::as_str) {
			Some(state) => settings.set(SettingsKey::EnablePurge, state == "on")?,
			None => println!("purge: {}", if settings.get(SettingsKey::EnablePurge) { "on" } else { "off" }),
		},
		_ => unreachable!("subcommand_required"),
	}

	Ok(())
}

// vim: ts=4
