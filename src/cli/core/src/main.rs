/* src/cli/core/src/main.rs */

mod build;
mod clean;
mod config;
mod error;
mod manifest;
mod shell;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use build::config::BuildConfig;
use build::partition::{Allowlist, inert_entries, split};
use config::{StudioConfig, find_project_root, load_project_config};
use error::Stage;
use manifest::read_package_manifest;
use ui::{RESET, YELLOW};

#[derive(Parser)]
#[command(name = "studio-build", version, about = "Bundle the studio site: client assets + server")]
struct Cli {
  /// Project root (auto-detected from studio.toml or package.json if omitted)
  #[arg(short, long, global = true)]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Clean the output directory, bundle the client, then bundle the server (default)
  Build,
  /// Remove the output directory
  Clean,
  /// Show which declared packages the server bundle inlines and which stay external
  Externals,
}

/// Resolve the project root (explicit or auto-detected) and parse its studio.toml
fn resolve_project(explicit: Option<PathBuf>) -> Result<(StudioConfig, BuildConfig)> {
  let root = match explicit {
    Some(p) => {
      p.canonicalize().with_context(|| format!("failed to canonicalize {}", p.display()))?
    }
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_project_root(&cwd)?
    }
  };
  let config = load_project_config(&root)?;
  let mut build_config = BuildConfig::from_studio_config(&config, &root)?;
  if build_config.project_name.is_none() {
    // Banner only; an unreadable manifest is reported by the backend step
    let manifest = read_package_manifest(&build_config.backend.manifest, Stage::Backend);
    build_config.project_name = manifest.ok().and_then(|m| m.name);
  }
  Ok((config, build_config))
}

fn print_externals(build_config: &BuildConfig, allowlist: &Allowlist) -> Result<()> {
  let manifest = read_package_manifest(&build_config.backend.manifest, Stage::Backend)?;
  let names = manifest.package_names();
  let deps = split(&names, allowlist);

  ui::banner("externals", build_config.project_name.as_deref());
  ui::name_list("bundled", &deps.bundled);
  ui::name_list("external", &deps.external);
  let inert: Vec<&String> = inert_entries(&names, allowlist).collect();
  if !inert.is_empty() {
    ui::detail(&format!("{YELLOW}note{RESET}: allow-list names not declared in the manifest"));
    ui::name_list("inert", inert);
  }
  ui::blank();
  ui::ok(&format!("{} bundled \u{00b7} {} external", deps.bundled.len(), deps.external.len()));
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  let (config, build_config) = resolve_project(cli.root)?;
  let allowlist = config.allowlist();

  match cli.command.unwrap_or(Command::Build) {
    Command::Build => build::run::run_build(&build_config, &allowlist)?,
    Command::Clean => clean::run_clean(&build_config)?,
    Command::Externals => print_externals(&build_config, &allowlist)?,
  }

  Ok(())
}
