/* src/cli/core/src/build/backend.rs */

// Backend pass: bundles the server entry point into one minified file with esbuild.
// Allow-listed packages are inlined; every other declared package stays a runtime import.

use std::collections::BTreeSet;

use super::config::BackendConfig;
use super::partition::{Allowlist, DependencySplit, split};
use super::step::BuildStep;
use crate::error::{BuildError, Stage};
use crate::manifest::read_package_manifest;
use crate::shell::{resolve_tool, run_tool};
use crate::ui::{self, DIM, RESET};

pub struct BackendStep {
  pub config: BackendConfig,
  pub allowlist: Allowlist,
}

impl BackendStep {
  pub fn new(config: BackendConfig, allowlist: Allowlist) -> Self {
    Self { config, allowlist }
  }

  /// Read the manifest as it is now and split its names against the allow-list.
  pub fn dependency_split(&self) -> Result<DependencySplit, BuildError> {
    let manifest = read_package_manifest(&self.config.manifest, Stage::Backend)?;
    Ok(split(&manifest.package_names(), &self.allowlist))
  }
}

impl BuildStep for BackendStep {
  fn stage(&self) -> Stage {
    Stage::Backend
  }

  fn title(&self) -> &'static str {
    "Bundling server"
  }

  fn run(&self) -> Result<(), BuildError> {
    let cfg = &self.config;
    let deps = self.dependency_split()?;
    ui::detail(&format!(
      "{} bundled \u{00b7} {} external",
      deps.bundled.len(),
      deps.external.len()
    ));

    let esbuild = resolve_tool(&cfg.root, "esbuild", cfg.esbuild.as_deref())
      .map_err(|e| BuildError::build(Stage::Backend, format!("{e:#}")))?;
    let args = esbuild_args(cfg, &deps.external);
    let entry = cfg.entry.strip_prefix(&cfg.root).unwrap_or(&cfg.entry);
    let echo = format!(
      "esbuild {} --bundle --platform=node --format={} --minify={} (+{} externals)",
      entry.display(),
      cfg.format.as_str(),
      cfg.minify,
      deps.external.len()
    );

    if let Err(e) = run_tool(&cfg.root, &esbuild, &args, "esbuild", &echo) {
      // A failed bundle must not leave a file that looks deployable.
      let mut message = format!("{e:#}");
      if let Err(cleanup) = discard_outfile(cfg) {
        message.push_str(&format!("\n{cleanup}"));
      }
      return Err(BuildError::build(Stage::Backend, message));
    }

    let size = std::fs::metadata(&cfg.outfile).map(|m| m.len()).unwrap_or(0);
    let shown = cfg.outfile.strip_prefix(&cfg.root).unwrap_or(&cfg.outfile);
    ui::detail_ok(&format!("{}  {DIM}({}){RESET}", shown.display(), ui::format_size(size)));
    Ok(())
  }
}

/// esbuild command line. Externals come sorted from the set, so the same inputs always
/// produce the same arguments.
pub fn esbuild_args(cfg: &BackendConfig, external: &BTreeSet<String>) -> Vec<String> {
  let mut args = vec![
    cfg.entry.to_string_lossy().into_owned(),
    "--bundle".to_string(),
    "--platform=node".to_string(),
    format!("--format={}", cfg.format.as_str()),
    format!("--outfile={}", cfg.outfile.display()),
  ];
  for (key, value) in &cfg.defines {
    args.push(format!("--define:{key}={value}"));
  }
  if cfg.minify {
    args.push("--minify".to_string());
  }
  for name in external {
    args.push(format!("--external:{name}"));
  }
  args.push("--log-level=info".to_string());
  args
}

fn discard_outfile(cfg: &BackendConfig) -> Result<(), BuildError> {
  match std::fs::remove_file(&cfg.outfile) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(BuildError::io(Stage::Backend, "failed to remove partial", &cfg.outfile, e)),
  }
}
