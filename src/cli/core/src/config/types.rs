/* src/cli/core/src/config/types.rs */

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::build::partition::{Allowlist, DEFAULT_ALLOWLIST};

/// Contents of `studio.toml`. Every section is optional; an absent file means all defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudioConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub paths: PathsSection,
  #[serde(default)]
  pub frontend: FrontendSection,
  #[serde(default)]
  pub backend: BackendSection,
  #[serde(default)]
  pub tools: ToolsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
  #[serde(default = "default_client")]
  pub client: String,
  #[serde(default = "default_server_entry")]
  pub server_entry: String,
  #[serde(default = "default_manifest")]
  pub manifest: String,
  #[serde(default = "default_out_dir")]
  pub out_dir: String,
  /// Relative to `out_dir`.
  #[serde(default = "default_public_dir")]
  pub public_dir: String,
  /// Relative to `out_dir`.
  #[serde(default = "default_server_bundle")]
  pub server_bundle: String,
}

impl Default for PathsSection {
  fn default() -> Self {
    Self {
      client: default_client(),
      server_entry: default_server_entry(),
      manifest: default_manifest(),
      out_dir: default_out_dir(),
      public_dir: default_public_dir(),
      server_bundle: default_server_bundle(),
    }
  }
}

fn default_client() -> String {
  "client".to_string()
}

fn default_server_entry() -> String {
  "server/index.ts".to_string()
}

fn default_manifest() -> String {
  "package.json".to_string()
}

fn default_out_dir() -> String {
  "dist".to_string()
}

fn default_public_dir() -> String {
  "public".to_string()
}

fn default_server_bundle() -> String {
  "index.cjs".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendSection {
  /// Applied in order; later plugins see the output of earlier ones.
  #[serde(default = "default_plugins")]
  pub plugins: Vec<String>,
  /// Alias -> directory relative to the project root.
  #[serde(default = "default_aliases")]
  pub aliases: BTreeMap<String, String>,
}

impl Default for FrontendSection {
  fn default() -> Self {
    Self { plugins: default_plugins(), aliases: default_aliases() }
  }
}

fn default_plugins() -> Vec<String> {
  vec!["@vitejs/plugin-react".to_string(), "@tailwindcss/vite".to_string()]
}

fn default_aliases() -> BTreeMap<String, String> {
  BTreeMap::from([
    ("@".to_string(), "client/src".to_string()),
    ("@shared".to_string(), "shared".to_string()),
    ("@assets".to_string(), "attached_assets".to_string()),
  ])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleFormat {
  #[default]
  Cjs,
  Esm,
  Iife,
}

impl BundleFormat {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Cjs => "cjs",
      Self::Esm => "esm",
      Self::Iife => "iife",
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
  #[serde(default = "default_allowlist")]
  pub allowlist: Vec<String>,
  #[serde(default)]
  pub format: BundleFormat,
  #[serde(default = "default_minify")]
  pub minify: bool,
  /// Compile-time substitutions, values are JS expressions.
  #[serde(default = "default_defines")]
  pub defines: BTreeMap<String, String>,
}

impl Default for BackendSection {
  fn default() -> Self {
    Self {
      allowlist: default_allowlist(),
      format: BundleFormat::default(),
      minify: default_minify(),
      defines: default_defines(),
    }
  }
}

fn default_allowlist() -> Vec<String> {
  DEFAULT_ALLOWLIST.iter().map(|s| (*s).to_string()).collect()
}

fn default_minify() -> bool {
  true
}

fn default_defines() -> BTreeMap<String, String> {
  BTreeMap::from([("process.env.NODE_ENV".to_string(), "\"production\"".to_string())])
}

/// Explicit bundler executables; resolved from node_modules/.bin or PATH when unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsSection {
  pub vite: Option<String>,
  pub esbuild: Option<String>,
}

impl StudioConfig {
  pub fn validate(&self) -> Result<()> {
    if let Some(p) = self.frontend.plugins.iter().find(|p| p.trim().is_empty()) {
      bail!("frontend.plugins contains an empty entry {p:?}");
    }
    if self.frontend.aliases.keys().any(|k| k.is_empty()) {
      bail!("frontend.aliases keys must not be empty");
    }
    if self.paths.public_dir.is_empty() {
      bail!("paths.public_dir must not be empty");
    }
    if self.paths.server_bundle.is_empty() {
      bail!("paths.server_bundle must not be empty");
    }
    if self.backend.defines.keys().any(|k| k.is_empty()) {
      bail!("backend.defines keys must not be empty");
    }
    Ok(())
  }

  pub fn allowlist(&self) -> Allowlist {
    Allowlist::new(self.backend.allowlist.iter().cloned())
  }
}
