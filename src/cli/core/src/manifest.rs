/* src/cli/core/src/manifest.rs */

// Dependency manifest (package.json): only the declared package names matter here.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{BuildError, Stage};

/// A dependency group: names only, version specifiers are never inspected.
type Group = Option<BTreeMap<String, IgnoredAny>>;

#[derive(Debug, Default, Deserialize)]
pub struct PackageManifest {
  #[serde(default)]
  pub name: Option<String>,
  /// `null` or absent means empty.
  #[serde(default)]
  pub dependencies: Group,
  #[serde(default, rename = "devDependencies")]
  pub dev_dependencies: Group,
}

impl PackageManifest {
  /// Union of runtime and development dependency names.
  pub fn package_names(&self) -> BTreeSet<String> {
    [&self.dependencies, &self.dev_dependencies]
      .into_iter()
      .flatten()
      .flat_map(BTreeMap::keys)
      .cloned()
      .collect()
  }
}

/// Read and parse the manifest. Unreadable is an I/O failure, unparseable a config failure.
pub fn read_package_manifest(path: &Path, stage: Stage) -> Result<PackageManifest, BuildError> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| BuildError::io(stage, "failed to read manifest", path, e))?;
  serde_json::from_str(&content)
    .map_err(|source| BuildError::Config { stage, path: path.to_path_buf(), source })
}
