/* src/cli/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::StudioConfig;

pub const CONFIG_FILE: &str = "studio.toml";

/// Walk upward from `start` to the first directory holding `studio.toml` or `package.json`.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    if dir.join(CONFIG_FILE).is_file() || dir.join("package.json").is_file() {
      return Ok(dir);
    }
    if !dir.pop() {
      bail!("no {CONFIG_FILE} or package.json found (searched upward from {})", start.display());
    }
  }
}

pub fn load_studio_config(path: &Path) -> Result<StudioConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: StudioConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.validate().with_context(|| format!("invalid {}", path.display()))?;
  Ok(config)
}

/// Load `<root>/studio.toml`, falling back to defaults when the project has none.
pub fn load_project_config(root: &Path) -> Result<StudioConfig> {
  let path = root.join(CONFIG_FILE);
  if path.is_file() { load_studio_config(&path) } else { Ok(StudioConfig::default()) }
}
