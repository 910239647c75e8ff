/* src/cli/core/src/clean.rs */

// Workspace cleaner: removes the previous build output before anything writes to it.
// Also backs the `studio-build clean` command.

use std::path::{Path, PathBuf};

use crate::build::config::BuildConfig;
use crate::build::step::BuildStep;
use crate::error::{BuildError, Stage};
use crate::ui;

/// Removes the whole output tree. Succeeds without doing anything when it is already gone.
#[derive(Debug, Clone)]
pub struct CleanStep {
  pub out_dir: PathBuf,
}

impl BuildStep for CleanStep {
  fn stage(&self) -> Stage {
    Stage::Clean
  }

  fn title(&self) -> &'static str {
    "Cleaning output"
  }

  fn run(&self) -> Result<(), BuildError> {
    if remove_dir_if_exists(&self.out_dir, Stage::Clean)? {
      ui::detail(&format!("deleted {}", self.out_dir.display()));
    } else {
      ui::detail(&format!("{} already clean", self.out_dir.display()));
    }
    Ok(())
  }
}

/// Run `studio-build clean`.
pub fn run_clean(build_config: &BuildConfig) -> Result<(), BuildError> {
  ui::arrow("cleaning build output");
  CleanStep { out_dir: build_config.out_dir.clone() }.run()?;
  ui::ok("clean complete");
  Ok(())
}

/// Recursively delete `path`. Returns whether anything was removed.
/// A missing path is fine; a path that cannot be removed (permissions, not a directory) is not.
pub(crate) fn remove_dir_if_exists(path: &Path, stage: Stage) -> Result<bool, BuildError> {
  match std::fs::remove_dir_all(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(BuildError::io(stage, "failed to remove", path, e)),
  }
}
