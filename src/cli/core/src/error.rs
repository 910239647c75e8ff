/* src/cli/core/src/error.rs */

// Failure taxonomy of the build pipeline. Every variant names the stage it came from.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Pipeline stage a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Clean,
  Frontend,
  Backend,
}

impl Stage {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Clean => "clean",
      Self::Frontend => "frontend",
      Self::Backend => "backend",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum BuildError {
  /// Filesystem access failed: manifest unreadable, output not removable, config not writable.
  #[error("[{stage}] {action} {}: {source}", .path.display())]
  Io {
    stage: Stage,
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A bundler could not be started or reported failure.
  #[error("[{stage}] {message}")]
  Build { stage: Stage, message: String },

  /// The dependency manifest is not the expected JSON mapping.
  #[error("[{stage}] malformed manifest {}: {source}", .path.display())]
  Config {
    stage: Stage,
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

impl BuildError {
  pub fn io(stage: Stage, action: &'static str, path: &Path, source: std::io::Error) -> Self {
    Self::Io { stage, action, path: path.to_path_buf(), source }
  }

  pub fn build(stage: Stage, message: impl Into<String>) -> Self {
    Self::Build { stage, message: message.into() }
  }

  pub fn stage(&self) -> Stage {
    match self {
      Self::Io { stage, .. } | Self::Build { stage, .. } | Self::Config { stage, .. } => *stage,
    }
  }
}
