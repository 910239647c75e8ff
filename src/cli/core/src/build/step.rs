/* src/cli/core/src/build/step.rs */

// A build phase the orchestrator can run. Steps run in sequence and own the
// output directory exclusively while running.

use crate::error::{BuildError, Stage};

pub trait BuildStep {
  fn stage(&self) -> Stage;

  /// Progress line shown before the step runs.
  fn title(&self) -> &'static str;

  fn run(&self) -> Result<(), BuildError>;
}
