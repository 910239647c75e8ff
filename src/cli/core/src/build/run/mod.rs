/* src/cli/core/src/build/run/mod.rs */

// Build orchestrator: clean -> bundle client -> bundle server, stopping at the first failure.


use std::time::Instant;

use super::backend::BackendStep;
use super::config::BuildConfig;
use super::frontend::FrontendStep;
use super::partition::Allowlist;
use super::step::BuildStep;
use crate::clean::CleanStep;
use crate::error::{BuildError, Stage};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
  Idle,
  Cleaning,
  BuildingFrontend,
  BuildingBackend,
  Done,
  Failed(Stage),
}

impl BuildState {
  fn running(stage: Stage) -> Self {
    match stage {
      Stage::Clean => Self::Cleaning,
      Stage::Frontend => Self::BuildingFrontend,
      Stage::Backend => Self::BuildingBackend,
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Done | Self::Failed(_))
  }
}

/// Runs its steps in order, once. No step is retried and a failure skips the rest.
pub struct Orchestrator {
  steps: Vec<Box<dyn BuildStep>>,
  history: Vec<BuildState>,
}

impl Orchestrator {
  pub fn new(steps: Vec<Box<dyn BuildStep>>) -> Self {
    Self { steps, history: vec![BuildState::Idle] }
  }

  /// The standard pipeline for a project. The allow-list is passed in, never read globally.
  pub fn for_project(build_config: &BuildConfig, allowlist: &Allowlist) -> Self {
    Self::new(vec![
      Box::new(CleanStep { out_dir: build_config.out_dir.clone() }),
      Box::new(FrontendStep::new(build_config.frontend.clone())),
      Box::new(BackendStep::new(build_config.backend.clone(), allowlist.clone())),
    ])
  }

  pub fn state(&self) -> BuildState {
    self.history.last().copied().unwrap_or(BuildState::Idle)
  }

  /// Every state visited so far, starting with `Idle`.
  pub fn history(&self) -> &[BuildState] {
    &self.history
  }

  /// Run every step once. A finished pipeline is not run again: `Done` stays a success and
  /// `Failed` keeps reporting the stage that failed.
  pub fn run(&mut self) -> Result<(), BuildError> {
    match self.state() {
      BuildState::Done => return Ok(()),
      BuildState::Failed(stage) => {
        return Err(BuildError::build(stage, "build already failed; start a new run"));
      }
      _ => {}
    }
    let total = self.steps.len();
    for (i, step) in self.steps.iter().enumerate() {
      self.history.push(BuildState::running(step.stage()));
      ui::step(i + 1, total, step.title());
      if let Err(e) = step.run() {
        self.history.push(BuildState::Failed(e.stage()));
        ui::fail(&format!("{} failed", e.stage()));
        return Err(e);
      }
      ui::blank();
    }
    self.history.push(BuildState::Done);
    Ok(())
  }
}

// -- Entry point --

pub fn run_build(build_config: &BuildConfig, allowlist: &Allowlist) -> Result<(), BuildError> {
  let started = Instant::now();
  ui::banner("build", build_config.project_name.as_deref());

  let mut orchestrator = Orchestrator::for_project(build_config, allowlist);
  orchestrator.run()?;

  let elapsed = started.elapsed().as_secs_f64();
  // history = Idle, one entry per step, Done
  let steps = orchestrator.history().len().saturating_sub(2);
  let out = build_config.out_dir.strip_prefix(&build_config.root).unwrap_or(&build_config.out_dir);
  ui::ok(&format!("build complete in {elapsed:.1}s"));
  ui::detail(&format!("{steps} steps \u{00b7} output in {}", out.display()));
  Ok(())
}
