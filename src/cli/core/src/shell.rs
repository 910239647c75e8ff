/* src/cli/core/src/shell.rs */

// Helpers for locating and running the external bundlers.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::ui::{self, DIM, RESET};

/// Run `program args..` in `base_dir`, bail on failure (shows both stdout and stderr on error).
/// `echo` is the short form printed before running. On success the tool's own report
/// (esbuild and Vite both log to stderr) is relayed as dimmed detail lines.
pub(crate) fn run_tool(
  base_dir: &Path,
  program: &Path,
  args: &[String],
  label: &str,
  echo: &str,
) -> Result<()> {
  ui::detail(&format!("{DIM}{echo}{RESET}"));
  let output = Command::new(program)
    .args(args)
    .current_dir(base_dir)
    .output()
    .with_context(|| format!("failed to run {label} ({})", program.display()))?;
  if !output.status.success() {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut msg = format!("{label} exited with status {}", output.status);
    if !stderr.is_empty() {
      msg.push('\n');
      msg.push_str(stderr.trim_end());
    }
    if !stdout.is_empty() {
      msg.push('\n');
      msg.push_str(stdout.trim_end());
    }
    bail!("{msg}");
  }
  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);
  for line in report_lines(&stderr, &stdout) {
    ui::detail(&format!("{DIM}{line}{RESET}"));
  }
  Ok(())
}

/// Non-blank lines of a tool's output, stderr first, trailing whitespace trimmed.
fn report_lines<'a>(stderr: &'a str, stdout: &'a str) -> impl Iterator<Item = &'a str> {
  stderr.lines().chain(stdout.lines()).map(str::trim_end).filter(|l| !l.trim().is_empty())
}

/// Locate a bundler executable: explicit path, then `node_modules/.bin`, then PATH.
pub(crate) fn resolve_tool(
  base_dir: &Path,
  name: &str,
  explicit: Option<&str>,
) -> Result<PathBuf> {
  if let Some(path) = explicit {
    let path = base_dir.join(path);
    if path.is_file() {
      return Ok(path);
    }
    bail!("{name} not found at {} (set in [tools])", path.display());
  }
  if let Some(path) = resolve_node_module(base_dir, &format!(".bin/{name}")) {
    return Ok(path);
  }
  if which_exists(name) {
    return Ok(PathBuf::from(name));
  }
  bail!("{name} not found -- run `npm install` or set tools.{name} in studio.toml");
}

/// Resolve a path inside node_modules by walking up parent directories.
/// Mirrors Node.js module resolution: checks `<dir>/node_modules/<suffix>` at each level.
pub(crate) fn resolve_node_module(start: &Path, suffix: &str) -> Option<PathBuf> {
  let mut dir = start.to_path_buf();
  loop {
    let candidate = dir.join("node_modules").join(suffix);
    if candidate.exists() {
      return Some(candidate);
    }
    if !dir.pop() {
      return None;
    }
  }
}

/// Check if a command exists on PATH.
pub(crate) fn which_exists(cmd: &str) -> bool {
  Command::new("which")
    .arg(cmd)
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .is_ok_and(|s| s.success())
}

/// Write an executable shell script standing in for a bundler.
#[cfg(all(test, unix))]
pub(crate) fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
