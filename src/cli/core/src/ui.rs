/* src/cli/core/src/ui.rs */

// Terminal output helpers. Every user-facing line of the CLI goes through here.

#![allow(clippy::print_stdout, clippy::print_stderr)]

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn ok(msg: &str) {
  println!("  {GREEN}\u{2713}{RESET} {msg}");
}

pub fn fail(msg: &str) {
  eprintln!("  {RED}\u{2717}{RESET} {msg}");
}

pub fn arrow(msg: &str) {
  println!("  {GREEN}\u{2192}{RESET} {msg}");
}

pub fn step(n: usize, total: usize, msg: &str) {
  println!("  {BOLD}[{n}/{total}]{RESET} {msg}...");
}

pub fn detail(msg: &str) {
  println!("        {msg}");
}

pub fn detail_ok(msg: &str) {
  println!("        {GREEN}\u{2713}{RESET} {msg}");
}

pub fn banner(cmd: &str, project: Option<&str>) {
  println!();
  match project {
    Some(name) => {
      println!("  {BOLD}studio-build{RESET} {cmd} {CYAN}{name}{RESET} {DIM}v{VERSION}{RESET}");
    }
    None => println!("  {BOLD}studio-build{RESET} {cmd} {DIM}v{VERSION}{RESET}"),
  }
  println!();
}

/// Print a name list on one dimmed line, or `(none)` when empty.
pub fn name_list<'a>(label: &str, names: impl IntoIterator<Item = &'a String>) {
  let joined: Vec<&str> = names.into_iter().map(String::as_str).collect();
  if joined.is_empty() {
    detail(&format!("{label}: {DIM}(none){RESET}"));
  } else {
    detail(&format!("{label}: {DIM}{}{RESET}", joined.join(", ")));
  }
}

#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
  if bytes >= 1_000_000 {
    format!("{:.1} MB", bytes as f64 / 1_000_000.0)
  } else if bytes >= 1_000 {
    format!("{:.1} kB", bytes as f64 / 1_000.0)
  } else {
    format!("{bytes} B")
  }
}

pub fn blank() {
  println!();
}

#[cfg(test)]
mod tests {
  use super::format_size;

  #[test]
  fn format_size_units() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(1_500), "1.5 kB");
    assert_eq!(format_size(2_340_000), "2.3 MB");
  }
}
