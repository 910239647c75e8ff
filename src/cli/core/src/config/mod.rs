/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{CONFIG_FILE, find_project_root, load_project_config, load_studio_config};
pub use types::{BundleFormat, StudioConfig};
