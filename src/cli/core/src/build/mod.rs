/* src/cli/core/src/build/mod.rs */

pub mod backend;
pub mod config;
pub mod frontend;
pub mod partition;
pub mod run;
pub mod step;
