//! rqs core - Shared plumbing for the rqs alias tool
//!
//! Per-user paths, the optional config file, and the two process
//! collaborators the entry model leans on: an executable probe and a
//! shell runner.

pub mod config;
pub mod paths;
pub mod process;

pub use config::Config;
pub use paths::Paths;
pub use process::{Probe, Runner, ShellRunner, SystemProbe};
