//! Evidence collectors for the overtime engine.
//!
//! Collectors are the side-effecting half of the system: they gather
//! raw activity evidence (git commits, pre-fetched review/meeting/chat
//! exports), normalize timestamps into the configured local zone, and
//! hand the engine plain record lists. Collection failures degrade
//! gracefully; a source that yields nothing contributes nothing.

pub mod file;
pub mod git;

pub use file::{LoadError, load_instants, load_meetings};
pub use git::{GitConfig, GitError, collect_commits};
