//! Git operations via the system `git` binary.

pub mod gateway;
pub mod runner;
pub mod status;

pub use gateway::{GitGateway, Vcs};
pub use runner::{GitOutput, GitRunner, SystemRunner};
pub use status::{StatusEntry, parse_porcelain};
