//! Collect diagnostic artifacts and container logs from a namespace after an
//! integration test run.

pub mod cli;
pub mod clowder;
pub mod cluster;
pub mod collector;
pub mod error;
pub mod kubernetes;
pub mod oc;
#[cfg(test)]
mod tests;
pub mod types;
pub mod utils;

pub use cluster::ClusterApi;
pub use collector::{CollectOptions, collect};
pub use error::{Error, Result};
