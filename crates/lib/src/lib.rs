//! rigup-lib: provisioning core for rigup.
//!
//! Clones a bootstrap repository into a fresh temporary workspace and runs
//! its `bootstrap.sh`, installing the version-control client first when it
//! is missing. Progress and log output stream to an observer-supplied event
//! sink in near real time:
//! - [`pipeline::Provisioner`]: the single-use pipeline orchestrator
//! - [`event::Event`] / [`event::EventSink`]: the observer contract
//! - [`process`]: external command execution with live output streaming
//! - [`deps`]: tool detection and package-manager installation
//! - [`workspace`] / [`fetch`] / [`bootstrap`]: the individual stages

pub mod bootstrap;
pub mod deps;
pub mod event;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testutil;
