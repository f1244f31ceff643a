//! obsreview: a local browser review gate for Markdown notes and agent plans.
//!
//! The binary reads a hook event, serves the note on loopback, waits for the
//! human to approve or deny, and prints the decision. This library exposes
//! the pieces for integration testing; the entrypoint is in `main.rs`.

pub mod browser;
pub mod cli;
pub mod config;
pub mod decision;
pub mod event;
pub mod paths;
pub mod server;
pub mod session;
