//! Internal modules for the FlexInvest terminal client.
//!
//! This library provides command parsing, configuration, page rendering
//! and the interactive shell used by the fi_client binary.

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod shell;
