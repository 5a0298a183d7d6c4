//! Crypton CLI library
//!
//! The pieces behind the `crypton` binary: argument parsing, layered
//! configuration, rendering, and the console/replay/config handlers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod meta;
pub mod render;

pub use cli::{Cli, Commands};
pub use commands::{replay, CommandDispatcher, ConsoleOutput, ReplayReport, Session};
pub use config::{CliConfig, ConfigError, ConfigOverrides, ConsoleAppConfig};
pub use error::{CliError, Result};
pub use meta::MetaAction;
pub use render::Renderer;
