//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, settings merging,
//! and subcommand handlers.

mod args;
mod commands;
mod enums;
mod settings;

pub use args::{Args, Command, ConfigAction};
pub use commands::handle_config_action;
pub use enums::{CharacterSet, FilterArg};
pub use settings::{params_from_config, resolve_params};
