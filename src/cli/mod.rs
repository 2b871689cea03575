//! Command line front end
//!
//! - view: load a record file and print one view
//! - serve: load a record file, then apply JSON commands from stdin and
//!   stream events to stdout
//!
//! Logs go to stderr so stdout carries nothing but events.

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, ViewArgs};
pub use commands::{open_controller, render_view, run, run_command, serve, serve_stream, view};
pub use config::ViewConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{encode_event, load_records, write_event};
