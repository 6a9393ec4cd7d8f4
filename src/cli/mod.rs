//! CLI module for pgl
//!
//! Provides the command-line interface for:
//! - qdataset: list, create, import, insert, delete, run and collect datasets
//! - serve: answer plan-choice requests over stdin/stdout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DatasetCommand};
pub use commands::{collect, dataset_client, run, run_cli, run_dataset, run_dataset_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json_file, write_line, write_response};
