//! CLI command implementations
//!
//! Commands are thin drivers over the library: each opens what it needs,
//! reports one JSON result on stdout, and returns.

use std::io;
use std::path::Path;

use serde_json::json;

use crate::adapter::AdapterKind;
use crate::client::{CollectRequest, DatasetClient};
use crate::config::PglConfig;
use crate::observability::Logger;
use crate::server::run_server;

use super::args::{Cli, Command, DatasetCommand};
use super::errors::CliResult;
use super::io::{write_json_file, write_line, write_response};

/// Parse the command line and run it
pub fn run() -> CliResult<()> {
    run_cli(Cli::parse_args())
}

/// Run already-parsed arguments
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let config = PglConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Qdataset { cmd } => {
            let client = dataset_client(&config, cli.db_url.as_deref());
            run_dataset_command(&client, &config, cmd)
        }
        Command::Serve { adapter, seed } => serve(adapter, seed),
    }
}

/// Build the client from the resolved connection string and config
pub fn dataset_client(config: &PglConfig, db_url: Option<&str>) -> DatasetClient {
    DatasetClient::new(config.resolve_database_url(db_url)).with_fetch_size(config.fetch_size)
}

/// Run one `qdataset` subcommand
pub fn run_dataset_command(
    client: &DatasetClient,
    config: &PglConfig,
    cmd: DatasetCommand,
) -> CliResult<()> {
    match cmd {
        DatasetCommand::Ls => {
            let datasets = client.list_datasets()?;
            write_response(json!({ "datasets": datasets }))
        }
        DatasetCommand::Create { name } => {
            client.create_dataset(&name)?;
            write_response(json!({ "created": name }))
        }
        DatasetCommand::Import { name, file_path } => {
            client.import_queries(&name, &file_path)?;
            write_response(json!({ "imported": name, "path": file_path }))
        }
        DatasetCommand::Insert { name, query } => {
            client.insert_query(&name, &query)?;
            write_response(json!({ "inserted": name }))
        }
        DatasetCommand::Delete { name } => {
            client.delete_dataset(&name)?;
            write_response(json!({ "deleted": name }))
        }
        DatasetCommand::Run {
            name,
            r#continue,
            out,
            limit,
            method,
            arm,
        } => {
            let limit = limit.unwrap_or(config.default_limit);
            let method = method.unwrap_or_else(|| config.default_method.clone());
            run_dataset(client, &name, r#continue, &out, limit, &method, arm)
        }
        DatasetCommand::Collect {
            name,
            offset,
            limit,
            method,
            arm,
        } => {
            let request = CollectRequest::new(name)
                .with_offset(offset)
                .with_limit(limit.unwrap_or(config.default_limit))
                .with_method(method.unwrap_or_else(|| config.default_method.clone()))
                .with_arm(arm);
            collect(client, &request)
        }
    }
}

/// Drain a dataset into a JSON array file
pub fn run_dataset(
    client: &DatasetClient,
    name: &str,
    resume: bool,
    out: &Path,
    limit: i64,
    method: &str,
    arm: i32,
) -> CliResult<()> {
    if resume {
        Logger::info("DATASET_RUN_RESUME", &[("dataset", name)]);
    } else {
        Logger::info("DATASET_RUN_FROM_START", &[("dataset", name)]);
    }

    let plans = client.drain(name, resume, limit, method, arm)?;
    write_json_file(out, &plans)?;

    let out_display = out.display().to_string();
    Logger::info(
        "DATASET_RUN_SAVED",
        &[
            ("dataset", name),
            ("out", &out_display),
            ("plans", &plans.len().to_string()),
        ],
    );
    write_response(json!({
        "dataset": name,
        "plans": plans.len(),
        "out": out_display,
    }))
}

/// Print one collect batch, one record per line
pub fn collect(client: &DatasetClient, request: &CollectRequest) -> CliResult<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for record in client.collect(request)? {
        write_line(&mut stdout, &record?)?;
    }
    Ok(())
}

/// Serve plan-choice requests on stdin/stdout until end of input
pub fn serve(adapter: AdapterKind, seed: Option<u64>) -> CliResult<()> {
    let adapter_name = adapter.to_string();
    Logger::info("SERVE_ADAPTER", &[("adapter", &adapter_name)]);

    let stdin = io::stdin();
    run_server(adapter.build(seed), stdin.lock(), io::stdout().lock())?;
    Ok(())
}
