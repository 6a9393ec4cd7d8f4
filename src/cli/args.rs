//! CLI argument definitions using clap
//!
//! Commands:
//! - pgl qdataset ls|create|import|insert|delete|run|collect
//! - pgl serve

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapter::AdapterKind;
use crate::client::{ANY_ARM, RESUME_OFFSET};

/// pgl - client for the pglearned PostgreSQL extension
#[derive(Parser, Debug)]
#[command(name = "pgl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub db_url: Option<String>,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage query datasets
    Qdataset {
        #[command(subcommand)]
        cmd: DatasetCommand,
    },

    /// Answer plan-choice requests on stdin/stdout
    Serve {
        /// Strategy used to choose plans
        #[arg(long, default_value = "first")]
        adapter: AdapterKind,

        /// Seed for the random strategy
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommand {
    /// List all datasets
    Ls,

    /// Create a new dataset
    Create {
        /// Name of the dataset
        name: String,
    },

    /// Import queries from a file (server-side path)
    Import {
        /// Name of the dataset
        name: String,
        /// Path to the file on the database server
        file_path: String,
    },

    /// Insert a single query
    Insert {
        /// Name of the dataset
        name: String,
        /// SQL query string
        query: String,
    },

    /// Delete a dataset
    Delete {
        /// Name of the dataset
        name: String,
    },

    /// Run a whole dataset and save the plans as a JSON array
    Run {
        /// Name of the dataset
        name: String,
        /// Continue from the server-tracked position instead of offset 0
        #[arg(long)]
        r#continue: bool,
        /// Output file path
        #[arg(long)]
        out: PathBuf,
        /// Queries per batch (config default_limit when omitted)
        #[arg(long)]
        limit: Option<i64>,
        /// Planning method (config default_method when omitted)
        #[arg(long)]
        method: Option<String>,
        /// Planner arm, -1 for all
        #[arg(long, default_value_t = ANY_ARM, allow_hyphen_values = true)]
        arm: i32,
    },

    /// Collect one batch and print one JSON record per line
    Collect {
        /// Name of the dataset
        name: String,
        /// Offset into the dataset, -1 for the server-tracked position
        #[arg(long, default_value_t = RESUME_OFFSET, allow_hyphen_values = true)]
        offset: i64,
        /// Number of queries to run (config default_limit when omitted)
        #[arg(long)]
        limit: Option<i64>,
        /// Planning method (config default_method when omitted)
        #[arg(long)]
        method: Option<String>,
        /// Planner arm, -1 for all
        #[arg(long, default_value_t = ANY_ARM, allow_hyphen_values = true)]
        arm: i32,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "pgl", "qdataset", "run", "tpch", "--continue", "--out", "plans.json",
        ])
        .unwrap();

        match cli.command {
            Command::Qdataset {
                cmd:
                    DatasetCommand::Run {
                        name,
                        r#continue,
                        out,
                        limit,
                        arm,
                        ..
                    },
            } => {
                assert_eq!(name, "tpch");
                assert!(r#continue);
                assert_eq!(out, PathBuf::from("plans.json"));
                assert_eq!(limit, None);
                assert_eq!(arm, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_collect_with_negative_values() {
        let cli = Cli::try_parse_from([
            "pgl", "qdataset", "collect", "job", "--offset", "-1", "--limit", "2", "--method",
            "brute", "--arm", "3",
        ])
        .unwrap();

        match cli.command {
            Command::Qdataset {
                cmd:
                    DatasetCommand::Collect {
                        offset,
                        limit,
                        method,
                        arm,
                        ..
                    },
            } => {
                assert_eq!(offset, -1);
                assert_eq!(limit, Some(2));
                assert_eq!(method.as_deref(), Some("brute"));
                assert_eq!(arm, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_db_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pgl", "qdataset", "ls", "--db-url", "postgres://u:p@h:5432/d",
        ])
        .unwrap();
        assert_eq!(cli.db_url.as_deref(), Some("postgres://u:p@h:5432/d"));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["pgl", "serve", "--adapter", "lowest-cost"]).unwrap();
        match cli.command {
            Command::Serve { adapter, seed } => {
                assert_eq!(adapter, AdapterKind::LowestCost);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_rejects_unknown_adapter() {
        assert!(Cli::try_parse_from(["pgl", "serve", "--adapter", "oracle"]).is_err());
    }
}
