use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagejoin::{
    ConfigError, ExecConfig, ExecError, ExternalSorter, FileError, IoAccountant, Relation,
    SortMergeJoin,
};

/// External sort and sort-merge join under a four-page memory budget
#[derive(Parser, Debug)]
#[command(name = "pagejoin", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory for temporary run files (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Statistics format
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join two CSV relations on <COL_A> = <COL_B>
    Join {
        table_a: PathBuf,
        table_b: PathBuf,
        col_a: String,
        col_b: String,
        output: PathBuf,
    },
    /// Sort a CSV relation on one column
    Sort {
        table: PathBuf,
        column: String,
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    File(#[from] FileError),

    #[error("{0}")]
    Exec(#[from] ExecError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SortReport {
    io_ops: usize,
    pages_written: usize,
    rows: usize,
    runs_generated: usize,
    merge_passes: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pagejoin=debug")
        } else {
            EnvFilter::new("pagejoin=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<ExecConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => ExecConfig::from_file(path)?,
        None => ExecConfig::default(),
    };
    if let Some(dir) = &args.work_dir {
        config.work_dir = dir.clone();
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = load_config(args)?;
    let mut io = IoAccountant::new();

    match &args.command {
        Command::Join {
            table_a,
            table_b,
            col_a,
            col_b,
            output,
        } => {
            let a = Relation::open(table_a)?;
            let b = Relation::open(table_b)?;
            info!(a = %table_a.display(), b = %table_b.display(), "joining {} = {}", col_a, col_b);

            let stats = SortMergeJoin::new(&config).execute(&a, &b, col_a, col_b, output, &mut io)?;
            match args.format {
                OutputFormat::Text => {
                    println!("#I/Os       : {}", stats.io_ops);
                    println!("#Pages out  : {}", stats.pages_out);
                    println!("#Tuples out : {}", stats.tuples_out);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
            }
        }
        Command::Sort {
            table,
            column,
            output,
        } => {
            let relation = Relation::open(table)?;
            io.reset();

            let sorted = ExternalSorter::new(&config).sort(&relation, column, "S", &mut io)?;
            let report = SortReport {
                io_ops: io.total_ops(),
                pages_written: io.pages_written(),
                rows: sorted.rows(),
                runs_generated: sorted.runs_generated(),
                merge_passes: sorted.merge_passes(),
            };
            sorted.into_run().persist(output)?;

            match args.format {
                OutputFormat::Text => {
                    println!("#I/Os          : {}", report.io_ops);
                    println!("#Pages written : {}", report.pages_written);
                    println!("#Tuples        : {}", report.rows);
                    println!("#Runs          : {}", report.runs_generated);
                    println!("#Merge passes  : {}", report.merge_passes);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
    }

    Ok(())
}
