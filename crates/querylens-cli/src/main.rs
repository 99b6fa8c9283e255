//! CLI entry point for `querylens`.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use querylens_cli::{run_analyze, AnalyzeOptions, InputFormat, OutputFormat};
use querylens_core::tracing::init_tracing;
use querylens_core::QueryLensErrorCode;

#[derive(Debug, Parser)]
#[command(
    name = "querylens",
    about = "Score SQL query complexity and summarize table usage per organization"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Analyze a query-log feed and write result sets
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Query-log feed (CSV export or JSON Lines)
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "querylens-output")]
    output_dir: PathBuf,

    /// Feed format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    /// Result-set format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    output_format: OutputFormat,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Directory holding querylens.toml
    #[arg(long, default_value = ".")]
    config_root: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Analyze(args) => analyze(args),
    }
}

fn analyze(args: AnalyzeArgs) {
    let options = AnalyzeOptions {
        input: args.input,
        output_dir: args.output_dir,
        input_format: args.input_format,
        output_format: args.output_format,
        config_root: args.config_root,
        threads: args.threads,
    };

    let report = match run_analyze(&options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e.report_string());
            process::exit(2);
        }
    };

    for failure in &report.failures {
        eprintln!("{}", failure.report_string());
    }
    println!(
        "Analyzed {}/{} records ({} failed) across {} organizations and {} tables",
        report.queries_analyzed,
        report.records_read,
        report.failures.len(),
        report.organizations,
        report.tables
    );
    for path in &report.outputs {
        println!("  wrote {}", path.display());
    }
}
