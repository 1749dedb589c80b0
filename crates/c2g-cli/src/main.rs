//! Cassandra-to-GCS job configuration CLI.
//!
//! Resolves a job's properties into a validated configuration and reports
//! either the configuration or every problem found:
//! - `validate`: resolve and print the configuration or the error report
//! - `snapshot`: resolve and print an audit snapshot
//! - `keys`: list the recognized property keys

use c2g_cli::exit_codes::ExitCode;
use c2g_cli::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use c2g_cli::render::{render_config, render_keys, render_snapshot, ValidationOutcome};
use c2g_common::{format_error_human, Error, ReportFormat, StructuredError};
use c2g_config::properties::load_properties;
use c2g_config::{ConfigResolver, ConfigSnapshot, KeyNamespace, DEFAULT_NAMESPACE};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Validate Cassandra-to-GCS export job properties
#[derive(Parser)]
#[command(name = "c2g")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: ReportFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve job properties and print the configuration or every problem
    Validate(SourceArgs),

    /// Resolve job properties and print an audit snapshot
    Snapshot(SourceArgs),

    /// List the recognized property keys
    Keys(KeysArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Path to the job properties file
    #[arg(long)]
    properties: Option<PathBuf>,

    /// Override a property (key=value), applied after the file
    #[arg(long = "prop", value_name = "KEY=VALUE")]
    props: Vec<String>,

    /// Key namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

#[derive(Args, Debug)]
struct KeysArgs {
    /// Key namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("c2g", run_id = %run_id);
    let _enter = span.enter();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(code = err.code(), "command failed: {}", err);
            report_error(&cli.global, &err);
            ExitCode::from(&err)
        }
    };

    tracing::debug!(exit = %exit_code, "done");
    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    match &cli.command {
        Commands::Validate(args) => run_validate(&cli.global, args),
        Commands::Snapshot(args) => run_snapshot(&cli.global, args),
        Commands::Keys(args) => run_keys(&cli.global, args),
    }
}

fn run_validate(global: &GlobalOpts, args: &SourceArgs) -> Result<ExitCode, Error> {
    let (bag, paths) = load_properties(args.properties.as_deref(), args.props.as_slice())?;
    let resolver = ConfigResolver::new(KeyNamespace::new(args.namespace.as_str()));
    let namespace = resolver.namespace().as_str();

    match resolver.resolve(&bag) {
        Ok(config) => {
            let ignored: Vec<&str> = resolver.ignored_keys(&bag).collect();
            let outcome = ValidationOutcome::valid(namespace, &paths, &config, ignored);
            println!("{}", render_config(&outcome, global.format)?);
            Ok(ExitCode::Clean)
        }
        Err(report) if global.format == ReportFormat::Json => {
            let outcome = ValidationOutcome::invalid(namespace, &paths, &report);
            println!("{}", render_config(&outcome, global.format)?);
            Ok(ExitCode::from(&Error::from(report)))
        }
        Err(report) => Err(report.into()),
    }
}

fn run_snapshot(global: &GlobalOpts, args: &SourceArgs) -> Result<ExitCode, Error> {
    let (bag, paths) = load_properties(args.properties.as_deref(), args.props.as_slice())?;
    let resolver = ConfigResolver::new(KeyNamespace::new(args.namespace.as_str()));

    let config = resolver.resolve(&bag)?;
    let snapshot = ConfigSnapshot::new(&config, &bag, &paths, resolver.namespace())?;
    tracing::info!(id = snapshot.short_id(), "config snapshot taken");

    println!("{}", render_snapshot(&snapshot, global.format)?);
    Ok(ExitCode::Clean)
}

fn run_keys(global: &GlobalOpts, args: &KeysArgs) -> Result<ExitCode, Error> {
    let resolver = ConfigResolver::new(KeyNamespace::new(args.namespace.as_str()));
    print!("{}", render_keys(&resolver.keys(), global.format)?);
    if global.format == ReportFormat::Json {
        println!();
    }
    Ok(ExitCode::Clean)
}

fn report_error(global: &GlobalOpts, err: &Error) {
    match global.format {
        ReportFormat::Json => {
            println!("{}", StructuredError::from(err).to_json_pretty());
        }
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
}
