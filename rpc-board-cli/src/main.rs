//! # rpc-board
//!
//! CLI tool for building board trees from RPC router type graphs.
//!
//! ## Usage
//!
//! ```bash
//! # Build tree.json from an exported type graph
//! rpc-board build --input graph.json
//!
//! # Preview the artifact without writing it
//! rpc-board build --input graph.json --dry-run
//!
//! # Show the form a procedure's input mounts
//! rpc-board describe --tree tree.json --procedure add
//!
//! # Initialize configuration
//! rpc-board init
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rpc_board_cli::{
    commands::{build_tree, describe_procedure, BuildReport, FormReport},
    config::{CliArgs, ConfigManager},
    error::CliError,
    writer::{read_input, ArtifactWriter, Emitted},
};

#[derive(Parser)]
#[command(name = "rpc-board")]
#[command(author, version, about = "Build and inspect RPC procedure boards", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a tree artifact from a type graph file
    Build {
        /// Type graph JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the tree artifact
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the artifact instead of writing it
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the resolver depth bound
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Describe the form mounted for a procedure's input
    Describe {
        /// Tree artifact produced by `build`
        #[arg(short, long)]
        tree: Option<PathBuf>,

        /// Dotted procedure path, e.g. `r.nested`
        #[arg(short, long)]
        procedure: String,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new rpc-board configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "rpc-board.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Build {
            input,
            output,
            dry_run,
            config,
            max_depth,
        } => cmd_build(input, output, dry_run, config, max_depth),

        Commands::Describe {
            tree,
            procedure,
            config,
        } => cmd_describe(tree, procedure, config),

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

/// Build command implementation.
fn cmd_build(
    input: PathBuf,
    output: Option<PathBuf>,
    dry_run: bool,
    config_path: Option<PathBuf>,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &CliArgs { max_depth, output })?;

    println!("{} {}", "Loading type graph".cyan(), input.display());
    let graph_json = read_input(&input)?;
    let report = build_tree(&graph_json, &config.board)?;

    println!(
        "  Built {} procedure(s)",
        report.procedure_count().to_string().green()
    );
    if config.output.show_diagnostics {
        print_diagnostics(&report);
    }

    let writer = if dry_run {
        ArtifactWriter::preview()
    } else {
        ArtifactWriter::new()
    };
    match writer.emit_tree(&config.output.tree_file, &report)? {
        Emitted::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        Emitted::Preview { path, content } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Describe command implementation.
fn cmd_describe(
    tree: Option<PathBuf>,
    procedure: String,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let tree_path = tree.unwrap_or_else(|| config.output.tree_file.clone());

    let tree_json = read_input(&tree_path)?;
    let report = describe_procedure(&tree_json, &procedure, &config.board)?;
    print_form(&report);

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    let emitted = ArtifactWriter::new().write_config(&output, force)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        emitted.path().display()
    );

    Ok(())
}

fn print_diagnostics(report: &BuildReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    println!(
        "{} {} diagnostic(s):",
        "Warning:".yellow(),
        report.diagnostics.len()
    );
    for diagnostic in &report.diagnostics {
        println!("  {}", diagnostic);
    }
}

fn print_form(report: &FormReport) {
    println!(
        "{} [{}] {}",
        report.procedure.bold(),
        report.procedure_type,
        report.input_type.dimmed()
    );

    println!("{}", "Fields:".cyan());
    for field in &report.fields {
        match &field.default {
            Some(default) => println!(
                "  {}  {}  = {}",
                field.path,
                field.classification.green(),
                default
            ),
            None => println!("  {}  {}", field.path, field.classification.green()),
        }
    }

    if !report.failures.is_empty() {
        println!("{}", "Unsupported:".yellow());
        for failure in &report.failures {
            println!("  {}  {}", failure.path, failure.message.red());
        }
    }

    println!("{}", "Payload:".cyan());
    match serde_json::to_string_pretty(&report.payload) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("  {}", e.to_string().red()),
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
