//! onready-gen command-line driver
//!
//! Reads a compilation snapshot (JSON), runs the generator, writes one
//! `<hint>.g.cs` file per affected class and reports diagnostics.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use onready_gen::prelude::*;

#[derive(Parser)]
#[command(name = "onready-gen")]
#[command(about = "Generate lifecycle partial classes from annotated members", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate partial classes
    Generate {
        /// Snapshot file
        snapshot: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "generated")]
        out: PathBuf,
        /// Generator config (JSON), layered over the snapshot's config
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report diagnostics without writing anything
    Check {
        /// Snapshot file
        snapshot: PathBuf,
        /// Generator config (JSON), layered over the snapshot's config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Diagnostics output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match run(cli.command) {
        Ok(clean) if clean => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `Ok(false)` when the run produced Error diagnostics.
fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Generate {
            snapshot,
            out,
            config,
        } => {
            let output = load_and_generate(&snapshot, config.as_deref())?;
            fs::create_dir_all(&out)
                .with_context(|| format!("creating output directory {}", out.display()))?;
            for src in &output.sources {
                let path = out.join(format!("{}.g.cs", src.hint_name));
                fs::write(&path, &src.text)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::debug!(file = %path.display(), "wrote generated source");
            }
            print_text(&output.diagnostics);
            println!(
                "generated {} file(s) into {}",
                output.sources.len(),
                out.display()
            );
            Ok(!output.diagnostics.has_errors())
        }
        Commands::Check {
            snapshot,
            config,
            format,
        } => {
            let output = load_and_generate(&snapshot, config.as_deref())?;
            match format {
                Format::Text => print_text(&output.diagnostics),
                Format::Json => println!("{}", serde_json::to_string_pretty(&output.diagnostics)?),
            }
            Ok(!output.diagnostics.has_errors())
        }
    }
}

fn load_and_generate(snapshot: &Path, config: Option<&Path>) -> anyhow::Result<GenerationOutput> {
    let text = fs::read_to_string(snapshot)
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;
    let (compilation, mut cfg) = Snapshot::from_json(&text)
        .and_then(Snapshot::into_parts)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    if let Some(path) = config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        cfg = cfg
            .overlay_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
    }
    Ok(generate(&compilation, &cfg)?)
}

fn print_text(diagnostics: &Diagnostics) {
    for d in diagnostics {
        eprintln!("{d}");
    }
}
