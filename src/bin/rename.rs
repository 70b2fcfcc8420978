//! CLI for the rename-dsl tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rename_dsl::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rename")]
#[command(author, version, about = "Rule-based batch file renaming", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a rename rule to files
    Apply {
        /// Rule file (YAML or JSON)
        #[arg(short, long)]
        rule: PathBuf,

        /// Files or directories to rename
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Descend into subdirectories
        #[arg(short = 'R', long)]
        recursive: bool,

        /// Include dot files
        #[arg(long)]
        hidden: bool,

        /// File extension to filter (e.g., "jpg")
        #[arg(short, long)]
        extension: Option<String>,

        /// Glob pattern to exclude
        #[arg(long)]
        exclude: Option<String>,

        /// What to do when the new name already exists
        #[arg(long, value_enum, default_value_t = ConflictChoice::Skip)]
        on_conflict: ConflictChoice,

        /// Preview renames without applying
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load and validate a rule file
    Check {
        /// Rule file (YAML or JSON)
        #[arg(short, long)]
        rule: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConflictChoice {
    Skip,
    Cancel,
    TryAgain,
    Ask,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Asks on the terminal for every conflict.
struct Prompt;

impl ConflictPolicy for Prompt {
    fn decide(&mut self, original: &Path, target: &Path) -> Decision {
        let stdin = io::stdin();
        loop {
            eprint!(
                "{} already exists (renaming {}). [s]kip, [t]ry again, [c]ancel? ",
                target.display(),
                original.display()
            );
            io::stderr().flush().ok();

            let mut answer = String::new();
            if stdin.lock().read_line(&mut answer).unwrap_or(0) == 0 {
                return Decision::Cancel;
            }
            match answer.trim().to_lowercase().as_str() {
                "s" | "skip" => return Decision::Skip,
                "t" | "try" | "try again" => return Decision::TryAgain,
                "c" | "cancel" => return Decision::Cancel,
                _ => continue,
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "rename_dsl=debug"
    } else {
        "rename_dsl=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Apply {
            rule,
            paths,
            recursive,
            hidden,
            extension,
            exclude,
            on_conflict,
            dry_run,
            format,
        } => {
            let mut collector = FileCollector::new();
            if recursive {
                collector = collector.recursive();
            }
            if hidden {
                collector = collector.hidden();
            }
            if let Some(ref ext) = extension {
                collector = collector.extension(ext);
            }
            if let Some(ref exc) = exclude {
                collector = collector.exclude(exc);
            }
            cmd_apply(rule, paths, collector, on_conflict, dry_run, format)
        }
        Commands::Check { rule } => cmd_check(rule),
    }
}

fn cmd_apply(
    rule: PathBuf,
    paths: Vec<PathBuf>,
    collector: FileCollector,
    on_conflict: ConflictChoice,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let rule = RuleSpec::from_file(&rule)
        .with_context(|| format!("Failed to load rule {}", rule.display()))?;

    let mut renamer = Renamer::new(rule)?;
    renamer = match on_conflict {
        ConflictChoice::Skip => renamer.on_conflict(Decision::Skip),
        ConflictChoice::Cancel => renamer.on_conflict(Decision::Cancel),
        ConflictChoice::TryAgain => renamer.on_conflict(Decision::TryAgain),
        ConflictChoice::Ask => renamer.on_conflict(Prompt),
    };
    if dry_run {
        renamer = renamer.dry_run();
    }

    match renamer.run_paths(&paths, &collector) {
        Ok(report) => print_report(&report, dry_run, format),
        Err(RenameError::Cancelled { report }) => {
            print_report(&report, dry_run, format)?;
            anyhow::bail!("Cancelled after renaming {} file(s)", report.total_renamed())
        }
        Err(e) => Err(e).context("Rename failed"),
    }
}

fn print_report(report: &RunReport, dry_run: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            print!("{}", report.plan());
            if dry_run {
                let diff = report.link_diff();
                if !diff.is_empty() {
                    println!("\n{}", diff);
                }
                println!("\nWould rename {} file(s)", report.total_renamed());
            } else {
                println!("\nRenamed {} file(s)", report.total_renamed());
            }
            for failure in report.link_errors() {
                println!("Could not update {}: {}", failure.path.display(), failure.message);
            }
            for outcome in &report.directories {
                match outcome.stop {
                    StopReason::Completed | StopReason::Cancelled => {}
                    reason => println!(
                        "{}: stopped early ({:?})",
                        outcome.directory.display(),
                        reason
                    ),
                }
            }
        }
    }
    Ok(())
}

fn cmd_check(rule: PathBuf) -> Result<()> {
    let rule = RuleSpec::from_file(&rule)
        .with_context(|| format!("Invalid rule {}", rule.display()))?;
    println!("{}", rule.describe());
    if let Some(sort) = rule.sort {
        println!("  sorted by {:?} ({:?})", sort.key, sort.order);
    }
    for link in &rule.links {
        println!("  updates links in {}", link.display());
    }
    Ok(())
}
