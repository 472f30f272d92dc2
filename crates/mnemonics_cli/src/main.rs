//! `mnemonics` command-line entry point.
//!
//! # Responsibility
//! - Parse `remember`, `recall` and `delete` invocations.
//! - Resolve store configuration and start file logging.
//! - Print reports and map outcomes to exit codes.

mod prompt;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use mnemonics_core::{
    forget, init_logging, parse_memory_type, parse_recall_type, recall, remember, ConfigOverrides,
    ConfirmMode, ForgetOutcome, ForgetQuery, MutationError, RecallQuery, RelatedNote,
    RememberRequest, StoreConfig, Warning,
};
use prompt::TerminalPrompter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mnemonics")]
#[command(version, about = "Markdown memory store with similarity and reference upkeep")]
struct Cli {
    /// Store root (overrides MNEMONICS_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Note template file (overrides MNEMONICS_TEMPLATE)
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update a memory
    Remember {
        /// Memory type: learning, decision, idea, todo, reference, default
        #[arg(long = "type")]
        memory_type: String,

        /// Memory title; the filename is derived from it
        #[arg(long)]
        title: String,

        /// Memory content
        #[arg(long)]
        content: String,

        /// Path of a related memory to link to
        #[arg(long)]
        related: Option<String>,

        /// Skip confirmation prompts
        #[arg(long)]
        confirm: bool,
    },

    /// List or search memories (read-only)
    Recall {
        /// Category: learning, architectural, decisions, problems, issues
        #[arg(long = "type")]
        memory_type: Option<String>,

        /// Topic to search for within memory content
        #[arg(long)]
        topic: Option<String>,

        /// Full-text search query within memory content
        #[arg(long)]
        query: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Delete a memory and strip links to it
    Delete {
        /// Title (or part of it) of the memory to delete
        #[arg(long)]
        title: String,

        /// Restrict the search to one category folder
        #[arg(long = "type")]
        memory_type: Option<String>,

        /// Search within memory content
        #[arg(long)]
        topic: Option<String>,

        /// Skip the deletion confirmation
        #[arg(long)]
        yes: bool,

        /// Candidate number to delete when several match (1-based)
        #[arg(long)]
        pick: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// A subcommand with its `--type` already validated.
enum Job {
    Remember {
        request: RememberRequest,
        mode: ConfirmMode,
    },
    Recall {
        query: RecallQuery,
        format: OutputFormat,
    },
    Delete {
        query: ForgetQuery,
        mode: ConfirmMode,
        pick: Option<usize>,
    },
}

fn confirm_mode(skip_prompts: bool) -> ConfirmMode {
    if skip_prompts {
        ConfirmMode::AutoConfirm
    } else {
        ConfirmMode::Interactive
    }
}

/// Checks arguments that need no store access. Runs before logging starts.
fn prepare(command: Commands, cwd: &Path) -> Result<Job, String> {
    match command {
        Commands::Remember {
            memory_type,
            title,
            content,
            related,
            confirm,
        } => {
            let memory_type = parse_memory_type(&memory_type).map_err(|err| format!("❌ {err}"))?;
            Ok(Job::Remember {
                request: RememberRequest {
                    memory_type,
                    title,
                    content,
                    related: related.map(|raw| RelatedNote::resolve(&raw, cwd)),
                },
                mode: confirm_mode(confirm),
            })
        }
        Commands::Recall {
            memory_type,
            topic,
            query,
            format,
        } => {
            let recall_type = memory_type
                .as_deref()
                .map(parse_recall_type)
                .transpose()
                .map_err(|err| format!("Error: {err}"))?;
            Ok(Job::Recall {
                query: RecallQuery {
                    recall_type,
                    topic,
                    query,
                },
                format,
            })
        }
        Commands::Delete {
            title,
            memory_type,
            topic,
            yes,
            pick,
        } => Ok(Job::Delete {
            query: ForgetQuery {
                title,
                category: memory_type,
                topic,
            },
            mode: confirm_mode(yes),
            pick,
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let job = match prepare(cli.command, &cwd) {
        Ok(job) => job,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let config = match StoreConfig::resolve(ConfigOverrides {
        root: cli.root,
        template: cli.template,
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            return ExitCode::FAILURE;
        }
    };
    start_logging(&config);

    let result = match job {
        Job::Remember { request, mode } => run_remember(&config, &request, mode),
        Job::Recall { query, format } => run_recall(&config, &query, format),
        Job::Delete { query, mode, pick } => run_delete(&config, &query, mode, pick),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_output module=cli status=error error={err}");
            eprintln!("❌ failed to write output: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logging problems are reported and otherwise ignored.
fn start_logging(config: &StoreConfig) {
    let log_dir = absolute(&config.log_dir);
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("⚠️  Warning: logging disabled: {err}");
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}", render::warning_line(warning));
    }
}

fn run_remember(
    config: &StoreConfig,
    request: &RememberRequest,
    mode: ConfirmMode,
) -> io::Result<ExitCode> {
    info!(
        "event=cli_command module=cli status=start command=remember type={} mode={:?}",
        request.memory_type.as_str(),
        mode
    );

    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
    let mut stdout = io::stdout();
    match remember(config, request, mode, &mut prompter) {
        Ok(report) => {
            print_warnings(&report.warnings);
            let text = render::remember_text(
                &report,
                &request.title,
                mode == ConfirmMode::AutoConfirm,
            );
            writeln!(stdout, "{text}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(MutationError::InvalidArgument(err)) => {
            eprintln!("❌ {err}");
            Ok(ExitCode::FAILURE)
        }
        Err(MutationError::Store(err)) => {
            eprintln!("❌ Error saving memory: {err}");
            writeln!(stdout, "❌ Failed to save memory")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_recall(
    config: &StoreConfig,
    query: &RecallQuery,
    format: OutputFormat,
) -> io::Result<ExitCode> {
    let report = recall(&config.root, query);
    for skipped in &report.skipped {
        eprintln!("⚠️  Warning: skipped: {skipped}");
    }

    let text = match format {
        OutputFormat::Text => render::recall_text(&report),
        OutputFormat::Json => render::recall_json(&report).map_err(io::Error::other)?,
    };
    writeln!(io::stdout(), "{text}")?;
    Ok(ExitCode::SUCCESS)
}

fn run_delete(
    config: &StoreConfig,
    query: &ForgetQuery,
    mode: ConfirmMode,
    pick: Option<usize>,
) -> io::Result<ExitCode> {
    info!(
        "event=cli_command module=cli status=start command=delete mode={:?}",
        mode
    );

    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout()).with_pick(pick);
    let report = forget(config, query, mode, &mut prompter);
    print_warnings(&report.warnings);
    writeln!(io::stdout(), "{}", render::forget_text(&report, &query.title))?;

    Ok(ExitCode::from(delete_exit_status(&report.outcome)))
}

/// Only a failed removal is an error; not found and cancelled are not.
fn delete_exit_status(outcome: &ForgetOutcome) -> u8 {
    match outcome {
        ForgetOutcome::Failed { .. } => 1,
        _ => 0,
    }
}
