//! CLI command definitions and handlers

mod analyze;
mod history;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Retrocode - AI-assisted code analysis
#[derive(Parser, Debug)]
#[command(name = "retrocode")]
#[command(
    version,
    about = "AI-assisted code analysis — submit source code, get a bounded quality report",
    long_about = "Retrocode sends source code to an LLM backend and normalizes the \
free-form response into a complete, bounded analysis record: summary, issues, \
suggestions, security and performance findings, an enhanced version of the code, \
and quality scores.\n\n\
BYOK — set GROQ_API_KEY (default backend) or pick another backend in retrocode.toml.",
    after_help = "\
Examples:
  retrocode analyze app.py                     Analyze a file (language from extension)
  cat app.py | retrocode analyze -             Analyze stdin
  retrocode analyze app.py --format json       JSON output for scripting
  retrocode analyze snippet.txt --language go  Force the language
  retrocode history                            List stored analyses
  retrocode init                               Write a starter retrocode.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file path (default: ./retrocode.toml, then user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a source file (use '-' for stdin)
    Analyze {
        /// File to analyze, or '-' to read stdin
        file: PathBuf,

        /// Source language (auto = detect from file name/content)
        #[arg(long, short = 'l', default_value = "auto")]
        language: String,

        /// Title for the stored record (default: the file name)
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Do not persist the result
        #[arg(long)]
        no_save: bool,
    },

    /// List stored analyses, newest first
    History {
        /// Maximum records to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Write a starter retrocode.toml config file
    Init,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Analyze {
            file,
            language,
            title,
            format,
            output,
            no_save,
        } => analyze::run(analyze::AnalyzeArgs {
            config,
            file,
            language,
            title,
            format,
            output,
            no_save,
        }),
        Commands::History { limit } => history::run(limit),
        Commands::Init => init::run(),
    }
}
