//! CLI definition and handler

use crate::config::{load_config, Settings};
use crate::models::PhraseReport;
use crate::phrases::{Ranker, TieBreak, DEFAULT_LIMIT};
use crate::pipeline::parallel::{run_sources, FailurePolicy, RunOptions};
use crate::pipeline::Source;
use crate::reporters::{report_with_format, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse and validate the number of phrases to show (at least 1)
fn parse_top(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("top must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Phrasecount - the most common three-word phrases in your text
#[derive(Parser, Debug)]
#[command(name = "phrasecount")]
#[command(
    version,
    about = "Count the most frequent three-word phrases across piped input and files",
    long_about = "Reads piped stdin and every FILE given, lowercases the text, strips \
punctuation and counts each run of three consecutive words. Counts from all \
sources are added together and the most frequent phrases are printed, one \
'<phrase> - <count>' per line.",
    after_help = "\
Examples:
  cat book.txt | phrasecount              Count phrases in piped text
  phrasecount a.txt b.txt                 Count phrases across two files
  phrasecount a.txt --top 10              Only the ten most frequent
  phrasecount a.txt --format json         JSON output with per-source stats
  phrasecount a.txt --tie-break legacy    Historical ordering of tied counts"
)]
pub struct Cli {
    /// Files to read (stdin is read too when it is piped)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Number of phrases to report [default: 100]
    #[arg(long, short = 'n', value_parser = parse_top)]
    pub top: Option<usize>,

    /// Output format: text, json [default: text]
    #[arg(long, short = 'f', value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Ordering of phrases with equal counts: lexical, legacy [default: lexical]
    #[arg(long, value_parser = ["lexical", "legacy"])]
    pub tie_break: Option<String>,

    /// Stop every source and print nothing as soon as one source fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Never read stdin, even when it is piped
    #[arg(long)]
    pub no_stdin: bool,

    /// Number of sources read in parallel (1-64)
    #[arg(long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

/// How a completed run went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every source was read
    Complete,
    /// Some sources failed; the report covers the rest
    Partial,
}

/// Flag values after layering the settings file under the command line
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    top: usize,
    format: OutputFormat,
    tie_break: TieBreak,
    policy: FailurePolicy,
    workers: Option<usize>,
}

impl Resolved {
    fn new(cli: &Cli, settings: &Settings) -> Result<Self> {
        let defaults = &settings.defaults;
        let format = match &cli.format {
            Some(f) => OutputFormat::from_str(f)?,
            None => defaults.format.unwrap_or_default(),
        };
        let tie_break = match &cli.tie_break {
            Some(t) => TieBreak::from_str(t)?,
            None => defaults.tie_break.unwrap_or_default(),
        };
        let policy = if cli.fail_fast {
            FailurePolicy::FailFast
        } else {
            defaults.on_error.unwrap_or_default()
        };

        Ok(Self {
            top: cli.top.or(defaults.top).unwrap_or(DEFAULT_LIMIT),
            format,
            tie_break,
            policy,
            workers: cli.workers.or(defaults.workers),
        })
    }
}

/// Collect the sources for this invocation: stdin first, then files in order.
fn collect_sources(cli: &Cli) -> Vec<Source> {
    let mut sources = Vec::with_capacity(cli.files.len() + 1);
    if !cli.no_stdin && !std::io::stdin().is_terminal() {
        sources.push(Source::Stdin);
    }
    sources.extend(cli.files.iter().map(|p| Source::File(p.clone())));
    sources
}

pub fn run(cli: Cli) -> Result<RunStatus> {
    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let settings = load_config(&cwd);
    let resolved = Resolved::new(&cli, &settings)?;
    tracing::debug!("Resolved options: {:?}", resolved);

    let sources = collect_sources(&cli);
    let mut options = RunOptions {
        policy: resolved.policy,
        ..Default::default()
    };
    if let Some(workers) = resolved.workers {
        options.workers = workers;
    }

    let outcome = run_sources(sources, options)?;
    for failed in outcome.failures() {
        if let Err(e) = &failed.outcome {
            eprintln!("{} {}", style("warning:").yellow().bold(), e);
        }
    }

    let ranker = Ranker::new(resolved.top, resolved.tie_break);
    let ranking = ranker.rank(&outcome.merged);
    let report = PhraseReport::new(ranking, &outcome);
    let rendered = report_with_format(&report, resolved.format)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write report")?;

    if outcome.has_failures() {
        let failed = outcome.failures().count();
        eprintln!(
            "{} {} of {} source(s) could not be read; counts above exclude them",
            style("note:").cyan().bold(),
            failed,
            outcome.reports.len()
        );
        Ok(RunStatus::Partial)
    } else {
        Ok(RunStatus::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliDefaults;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["phrasecount"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn test_no_args_is_valid() {
        let cli = parse(&[]);
        assert!(cli.files.is_empty());
        assert!(cli.top.is_none());
        assert!(!cli.fail_fast);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["phrasecount", "--top", "0"]).is_err());
        assert!(Cli::try_parse_from(["phrasecount", "--workers", "65"]).is_err());
        assert!(Cli::try_parse_from(["phrasecount", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["phrasecount", "--tie-break", "random"]).is_err());
    }

    #[test]
    fn test_builtin_defaults() {
        let resolved = Resolved::new(&parse(&["a.txt"]), &Settings::default()).unwrap();
        assert_eq!(resolved.top, DEFAULT_LIMIT);
        assert_eq!(resolved.format, OutputFormat::Text);
        assert_eq!(resolved.tie_break, TieBreak::Lexical);
        assert_eq!(resolved.policy, FailurePolicy::Continue);
        assert_eq!(resolved.workers, None);
    }

    #[test]
    fn test_settings_fill_unset_flags() {
        let settings = Settings {
            defaults: CliDefaults {
                top: Some(7),
                format: Some(OutputFormat::Json),
                tie_break: Some(TieBreak::Legacy),
                on_error: Some(FailurePolicy::FailFast),
                workers: Some(2),
            },
        };
        let resolved = Resolved::new(&parse(&[]), &settings).unwrap();
        assert_eq!(resolved.top, 7);
        assert_eq!(resolved.format, OutputFormat::Json);
        assert_eq!(resolved.tie_break, TieBreak::Legacy);
        assert_eq!(resolved.policy, FailurePolicy::FailFast);
        assert_eq!(resolved.workers, Some(2));
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            defaults: CliDefaults {
                top: Some(7),
                format: Some(OutputFormat::Json),
                tie_break: Some(TieBreak::Legacy),
                ..Default::default()
            },
        };
        let cli = parse(&["--top", "3", "-f", "text", "--tie-break", "lexical", "--fail-fast"]);
        let resolved = Resolved::new(&cli, &settings).unwrap();
        assert_eq!(resolved.top, 3);
        assert_eq!(resolved.format, OutputFormat::Text);
        assert_eq!(resolved.tie_break, TieBreak::Lexical);
        assert_eq!(resolved.policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_files_keep_argument_order() {
        let cli = parse(&["--no-stdin", "b.txt", "a.txt"]);
        let sources = collect_sources(&cli);
        assert_eq!(
            sources,
            vec![
                Source::File(PathBuf::from("b.txt")),
                Source::File(PathBuf::from("a.txt"))
            ]
        );
    }
}
