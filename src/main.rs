use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use culprit_blamelens::RecencyPolicy;
use culprit_core::{CulpritConfig, OutputFormat};
use culprit_history::GitHistory;
use culprit_szz::{
    run_heuristic, run_issue_aware, FixAnalysis, FixPattern, HeuristicReport, IssueReport,
    SzzOptions,
};

#[derive(Parser)]
#[command(
    name = "culprit",
    version,
    about = "SZZ-style hunt for the commits that introduced your bugs",
    long_about = "Culprit correlates a bug fix's diff with blame at the fix's first parent to\n\
                   find the commits that most likely introduced the bug being fixed.\n\n\
                   Examples:\n  \
                     culprit hunt --repo .              Analyze the latest bug-fix commits\n  \
                     culprit hunt --recent              Keep only the newest inducer per file\n  \
                     culprit issues -f issues.json      Filter suspects by issue-open time\n  \
                     culprit issues --pattern '#(\\d+)'  Override the fix-reference pattern\n  \
                     culprit init                       Create a .culprit.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .culprit.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable per-commit sections (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Find bug-inducing candidates for recent bug-fix commits
    #[command(long_about = "Find bug-inducing candidates for recent bug-fix commits.\n\n\
        Selects the newest commits whose message mentions a bug fix, diffs each\n\
        against its first parent with zero context, and blames the deleted lines\n\
        at that parent to attribute them.\n\n\
        Examples:\n  culprit hunt --repo .\n  culprit hunt --limit 10 --recent")]
    Hunt {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Keep only the most recently committed attribution per file
        #[arg(long, short)]
        recent: bool,

        /// How many bug-fix commits to analyze, newest first
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Correlate fixes with an issue dataset and filter by issue-open time
    #[command(
        long_about = "Correlate fixes with an issue dataset and filter by issue-open time.\n\n\
        Selects every commit matching the fix-reference pattern, looks its issue\n\
        number up in the supplied JSON dataset, and keeps only candidates committed\n\
        strictly before the issue was opened. Fixes whose issue is missing from the\n\
        dataset are reported and skipped.\n\n\
        Examples:\n  culprit issues --file issues.json\n  culprit issues -f issues.json --pattern 'closes #(\\d+)'"
    )]
    Issues {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// JSON file with issue records (objects with number and created_at)
        #[arg(long, short)]
        file: PathBuf,

        /// Fix-reference regex; capture group 1 is the issue number
        #[arg(long)]
        pattern: Option<String>,

        /// Keep only the most recently committed attribution per file
        #[arg(long, short)]
        recent: bool,
    },
    /// Create a default .culprit.toml configuration file
    #[command(long_about = "Create a default .culprit.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .culprit.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# culprit configuration
# All settings are optional; the commented values are the defaults.

[hunt]
# How many bug-fix commits heuristic mode analyzes, newest first.
# max_fixes = 5

# Keep only the most recently committed attribution per file.
# recent_only = false

[issues]
# Case-insensitive fix-reference regex; capture group 1 is the issue number.
# Required by `culprit issues` unless --pattern is passed.
# pattern = '#(\d+)'
"#;

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m⚡\x1b[0m \x1b[1mculprit\x1b[0m v{version} — find the commits that introduced your bugs\n");

        println!("Quick start:");
        println!("  \x1b[36mculprit init\x1b[0m                   Create a .culprit.toml config file");
        println!("  \x1b[36mculprit hunt --repo .\x1b[0m          Analyze the latest bug-fix commits");
        println!("  \x1b[36mculprit issues -f issues.json\x1b[0m  Filter suspects by issue-open time\n");

        println!("All commands:");
        println!("  \x1b[32mhunt\x1b[0m    Diff/blame correlation for recent keyword bug fixes");
        println!("  \x1b[32missues\x1b[0m  Issue-aware mode with temporal suspect filtering");
        println!("  \x1b[32minit\x1b[0m    Write a default configuration file");
    } else {
        println!("culprit v{version} — find the commits that introduced your bugs\n");

        println!("Quick start:");
        println!("  culprit init                   Create a .culprit.toml config file");
        println!("  culprit hunt --repo .          Analyze the latest bug-fix commits");
        println!("  culprit issues -f issues.json  Filter suspects by issue-open time\n");

        println!("All commands:");
        println!("  hunt    Diff/blame correlation for recent keyword bug fixes");
        println!("  issues  Issue-aware mode with temporal suspect filtering");
        println!("  init    Write a default configuration file");
    }

    println!("\nRun culprit --help for details.");
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CulpritConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".culprit.toml");
            if default_path.exists() {
                CulpritConfig::from_file(default_path).into_diagnostic()?
            } else {
                CulpritConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            Ok(())
        }
        Some(Command::Hunt {
            ref repo,
            recent,
            limit,
        }) => {
            ensure_repository(repo)?;
            let history = GitHistory::open(repo).into_diagnostic()?;

            let options = SzzOptions {
                recency: recency_policy(recent, &config),
                max_fixes: limit.unwrap_or(config.hunt.max_fixes),
            };

            let spinner = start_spinner("Correlating diffs with blame...");
            let outcome = run_heuristic(&history, &options);
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            let report = outcome.into_diagnostic()?;

            render_heuristic(&report, cli.format).into_diagnostic()
        }
        Some(Command::Issues {
            ref repo,
            ref file,
            ref pattern,
            recent,
        }) => {
            ensure_repository(repo)?;
            let history = GitHistory::open(repo).into_diagnostic()?;

            let pattern_str = pattern
                .clone()
                .or_else(|| config.issues.pattern.clone())
                .ok_or_else(|| {
                    miette::miette!(
                        help = "Pass --pattern '#(\\d+)' or set pattern under [issues] in .culprit.toml",
                        "No fix-reference pattern configured"
                    )
                })?;
            let fix_pattern = FixPattern::new(&pattern_str).into_diagnostic()?;

            let issues = culprit_core::IssueRecord::load(file).into_diagnostic()?;
            if cli.verbose {
                eprintln!("Loaded {} issue(s) from {}", issues.len(), file.display());
            }

            let options = SzzOptions {
                recency: recency_policy(recent, &config),
                ..SzzOptions::default()
            };

            let spinner = start_spinner("Correlating diffs with blame...");
            let outcome = run_issue_aware(&history, &fix_pattern, &issues, &options);
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            let report = outcome.into_diagnostic()?;

            render_issues(&report, cli.format).into_diagnostic()
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".culprit.toml");
            if path.exists() {
                miette::bail!(".culprit.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .culprit.toml with default configuration");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "culprit", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn ensure_repository(path: &std::path::Path) -> Result<()> {
    // Hint: not a git repository
    if !path.join(".git").exists() && git2::Repository::discover(path).is_err() {
        miette::bail!(miette::miette!(
            help = "Run culprit from inside a git repository, or specify --repo to one",
            "Not a git repository: {}",
            path.display()
        ));
    }
    Ok(())
}

fn recency_policy(recent_flag: bool, config: &CulpritConfig) -> RecencyPolicy {
    if recent_flag || config.hunt.recent_only {
        RecencyPolicy::MostRecentOnly
    } else {
        RecencyPolicy::All
    }
}

fn start_spinner(message: &'static str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    let style = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

fn print_analysis_text(analysis: &FixAnalysis) {
    println!("\nCommit {}  {}", analysis.fix_hash, analysis.summary);
    if let Some(number) = analysis.issue_number {
        println!("References issue #{number}");
    }
    if analysis.candidates.is_empty() {
        println!("  (no candidate commits)");
    } else {
        for candidate in &analysis.candidates {
            println!("  {}  {}", candidate.hash, candidate.author);
        }
    }
}

fn print_analysis_markdown(analysis: &FixAnalysis) {
    println!("## `{}` {}\n", analysis.fix_hash, analysis.summary);
    if let Some(number) = analysis.issue_number {
        println!("References issue #{number}.\n");
    }
    if analysis.candidates.is_empty() {
        println!("No candidate commits.\n");
    } else {
        println!("| Commit | Author |");
        println!("|--------|--------|");
        for candidate in &analysis.candidates {
            println!("| `{}` | {} |", candidate.hash, candidate.author);
        }
        println!();
    }
}

fn render_heuristic(report: &HeuristicReport, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Markdown => {
            println!("# Bug-Inducing Candidates\n");
            println!("**Bug-fix commits analyzed:** {}\n", report.analyzed.len());
            for analysis in &report.analyzed {
                print_analysis_markdown(analysis);
            }
        }
        OutputFormat::Text => {
            println!(
                "Analyzed {} bug-fix commit(s), newest first.",
                report.analyzed.len()
            );
            for analysis in &report.analyzed {
                print_analysis_text(analysis);
            }
        }
    }

    for failure in &report.failures {
        eprintln!(
            "warning: analysis of {} aborted: {}",
            failure.fix_hash, failure.error
        );
    }

    Ok(())
}

fn render_issues(report: &IssueReport, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Markdown => {
            println!("# Suspect Commits\n");
            println!(
                "**Bug-fix commits with a known issue:** {}\n",
                report.suspects.len()
            );
            for analysis in &report.suspects {
                print_analysis_markdown(analysis);
            }
            if !report.skipped.is_empty() {
                println!("## Skipped fixes\n");
                for skip in &report.skipped {
                    match skip.issue_number {
                        Some(number) => println!(
                            "- `{}` references issue #{number}, which is not in the issue file",
                            skip.fix_hash
                        ),
                        None => println!(
                            "- `{}` matches the fix pattern but carries no issue number",
                            skip.fix_hash
                        ),
                    }
                }
                println!();
            }
        }
        OutputFormat::Text => {
            println!(
                "Found suspects for {} bug-fix commit(s).",
                report.suspects.len()
            );
            for analysis in &report.suspects {
                print_analysis_text(analysis);
            }
            for skip in &report.skipped {
                match skip.issue_number {
                    Some(number) => println!(
                        "\nCommit {} references issue #{number}, which is not in the issue file; skipped.",
                        skip.fix_hash
                    ),
                    None => println!(
                        "\nCommit {} matches the fix pattern but carries no issue number; skipped.",
                        skip.fix_hash
                    ),
                }
            }
        }
    }

    for failure in &report.failures {
        eprintln!(
            "warning: analysis of {} aborted: {}",
            failure.fix_hash, failure.error
        );
    }

    Ok(())
}
