use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use gitscope_core::{Language, OutputFormat, ScopeConfig};
use gitscope_history::GitRepository;
use gitscope_report::{AnalysisOptions, ReportData, ReportOptions};
use gitscope_stats::WorkStyle;

#[derive(Parser)]
#[command(
    name = "gitscope",
    version,
    about = "Git history analytics: contribution stats, branch topology, code health",
    long_about = "Gitscope mines a repository's commit history for contribution statistics,\n\
                   branch topology, and heuristic code-health risk signals.\n\n\
                   Examples:\n  \
                     gitscope analyze                 Analyze the current repository\n  \
                     gitscope analyze --path ../app   Analyze another repository\n  \
                     gitscope analyze --format json   Machine-readable output\n  \
                     gitscope init                    Create a .gitscope.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .gitscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Human-readable summaries (default)\n  \
                         json  Machine-readable JSON with camelCase keys"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a repository's commit history
    #[command(long_about = "Analyze a repository's commit history.\n\n\
        Runs three engines over the full history: contribution/time aggregation,\n\
        branch topology, and code-health heuristics (hotspots, stability,\n\
        refactoring pressure, churn concentration).\n\n\
        Examples:\n  gitscope analyze\n  gitscope analyze --path ../app --top-authors 5\n  gitscope analyze --language zh --format json")]
    Analyze {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Number of top contributors to list
        #[arg(long)]
        top_authors: Option<usize>,

        /// Number of most-modified files to list
        #[arg(long)]
        top_files: Option<usize>,

        /// Number of most-active hours to list
        #[arg(long)]
        top_hours: Option<usize>,

        /// Trailing window for refactoring-pressure detection, in days
        #[arg(long)]
        refactor_window: Option<i64>,

        /// Report label language (en or zh)
        #[arg(long)]
        language: Option<Language>,
    },
    /// Create a default .gitscope.toml configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# gitscope configuration

[analysis]
# A branch counts as active if its newest commit is within this many days
branch_activity_days = 30
# Trailing window for refactoring-pressure detection
refactor_window_days = 7
# Caps on reported findings
max_hotspots = 10
max_stability = 15

[report]
# Report label language: "en" or "zh"
language = "en"
top_authors = 10
top_files = 10
top_hours = 5
"#;

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("gitscope v{version} — git history analytics\n");

    println!("Quick start:");
    println!("  gitscope init                 Create a .gitscope.toml config file");
    println!("  gitscope analyze              Analyze the current repository");
    println!("  gitscope analyze --format json  Machine-readable output\n");

    println!("Run 'gitscope <command> --help' for details.");
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
        Some(path) => ScopeConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = Path::new(".gitscope.toml");
            if default_path.exists() {
                ScopeConfig::from_file(default_path).into_diagnostic()?
            } else {
                ScopeConfig::default()
            }
        }
    };

    match cli.command {
        None => {
            print_welcome();
            Ok(())
        }
        Some(Command::Analyze {
            ref path,
            top_authors,
            top_files,
            top_hours,
            refactor_window,
            language,
        }) => {
            let repo = GitRepository::open(path)
                .into_diagnostic()
                .wrap_err(format!("opening repository at {}", path.display()))?;

            let mut analysis = config.analysis.clone();
            if let Some(days) = refactor_window {
                analysis.refactor_window_days = days;
            }
            let language = language.unwrap_or(config.report.language);

            let options = AnalysisOptions {
                reference_time: Utc::now().fixed_offset(),
                analysis,
                language,
            };

            if cli.verbose {
                eprintln!("analyzing {}", path.display());
                eprintln!(
                    "refactor window: {} days, branch activity: {} days",
                    options.analysis.refactor_window_days,
                    options.analysis.branch_activity_days,
                );
            }

            let stats = gitscope_report::analyze(&repo, &options).into_diagnostic()?;

            if cli.verbose {
                eprintln!(
                    "{} commits, {} authors",
                    stats.repo.total_commits,
                    stats.repo.authors.len(),
                );
            }

            let mut report_options: ReportOptions = config.report.clone().into();
            report_options.language = language;
            if let Some(n) = top_authors {
                report_options.top_authors = n;
            }
            if let Some(n) = top_files {
                report_options.top_files = n;
            }
            if let Some(n) = top_hours {
                report_options.top_hours = n;
            }

            let report = ReportData::assemble(&stats, &report_options);

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).into_diagnostic()?
                    );
                }
                OutputFormat::Text => print_report(&report),
            }
            Ok(())
        }
        Some(Command::Init) => {
            let path = Path::new(".gitscope.toml");
            if path.exists() {
                miette::bail!(".gitscope.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .gitscope.toml with default configuration");
            Ok(())
        }
    }
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn style_label(style: WorkStyle) -> &'static str {
    match style {
        WorkStyle::Steady => "steady",
        WorkStyle::Burst => "burst",
        WorkStyle::Balanced => "balanced",
        WorkStyle::Unknown => "unknown",
    }
}

fn print_report(report: &ReportData) {
    println!("{}", report.labels.overview);
    println!("  commits: {}", report.total_commits);
    println!("  first:   {}", report.first_commit);
    println!("  last:    {}", report.last_commit);
    println!(
        "  active:  {} days / {} weeks / {} months",
        report.active_days, report.active_weeks, report.active_months,
    );

    println!("\n{}", report.labels.contributors);
    for author in &report.top_authors {
        println!(
            "  {:<36} {:>5} commits  +{} -{}",
            format!("{} <{}>", author.name, author.email),
            author.commit_count,
            author.additions,
            author.deletions,
        );
    }

    println!("\n{}", report.labels.files);
    for file in &report.top_files {
        println!("  {:<48} {:>4}", file.path, file.touches);
    }

    println!("\n{}", report.labels.activity);
    for hour in &report.top_hours {
        println!("  {:02}:00  {:>4} commits", hour.hour, hour.commits);
    }
    for (name, count) in WEEKDAYS.iter().zip(report.weekday.iter()) {
        println!("  {name}    {count:>4}");
    }

    if let Some(health) = &report.health {
        println!("\n{}", report.labels.health);
        println!("  {}", health.health_summary);
        for spot in &health.technical_debt_hotspots {
            println!(
                "  {:<48} risk {:.2} ({} changes, {} authors)",
                spot.file_path, spot.risk_score, spot.modification_freq, spot.unique_authors,
            );
        }
        for signal in &health.refactoring_signals {
            println!(
                "  {:<48} {} ({} changes in {} days)",
                signal.file_path, signal.strength, signal.window_changes, signal.window_days,
            );
        }
        for issue in &health.code_concentration_issues {
            println!(
                "  {:<48} {} concentration ({:.0}% of churn)",
                issue.file_path,
                issue.concentration_level,
                issue.change_ratio * 100.0,
            );
        }
    }

    if let Some(branches) = &report.branches {
        println!(
            "\n{} ({} branches, {} merges)",
            report.labels.branches,
            branches.branches.len(),
            branches.merge_patterns.len(),
        );
        for branch in &branches.branches {
            let marker = if branch.is_active { " (active)" } else { "" };
            println!(
                "  {:<36} {:>5} commits{marker}",
                branch.name, branch.commit_count,
            );
        }
    }

    if !report.profiles.is_empty() {
        println!("\n{}", report.labels.profiles);
        for profile in &report.profiles {
            let mut traits = Vec::new();
            if profile.night_owl {
                traits.push("night owl");
            }
            if profile.early_bird {
                traits.push("early bird");
            }
            if profile.weekend_worker {
                traits.push("weekend worker");
            }
            let traits = if traits.is_empty() {
                String::new()
            } else {
                format!(" [{}]", traits.join(", "))
            };
            println!(
                "  {:<36} {} style, {:.1} commits/day, avg {:.0} lines{traits}",
                format!("{} <{}>", profile.name, profile.email),
                style_label(profile.work_style),
                profile.commits_per_day,
                profile.average_commit_size,
            );
        }
    }
}
