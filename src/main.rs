//! skinage: skin age self-assessment CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use skinage::analyzer::{AnalysisEngine, ScoringModel};
use skinage::config::{build_ignore_set, is_ignored, load_config, starter_config, Config, CONFIG_FILENAME};
use skinage::reporter::{ConsoleReporter, JsonReporter};
use skinage::watcher::SessionWatcher;
use skinage::{Gender, Profile};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Sessions above this count are scored in parallel without --parallel
const PARALLEL_THRESHOLD: usize = 10;

/// skinage: skin age self-assessment from face-mesh landmarks
#[derive(Parser, Debug)]
#[command(name = "skinage")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Session file or directory to analyze (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per session)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (analyzer sub-scores, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Actual age, used when a session carries no profile
    #[arg(long)]
    age: Option<u8>,

    /// Gender (female, male, other), used when a session carries no profile
    #[arg(long)]
    gender: Option<Gender>,

    /// Scoring model: extended (default) or compact
    #[arg(long)]
    model: Option<ScoringModel>,

    /// Path to config file (default: search .skinagerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for session file changes and re-score
    #[arg(long)]
    watch: bool,

    /// Score sessions in parallel
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .skinagerc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Scoring model: extended or compact
        #[arg(long)]
        model: Option<ScoringModel>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    if let Some(cmd) = args.command {
        match cmd {
            Commands::Init {
                threshold,
                model,
                dir,
            } => return run_init(threshold, model, dir.as_deref()),
        }
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A session file or directory is required");
    };

    let config = load_effective_config(&args, &path)?;

    if args.watch {
        return run_watch(&args, &path, &config);
    }

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let session_files = collect_session_files(&path, &config, ignore_set.as_ref())?;
    if session_files.is_empty() {
        eprintln!("{}: No session files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }
    info!(count = session_files.len(), "session files collected");

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AnalysisEngine::new().with_model(config.model.unwrap_or_default());
    let use_parallel = args.parallel || session_files.len() > PARALLEL_THRESHOLD;
    let outcomes = if use_parallel {
        debug!("scoring sessions in parallel");
        engine.analyze_parallel(&session_files, Some(&config))
    } else {
        engine.analyze_many(&session_files, Some(&config))
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut had_errors = false;
    for (file, outcome) in session_files.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                if !args.quiet {
                    eprintln!(
                        "{}: Failed to analyze {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
                had_errors = true;
            }
        }
    }

    if results.is_empty() {
        eprintln!("{}: All sessions failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = AnalysisEngine::aggregate_stats(&results);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in &results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // A single session honors per-file overrides; many sessions compare the average
    let (score, threshold) = if results.len() == 1 {
        let result = &results[0];
        (
            result.report.score.value,
            config.effective_for_file(&result.file_path).threshold,
        )
    } else {
        (stats.average_score.value, config.threshold)
    };

    if let Some(threshold) = threshold {
        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Config file merged with CLI flags (CLI wins)
fn load_effective_config(args: &Args, path: &Path) -> Result<Config> {
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    };
    let cli_profile = if args.age.is_some() || args.gender.is_some() {
        Some(Profile {
            age: args.age,
            age_label: None,
            gender: args.gender,
        })
    } else {
        None
    };
    Ok(load_config(work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        args.model,
        cli_profile,
    ))
}

fn run_init(threshold: Option<u8>, model: Option<ScoringModel>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold = threshold.unwrap_or(70);
    let model = model.unwrap_or_default();
    let json = serde_json::to_string_pretty(&starter_config(threshold, model))
        .context("Failed to serialize starter config")?;

    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    println!(
        "{}: Created {} with threshold={}, model={}",
        "Done".green().bold(),
        config_path.display(),
        threshold,
        model
    );
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path, config: &Config) -> Result<ExitCode> {
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let suffixes = config
        .get_session_patterns()
        .into_iter()
        .map(String::from)
        .collect();

    let engine = AnalysisEngine::new().with_model(config.model.unwrap_or_default());
    let watcher = SessionWatcher::watch_with_suffixes(path, suffixes)
        .context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let paths = watcher.next_changes();
        for changed in paths {
            if ignore_set.as_ref().is_some_and(|set| is_ignored(&changed, set)) {
                debug!(path = %changed.display(), "ignored change");
                continue;
            }
            // Single-file mode only reacts to the watched file
            if path.is_file() && changed.file_name() != path.file_name() {
                continue;
            }
            report_watched(args, &engine, config, &changed);
        }
    }
}

fn report_watched(args: &Args, engine: &AnalysisEngine, config: &Config, path: &Path) {
    match engine.analyze(path, Some(config)) {
        Ok(result) => {
            if args.json {
                println!("{}", JsonReporter::new().report(&result));
            } else if args.quiet {
                ConsoleReporter::new().report_quiet(&result);
            } else {
                ConsoleReporter::new().report(&result);
            }
        }
        // Files are often caught mid-write; the next event re-scores them
        Err(e) => warn!(path = %path.display(), error = %format!("{:#}", e), "failed to score session"),
    }
}

fn collect_session_files(
    path: &Path,
    config: &Config,
    ignore_set: Option<&globset::GlobSet>,
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if ignore_set.is_some_and(|set| is_ignored(path, set)) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !config.is_session_file(file_path) {
            continue;
        }
        if ignore_set.is_some_and(|set| is_ignored(file_path, set)) {
            debug!(path = %file_path.display(), "ignored by config");
            continue;
        }
        files.push(file_path.to_path_buf());
    }

    files.sort();
    Ok(files)
}
