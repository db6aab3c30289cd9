use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cmplint_analyzer::options::parse_bool;
use cmplint_core::config::{self, Config, CONFIG_FILE};
use cmplint_core::orchestrator::{self, AnalysisOutput};
use cmplint_diagnostics::human::format_human;
use cmplint_diagnostics::rules::get_rule;
use cmplint_diagnostics::Severity;
use cmplint_ir::ir::AnalysisInput;

/// Build a long version string: "0.1.0 (abc12345)"
fn long_version() -> &'static str {
    let s = format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH"));
    Box::leak(s.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "cmplint")]
#[command(about = "Detects comparisons against the address of newly allocated Go values")]
#[command(version, long_version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze type-checked packages exported by the Go frontend
    Check {
        /// Analysis input files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
        /// Suppress errors.Is diagnostics when the type has an "Is(error) bool" method
        #[arg(long, value_name = "BOOL", value_parser = parse_check_is)]
        check_is: Option<bool>,
        /// Severity threshold: info, warning, error
        #[arg(long, value_parser = parse_severity)]
        severity: Option<Severity>,
        /// Max diagnostics to report (0 = unlimited)
        #[arg(long)]
        max_diagnostics: Option<usize>,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Explain a rule in detail
    Explain {
        /// Rule code (e.g., CMP001)
        rule: String,
    },
    /// Write a default cmplint.toml into the current directory
    Init,
}

fn parse_check_is(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("invalid boolean value {value:?}"))
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    value.parse()
}

struct CheckArgs {
    inputs: Vec<PathBuf>,
    format: Format,
    check_is: Option<bool>,
    severity: Option<Severity>,
    max_diagnostics: Option<usize>,
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for machine output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Check {
            inputs,
            format,
            check_is,
            severity,
            max_diagnostics,
            no_color,
        } => run_check(CheckArgs {
            inputs,
            format,
            check_is,
            severity,
            max_diagnostics,
            no_color,
        }),
        Commands::Explain { rule } => run_explain(&rule),
        Commands::Init => run_init(),
    }
}

fn run_check(args: CheckArgs) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = config::load_config(&cwd);

    if let Some(check_is) = args.check_is {
        config.analyzer.check_is = check_is;
    }
    if let Some(sev) = args.severity {
        config.cmplint.severity_threshold = sev.to_string();
    }
    if let Some(max) = args.max_diagnostics {
        config.cmplint.max_diagnostics = max;
    }

    let output = match check(&args.inputs, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    for diag in &output.internal {
        tracing::warn!(rule = %diag.rule, location = %diag.location, "{}", diag.title);
    }

    match args.format {
        Format::Json => {
            let result = serde_json::json!({
                "diagnostics": output.diagnostics,
                "summary": output.summary,
            });
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(2);
                }
            }
        }
        Format::Human => print!("{}", format_human(&output.diagnostics, !args.no_color)),
    }

    // Exit code: 0 clean, 1 issues at or above the threshold
    if output.summary.total() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Load every input and analyze the packages together.
fn check(inputs: &[PathBuf], config: &Config) -> anyhow::Result<AnalysisOutput> {
    let mut merged = AnalysisInput::default();
    for path in inputs {
        let input = cmplint_ir::load_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        if merged.go_version.is_empty() {
            merged.go_version = input.go_version;
            merged.bridge_version = input.bridge_version;
        }
        merged.packages.extend(input.packages);
    }
    tracing::debug!(packages = merged.packages.len(), "loaded analysis input");

    orchestrator::analyze_ir(&merged, config).context("analysis failed")
}

fn run_explain(rule: &str) -> ExitCode {
    let Some(info) = get_rule(rule) else {
        eprintln!("Unknown rule: {rule}. Known rules: CMP001, CMP002, CMP900.");
        return ExitCode::from(2);
    };

    let mut text = format!(
        "{}: {}\n\nSeverity: {}\nCategory: {}\n\n{}",
        info.code, info.name, info.severity, info.category, info.description
    );
    if let Some(bad) = &info.example_bad {
        text.push_str("\n\nExample:\n");
        text.push_str(&indent(bad));
    }
    if let Some(good) = &info.example_good {
        text.push_str("\n\nFix:\n");
        text.push_str(&indent(good));
    }
    if let Some(idiom) = &info.go_idiom {
        text.push_str(&format!("\n\nIdiom: {idiom}"));
    }
    println!("{text}");
    ExitCode::SUCCESS
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_init() -> ExitCode {
    if Path::new(CONFIG_FILE).exists() {
        eprintln!("{CONFIG_FILE} already exists");
        return ExitCode::from(2);
    }

    match std::fs::write(CONFIG_FILE, config::DEFAULT_CONFIG_TOML) {
        Ok(()) => {
            println!("Created {CONFIG_FILE}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
