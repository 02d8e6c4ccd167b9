//! Phint CLI - PHP syntax hint engine
//!
//! A pair-programming style linter that points out newer or shorter PHP
//! constructs, filtered by the PHP version the project targets.

use clap::Parser;
use colored::Colorize;
use phint::config::{Config, OutputFormat};
use phint::engine::Engine;
use phint::loader::Loader;
use phint::output::{Formatter, JsonFormatter, PrettyFormatter};
use phint::rules::Rule;
use phint::version::PhpVersion;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "phint",
    version,
    about = "PHP syntax hint engine",
    long_about = "A pair-programming style linter for PHP. Analyzes source files and \
                  suggests newer or shorter language constructs available in the targeted \
                  PHP version."
)]
struct Cli {
    /// Files, directories or glob patterns to analyze
    #[arg(default_value = ".")]
    paths: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target PHP version (e.g. 7.1.8)
    #[arg(short, long)]
    php_version: Option<PhpVersion>,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore_tools: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    only_tools: Option<Vec<String>>,

    /// Glob patterns for paths to skip (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore_paths: Option<Vec<String>>,

    /// File extensions treated as PHP sources (comma-separated)
    #[arg(long, value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Analyze vendor directories too
    #[arg(long)]
    vendor: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of worker threads (0 = auto)
    #[arg(short, long, default_value = "0")]
    jobs: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "debug" } else { "warn" },
    ))
    .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.list_rules {
        list_rules();
        return;
    }

    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path).unwrap_or_else(|e| {
            eprintln!("{}: Failed to load config: {}", "error".red().bold(), e);
            std::process::exit(2);
        })
    } else {
        Config::load_default().unwrap_or_else(|e| {
            eprintln!("{}: Failed to load config: {}", "error".red().bold(), e);
            std::process::exit(2);
        })
    };

    config.merge_cli(
        cli.php_version,
        cli.ignore_tools,
        cli.only_tools,
        cli.ignore_paths,
        cli.extensions,
        cli.vendor,
        Some(cli.format),
        Some(cli.jobs),
    );

    if let Err(e) = config.validate() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(2);
    }

    let loader = Loader::new(&config).unwrap_or_else(|e| {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(2);
    });
    let files = loader.load(&cli.paths).unwrap_or_else(|e| {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(2);
    });

    let format = config.format;
    let engine = Engine::new(config);
    let result = engine.analyze(&files);

    let formatter: Box<dyn Formatter> = match format {
        OutputFormat::Pretty => {
            let pretty = if cli.no_color {
                PrettyFormatter::new().without_color()
            } else {
                PrettyFormatter::new()
            };
            Box::new(pretty)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
    };

    print!("{}", formatter.format(&result));
    if format == OutputFormat::Json {
        println!();
    }

    std::process::exit(result.exit_code());
}

fn list_rules() {
    for rule in Rule::catalogue() {
        let since = if rule.min_version() == PhpVersion::ANY {
            "any PHP version".to_string()
        } else {
            format!("PHP >= {}", rule.min_version())
        };
        println!("{:<22} {}", rule.id().cyan(), since);
    }
}
