//! covscope CLI - browse package, class and method coverage reports

#![deny(warnings)]

// Global invariants enforced:
// - Events are replayed in a fixed order (tab, package, class, search, sort clicks)
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use covscope_core::config::{self, ResolvedConfig};
use covscope_core::{
    render_json, render_summary_json, render_summary_text, render_text, ReportLevel, ReportView,
    TabCategory,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "covscope")]
#[command(about = "Drill-down viewer for package, class and method coverage reports")]
#[command(version = env!("COVSCOPE_VERSION"))]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one table of a report directory
    View {
        /// Directory holding the package, class, method and summary reports
        dir: PathBuf,

        /// Drill into this package
        #[arg(long)]
        package: Option<String>,

        /// Drill into this class of the selected package
        #[arg(long, requires = "package")]
        class: Option<String>,

        /// Package tab (overrides config file)
        #[arg(long)]
        tab: Option<TabArg>,

        /// Case-insensitive substring filter over every column
        #[arg(long)]
        search: Option<String>,

        /// Column header to sort by; repeat to toggle the direction
        #[arg(long = "sort", value_name = "FIELD")]
        sort: Vec<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover in DIR)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show report totals and the package status breakdown
    Summary {
        /// Directory holding the package, class, method and summary reports
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover in DIR)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without loading any report
    Validate {
        /// Path to config file (default: auto-discover in --dir)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Report directory to search for a config file (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover in --dir)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Report directory to search for a config file (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TabArg {
    All,
    Top,
    Attention,
}

impl From<TabArg> for TabCategory {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::All => TabCategory::All,
            TabArg::Top => TabCategory::Top,
            TabArg::Attention => TabCategory::Attention,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::View {
            dir,
            package,
            class,
            tab,
            search,
            sort,
            format,
            config: config_path,
        } => {
            let mut view = open_view(&dir, config_path.as_deref())?;

            if let Some(tab) = tab {
                view.set_tab(tab.into());
            }
            if let Some(ref package) = package {
                view.select_package(package);
            }
            if let Some(ref class) = class {
                view.select_class(class);
            }
            if let Some(ref search) = search {
                view.set_search(search);
            }
            for field in &sort {
                view.click_sort(field);
            }

            let model = view.render();
            match format {
                OutputFormat::Text => print!("{}", render_text(&model)),
                OutputFormat::Json => println!("{}", render_json(&model)),
            }
        }
        Commands::Summary {
            dir,
            format,
            config: config_path,
        } => {
            let view = open_view(&dir, config_path.as_deref())?;
            let model = view.render();

            match format {
                OutputFormat::Text => print!("{}", render_summary_text(&model)),
                OutputFormat::Json => println!("{}", render_summary_json(&model)),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path, dir } => {
                let report_dir = report_dir_or_cwd(dir)?;
                let resolved = config::load_and_resolve(&report_dir, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path, dir } => {
                let report_dir = report_dir_or_cwd(dir)?;
                let resolved = config::load_and_resolve(&report_dir, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Log to stderr so table and JSON output stay clean on stdout
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_view(dir: &Path, config_path: Option<&Path>) -> anyhow::Result<ReportView> {
    if !dir.is_dir() {
        anyhow::bail!("Report directory does not exist: {}", dir.display());
    }

    covscope_core::open(dir, config_path)
}

fn report_dir_or_cwd(dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Reports:");
    for level in [
        ReportLevel::Package,
        ReportLevel::Class,
        ReportLevel::Method,
        ReportLevel::Summary,
    ] {
        println!(
            "  {}: {}",
            level.as_str(),
            resolved.report_files.file_for(level)
        );
    }
    println!();
    println!("Tabs:");
    println!("  top_min: {}", resolved.thresholds.top_min);
    println!("  attention_below: {}", resolved.thresholds.attention_below);
    println!("  default: {}", resolved.default_tab.as_str());
}
