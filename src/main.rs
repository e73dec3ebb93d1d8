use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{get_styles, TableBuilder};

use pezzottify_dataset::config::{AppConfig, CliConfig, FileConfig};
use pezzottify_dataset::{
    generate_dataset, run_pipeline, GenerationReport, PipelineError, SqliteDatasetStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Generate a synthetic music-streaming dataset into a SQLite database.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Path to the SQLite database file to create or extend.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override command line flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Seed of the random source.
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(long)]
    pub artists: Option<u32>,

    #[clap(long)]
    pub albums: Option<u32>,

    #[clap(long)]
    pub songs: Option<u32>,

    #[clap(long)]
    pub users: Option<u32>,

    #[clap(long)]
    pub plays: Option<u32>,

    /// Minimum user population accepted.
    #[clap(long)]
    pub min_users: Option<u32>,

    /// Generate and verify without writing the database.
    #[clap(long)]
    pub dry_run: bool,

    /// Write the run report as JSON to this file.
    #[clap(long, value_parser = parse_path)]
    pub report: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            seed: self.seed,
            artists: self.artists,
            albums: self.albums,
            songs: self.songs,
            users: self.users,
            plays: self.plays,
            min_users: self.min_users,
            dry_run: self.dry_run,
            report_path: self.report.clone(),
        }
    }
}

fn print_summary(config: &AppConfig, report: &GenerationReport) {
    cli_style::print_section_header("Dataset Summary");
    if report.persisted {
        cli_style::print_key_value("Database", &config.db_path.display().to_string());
    } else {
        cli_style::print_key_value("Database", "not written (dry run)");
    }
    cli_style::print_key_value("Seed", &report.seed.to_string());
    cli_style::print_key_value(
        "Emails left absent",
        &report.quality.missing_emails.to_string(),
    );
    cli_style::print_key_value(
        "Duplication passes",
        &report.quality.duplication_passes.to_string(),
    );
    cli_style::print_key_value_highlight("Total listens", &report.total_listens.to_string());
    cli_style::print_section_footer();

    let mut table = TableBuilder::new(vec!["Table", "Rows"]);
    for (name, count) in report.table_counts.entries() {
        table.add_row(vec![name.to_string(), count.to_string()]);
    }
    table.print();
    println!();

    if !report.persisted {
        cli_style::print_warning("Dry run: in-memory checks passed, nothing was persisted");
    } else if report.violations.is_empty() {
        cli_style::print_success("Foreign key check passed");
    } else {
        cli_style::print_error(&format!(
            "{} foreign key violations",
            report.violations.len()
        ));
    }
}

fn write_report(path: &Path, report: &GenerationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
    info!("Report written to {:?}", path);
    Ok(())
}

fn run(config: &AppConfig) -> Result<GenerationReport, PipelineError> {
    let settings = &config.generation;
    if config.dry_run {
        let generated = generate_dataset(settings)?;
        return Ok(GenerationReport::in_memory(settings.seed, &generated));
    }

    info!("Opening SQLite dataset database at {:?}...", config.db_path);
    let store = SqliteDatasetStore::open(&config.db_path)?;
    run_pipeline(settings, &store)
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let report = run(&config)?;

    print_summary(&config, &report);

    if let Some(report_path) = &config.report_path {
        write_report(report_path, &report)?;
    }
    Ok(())
}
