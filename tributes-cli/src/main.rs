mod reports;
mod runner;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use runner::{RunPlan, Runner};
use tributes_game::{DataLoader, EventCatalog, GameConfig, StaticLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored round-by-round narration
    Console,
    /// Every game record as pretty JSON
    Json,
    /// Markdown transcript
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "tributes", version = "0.1.0")]
#[command(about = "Narrate elimination tournaments round by round until one tribute remains")]
struct Args {
    /// Roster size; overrides max_tributes from the config
    #[arg(long)]
    tributes: Option<usize>,

    /// Tribute names to add before padding (comma-separated)
    #[arg(long)]
    names: Option<String>,

    /// Default roster group used to fill the remaining slots
    #[arg(long, default_value = "districts")]
    group: String,

    /// Game title
    #[arg(long)]
    title: Option<String>,

    /// Seed for reproducible runs; omitted means OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to run
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON game config overriding the bundled one
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON event catalog overriding the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// List the bundled roster groups and exit
    #[arg(long)]
    list_groups: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let loader = StaticLoader;
    let rosters = loader.load_rosters()?;

    if args.list_groups {
        let mut sink = ReportSink::open(args.output.as_deref())?;
        writeln!(sink, "Available groups:")?;
        for name in rosters.group_names() {
            let size = rosters.group(name).map_or(0, <[String]>::len);
            writeln!(sink, "  {name:15} - {size} tributes")?;
        }
        sink.flush()?;
        return Ok(());
    }

    let config = load_game_config(&args, &loader)?;
    let catalog = load_catalog(args.catalog.as_deref(), &loader)?;

    if args.report == ReportFormat::Console && args.output.is_none() {
        announce_banner();
    }

    let plan = RunPlan {
        games: args.games,
        title: args.title.clone(),
        names: args.names.as_deref().map(split_csv).unwrap_or_default(),
        group: Some(args.group.clone()),
    };
    let mut runner = Runner::new(catalog, rosters, config, args.seed);
    let records = runner.run(&plan)?;

    let mut sink = ReportSink::open(args.output.as_deref())?;
    match args.report {
        ReportFormat::Console => reports::generate_console_report(&mut sink, &records)?,
        ReportFormat::Json => reports::generate_json_report(&mut sink, &records)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut sink, &records)?,
    }
    sink.flush()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🎮 Tributes Simulator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_game_config(args: &Args, loader: &StaticLoader) -> Result<GameConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => GameConfig::from_json(&read_file(path)?)
            .with_context(|| format!("invalid config in {}", path.display()))?,
        None => loader.load_config("game_config")?,
    };
    if let Some(tributes) = args.tributes {
        config.max_tributes = tributes;
    }
    config.validate().context("invalid game config")?;
    Ok(config)
}

fn load_catalog(path: Option<&Path>, loader: &StaticLoader) -> Result<EventCatalog> {
    match path {
        Some(path) => EventCatalog::from_json(&read_file(path)?)
            .with_context(|| format!("invalid event catalog in {}", path.display())),
        None => Ok(loader.load_event_catalog()?),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Report destination. File output is written without ANSI colors.
struct ReportSink {
    inner: BufWriter<Box<dyn Write>>,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let inner: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                colored::control::set_override(false);
                Box::new(file)
            }
            None => Box::new(stdout()),
        };
        Ok(Self {
            inner: BufWriter::new(inner),
        })
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
