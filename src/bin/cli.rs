use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use liturgical_index::calendar::{parse_date, DATE_FORMAT};
use liturgical_index::{
    FormattedEntry, IndexResult, IndexScope, LiturgicalCalendar, LiturgicalIndex, OutputFormat,
    PlanFile, PlanSource, Tradition,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// lti - build a liturgical time index from a reading plan.
#[derive(Debug, Parser)]
#[command(name = "lti")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a year (or one season of it) and write it out
    Build(BuildArgs),

    /// Print the entry for a single day
    Today(TodayArgs),

    /// Load a plan and report whether it is valid
    Validate {
        /// Plan file (.yaml, .yml or .json)
        plan: PathBuf,
    },

    /// List the movable feasts of a year
    Holidays {
        year: i32,

        #[arg(short, long, env = "LTI_TRADITION", default_value = "roman")]
        tradition: String,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Plan file (.yaml, .yml or .json)
    #[arg(short, long, env = "LTI_PLAN", default_value = "./plan.yaml")]
    plan: PathBuf,

    /// Calendar tradition
    #[arg(short, long, env = "LTI_TRADITION", default_value = "roman")]
    tradition: String,
}

impl PlanArgs {
    fn index(&self) -> IndexResult<LiturgicalIndex> {
        let tradition: Tradition = self.tradition.parse()?;
        let plan = PlanFile::new(&self.plan).load_plan()?;
        Ok(LiturgicalIndex::new(tradition, plan))
    }
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Year to build
    #[arg(short, long)]
    year: i32,

    #[command(flatten)]
    plan: PlanArgs,

    /// 'annual' or a single season key (e.g. 'lent')
    #[arg(short, long, default_value = "annual")]
    scope: String,

    #[command(flatten)]
    target: OutputTarget,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct OutputTarget {
    /// Write an iCalendar file
    #[arg(long)]
    ics: Option<PathBuf>,

    /// Write a Markdown table
    #[arg(long)]
    md: Option<PathBuf>,

    /// Write a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl OutputTarget {
    fn resolve(&self) -> Option<(OutputFormat, &PathBuf)> {
        self.ics
            .as_ref()
            .map(|path| (OutputFormat::Ics, path))
            .or_else(|| self.md.as_ref().map(|path| (OutputFormat::Markdown, path)))
            .or_else(|| self.csv.as_ref().map(|path| (OutputFormat::Csv, path)))
    }
}

#[derive(Debug, Args)]
struct TodayArgs {
    /// Date to look up (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<String>,

    #[command(flatten)]
    plan: PlanArgs,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn print_entry(entry: &FormattedEntry) {
    let key = &entry.key;
    println!(
        "{} | {} week {} | {}",
        key.date().format(DATE_FORMAT),
        key.season().label(),
        key.season_week(),
        key.weekday().label()
    );
    println!("Cue: {}", entry.cue);
    for reference in &entry.rb {
        println!("- {reference}");
    }
    if let Some(tags) = entry.tags.as_ref().filter(|tags| !tags.is_empty()) {
        println!("Tags: {}", tags.join(", "));
    }
}

fn build(args: BuildArgs) -> IndexResult<()> {
    let scope: IndexScope = args.scope.parse()?;
    let index = args.plan.index()?;
    let result = index.build(args.year, scope)?;

    if let Some((format, path)) = args.target.resolve() {
        format.write(&result.entries, path)?;
        println!(
            "Wrote {} ({}) to {}",
            format.as_str(),
            result.summary.to_cli_summary(),
            path.display()
        );
    }
    Ok(())
}

fn today(args: TodayArgs) -> IndexResult<()> {
    let date: NaiveDate = match args.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    let index = args.plan.index()?;
    print_entry(&index.entry_for(date)?);
    Ok(())
}

fn holidays(year: i32, tradition: &str) -> IndexResult<()> {
    let calendar = LiturgicalCalendar::for_tradition(tradition)?;
    for (holiday, key) in calendar.holidays(year)? {
        println!(
            "{}: {} ({}, week {}, {})",
            holiday.name(),
            key.date().format(DATE_FORMAT),
            key.season().label(),
            key.season_week(),
            key.weekday().label()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> IndexResult<()> {
    match cli.command {
        Command::Build(args) => build(args),
        Command::Today(args) => today(args),
        Command::Validate { plan } => {
            PlanFile::new(plan).load_plan()?;
            println!("Plan valid.");
            Ok(())
        }
        Command::Holidays { year, tradition } => holidays(year, &tradition),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
