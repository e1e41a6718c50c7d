//! CLI tool for exporting a setlist to a large-print PDF.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use setlist_core::compose::fit_stage_entries;
use setlist_core::{
    export_setlist, plan_font_sizes, BuiltinMetrics, ExportOptions, FontFamily, LayoutConfig,
    LogTrace, Schedule, Setlist, SongCatalog,
};
use setlist_pdf::PdfSurface;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Render a setlist as a stage view plus an organizer table.
#[derive(Parser, Debug)]
#[command(name = "setlist-export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Setlist JSON file (array of song and break entries)
    input: PathBuf,

    /// Song catalog JSON file with durations and vibes
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Output directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Show date as YYYY-MM-DD (default: today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// chrono format string for the date label
    #[arg(long, default_value = "%-m/%-d/%Y")]
    date_format: String,

    /// Font family: helvetica or courier
    #[arg(short, long, default_value = "helvetica")]
    font: String,

    /// Page margin in mm
    #[arg(long, default_value = "8")]
    margin: f64,

    /// Most songs that still get the single-page stage view
    #[arg(long, default_value = "9")]
    single_page_limit: usize,

    /// Width fraction at which song titles start being shortened
    #[arg(long, default_value = "0.9")]
    shorten_ratio: f64,

    /// Print the layout decisions without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let setlist = read_setlist(&args.input)?;
    let catalog = match &args.catalog {
        Some(path) => Some(read_catalog(path)?),
        None => None,
    };

    let family = FontFamily::from_name(&args.font)
        .ok_or_else(|| anyhow::anyhow!("Unknown font family: {}", args.font))?;
    let config = LayoutConfig::new()
        .with_font_family(family)
        .with_margin(args.margin)
        .with_single_page_song_limit(args.single_page_limit)
        .with_shorten_trigger_ratio(args.shorten_ratio);

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let mut date_label = String::new();
    write!(date_label, "{}", date.format(&args.date_format))
        .map_err(|_| anyhow::anyhow!("Invalid date format: {}", args.date_format))?;

    if args.dry_run {
        return print_plan(&setlist, catalog.as_ref(), &config);
    }

    let options = ExportOptions::new(&args.output, date_label.as_str()).with_config(config.clone());
    let surface = PdfSurface::new(&format!("Setlist {}", date_label), &config);

    match export_setlist(surface, &setlist, catalog.as_ref(), &options)? {
        Some(report) => {
            if args.verbose {
                eprintln!(
                    "  {} stage page(s) at {}pt, {} organizer page(s)",
                    report.summary.stage_pages,
                    report.plan.song_font_size,
                    report.summary.organizer_pages
                );
                for entry in report.summary.shortened() {
                    eprintln!(
                        "  shortened ({}): {} -> {}",
                        entry.text.stage, entry.text.original, entry.text.display
                    );
                }
            }
            println!("{}", report.path.display());
        }
        None => eprintln!("Setlist is empty, nothing written"),
    }

    Ok(())
}

fn read_setlist(path: &Path) -> Result<Setlist> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Setlist::from_json(&json).with_context(|| format!("Invalid setlist in {}", path.display()))
}

fn read_catalog(path: &Path) -> Result<SongCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    SongCatalog::from_json(&json).with_context(|| format!("Invalid catalog in {}", path.display()))
}

/// Print sizes, fitted titles and the running order.
fn print_plan(setlist: &Setlist, catalog: Option<&SongCatalog>, config: &LayoutConfig) -> Result<()> {
    config.validate()?;
    let plan = plan_font_sizes(setlist, config);
    println!(
        "{:?}: songs {}pt, breaks {}pt",
        plan.mode, plan.song_font_size, plan.break_font_size
    );

    let entries = fit_stage_entries(setlist, &plan, config, &BuiltinMetrics::new(), &LogTrace)?;
    let schedule = Schedule::build(setlist, catalog);
    for (fitted, row) in entries.iter().zip(schedule.entries()) {
        println!(
            "{:<13} {:<40} [{}] {}",
            row.time_range(),
            fitted.text.display,
            fitted.text.stage,
            row.vibe
        );
    }
    Ok(())
}
