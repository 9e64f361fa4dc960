//! landex CLI - PV land exclusion and placement

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use landex_algorithms::exclusion::{AVAILABLE, EXCLUDED, OUTSIDE};
use landex_algorithms::workflow::{resolve_template, run, CountryReport, Layout, Workflow, DEFAULT_COUNTRIES};
use landex_core::io::{read_geotiff, store_srs};
use landex_core::{Raster, CRS};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "landex")]
#[command(author, version, about = "Land exclusion and PV placement", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the exclusion workflow for each country
    Run {
        /// Directory holding data/ and processed/ (defaults to the working directory)
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
        /// Country to process; repeat for several (defaults to Laos)
        #[arg(short, long = "country")]
        countries: Vec<String>,
        /// Workflow TOML file (defaults to the built-in PV workflow)
        #[arg(short, long)]
        workflow: Option<PathBuf>,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Write the spatial reference cache of a country
    CacheSrs {
        /// Country name
        country: String,
        /// EPSG code of the country's analysis CRS
        epsg: u32,
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
        /// Workflow TOML file providing the cache file name
        #[arg(short, long)]
        workflow: Option<PathBuf>,
    },
    /// Print the built-in workflow as TOML
    Workflow,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn layout(base_dir: Option<PathBuf>) -> Result<Layout> {
    let base = match base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine working directory")?,
    };
    Ok(Layout::resolve(base))
}

fn load_workflow(path: Option<&Path>) -> Result<Workflow> {
    match path {
        Some(path) => Workflow::from_toml_file(path)
            .with_context(|| format!("Failed to load workflow {}", path.display())),
        None => Ok(Workflow::pv_default()),
    }
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path, None).context("Failed to read raster")?;
    pb.finish_and_clear();
    debug!("Read {} ({} x {})", path.display(), raster.rows(), raster.cols());
    Ok(raster)
}

fn summary(report: &CountryReport) {
    println!("{}", report.country);
    println!(
        "  Eligible: {} of {} cells ({:.2}%)",
        report.eligible_cells, report.region_cells, report.percent_available
    );
    for step in &report.steps {
        println!("    {:<55} -{}", step.label, step.cells_removed);
    }
    println!("  Exclusions saved to: {}", report.exclusions_path.display());
    println!(
        "  Placements ({}) saved to: {}",
        report.placements,
        report.placements_path.display()
    );
}

/// Georeferencing and value summary of a raster, plus the eligibility
/// breakdown when it looks like an exclusion mask
fn describe(path: &Path, raster: &Raster<f64>) {
    let (rows, cols) = raster.shape();
    let (min_x, min_y, max_x, max_y) = raster.bounds();
    println!("{}", path.display());
    println!("  Grid: {} rows x {} cols at {}", rows, cols, raster.cell_size());
    println!("  Extent: x {:.3}..{:.3}, y {:.3}..{:.3}", min_x, max_x, min_y, max_y);
    match raster.crs() {
        Some(crs) => println!("  CRS: {}", crs),
        None => println!("  CRS: none"),
    }
    if let Some(nodata) = raster.nodata() {
        println!("  NoData: {}", nodata);
    }

    let stats = raster.statistics();
    let share = |n: usize| 100.0 * n as f64 / raster.len().max(1) as f64;
    println!("  Valid cells: {} ({:.1}%)", stats.valid_count, share(stats.valid_count));
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        println!("  Values: {} to {}, mean {:.4}", min, max, mean);
    }

    let mask_values = [AVAILABLE, EXCLUDED, OUTSIDE].map(f64::from);
    let is_mask = raster.data().iter().all(|v| v.is_nan() || mask_values.contains(v));
    if is_mask {
        let available = raster.count(f64::from(AVAILABLE));
        let excluded = raster.count(f64::from(EXCLUDED));
        let region = available + excluded;
        println!(
            "  Eligible: {} of {} region cells ({:.2}%)",
            available,
            region,
            100.0 * available as f64 / region.max(1) as f64
        );
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            base_dir,
            countries,
            workflow,
        } => {
            let layout = layout(base_dir)?;
            let workflow = load_workflow(workflow.as_deref())?;
            let countries: Vec<String> = if countries.is_empty() {
                DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect()
            } else {
                countries
            };

            let start = Instant::now();
            let reports = run(&layout, &workflow, &countries).context("Workflow failed")?;
            for report in &reports {
                summary(report);
            }
            println!("Processing time: {:.2?}", start.elapsed());
        }

        Commands::Info { input } => {
            let raster = read_raster(&input)?;
            describe(&input, &raster);
        }

        Commands::CacheSrs {
            country,
            epsg,
            base_dir,
            workflow,
        } => {
            let layout = layout(base_dir)?;
            let workflow = load_workflow(workflow.as_deref())?;
            layout.ensure().context("Failed to create data directories")?;

            let path = layout.data_file(&resolve_template(&workflow.srs_cache, &country));
            store_srs(&path, &CRS::from_epsg(epsg)).context("Failed to write SRS cache")?;
            println!("EPSG:{} cached for {} at {}", epsg, country, path.display());
        }

        Commands::Workflow => {
            let text = Workflow::pv_default().to_toml().context("Failed to encode workflow")?;
            print!("{}", text);
        }
    }

    Ok(())
}
