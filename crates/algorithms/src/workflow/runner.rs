//! Sequential per-country execution of a workflow

use super::{raster_options, resolve_template, Layout, Step, Workflow};
use crate::exclusion::{ExclusionCalculator, VectorExclusion};
use landex_core::io::{load_srs, read_geotiff_native, AnyRaster};
use landex_core::Result;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one workflow step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub label: String,
    pub cells_removed: usize,
    pub eligible_cells: usize,
}

/// Outcome of a whole country
#[derive(Debug, Clone, PartialEq)]
pub struct CountryReport {
    pub country: String,
    pub region_cells: usize,
    pub eligible_cells: usize,
    pub percent_available: f64,
    pub placements: usize,
    pub steps: Vec<StepReport>,
    pub exclusions_path: PathBuf,
    pub placements_path: PathBuf,
}

/// Run `workflow` for each country in order.
///
/// Creates the layout directories first. The first failing country aborts
/// the run, and countries after it are not attempted.
pub fn run<S: AsRef<str>>(layout: &Layout, workflow: &Workflow, countries: &[S]) -> Result<Vec<CountryReport>> {
    workflow.validate()?;
    layout.ensure()?;

    let start = Instant::now();
    countries
        .iter()
        .map(|country| run_country(layout, workflow, country.as_ref(), start))
        .collect()
}

/// Run `workflow` for a single country, timing log lines from `start`.
pub fn run_country(layout: &Layout, workflow: &Workflow, country: &str, start: Instant) -> Result<CountryReport> {
    let name = |template: &str| resolve_template(template, country);
    let done = || info!("   Done! Time elapsed so far: {:.4} seconds", start.elapsed().as_secs_f64());

    info!("Land exclusions for {}", country);

    // The SRS is a hard precondition: nothing is built without it
    let srs = load_srs(layout.data_file(&name(&workflow.srs_cache)))?;

    info!(" - Initializing exclusion calculator...");
    let mut calc = ExclusionCalculator::new(layout.data_file(&name(&workflow.region)), &srs, workflow.pixel_size)?;
    done();

    let mut cache = RasterCache::default();
    let mut steps = Vec::with_capacity(workflow.steps.len());
    for step in &workflow.steps {
        let label = step.label().to_string();
        let report = match step {
            Step::Vector {
                source,
                buffer,
                invert,
                ..
            } => {
                info!(" - Applying exclusions - {}...", label);
                let params = VectorExclusion {
                    buffer: *buffer,
                    invert: *invert,
                };
                Some(calc.exclude_vector(layout.data_file(&name(source)), &params)?)
            }
            Step::Raster {
                source,
                value,
                prewarp,
                buffer,
                invert,
                ..
            } => {
                info!(" - Applying exclusions - {}...", label);
                let raster = cache.get(layout.data_file(&name(source)))?;
                let params = raster_options(*value, *prewarp, *buffer, *invert);
                Some(calc.exclude_source(raster, &params)?)
            }
            Step::Draw { output, .. } => {
                info!(" - Drawing {}...", label);
                calc.draw(layout.output_file(&name(output)))?;
                None
            }
        };
        done();

        steps.push(StepReport {
            label,
            cells_removed: report.map_or(0, |r| r.cells_removed),
            eligible_cells: report.map_or_else(|| calc.eligible_cells(), |r| r.eligible_cells),
        });
    }

    info!("{}", workflow.saving_message());
    let exclusions_path = layout.output_file(&name(&workflow.exclusions_output));
    calc.save(&exclusions_path, workflow.overwrite)?;
    done();

    info!("{}", workflow.distributing_message());
    let placements_path = layout.output_file(&name(&workflow.placements_output));
    let points = calc.distribute_items(workflow.separation, &placements_path, workflow.overwrite)?;
    done();

    info!(
        "{}: {} of {} cells eligible ({:.2}%), {} placements",
        country,
        calc.eligible_cells(),
        calc.region_cells(),
        calc.percent_available(),
        points.len()
    );

    Ok(CountryReport {
        country: country.to_string(),
        region_cells: calc.region_cells(),
        eligible_cells: calc.eligible_cells(),
        percent_available: calc.percent_available(),
        placements: points.len(),
        steps,
        exclusions_path,
        placements_path,
    })
}

/// Keeps the last raster read, since consecutive steps often share a source
#[derive(Default)]
struct RasterCache {
    entry: Option<(PathBuf, AnyRaster)>,
}

impl RasterCache {
    fn get(&mut self, path: PathBuf) -> Result<&AnyRaster> {
        match self.entry.take() {
            Some((cached, raster)) if cached == path => Ok(&self.entry.insert((cached, raster)).1),
            _ => {
                let raster = read_geotiff_native(&path, None)?;
                debug!("Read {} as {}", path.display(), raster.sample_type());
                Ok(&self.entry.insert((path, raster)).1)
            }
        }
    }
}
