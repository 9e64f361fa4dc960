//! Configurable exclusion workflow
//!
//! A [`Workflow`] lists the grid settings, file name templates and the
//! ordered exclusion steps run for every country. File names may contain
//! `{country}`, replaced by the country name. Inputs resolve under the
//! layout's `data/` directory and outputs under `processed/`.

mod layout;
mod runner;

pub use layout::Layout;
pub use runner::{run, run_country, CountryReport, StepReport};

use crate::exclusion::{RasterExclusion, ValueSpec};
use landex_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Countries processed when none are given
pub const DEFAULT_COUNTRIES: &[&str] = &["Laos"];

/// Placeholder in file name templates
const COUNTRY: &str = "{country}";

fn default_overwrite() -> bool {
    true
}

fn default_exclusions_label() -> String {
    "excluded areas for PV".to_string()
}

fn default_placements_label() -> String {
    "pv plants".to_string()
}

/// Per-country exclusion workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Cell size of the analysis grid, in units of the country's SRS
    pub pixel_size: f64,
    /// Minimum distance between placed items
    pub separation: f64,
    /// Replace existing outputs
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    pub srs_cache: String,
    pub region: String,
    pub exclusions_output: String,
    pub placements_output: String,
    /// What the saved mask holds, for progress messages
    #[serde(default = "default_exclusions_label")]
    pub exclusions_label: String,
    /// What the placed items are, for progress messages
    #[serde(default = "default_placements_label")]
    pub placements_label: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step of a workflow, applied in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
    /// Exclude the features of a GeoJSON file
    Vector {
        label: String,
        source: String,
        #[serde(default)]
        buffer: f64,
        #[serde(default)]
        invert: bool,
    },
    /// Exclude cells of a GeoTIFF by value
    Raster {
        label: String,
        source: String,
        value: ValueSpec,
        #[serde(default)]
        prewarp: bool,
        #[serde(default)]
        buffer: f64,
        #[serde(default)]
        invert: bool,
    },
    /// Write a PNG preview of the current mask
    Draw { label: String, output: String },
}

impl Step {
    pub fn label(&self) -> &str {
        match self {
            Step::Vector { label, .. } | Step::Raster { label, .. } | Step::Draw { label, .. } => label,
        }
    }

    fn vector(label: &str, source: &str, buffer: f64) -> Self {
        Step::Vector {
            label: label.to_string(),
            source: source.to_string(),
            buffer,
            invert: false,
        }
    }

    fn raster(label: &str, source: &str, value: f64) -> Self {
        Step::Raster {
            label: label.to_string(),
            source: source.to_string(),
            value: ValueSpec::Exact(value),
            prewarp: true,
            buffer: 0.0,
            invert: false,
        }
    }
}

impl Workflow {
    /// PV exclusion workflow: three vector layers buffered by 250, the slope
    /// flag and four land-cover classes, with a preview after the water step.
    pub fn pv_default() -> Self {
        Self {
            pixel_size: 100.0,
            separation: 224.0,
            overwrite: true,
            srs_cache: "{country}_EPSG.pkl".to_string(),
            region: "{country}.geojson".to_string(),
            exclusions_output: "{country}_pv_exclusions.tif".to_string(),
            placements_output: "{country}_pv_placements.shp".to_string(),
            exclusions_label: default_exclusions_label(),
            placements_label: default_placements_label(),
            steps: vec![
                Step::vector("coast", "{country}_oceans.geojson", 250.0),
                Step::vector(
                    "national biodiversity conservation areas",
                    "{country}_national_conversation.geojson",
                    250.0,
                ),
                Step::vector("forest protection areas", "{country}_protection_area.geojson", 250.0),
                Step::raster(
                    "Slope above 6.28 degrees (N/E/W) and 33 degrees (S)",
                    "Laos_slope_excluded_pv.tif",
                    1.0,
                ),
                Step::raster("herbaceous wetland", "{country}_CLC.tif", 90.0),
                Step::raster("built-up area", "{country}_CLC.tif", 50.0),
                Step::raster("permanent water bodies", "{country}_CLC.tif", 80.0),
                Step::Draw {
                    label: "preview".to_string(),
                    output: "{country}_pv_preview.png".to_string(),
                },
                Step::raster("agriculture", "{country}_CLC.tif", 40.0),
            ],
        }
    }

    /// Load a workflow from a TOML file
    /// Progress message logged before the mask is written
    pub fn saving_message(&self) -> String {
        format!(" - Saving {} as .tif file...", self.exclusions_label)
    }

    /// Progress message logged before items are placed
    pub fn distributing_message(&self) -> String {
        format!(" - Distributing {} and saving placements as .shp...", self.placements_label)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let workflow: Workflow = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        workflow.validate()?;
        Ok(workflow)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check grid and step parameters before any file is touched
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be a positive number, got {}", name, v)))
            }
        };
        positive("pixel_size", self.pixel_size)?;
        positive("separation", self.separation)?;

        for step in &self.steps {
            let buffer = match step {
                Step::Vector { buffer, .. } | Step::Raster { buffer, .. } => *buffer,
                Step::Draw { .. } => 0.0,
            };
            if !buffer.is_finite() || buffer < 0.0 {
                return Err(Error::Config(format!(
                    "step '{}': buffer must be non-negative, got {}",
                    step.label(),
                    buffer
                )));
            }
        }
        Ok(())
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::pv_default()
    }
}

/// Substitute `country` into a file name template
pub fn resolve_template(template: &str, country: &str) -> String {
    template.replace(COUNTRY, country)
}

/// Raster exclusion options of a step
pub(crate) fn raster_options(value: ValueSpec, prewarp: bool, buffer: f64, invert: bool) -> RasterExclusion {
    RasterExclusion::new(value)
        .prewarp(prewarp)
        .buffer(buffer)
        .invert(invert)
}
