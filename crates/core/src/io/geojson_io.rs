//! GeoJSON reading via the `geojson` crate

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geojson::{GeoJson, JsonObject};
use std::path::Path;

/// Read a GeoJSON file into features plus the CRS declared by its legacy
/// `crs` member (EPSG:4326 when absent, as RFC 7946 prescribes).
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<(FeatureCollection, CRS)> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_geojson(&text)
}

pub(crate) fn parse_geojson(text: &str) -> Result<(FeatureCollection, CRS)> {
    let geojson: GeoJson = text.parse()?;

    let mut collection = FeatureCollection::new();
    let crs = match geojson {
        GeoJson::FeatureCollection(fc) => {
            let crs = declared_crs(fc.foreign_members.as_ref())?;
            for feature in fc.features {
                collection.push(convert_feature(feature)?);
            }
            crs
        }
        GeoJson::Feature(feature) => {
            let crs = declared_crs(feature.foreign_members.as_ref())?;
            collection.push(convert_feature(feature)?);
            crs
        }
        GeoJson::Geometry(geometry) => {
            let crs = declared_crs(geometry.foreign_members.as_ref())?;
            let geometry: geo_types::Geometry<f64> = geometry.try_into()?;
            collection.push(Feature::new(geometry));
            crs
        }
    };

    Ok((collection, crs))
}

fn convert_feature(feature: geojson::Feature) -> Result<Feature> {
    let geometry: Option<geo_types::Geometry<f64>> =
        feature.geometry.map(|g| g.try_into()).transpose()?;

    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => s,
        geojson::feature::Id::Number(n) => n.to_string(),
    });

    let properties = feature
        .properties
        .unwrap_or_default()
        .iter()
        .map(|(k, v)| (k.clone(), AttributeValue::from(v)))
        .collect();

    Ok(Feature {
        geometry,
        properties,
        id,
    })
}

/// `"crs": {"type": "name", "properties": {"name": "..."}}`
fn declared_crs(members: Option<&JsonObject>) -> Result<CRS> {
    let Some(crs) = members.and_then(|m| m.get("crs")) else {
        return Ok(CRS::wgs84());
    };

    crs.get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .ok_or_else(|| Error::Vector(format!("Unrecognised crs member: {}", crs)))
        .and_then(CRS::parse)
}
