//! Spatial reference identifiers
//!
//! landex only needs to tell WGS84, Web Mercator and the UTM zones apart,
//! so a reference is an EPSG code, or an opaque WKT string when it came
//! from a file that did not carry a code.

mod transform;

pub use transform::{parse_utm_epsg, Projection, Transformer};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    wkt: Option<String>,
    epsg: Option<u32>,
}

impl CRS {
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
        }
    }

    /// Reference known only by its WKT text, which is kept verbatim
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
        }
    }

    /// Parse an identifier such as `EPSG:32648`, `epsg:4326`,
    /// `urn:ogc:def:crs:EPSG::32648`, `urn:ogc:def:crs:OGC:1.3:CRS84`
    /// or a bare code `32648`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("urn:ogc:def:crs:OGC:1.3:CRS84") || s.eq_ignore_ascii_case("CRS84") {
            return Ok(Self::wgs84());
        }

        let upper = s.to_ascii_uppercase();
        let digits = if let Some(rest) = upper.strip_prefix("EPSG:") {
            rest
        } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            // The version segment between the authority and the code may be empty
            upper.rsplit(':').next().unwrap_or_default()
        } else {
            upper.as_str()
        };

        let code = digits
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::UnsupportedCrs(s.to_string()))?;

        Ok(Self::from_epsg(code))
    }

    /// EPSG:4326, the default of GeoJSON files without a `crs` member
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// EPSG:3857
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Same EPSG code, or failing that byte-identical WKT
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        match (self.epsg, other.epsg, &self.wkt, &other.wkt) {
            (Some(a), Some(b), _, _) => a == b,
            (_, _, Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// ESRI-flavoured WKT for the `.prj` sidecar of a shapefile.
    ///
    /// Returns the stored WKT when present, otherwise generates one for the
    /// EPSG codes [`Transformer`] understands.
    pub fn esri_wkt(&self) -> Option<String> {
        if let Some(wkt) = &self.wkt {
            return Some(wkt.clone());
        }

        const GEOGCS: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
            SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],\
            PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";

        let code = self.epsg?;
        if code == 4326 {
            return Some(GEOGCS.to_string());
        }
        if code == 3857 {
            return Some(format!(
                "PROJCS[\"WGS_1984_Web_Mercator_Auxiliary_Sphere\",{GEOGCS},\
                 PROJECTION[\"Mercator_Auxiliary_Sphere\"],PARAMETER[\"False_Easting\",0.0],\
                 PARAMETER[\"False_Northing\",0.0],PARAMETER[\"Central_Meridian\",0.0],\
                 PARAMETER[\"Standard_Parallel_1\",0.0],PARAMETER[\"Auxiliary_Sphere_Type\",0.0],\
                 UNIT[\"Meter\",1.0]]"
            ));
        }

        let (zone, north) = parse_utm_epsg(code)?;
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
        Some(format!(
            "PROJCS[\"WGS_1984_UTM_Zone_{zone}{hemi}\",{GEOGCS},\
             PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",500000.0],\
             PARAMETER[\"False_Northing\",{false_northing:.1}],PARAMETER[\"Central_Meridian\",{central_meridian:.1}],\
             PARAMETER[\"Scale_Factor\",0.9996],PARAMETER[\"Latitude_Of_Origin\",0.0],\
             UNIT[\"Meter\",1.0]]",
            hemi = if north { "N" } else { "S" },
            false_northing = if north { 0.0 } else { 10_000_000.0 },
        ))
    }

    /// `EPSG:<code>`, or the start of the WKT
    pub fn identifier(&self) -> String {
        match (self.epsg, &self.wkt) {
            (Some(code), _) => format!("EPSG:{}", code),
            (None, Some(wkt)) => format!("WKT:{}", wkt.chars().take(50).collect::<String>()),
            (None, None) => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_prefers_epsg() {
        assert_eq!(CRS::from_epsg(32648).identifier(), "EPSG:32648");
        assert_eq!(CRS::from_wkt("LOCAL_CS[\"site\"]").identifier(), "WKT:LOCAL_CS[\"site\"]");
        assert_eq!(CRS::wgs84().to_string(), "EPSG:4326");
    }

    #[test]
    fn equivalence_by_code_or_text() {
        assert!(CRS::from_epsg(4326).is_equivalent(&CRS::wgs84()));
        assert!(!CRS::wgs84().is_equivalent(&CRS::from_epsg(32648)));
        assert!(CRS::from_wkt("A").is_equivalent(&CRS::from_wkt("A")));
        assert!(!CRS::from_wkt("A").is_equivalent(&CRS::wgs84()));
    }

    #[test]
    fn parses_epsg_and_urn_identifiers() {
        assert_eq!(CRS::parse("EPSG:32648").unwrap().epsg(), Some(32648));
        assert_eq!(CRS::parse("epsg:4326").unwrap().epsg(), Some(4326));
        assert_eq!(CRS::parse(" 32648 ").unwrap().epsg(), Some(32648));
        assert_eq!(CRS::parse("urn:ogc:def:crs:EPSG::3857").unwrap().epsg(), Some(3857));
        assert_eq!(CRS::parse("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap().epsg(), Some(4326));
    }

    #[test]
    fn rejects_non_epsg_identifiers() {
        assert!(CRS::parse("ESRI:102003").is_err());
        assert!(CRS::parse("laos").is_err());
    }

    #[test]
    fn esri_wkt_for_utm_zones() {
        let wkt = CRS::from_epsg(32648).esri_wkt().unwrap();
        assert!(wkt.starts_with("PROJCS[\"WGS_1984_UTM_Zone_48N\""));
        assert!(wkt.contains("PARAMETER[\"Central_Meridian\",105.0]"));

        let south = CRS::from_epsg(32721).esri_wkt().unwrap();
        assert!(south.contains("Zone_21S"));
        assert!(south.contains("PARAMETER[\"False_Northing\",10000000.0]"));

        assert!(CRS::from_epsg(2154).esri_wkt().is_none());
    }
}
