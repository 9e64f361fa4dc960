//! Pure-Rust coordinate transforms between WGS84, Web Mercator and UTM.
//!
//! UTM uses the Snyder (1987) series (USGS Prof. Paper 1395, pp. 61-64),
//! covering EPSG 326xx (UTM North) and 327xx (UTM South). No libproj.

use super::CRS;
use crate::error::{Error, Result};

// ── WGS84 ellipsoid constants ────────────────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A projection the transformer knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Geographic longitude/latitude in degrees (EPSG:4326)
    Geographic,
    /// Spherical Web Mercator (EPSG:3857)
    WebMercator,
    /// Universal Transverse Mercator on WGS84
    Utm { zone: u32, north: bool },
}

impl Projection {
    /// Resolve a projection from an EPSG code.
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        match epsg {
            4326 => Some(Projection::Geographic),
            3857 | 900913 => Some(Projection::WebMercator),
            _ => parse_utm_epsg(epsg).map(|(zone, north)| Projection::Utm { zone, north }),
        }
    }

    /// Geographic (lon, lat) degrees → projected coordinates
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (lon, lat),
            Projection::WebMercator => {
                let x = A * lon.to_radians();
                let y = A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
                (x, y)
            }
            Projection::Utm { zone, north } => wgs84_to_utm(lon, lat, zone, north),
        }
    }

    /// Projected coordinates → geographic (lon, lat) degrees
    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Projection::Geographic => (x, y),
            Projection::WebMercator => {
                let lon = (x / A).to_degrees();
                let lat = (2.0 * (y / A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
                (lon, lat)
            }
            Projection::Utm { zone, north } => utm_to_wgs84(x, y, zone, north),
        }
    }
}

/// Point transformer between two coordinate reference systems.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    source: Projection,
    target: Projection,
    identity: bool,
}

impl Transformer {
    /// Build a transformer from `from` to `to`.
    ///
    /// Equivalent CRS always yield an identity transform, even if neither
    /// carries an EPSG code the transformer understands.
    pub fn new(from: &CRS, to: &CRS) -> Result<Self> {
        if from.is_equivalent(to) {
            return Ok(Self {
                source: Projection::Geographic,
                target: Projection::Geographic,
                identity: true,
            });
        }

        let resolve = |crs: &CRS| {
            crs.epsg()
                .and_then(Projection::from_epsg)
                .ok_or_else(|| Error::UnsupportedCrs(crs.identifier()))
        };

        let source = resolve(from)?;
        let target = resolve(to)?;
        Ok(Self {
            source,
            target,
            identity: source == target,
        })
    }

    /// Whether this transform leaves coordinates untouched
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transform a single coordinate pair
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        if self.identity {
            return (x, y);
        }
        let (lon, lat) = self.source.inverse(x, y);
        self.target.forward(lon, lat)
    }
}

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, North hemisphere
/// - EPSG 327xx → zone xx, South hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

/// Convert WGS84 (longitude, latitude) in degrees to UTM (easting, northing)
/// in metres for the given zone and hemisphere.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = central_meridian(zone);

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a_coeff = cos_lat * (lon - lon0);

    let m = meridional_arc(lat);

    let a2 = a_coeff * a_coeff;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    // Snyder eq. 8-9
    let easting = K0 * n
        * (a_coeff
            + (1.0 - t + c) * a2 * a_coeff / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a_coeff / 120.0)
        + FALSE_EASTING;

    // Snyder eq. 8-10
    let northing = K0
        * (m
            + n * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    let northing = if north { northing } else { northing + FALSE_NORTHING_SOUTH };

    (easting, northing)
}

/// Convert UTM (easting, northing) in metres to WGS84 (longitude, latitude)
/// in degrees. Snyder eqs. 8-12 to 8-25.
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north { northing } else { northing - FALSE_NORTHING_SOUTH };

    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let sqrt_1e2 = (1.0 - E2).sqrt();
    let e1 = (1.0 - sqrt_1e2) / (1.0 + sqrt_1e2);

    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    // Footpoint latitude
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - E2 * sin_phi1 * sin_phi1;
    let n1 = A / denom.sqrt();
    let r1 = A * (1.0 - E2) / denom.powf(1.5);
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d2 * d2;
    let d5 = d4 * d;
    let d6 = d4 * d2;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * E_PRIME2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1) * d5 / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

/// Meridional arc from equator to latitude `lat` (radians).
/// Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e2 = E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parse_utm_zones() {
        assert_eq!(parse_utm_epsg(32648), Some((48, true)));
        assert_eq!(parse_utm_epsg(32721), Some((21, false)));
        assert_eq!(parse_utm_epsg(32600), None);
        assert_eq!(parse_utm_epsg(32661), None);
        assert_eq!(parse_utm_epsg(4326), None);
    }

    // pyproj: Transformer.from_crs(4326, 32630, always_xy=True)
    //   .transform(-3.7037, 40.4168) → (440298.94, 4474257.31)
    #[test]
    fn madrid_wgs84_to_utm30n() {
        let t = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32630)).unwrap();
        let (e, n) = t.transform(-3.7037, 40.4168);
        assert_relative_eq!(e, 440_298.94, epsilon = 1.0);
        assert_relative_eq!(n, 4_474_257.31, epsilon = 1.0);
    }

    #[test]
    fn utm_inverse_roundtrip_laos() {
        // Vientiane, UTM zone 48N
        let fwd = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32648)).unwrap();
        let inv = Transformer::new(&CRS::from_epsg(32648), &CRS::wgs84()).unwrap();

        let (e, n) = fwd.transform(102.6331, 17.9757);
        let (lon, lat) = inv.transform(e, n);
        assert_relative_eq!(lon, 102.6331, epsilon = 1e-6);
        assert_relative_eq!(lat, 17.9757, epsilon = 1e-6);
    }

    #[test]
    fn utm_inverse_roundtrip_south() {
        let fwd = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32721)).unwrap();
        let inv = Transformer::new(&CRS::from_epsg(32721), &CRS::wgs84()).unwrap();

        let (e, n) = fwd.transform(-58.3816, -34.6037);
        assert!(n > 6_000_000.0);
        let (lon, lat) = inv.transform(e, n);
        assert_relative_eq!(lon, -58.3816, epsilon = 1e-6);
        assert_relative_eq!(lat, -34.6037, epsilon = 1e-6);
    }

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let t = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32648)).unwrap();
        let (e, n) = t.transform(105.0, 0.0);
        assert_relative_eq!(e, 500_000.0, epsilon = 0.01);
        assert_relative_eq!(n, 0.0, epsilon = 0.01);
    }

    #[test]
    fn web_mercator_roundtrip() {
        let fwd = Transformer::new(&CRS::wgs84(), &CRS::web_mercator()).unwrap();
        let (x, y) = fwd.transform(180.0, 0.0);
        assert_relative_eq!(x, 20_037_508.342789244, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);

        let inv = Transformer::new(&CRS::web_mercator(), &CRS::wgs84()).unwrap();
        let (mx, my) = fwd.transform(102.5, 18.0);
        let (lon, lat) = inv.transform(mx, my);
        assert_relative_eq!(lon, 102.5, epsilon = 1e-9);
        assert_relative_eq!(lat, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn utm_to_utm_via_geographic() {
        let t = Transformer::new(&CRS::from_epsg(32647), &CRS::from_epsg(32648)).unwrap();
        let to_47 = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32647)).unwrap();
        let to_48 = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(32648)).unwrap();

        let (x47, y47) = to_47.transform(102.0, 19.0);
        let (x48, y48) = to_48.transform(102.0, 19.0);
        let (x, y) = t.transform(x47, y47);
        assert_relative_eq!(x, x48, epsilon = 0.05);
        assert_relative_eq!(y, y48, epsilon = 0.05);
    }

    #[test]
    fn identity_for_equivalent_crs() {
        let t = Transformer::new(&CRS::from_wkt("LOCAL_CS[\"x\"]"), &CRS::from_wkt("LOCAL_CS[\"x\"]")).unwrap();
        assert!(t.is_identity());
        assert_eq!(t.transform(1.5, -2.5), (1.5, -2.5));
    }

    #[test]
    fn unsupported_crs_is_an_error() {
        let err = Transformer::new(&CRS::wgs84(), &CRS::from_epsg(2154)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCrs(ref id) if id == "EPSG:2154"));
    }
}
