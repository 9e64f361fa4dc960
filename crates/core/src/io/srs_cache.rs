//! Cached spatial reference per country, stored as a Python pickle.
//!
//! The cache holds either an integer EPSG code or an identifier string such
//! as `"EPSG:32648"`.

use crate::crs::CRS;
use crate::error::{Error, Result};
use serde_pickle::{DeOptions, SerOptions, Value};
use std::path::Path;

/// Load the cached spatial reference at `path`.
///
/// A missing or undecodable cache is `Error::SrsCache`.
pub fn load_srs<P: AsRef<Path>>(path: P) -> Result<CRS> {
    let path = path.as_ref();
    let cache_err = |reason: String| Error::SrsCache {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| cache_err(e.to_string()))?;
    let value = serde_pickle::value_from_slice(&bytes, DeOptions::new())
        .map_err(|e| cache_err(e.to_string()))?;

    match value {
        Value::I64(code) => u32::try_from(code)
            .map(CRS::from_epsg)
            .map_err(|_| cache_err(format!("EPSG code {} out of range", code))),
        Value::String(s) => CRS::parse(&s).map_err(|e| cache_err(e.to_string())),
        Value::Bytes(b) => {
            let s = String::from_utf8_lossy(&b);
            CRS::parse(&s).map_err(|e| cache_err(e.to_string()))
        }
        other => Err(cache_err(format!("expected an EPSG code, found {:?}", other))),
    }
}

/// Store the EPSG code of `crs` at `path` as a pickled integer.
pub fn store_srs<P: AsRef<Path>>(path: P, crs: &CRS) -> Result<()> {
    let code = crs
        .epsg()
        .ok_or_else(|| Error::UnsupportedCrs(crs.identifier()))?;

    let bytes = serde_pickle::to_vec(&code, SerOptions::new())
        .map_err(|e| Error::Other(format!("Cannot encode pickle: {}", e)))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn integer_cache_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Laos_EPSG.pkl");

        store_srs(&path, &CRS::from_epsg(32648)).unwrap();
        assert_eq!(load_srs(&path).unwrap().epsg(), Some(32648));
    }

    #[test]
    fn python_protocol_4_int() {
        // pickle.dumps(32648, protocol=4)
        let bytes = [
            0x80, 0x04, 0x95, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, b'M', 0x88, 0x7f, b'.',
        ];
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Laos_EPSG.pkl");
        std::fs::write(&path, bytes).unwrap();

        assert_eq!(load_srs(&path).unwrap().epsg(), Some(32648));
    }

    #[test]
    fn string_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Laos_EPSG.pkl");
        let bytes = serde_pickle::to_vec(&"EPSG:32648", SerOptions::new()).unwrap();
        std::fs::write(&path, bytes).unwrap();

        assert_eq!(load_srs(&path).unwrap().epsg(), Some(32648));
    }

    #[test]
    fn missing_cache_is_an_srs_cache_error() {
        let dir = TempDir::new().unwrap();
        let err = load_srs(dir.path().join("Nowhere_EPSG.pkl")).unwrap_err();
        assert!(matches!(err, Error::SrsCache { .. }));
    }

    #[test]
    fn garbage_cache_is_an_srs_cache_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Laos_EPSG.pkl");
        std::fs::write(&path, b"not a pickle").unwrap();
        assert!(matches!(load_srs(&path), Err(Error::SrsCache { .. })));
    }
}
