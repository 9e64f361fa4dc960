//! Point shapefile writer (`.shp`, `.shx`, `.dbf`, `.prj`)
//!
//! Implements the subset of the ESRI Shapefile Technical Description needed
//! for point placements: shape type 1 records and a dBASE III table with a
//! single numeric `ID` field.

use super::check_writable;
use crate::crs::CRS;
use crate::error::{Error, Result};
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use chrono::Datelike;
use geo_types::Point;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const SHAPE_POINT: i32 = 1;
const HEADER_BYTES: usize = 100;
/// Record header (8) + shape type (4) + x, y (16)
const POINT_RECORD_BYTES: usize = 28;
const POINT_CONTENT_WORDS: i32 = 10;

const ID_FIELD: &[u8] = b"ID";
const ID_WIDTH: usize = 10;

/// Write `points` as a point shapefile at `path` (its `.shp` member).
///
/// All sidecars are derived from `path` by swapping the extension. When
/// `overwrite` is false and the `.shp` already exists, returns
/// `Error::OutputExists`; when true, every sidecar is replaced. The `.prj`
/// is written only when a WKT is known for `crs`.
pub fn write_point_shapefile<P: AsRef<Path>>(
    path: P,
    points: &[Point<f64>],
    crs: Option<&CRS>,
    overwrite: bool,
) -> Result<()> {
    let shp_path = path.as_ref().with_extension("shp");
    check_writable(&shp_path, overwrite)?;

    if points.len() > 99_999_999 {
        return Err(Error::InvalidParameter {
            name: "points",
            value: points.len().to_string(),
            reason: "exceeds the shapefile record limit".to_string(),
        });
    }

    let sidecar = |ext: &str| -> PathBuf { shp_path.with_extension(ext) };

    let bbox = bounding_box(points);

    let mut shp = BufWriter::new(File::create(&shp_path)?);
    let shp_words = (HEADER_BYTES + POINT_RECORD_BYTES * points.len()) / 2;
    write_header(&mut shp, shp_words, bbox)?;
    for (i, p) in points.iter().enumerate() {
        shp.write_i32::<BigEndian>(i as i32 + 1)?;
        shp.write_i32::<BigEndian>(POINT_CONTENT_WORDS)?;
        shp.write_i32::<LittleEndian>(SHAPE_POINT)?;
        shp.write_f64::<LittleEndian>(p.x())?;
        shp.write_f64::<LittleEndian>(p.y())?;
    }
    shp.flush()?;

    let mut shx = BufWriter::new(File::create(sidecar("shx"))?);
    let shx_words = (HEADER_BYTES + 8 * points.len()) / 2;
    write_header(&mut shx, shx_words, bbox)?;
    for i in 0..points.len() {
        let offset_words = (HEADER_BYTES + POINT_RECORD_BYTES * i) / 2;
        shx.write_i32::<BigEndian>(offset_words as i32)?;
        shx.write_i32::<BigEndian>(POINT_CONTENT_WORDS)?;
    }
    shx.flush()?;

    let mut dbf = BufWriter::new(File::create(sidecar("dbf"))?);
    write_dbf(&mut dbf, points.len())?;
    dbf.flush()?;

    let prj_path = sidecar("prj");
    match crs.and_then(CRS::esri_wkt) {
        Some(wkt) => std::fs::write(&prj_path, wkt)?,
        None if prj_path.exists() => std::fs::remove_file(&prj_path)?,
        None => {}
    }

    Ok(())
}

fn bounding_box(points: &[Point<f64>]) -> [f64; 4] {
    if points.is_empty() {
        return [0.0; 4];
    }
    points.iter().fold(
        [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY],
        |[min_x, min_y, max_x, max_y], p| {
            [min_x.min(p.x()), min_y.min(p.y()), max_x.max(p.x()), max_y.max(p.y())]
        },
    )
}

/// Shared 100-byte header of `.shp` and `.shx`
fn write_header<W: Write>(w: &mut W, length_words: usize, bbox: [f64; 4]) -> Result<()> {
    w.write_i32::<BigEndian>(FILE_CODE)?;
    for _ in 0..5 {
        w.write_i32::<BigEndian>(0)?;
    }
    w.write_i32::<BigEndian>(length_words as i32)?;
    w.write_i32::<LittleEndian>(VERSION)?;
    w.write_i32::<LittleEndian>(SHAPE_POINT)?;
    for v in bbox {
        w.write_f64::<LittleEndian>(v)?;
    }
    // Z and M ranges are unused for 2D points
    for _ in 0..4 {
        w.write_f64::<LittleEndian>(0.0)?;
    }
    Ok(())
}

/// dBASE III table with one `ID` numeric field holding 1..=n
fn write_dbf<W: Write>(w: &mut W, records: usize) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let header_len = 32 + 32 + 1;
    let record_len = 1 + ID_WIDTH;

    w.write_u8(0x03)?;
    w.write_u8((today.year() - 1900).clamp(0, 255) as u8)?;
    w.write_u8(today.month() as u8)?;
    w.write_u8(today.day() as u8)?;
    w.write_u32::<LittleEndian>(records as u32)?;
    w.write_u16::<LittleEndian>(header_len as u16)?;
    w.write_u16::<LittleEndian>(record_len as u16)?;
    w.write_all(&[0u8; 20])?;

    // Field descriptor
    let mut name = [0u8; 11];
    name[..ID_FIELD.len()].copy_from_slice(ID_FIELD);
    w.write_all(&name)?;
    w.write_u8(b'N')?;
    w.write_all(&[0u8; 4])?;
    w.write_u8(ID_WIDTH as u8)?;
    w.write_u8(0)?;
    w.write_all(&[0u8; 14])?;
    w.write_u8(0x0D)?;

    for i in 0..records {
        w.write_u8(b' ')?;
        write!(w, "{:>width$}", i + 1, width = ID_WIDTH)?;
    }
    w.write_u8(0x1A)?;
    Ok(())
}
