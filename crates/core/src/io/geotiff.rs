//! Native GeoTIFF reading/writing built on the `tiff` crate.
//!
//! Georeferencing is limited to what the exclusion workflow needs:
//! ModelPixelScale + ModelTiepoint for the transform, the GeoKeyDirectory
//! EPSG code for the CRS and GDAL_NODATA for the no-data value.

use super::check_writable;
use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::{ColorType, Gray32Float, Gray8};
use tiff::encoder::{TiffEncoder, TiffValue};
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

/// Sample format used when encoding a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// 32-bit IEEE float
    #[default]
    Float32,
    /// 8-bit unsigned integer (masks, class rasters)
    UInt8,
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    pub sample_format: SampleFormat,
    /// Replace an existing file instead of failing with `OutputExists`
    pub overwrite: bool,
}

impl GeoTiffOptions {
    pub fn uint8() -> Self {
        Self {
            sample_format: SampleFormat::UInt8,
            ..Self::default()
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// A single band kept in the sample type it is stored with.
///
/// Class and flag rasters are usually 8 or 16 bit, so reading them at their
/// own width instead of as `f64` keeps memory at the file's footprint.
/// 64-bit integer samples are widened to `f64`.
#[derive(Debug, Clone)]
pub enum AnyRaster {
    U8(Raster<u8>),
    U16(Raster<u16>),
    U32(Raster<u32>),
    I8(Raster<i8>),
    I16(Raster<i16>),
    I32(Raster<i32>),
    F32(Raster<f32>),
    F64(Raster<f64>),
}

impl AnyRaster {
    /// Stored sample type, for logs
    pub fn sample_type(&self) -> &'static str {
        match self {
            AnyRaster::U8(_) => "u8",
            AnyRaster::U16(_) => "u16",
            AnyRaster::U32(_) => "u32",
            AnyRaster::I8(_) => "i8",
            AnyRaster::I16(_) => "i16",
            AnyRaster::I32(_) => "i32",
            AnyRaster::F32(_) => "f32",
            AnyRaster::F64(_) => "f64",
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            AnyRaster::U8(r) => r.shape(),
            AnyRaster::U16(r) => r.shape(),
            AnyRaster::U32(r) => r.shape(),
            AnyRaster::I8(r) => r.shape(),
            AnyRaster::I16(r) => r.shape(),
            AnyRaster::I32(r) => r.shape(),
            AnyRaster::F32(r) => r.shape(),
            AnyRaster::F64(r) => r.shape(),
        }
    }
}

/// Read a GeoTIFF file into a Raster
///
/// `band` is 1-indexed and selects one sample of a pixel-interleaved image;
/// defaults to the first.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file, band)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band)
}

/// Read one band of a GeoTIFF file without converting its samples
pub fn read_geotiff_native<P: AsRef<Path>>(path: P, band: Option<usize>) -> Result<AnyRaster> {
    let file = File::open(path.as_ref())?;
    decode_native(file, band)
}

/// Georeferencing read from the tags of the first image
struct Header {
    rows: usize,
    cols: usize,
    transform: Option<GeoTransform>,
    crs: Option<CRS>,
    nodata: Option<f64>,
}

fn decode<R: Read + Seek>(reader: R) -> Result<(Header, DecodingResult)> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let header = Header {
        rows: height as usize,
        cols: width as usize,
        transform: read_geotransform(&mut decoder),
        crs: read_crs(&mut decoder),
        nodata: read_nodata(&mut decoder),
    };

    let image = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;
    Ok((header, image))
}

fn decode_geotiff<T, R>(reader: R, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let (header, image) = decode(reader)?;
    match image {
        DecodingResult::U8(buf) => band_raster(buf, &header, band),
        DecodingResult::U16(buf) => band_raster(buf, &header, band),
        DecodingResult::U32(buf) => band_raster(buf, &header, band),
        DecodingResult::U64(buf) => band_raster(buf, &header, band),
        DecodingResult::I8(buf) => band_raster(buf, &header, band),
        DecodingResult::I16(buf) => band_raster(buf, &header, band),
        DecodingResult::I32(buf) => band_raster(buf, &header, band),
        DecodingResult::I64(buf) => band_raster(buf, &header, band),
        DecodingResult::F32(buf) => band_raster(buf, &header, band),
        DecodingResult::F64(buf) => band_raster(buf, &header, band),
        #[allow(unreachable_patterns)]
        _ => Err(unsupported()),
    }
}

fn decode_native<R: Read + Seek>(reader: R, band: Option<usize>) -> Result<AnyRaster> {
    let (header, image) = decode(reader)?;
    Ok(match image {
        DecodingResult::U8(buf) => AnyRaster::U8(band_raster(buf, &header, band)?),
        DecodingResult::U16(buf) => AnyRaster::U16(band_raster(buf, &header, band)?),
        DecodingResult::U32(buf) => AnyRaster::U32(band_raster(buf, &header, band)?),
        DecodingResult::U64(buf) => AnyRaster::F64(band_raster(buf, &header, band)?),
        DecodingResult::I8(buf) => AnyRaster::I8(band_raster(buf, &header, band)?),
        DecodingResult::I16(buf) => AnyRaster::I16(band_raster(buf, &header, band)?),
        DecodingResult::I32(buf) => AnyRaster::I32(band_raster(buf, &header, band)?),
        DecodingResult::I64(buf) => AnyRaster::F64(band_raster(buf, &header, band)?),
        DecodingResult::F32(buf) => AnyRaster::F32(band_raster(buf, &header, band)?),
        DecodingResult::F64(buf) => AnyRaster::F64(band_raster(buf, &header, band)?),
        #[allow(unreachable_patterns)]
        _ => return Err(unsupported()),
    })
}

fn unsupported() -> Error {
    Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())
}

/// Pick `band` out of the decoded samples and cast it to `T`
fn band_raster<S, T>(buf: Vec<S>, header: &Header, band: Option<usize>) -> Result<Raster<T>>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    let (rows, cols) = (header.rows, header.cols);
    let cells = rows * cols;
    if cells == 0 || buf.len() % cells != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let samples = buf.len() / cells;
    let band_idx = band.unwrap_or(1);
    if band_idx == 0 || band_idx > samples {
        return Err(Error::InvalidParameter {
            name: "band",
            value: band_idx.to_string(),
            reason: format!("image has {} band(s)", samples),
        });
    }

    let cast = |v: S| num_traits::cast(v).unwrap_or(T::default_nodata());
    let data: Vec<T> = if samples == 1 {
        buf.into_iter().map(cast).collect()
    } else {
        buf.into_iter().skip(band_idx - 1).step_by(samples).map(cast).collect()
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;
    if let Some(transform) = header.transform {
        raster.set_transform(transform);
    }
    raster.set_crs(header.crs.clone());
    raster.set_nodata(header.nodata.and_then(num_traits::cast));
    Ok(raster)
}

fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(tag(MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(tag(MODEL_TIEPOINT)).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

/// EPSG code from ProjectedCSTypeGeoKey, falling back to GeographicTypeGeoKey
fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let keys = decoder.get_tag_u16_vec(tag(GEO_KEY_DIRECTORY)).ok()?;
    let header = keys.get(..4)?;
    let count = header[3] as usize;

    let lookup = |wanted: u16| {
        keys[4..]
            .chunks_exact(4)
            .take(count)
            // location 0 means the value is stored inline
            .find(|entry| entry[0] == wanted && entry[1] == 0)
            .map(|entry| entry[3])
            // 32767 is "user-defined"
            .filter(|&code| code != 0 && code != 32767)
    };

    lookup(PROJECTED_CS_TYPE_KEY)
        .or_else(|| lookup(GEOGRAPHIC_TYPE_KEY))
        .map(|code| CRS::from_epsg(code as u32))
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(tag(GDAL_NODATA)).ok()?;
    text.trim_matches(char::from(0)).trim().parse().ok()
}

/// Write a Raster to a GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let options = options.unwrap_or_default();
    let path = path.as_ref();
    check_writable(path, options.overwrite)?;

    let file = BufWriter::new(File::create(path)?);
    encode_geotiff(raster, file, &options)
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    match options.sample_format {
        SampleFormat::Float32 => {
            let data: Vec<f32> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
                .collect();
            write_image::<Gray32Float, _, _>(&mut encoder, raster, &data)
        }
        SampleFormat::UInt8 => {
            let data: Vec<u8> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(u8::MAX))
                .collect();
            write_image::<Gray8, _, _>(&mut encoder, raster, &data)
        }
    }
}

fn write_image<C, T, W>(encoder: &mut TiffEncoder<W>, raster: &Raster<T>, data: &[C::Inner]) -> Result<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
    T: RasterElement,
    W: Write + Seek,
{
    let tag_err = |what: &str| {
        let what = what.to_string();
        move |e: tiff::TiffError| Error::Other(format!("Cannot write {} tag: {}", what, e))
    };

    let (rows, cols) = raster.shape();
    let mut image = encoder
        .new_image::<C>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(tag(MODEL_PIXEL_SCALE), &scale[..])
        .map_err(tag_err("scale"))?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(tag(MODEL_TIEPOINT), &tiepoint[..])
        .map_err(tag_err("tiepoint"))?;

    let geokeys = geokey_directory(raster.crs());
    image
        .encoder()
        .write_tag(tag(GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(tag_err("geokey"))?;

    if let Some(nodata) = raster.nodata().and_then(RasterElement::to_f64) {
        let text = format!("{}", nodata);
        image
            .encoder()
            .write_tag(tag(GDAL_NODATA), text.as_str())
            .map_err(tag_err("nodata"))?;
    }

    image
        .write_data(data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

/// GeoKeyDirectory entries: model type, raster-is-area and the EPSG code
/// when it fits a GeoKey short.
fn geokey_directory(crs: Option<&CRS>) -> Vec<u16> {
    let epsg = crs.and_then(CRS::epsg).and_then(|c| u16::try_from(c).ok());

    // GTModelType: 1 = projected, 2 = geographic
    let (model, crs_key) = match epsg {
        Some(4326) => (2, Some((GEOGRAPHIC_TYPE_KEY, 4326))),
        Some(code) => (1, Some((PROJECTED_CS_TYPE_KEY, code))),
        None => (1, None),
    };

    let mut entries = vec![[GT_MODEL_TYPE_KEY, 0, 1, model], [GT_RASTER_TYPE_KEY, 0, 1, 1]];
    if let Some((key, code)) = crs_key {
        entries.push([key, 0, 1, code]);
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.into_iter().flatten());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mask() -> Raster<u8> {
        let mut raster = Raster::from_vec(vec![100, 0, 255, 100, 100, 0], 2, 3)
            .unwrap()
            .with_georef(
                GeoTransform::new(500_000.0, 2_000_000.0, 100.0, -100.0),
                Some(CRS::from_epsg(32648)),
            );
        raster.set_nodata(Some(255));
        raster
    }

    #[test]
    fn uint8_roundtrip_keeps_georeferencing() {
        let buf = write_geotiff_to_buffer(&mask(), Some(GeoTiffOptions::uint8())).unwrap();
        let back: Raster<u8> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.data(), mask().data());
        assert_eq!(back.transform(), mask().transform());
        assert_eq!(back.crs().and_then(CRS::epsg), Some(32648));
        assert_eq!(back.nodata(), Some(255));
    }

    #[test]
    fn float_roundtrip_geographic_crs() {
        let mut raster: Raster<f64> = Raster::filled(3, 3, 1.5)
            .with_georef(GeoTransform::new(100.0, 20.0, 0.01, -0.01), Some(CRS::wgs84()));
        raster.set(1, 1, -3.25).unwrap();

        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(back.get(1, 1).unwrap(), -3.25);
        assert_eq!(back.crs().and_then(CRS::epsg), Some(4326));
        assert_eq!(back.nodata(), None);
    }

    #[test]
    fn write_refuses_existing_file_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mask.tif");

        write_geotiff(&mask(), &path, Some(GeoTiffOptions::uint8())).unwrap();
        let err = write_geotiff(&mask(), &path, Some(GeoTiffOptions::uint8())).unwrap_err();
        assert!(matches!(err, Error::OutputExists(_)));

        write_geotiff(&mask(), &path, Some(GeoTiffOptions::uint8().overwrite(true))).unwrap();
        let back: Raster<u8> = read_geotiff(&path, None).unwrap();
        assert_eq!(back.count(100), 3);
    }

    #[test]
    fn missing_band_is_rejected() {
        let buf = write_geotiff_to_buffer(&mask(), Some(GeoTiffOptions::uint8())).unwrap();
        let err = read_geotiff_from_buffer::<u8>(&buf, Some(2)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "band", .. }));
    }

    #[test]
    fn native_read_keeps_stored_sample_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clc.tif");
        write_geotiff(&mask(), &path, Some(GeoTiffOptions::uint8())).unwrap();

        match read_geotiff_native(&path, None).unwrap() {
            AnyRaster::U8(back) => {
                assert_eq!(back.data(), mask().data());
                assert_eq!(back.nodata(), Some(255));
                assert_eq!(back.crs().and_then(CRS::epsg), Some(32648));
            }
            other => panic!("expected u8 samples, got {}", other.sample_type()),
        }

        let path = dir.path().join("slope.tif");
        let slope: Raster<f64> = Raster::filled(2, 2, 6.5);
        write_geotiff(&slope, &path, None).unwrap();
        let back = read_geotiff_native(&path, None).unwrap();
        assert_eq!(back.sample_type(), "f32");
        assert_eq!(back.shape(), (2, 2));
    }
}
