//! Cell value types

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// A numeric type a [`Raster`](crate::Raster) can hold.
///
/// Integers mark nodata by an exact value. Floats also treat NaN as nodata
/// and match a declared nodata within a small tolerance, since GDAL writes
/// it back as decimal text.
pub trait RasterElement:
    Copy + Debug + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Value written for nodata when none is declared
    fn default_nodata() -> Self;

    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Lossless widening where possible; `None` when the value has no f64 form
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! integer_element {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MAX
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata == Some(*self)
            }
        }
    )*};
}

macro_rules! float_element {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                self.is_nan() || nodata.map_or(false, |nd| (self - nd).abs() < <$t>::EPSILON * 100.0)
            }
        }
    )*};
}

integer_element!(i8, i16, i32, u8, u16, u32);
float_element!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_nodata_is_exact() {
        assert!(255u8.is_nodata(Some(255)));
        assert!(!254u8.is_nodata(Some(255)));
        assert!(!255u8.is_nodata(None));
    }

    #[test]
    fn float_nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!((-9999.0f32).is_nodata(Some(-9999.0)));
        assert!(!0.5f64.is_nodata(Some(-9999.0)));
    }
}
