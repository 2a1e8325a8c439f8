//! Image resampling used to produce each icon resolution.
//!
//! `Interpolation` is the closed set of algorithms callers may choose; each
//! maps onto a `fast_image_resize` algorithm.  Lanczos with a = 2 has no
//! built-in filter there, so it is supplied as a custom convolution filter.

use fast_image_resize::images::Image as PixelBuffer;
use fast_image_resize::{Filter, FilterType, PixelType, ResizeAlg,
                        ResizeOptions, Resizer};
use log::trace;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::error::{IcnsError, Result};
use super::image::{Image, PixelFormat};

/// The resampling algorithm used when resizing the source image to each
/// icon resolution.  Variants are listed from fastest to slowest.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Interpolation {
    /// Nearest-neighbor interpolation.
    #[default]
    NearestNeighbor,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic interpolation (Catmull-Rom cubic spline).
    Bicubic,
    /// Mitchell-Netravali interpolation (B = C = 1/3).
    MitchellNetravali,
    /// Lanczos interpolation with a = 2.
    Lanczos2,
    /// Lanczos interpolation with a = 3.
    Lanczos3,
}

impl Interpolation {
    /// All interpolation functions, from fastest to slowest.
    pub const ALL: [Interpolation; 6] = [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
        Interpolation::MitchellNetravali,
        Interpolation::Lanczos2,
        Interpolation::Lanczos3,
    ];

    /// Returns the radius of this function's kernel, in source pixels, when
    /// the image is not being shrunk.
    pub fn support(self) -> f64 {
        match self {
            Interpolation::NearestNeighbor => 0.5,
            Interpolation::Bilinear => 1.0,
            Interpolation::Bicubic => 2.0,
            Interpolation::MitchellNetravali => 2.0,
            Interpolation::Lanczos2 => 2.0,
            Interpolation::Lanczos3 => 3.0,
        }
    }

    /// Returns the short name of this function, as accepted by `from_str`.
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::NearestNeighbor => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "bicubic",
            Interpolation::MitchellNetravali => "mitchell",
            Interpolation::Lanczos2 => "lanczos2",
            Interpolation::Lanczos3 => "lanczos3",
        }
    }

    fn resize_alg(self) -> Result<ResizeAlg> {
        let filter = match self {
            Interpolation::NearestNeighbor => return Ok(ResizeAlg::Nearest),
            Interpolation::Bilinear => FilterType::Bilinear,
            Interpolation::Bicubic => FilterType::CatmullRom,
            Interpolation::MitchellNetravali => FilterType::Mitchell,
            Interpolation::Lanczos2 => {
                let filter = Filter::new("lanczos2", lanczos2, self.support())
                    .map_err(|err| {
                        IcnsError::InvalidInput(format!("bad resize filter: \
                                                         {}",
                                                        err))
                    })?;
                FilterType::Custom(filter)
            }
            Interpolation::Lanczos3 => FilterType::Lanczos3,
        };
        Ok(ResizeAlg::Convolution(filter))
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = String;

    /// Parses a function name (e.g. `lanczos3`, `mitchell-netravali`) or a
    /// quality level from `0` (nearest neighbor) to `5` (Lanczos a=3).
    fn from_str(input: &str) -> std::result::Result<Interpolation, String> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let interpolation = match normalized.as_str() {
            "0" | "nearest" | "nearestneighbor" => {
                Interpolation::NearestNeighbor
            }
            "1" | "bilinear" => Interpolation::Bilinear,
            "2" | "bicubic" => Interpolation::Bicubic,
            "3" | "mitchell" | "mitchellnetravali" => {
                Interpolation::MitchellNetravali
            }
            "4" | "lanczos2" => Interpolation::Lanczos2,
            "5" | "lanczos3" => Interpolation::Lanczos3,
            _ => {
                return Err(format!("unknown interpolation function '{}'",
                                   input))
            }
        };
        Ok(interpolation)
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn lanczos2(x: f64) -> f64 {
    if x.abs() < 2.0 { sinc(x) * sinc(x / 2.0) } else { 0.0 }
}

/// Resizes `image` to exactly `width` by `height` pixels, without
/// preserving the aspect ratio.  The result is always in RGBA format.
/// Returns an error if either the source or the target has a zero
/// dimension.
pub fn resize(image: &Image,
              width: u32,
              height: u32,
              interpolation: Interpolation)
              -> Result<Image> {
    if image.width() == 0 || image.height() == 0 {
        return Err(IcnsError::InvalidInput(format!(
            "cannot resize an empty {}x{} image",
            image.width(),
            image.height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(IcnsError::InvalidInput(format!(
            "cannot resize to an empty {}x{} image",
            width, height
        )));
    }
    let rgba = image.convert_to(PixelFormat::RGBA);
    if rgba.width() == width && rgba.height() == height {
        return Ok(rgba);
    }
    trace!("resizing {}x{} to {}x{} ({})",
           rgba.width(),
           rgba.height(),
           width,
           height,
           interpolation);
    let src = PixelBuffer::from_vec_u8(rgba.width(),
                                       rgba.height(),
                                       rgba.data.into_vec(),
                                       PixelType::U8x4)
        .map_err(|err| IcnsError::InvalidInput(err.to_string()))?;
    let mut dst = PixelBuffer::new(width, height, PixelType::U8x4);
    let options = ResizeOptions::new().resize_alg(interpolation.resize_alg()?);
    Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|err| IcnsError::InvalidInput(err.to_string()))?;
    Image::from_data(PixelFormat::RGBA, width, height, dst.into_vec())
}
