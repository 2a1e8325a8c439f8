use hayro_jpeg2000::{self, ColorSpace, DecodeSettings};
use std::io::{self, Error, ErrorKind};

use super::image::{Image, PixelFormat};

/// Signature box at the start of a JP2 file.
pub(crate) const JP2_SIGNATURE: &[u8; 12] =
    b"\0\0\0\x0cjP  \r\n\x87\n";

/// Start-of-codestream marker of a raw JPEG 2000 codestream.
pub(crate) const J2K_SIGNATURE: &[u8; 4] = b"\xff\x4f\xff\x51";

/// Returns true if `data` looks like a JP2 file or raw JPEG 2000 codestream.
pub(crate) fn is_jpeg2000(data: &[u8]) -> bool {
    data.starts_with(JP2_SIGNATURE) || data.starts_with(J2K_SIGNATURE)
}

fn invalid_data<E>(error: E) -> Error
    where E: Into<Box<dyn std::error::Error + Send + Sync>>
{
    Error::new(ErrorKind::InvalidData, error)
}

impl Image {
    /// Reads an image from a JPEG 2000 file held in memory.
    pub fn read_jp2(input: &[u8]) -> io::Result<Image> {
        read_jp2_checked(input, None)
    }

    /// Reads a `size` by `size` image from a JPEG 2000 file held in memory.
    /// The header dimensions are checked before the codestream is decoded.
    pub(crate) fn read_sized_jp2(input: &[u8], size: u32) -> io::Result<Image> {
        read_jp2_checked(input, Some(size))
    }
}

fn read_jp2_checked(input: &[u8], size: Option<u32>) -> io::Result<Image> {
    let settings = DecodeSettings {
        resolve_palette_indices: true,
        strict: false,
        target_resolution: None,
    };
    let image = hayro_jpeg2000::Image::new(input, &settings)
        .map_err(|err| invalid_data(err.to_string()))?;
    let (width, height) = (image.width(), image.height());
    if let Some(size) = size {
        if width != size || height != size {
            return Err(invalid_data(format!("JPEG 2000 image is {}x{} \
                                             instead of {}x{}",
                                            width,
                                            height,
                                            size,
                                            size)));
        }
    }

    let pixel_format = match (image.color_space(), image.has_alpha()) {
        (ColorSpace::Gray, true) => PixelFormat::GrayAlpha,
        (ColorSpace::Gray, false) => PixelFormat::Gray,
        (ColorSpace::RGB, true) => PixelFormat::RGBA,
        (ColorSpace::RGB, false) => PixelFormat::RGB,
        (ColorSpace::CMYK, _) => {
            return Err(invalid_data("JPEG 2000 images with CMYK color \
                                     space are not supported"));
        }
        (ColorSpace::Unknown { num_channels }, _) => {
            return Err(invalid_data(format!(
                "JPEG 2000 images with unknown ({}-channel) color space \
                 are not supported",
                num_channels
            )));
        }
        (ColorSpace::Icc { .. }, _) => {
            return Err(invalid_data("JPEG 2000 images with an ICC \
                                     profile are not supported"));
        }
    };
    if pixel_format.checked_data_len(width, height).is_none() {
        return Err(invalid_data(format!("{}x{} JPEG 2000 image is too \
                                         large to decode",
                                        width,
                                        height)));
    }
    let pixels = image.decode()
        .map_err(|err| invalid_data(err.to_string()))?;
    Image::from_data(pixel_format, width, height, pixels)
        .map_err(|err| invalid_data(err.to_string()))
}
