//! Library for converting raster images into Apple Icon Image (.icns) files,
//! and for reading the images back out of them.
//!
//! Encoding picks the largest supported icon resolution the source image
//! can fill (judged by its larger side), then stores a PNG of the source
//! resized to that resolution and to every smaller supported one.  Each
//! resolution is resized directly from the source image.  Supported
//! resolutions, all stored at "retina" density:
//!
//! | Pixels | OSType |
//! |--------|--------|
//! | 1024   | `ic10` |
//! | 512    | `ic14` |
//! | 256    | `ic13` |
//! | 128    | `ic07` |
//! | 64     | `ic12` |
//! | 32     | `ic11` |
//!
//! Decoding works on a complete in-memory buffer.  Callers should bound
//! the input size before decoding; the only limit the format imposes is
//! its 32-bit length field.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.
//!
//! # Examples
//! ```
//! use icnsify::{Image, Interpolation, PixelFormat};
//!
//! let image = Image::new(PixelFormat::RGBA, 300, 300);
//! let icns = icnsify::encode_with_interpolation(&image,
//!                                               Interpolation::Bilinear)
//!     .unwrap();
//! let largest = icnsify::decode_largest(&icns).unwrap();
//! assert_eq!((largest.width(), largest.height()), (256, 256));
//! assert_eq!(icnsify::decode_all(&icns).unwrap().len(), 4);
//! ```

#![warn(missing_docs)]

use std::io::{Read, Write};

mod element;
mod error;
mod family;
pub mod format;
mod icontype;
mod image;
#[cfg(feature = "jp2io")]
mod jp2io;
mod pngio;
mod reader;
mod resize;
mod select;

pub use element::{encode_record, IconElement};
pub use error::{IcnsError, Result};
pub use family::IconFamily;
pub use format::ImageFormat;
pub use icontype::{ostype_for_pixels, pixels_for_ostype, IconType, OSType,
                   RESOLUTION_TABLE};
pub use image::{Image, PixelFormat};
pub use reader::{IconEntry, IconReader};
pub use resize::{resize, Interpolation};
pub use select::{nearest_supported_size, resolutions_up_to,
                 smallest_supported_size};

/// Encodes `image` as an ICNS file, resizing with nearest-neighbor
/// interpolation.  Non-square images are stretched to square.
pub fn encode(image: &Image) -> Result<Vec<u8>> {
    encode_with_interpolation(image, Interpolation::default())
}

/// Encodes `image` as an ICNS file, resizing with the given interpolation
/// function.
pub fn encode_with_interpolation(image: &Image,
                                 interpolation: Interpolation)
                                 -> Result<Vec<u8>> {
    IconFamily::from_image(image, interpolation)?.to_bytes()
}

/// Encodes `image` as an ICNS file and writes it to `writer`.  Nothing is
/// written if encoding fails.
pub fn encode_to<W: Write>(writer: W,
                           image: &Image,
                           interpolation: Interpolation)
                           -> Result<()> {
    IconFamily::from_image(image, interpolation)?.write(writer)
}

/// Decodes the largest image stored in an ICNS file.
pub fn decode_largest(data: &[u8]) -> Result<Image> {
    IconReader::parse(data)?.decode_largest()
}

/// Decodes every image stored in an ICNS file, in file order.
pub fn decode_all(data: &[u8]) -> Result<Vec<Image>> {
    IconReader::parse(data)?.decode_all()
}

/// Reads a complete ICNS file from `reader` and decodes its largest image.
pub fn read_largest<R: Read>(reader: R) -> Result<Image> {
    decode_largest(&read_to_end(reader)?)
}

/// Reads a complete ICNS file from `reader` and decodes every image in it.
pub fn read_all<R: Read>(reader: R) -> Result<Vec<Image>> {
    decode_all(&read_to_end(reader)?)
}

fn read_to_end<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(IcnsError::Read)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn encode_empty_image_is_invalid_input() {
        let image = Image::new(PixelFormat::RGBA, 40, 0);
        assert!(matches!(encode(&image), Err(IcnsError::InvalidInput(_))));
    }

    #[test]
    fn encode_to_writer_matches_encode() {
        let image = Image::new(PixelFormat::Gray, 70, 20);
        let mut output = Vec::new();
        encode_to(&mut output, &image, Interpolation::NearestNeighbor)
            .expect("encode_to failed");
        assert_eq!(output, encode(&image).unwrap());
    }

    #[test]
    fn read_failure_is_reported() {
        assert!(matches!(read_largest(BrokenPipe), Err(IcnsError::Read(_))));
        assert!(matches!(read_all(BrokenPipe), Err(IcnsError::Read(_))));
    }

    #[test]
    fn read_from_reader() {
        let image = Image::new(PixelFormat::RGB, 64, 64);
        let icns = encode(&image).unwrap();
        let largest = read_largest(io::Cursor::new(&icns)).unwrap();
        assert_eq!(largest.width(), 64);
        assert_eq!(read_all(&icns[..]).unwrap().len(), 2);
    }
}
