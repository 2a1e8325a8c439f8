//! Detecting and decoding any supported image format from its leading
//! bytes, so callers need not rely on file extensions.

use std::fmt;
use std::io::{Error, ErrorKind};

use super::error::{IcnsError, Result};
use super::family::ICNS_MAGIC_LITERAL;
use super::icontype::OSType;
use super::image::Image;
use super::pngio::PNG_SIGNATURE;
use super::reader::IconReader;

/// Image formats this crate can decode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ImageFormat {
    /// A PNG file.
    Png,
    /// A JP2 file or raw JPEG 2000 codestream.
    #[cfg(feature = "jp2io")]
    Jpeg2000,
    /// An Apple Icon Image file; decodes to its largest image.
    Icns,
}

struct FormatEntry {
    format: ImageFormat,
    name: &'static str,
    matches: fn(&[u8]) -> bool,
    decode: fn(&[u8]) -> Result<Image>,
}

static REGISTERED_FORMATS: &[FormatEntry] = &[
    FormatEntry {
        format: ImageFormat::Icns,
        name: "icns",
        matches: |data| data.starts_with(ICNS_MAGIC_LITERAL),
        decode: |data| IconReader::parse(data)?.decode_largest(),
    },
    FormatEntry {
        format: ImageFormat::Png,
        name: "png",
        matches: |data| data.starts_with(PNG_SIGNATURE),
        decode: |data| {
            Image::from_png_bytes(data)
                .map_err(|err| IcnsError::codec(OSType(*b"png "), err))
        },
    },
    #[cfg(feature = "jp2io")]
    FormatEntry {
        format: ImageFormat::Jpeg2000,
        name: "jpeg2000",
        matches: super::jp2io::is_jpeg2000,
        decode: |data| {
            Image::read_jp2(data)
                .map_err(|err| IcnsError::codec(OSType(*b"jp2 "), err))
        },
    },
];

impl ImageFormat {
    /// Identifies the format of `data` from its leading bytes, or returns
    /// `None` if no supported format matches.
    pub fn detect(data: &[u8]) -> Option<ImageFormat> {
        find_entry(data).map(|entry| entry.format)
    }

    /// Returns the short name of the format (e.g. `"icns"`).
    pub fn name(self) -> &'static str {
        REGISTERED_FORMATS
            .iter()
            .find(|entry| entry.format == self)
            .map_or("unknown", |entry| entry.name)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.name())
    }
}

fn find_entry(data: &[u8]) -> Option<&'static FormatEntry> {
    REGISTERED_FORMATS.iter().find(|entry| (entry.matches)(data))
}

/// Detects the format of `data` and decodes it.  ICNS files decode to their
/// largest image.
pub fn decode(data: &[u8]) -> Result<(ImageFormat, Image)> {
    let entry = find_entry(data).ok_or_else(|| {
        let mut raw = [0u8; 4];
        for (dst, src) in raw.iter_mut().zip(data) {
            *dst = *src;
        }
        IcnsError::codec(OSType(raw),
                         Error::new(ErrorKind::InvalidData,
                                    "unrecognized image format"))
    })?;
    let image = (entry.decode)(data)?;
    Ok((entry.format, image))
}
