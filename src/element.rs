use byteorder::{BigEndian, WriteBytesExt};
use log::trace;
use std::io::{self, Error, ErrorKind, Write};

use super::error::{IcnsError, Result};
use super::icontype::{IconType, OSType};
use super::image::Image;
use super::pngio::PNG_SIGNATURE;
use super::resize::{resize, Interpolation};

/// The length of an icon element header, in bytes:
pub(crate) const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file: an OSType and the raster data payload stored
/// under it.  The payload is fixed when the element is built, so writing
/// the same element twice produces identical bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct IconElement {
    /// The OSType for this element (e.g. `ic07` or `ic10`).
    pub ostype: OSType,
    /// The raw data payload for this element.
    pub data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Resizes `image` to the pixel size of `icon_type` and encodes the
    /// result as a PNG payload.  Non-square images are stretched to fill
    /// the square icon.
    pub fn encode_image_with_type(image: &Image,
                                  icon_type: IconType,
                                  interpolation: Interpolation)
                                  -> Result<IconElement> {
        let ostype = icon_type.ostype();
        let pixels = icon_type.pixel_width();
        let resized = resize(image, pixels, pixels, interpolation)?;
        let data = resized
            .to_png_bytes()
            .map_err(|err| IcnsError::codec(ostype, err))?;
        trace!("encoded {} ({}x{}) as {} bytes of PNG",
               ostype,
               pixels,
               pixels,
               data.len());
        Ok(IconElement::new(ostype, data))
    }

    /// Decodes the icon element into an image.  Returns an error if this
    /// element does not represent an icon type supported by this library, or
    /// if the data is malformed.
    pub fn decode_image(&self) -> Result<Image> {
        let icon_type = self.icon_type().ok_or_else(|| {
            let msg = format!("unsupported OSType: {}", self.ostype);
            IcnsError::codec(self.ostype,
                             Error::new(ErrorKind::InvalidInput, msg))
        })?;
        decode_payload(icon_type, &self.data)
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> Result<u32> {
        record_length(self.ostype, self.data.len())
    }

    /// Returns the element as it is laid out within an ICNS file: the
    /// OSType, the big-endian total length, then the payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_record(self.ostype, &self.data)
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let total_length = self.total_length()?;
        write_header(&mut writer, self.ostype, total_length)
            .and_then(|()| writer.write_all(&self.data))
            .map_err(IcnsError::Write)
    }
}

/// Frames `payload` as an ICNS element: four OSType bytes, then a
/// big-endian length covering the eight header bytes plus the payload,
/// then the payload itself.
pub fn encode_record(ostype: OSType, payload: &[u8]) -> Result<Vec<u8>> {
    let total_length = record_length(ostype, payload.len())?;
    let mut output = Vec::with_capacity(total_length as usize);
    write_header(&mut output, ostype, total_length)
        .map_err(IcnsError::Write)?;
    output.extend_from_slice(payload);
    Ok(output)
}

fn record_length(ostype: OSType, payload_length: usize) -> Result<u32> {
    u32::try_from(payload_length)
        .ok()
        .and_then(|length| length.checked_add(ICON_ELEMENT_HEADER_LENGTH))
        .ok_or_else(|| {
            IcnsError::InvalidInput(format!("'{}' payload of {} bytes is too \
                                             large for an ICNS element",
                                            ostype,
                                            payload_length))
        })
}

fn write_header<W: Write>(writer: &mut W,
                          ostype: OSType,
                          total_length: u32)
                          -> io::Result<()> {
    let OSType(ref raw_ostype) = ostype;
    writer.write_all(raw_ostype)?;
    writer.write_u32::<BigEndian>(total_length)
}

/// Decodes a PNG or JPEG 2000 element payload.  The payload's declared
/// dimensions must match the icon type; this is checked before any pixel
/// data is decoded.
pub(crate) fn decode_payload(icon_type: IconType, data: &[u8]) -> Result<Image> {
    let size = icon_type.pixel_width();
    if data.starts_with(PNG_SIGNATURE) {
        Image::from_sized_png_bytes(data, size)
    } else {
        decode_other_payload(data, size)
    }
    .map_err(|err| IcnsError::codec(icon_type.ostype(), err))
}

#[cfg(feature = "jp2io")]
fn decode_other_payload(data: &[u8], size: u32) -> io::Result<Image> {
    if super::jp2io::is_jpeg2000(data) {
        Image::read_sized_jp2(data, size)
    } else {
        Err(Error::new(ErrorKind::InvalidData,
                       "payload is neither PNG nor JPEG 2000 data"))
    }
}

#[cfg(not(feature = "jp2io"))]
fn decode_other_payload(_data: &[u8], _size: u32) -> io::Result<Image> {
    Err(Error::new(ErrorKind::InvalidData, "payload is not PNG data"))
}
