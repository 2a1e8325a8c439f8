use byteorder::{BigEndian, WriteBytesExt};
use log::debug;
use std::io::Write;

use super::element::IconElement;
use super::error::{IcnsError, Result};
use super::icontype::IconType;
use super::image::Image;
use super::resize::Interpolation;
use super::select::{nearest_supported_size, resolutions_up_to,
                    smallest_supported_size};

/// The first four bytes of an ICNS file:
pub(crate) const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
pub(crate) const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icons stored in a single ICNS file, largest first.
///
/// Every element's payload is encoded when the family is built, so a
/// family is an immutable value: writing it any number of times (from any
/// number of threads) yields the same bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IconFamily {
    elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Creates an icon family from already-encoded elements, kept in the
    /// given order.
    pub fn from_elements(elements: Vec<IconElement>) -> IconFamily {
        IconFamily { elements }
    }

    /// Builds the icon family for `image`: one element for every supported
    /// resolution up to the largest one the image can fill, each resized
    /// directly from `image` with the given interpolation function.
    /// Returns an error if the image is smaller than the smallest supported
    /// resolution, or if it is large enough on one side but has no pixels.
    pub fn from_image(image: &Image,
                      interpolation: Interpolation)
                      -> Result<IconFamily> {
        let biggest = nearest_supported_size(image.width(), image.height())
            .ok_or_else(|| IcnsError::ImageTooSmall {
                width: image.width(),
                height: image.height(),
                minimum: smallest_supported_size(),
            })?;
        if image.width() == 0 || image.height() == 0 {
            return Err(IcnsError::InvalidInput(format!(
                "cannot encode an empty {}x{} image",
                image.width(),
                image.height()
            )));
        }
        debug!("encoding {}x{} image up to {}px with {} interpolation",
               image.width(),
               image.height(),
               biggest,
               interpolation);
        let mut elements = Vec::new();
        for pixels in resolutions_up_to(biggest) {
            if let Some(icon_type) = IconType::from_pixel_size(pixels) {
                elements.push(IconElement::encode_image_with_type(
                    image,
                    icon_type,
                    interpolation,
                )?);
            }
        }
        Ok(IconFamily { elements })
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the elements of the family, in file order.
    pub fn elements(&self) -> &[IconElement] {
        &self.elements
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> Result<u32> {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length = length.checked_add(element.total_length()?).ok_or_else(
                || IcnsError::InvalidInput("icon family is too large for an \
                                            ICNS file"
                    .to_string()),
            )?;
        }
        Ok(length)
    }

    /// Returns the complete ICNS file: the `icns` magic literal, the
    /// big-endian total length, then each element in order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let total_length = self.total_length()?;
        let mut output = Vec::with_capacity(total_length as usize);
        output.extend_from_slice(ICNS_MAGIC_LITERAL);
        output.write_u32::<BigEndian>(total_length)
            .map_err(IcnsError::Write)?;
        for element in &self.elements {
            output.extend_from_slice(&element.to_bytes()?);
        }
        debug!("encoded {} element(s) into {} bytes",
               self.elements.len(),
               output.len());
        Ok(output)
    }

    /// Writes the icon family to an ICNS file.  A failing writer yields
    /// `IcnsError::Write`; nothing is retried.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let total_length = self.total_length()?;
        writer.write_all(ICNS_MAGIC_LITERAL).map_err(IcnsError::Write)?;
        writer.write_u32::<BigEndian>(total_length)
            .map_err(IcnsError::Write)?;
        for element in &self.elements {
            element.write(writer.by_ref())?;
        }
        writer.flush().map_err(IcnsError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::icontype::OSType;
    use super::super::image::PixelFormat;
    use std::io;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn fake_family() -> IconFamily {
        IconFamily::from_elements(vec![
            IconElement::new(OSType(*b"quux"), b"foobar".to_vec()),
            IconElement::new(OSType(*b"baz!"), b"#".to_vec()),
        ])
    }

    #[test]
    fn write_empty_icon_family() {
        let family = IconFamily::new();
        assert!(family.is_empty());
        assert_eq!(0, family.elements().len());
        let mut output: Vec<u8> = vec![];
        family.write(&mut output).expect("write failed");
        assert_eq!(b"icns\0\0\0\x08", &output as &[u8]);
        assert_eq!(output, family.to_bytes().unwrap());
    }

    #[test]
    fn write_icon_family_with_fake_elements() {
        let family = fake_family();
        let mut output: Vec<u8> = vec![];
        family.write(&mut output).expect("write failed");
        assert_eq!(b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#",
                   &output as &[u8]);
        assert_eq!(family.total_length().unwrap(), 0x1f);
        assert_eq!(output, family.to_bytes().unwrap());
    }

    #[test]
    fn write_failure_is_reported() {
        match fake_family().write(FullDisk) {
            Err(IcnsError::Write(err)) => {
                assert_eq!(err.to_string(), "disk full")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn from_image_emits_descending_resolutions() {
        let image = Image::new(PixelFormat::RGBA, 300, 200);
        let family = IconFamily::from_image(&image, Interpolation::Bilinear)
            .expect("failed to build family");
        let ostypes: Vec<OSType> =
            family.elements().iter().map(|el| el.ostype).collect();
        assert_eq!(ostypes,
                   vec![OSType(*b"ic13"),
                        OSType(*b"ic07"),
                        OSType(*b"ic12"),
                        OSType(*b"ic11")]);
    }

    #[test]
    fn from_image_too_small() {
        let image = Image::new(PixelFormat::RGBA, 31, 16);
        match IconFamily::from_image(&image, Interpolation::default()) {
            Err(IcnsError::ImageTooSmall { width, height, minimum }) => {
                assert_eq!((width, height, minimum), (31, 16, 32));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn from_image_empty() {
        let image = Image::new(PixelFormat::RGBA, 0, 40);
        assert!(matches!(
            IconFamily::from_image(&image, Interpolation::default()),
            Err(IcnsError::InvalidInput(_))
        ));
    }
}
