use std::fmt;
use std::str::FromStr;

/// The icon types this crate reads and writes, one per supported pixel
/// size.  Every type stores a PNG (or, on decode, JPEG 2000) payload.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
}

/// Supported icon types, ordered from the largest pixel size to the
/// smallest.  Pixel sizes are unique and strictly descending.
pub const RESOLUTION_TABLE: [IconType; 6] = [
    IconType::RGBA32_512x512_2x,
    IconType::RGBA32_256x256_2x,
    IconType::RGBA32_128x128_2x,
    IconType::RGBA32_128x128,
    IconType::RGBA32_32x32_2x,
    IconType::RGBA32_16x16_2x,
];

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Get the icon type whose pixel data is exactly `pixels` wide and
    /// tall, if any.
    ///
    /// # Examples
    /// ```
    /// use icnsify::IconType;
    /// assert_eq!(IconType::from_pixel_size(256),
    ///            Some(IconType::RGBA32_128x128_2x));
    /// assert_eq!(IconType::from_pixel_size(100), None);
    /// ```
    pub fn from_pixel_size(pixels: u32) -> Option<IconType> {
        RESOLUTION_TABLE
            .iter()
            .copied()
            .find(|icon_type| icon_type.pixel_width() == pixels)
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
        }
    }

    /// Returns the pixel data width of this icon type.  For 2x "retina"
    /// density icons, this is twice the screen width.
    ///
    /// # Examples
    /// ```
    /// use icnsify::IconType;
    /// assert_eq!(IconType::RGBA32_128x128.pixel_width(), 128);
    /// assert_eq!(IconType::RGBA32_128x128_2x.pixel_width(), 256);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.screen_width() * self.pixel_density()
    }

    /// Returns the pixel data height of this icon type.  Icons are square,
    /// so this always equals [`pixel_width`](#method.pixel_width).
    pub fn pixel_height(self) -> u32 {
        self.pixel_width()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_128x128 => 1,
            _ => 2,
        }
    }

    /// Returns the screen width (and height) of this icon type, in points.
    pub fn screen_width(self) -> u32 {
        match self {
            IconType::RGBA32_16x16_2x => 16,
            IconType::RGBA32_32x32_2x => 32,
            IconType::RGBA32_128x128 => 128,
            IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512_2x => 512,
        }
    }
}

/// Returns the pixel size recorded by the given OSType, or `None` if the
/// OSType is not one of the supported icon types.
pub fn pixels_for_ostype(ostype: OSType) -> Option<u32> {
    IconType::from_ostype(ostype).map(IconType::pixel_width)
}

/// Returns the OSType used for icons `pixels` wide, or `None` if that size
/// is not supported.
pub fn ostype_for_pixels(pixels: u32) -> Option<OSType> {
    IconType::from_pixel_size(pixels).map(IconType::ostype)
}

// Element types that appear in Apple-authored files but carry no image this
// crate decodes.  They share the standard element framing, so a reader can
// step over them by their declared length.
const SKIPPED_OSTYPES: &[&[u8; 4]] = &[
    b"TOC ", b"icnV", b"name", b"info", b"sbtp", b"slct",
    b"ICON", b"ICN#", b"icm#", b"icm4", b"icm8", b"ics#", b"ics4", b"ics8",
    b"is32", b"s8mk", b"icl4", b"icl8", b"il32", b"l8mk", b"ich#", b"ich4",
    b"ich8", b"ih32", b"h8mk", b"it32", b"t8mk", b"icp4", b"icp5", b"icp6",
    b"ic04", b"ic05", b"ic08", b"ic09", b"icsb", b"icsB", b"sb24", b"SB24",
];

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl OSType {
    /// Returns true if elements of this type are known to exist in ICNS
    /// files but hold no image this crate decodes (for example the `TOC `
    /// table of contents or the `icnV` version marker).
    pub fn is_skipped(self) -> bool {
        SKIPPED_OSTYPES.iter().any(|raw| **raw == self.0)
    }
}

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}
