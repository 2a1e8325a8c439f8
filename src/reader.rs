//! Parsing of ICNS data held in memory.
//!
//! The whole file is expected to be in memory before parsing starts.
//! Parsing checks the `icns` magic literal and the declared file length,
//! then walks the elements one at a time using each element's declared
//! length.  Every read is checked against both the end of the buffer and
//! the declared file length, so malformed or hostile input produces an
//! error rather than an out-of-bounds read.
//!
//! Element lengths include the eight-byte element header, the same
//! convention the encoder uses and Apple's own tools write.

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};
use std::collections::HashSet;

use super::element::{decode_payload, IconElement, ICON_ELEMENT_HEADER_LENGTH};
use super::error::{IcnsError, Result};
use super::family::{IconFamily, ICNS_MAGIC_LITERAL, ICON_FAMILY_HEADER_LENGTH};
use super::icontype::{IconType, OSType};
use super::image::Image;

/// A bounds-checked read position within an ICNS buffer.
struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let start = self.position;
        let bytes = start
            .checked_add(count)
            .and_then(|end| data.get(start..end))
            .ok_or(IcnsError::Truncated {
                offset: start,
                needed: count,
                available: self.remaining(),
            })?;
        self.position += count;
        Ok(bytes)
    }

    fn read_ostype(&mut self) -> Result<OSType> {
        let bytes = self.take(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(OSType(raw))
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.take(4).map(BigEndian::read_u32)
    }
}

/// One image element found while parsing an ICNS file.  The payload is
/// borrowed from the parsed buffer and only decoded on request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconEntry<'a> {
    icon_type: IconType,
    offset: usize,
    data: &'a [u8],
}

impl<'a> IconEntry<'a> {
    /// Returns the icon type named by the element's OSType.
    pub fn icon_type(&self) -> IconType {
        self.icon_type
    }

    /// Returns the pixel width (and height) of the element's image.
    pub fn pixels(&self) -> u32 {
        self.icon_type.pixel_width()
    }

    /// Returns the offset of the element header from the start of the file.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the element's raw (still encoded) payload.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Decodes the element's PNG or JPEG 2000 payload.
    pub fn decode_image(&self) -> Result<Image> {
        decode_payload(self.icon_type, self.data)
    }
}

/// The image elements of an ICNS file, in file order.
#[derive(Clone, Debug)]
pub struct IconReader<'a> {
    total_length: u32,
    entries: Vec<IconEntry<'a>>,
}

impl<'a> IconReader<'a> {
    /// Parses the ICNS file in `data`.  Elements of supported icon types
    /// are collected; if an icon type appears more than once, the first
    /// element wins.  Known elements without a supported image (such as
    /// the `TOC ` table of contents) are skipped.  Any other element type
    /// is an error, since its length cannot be trusted.
    ///
    /// Bytes after the declared file length are ignored.
    pub fn parse(data: &'a [u8]) -> Result<IconReader<'a>> {
        let mut cursor = ByteCursor::new(data);
        let magic = cursor.read_ostype()?;
        if magic.0 != *ICNS_MAGIC_LITERAL {
            return Err(IcnsError::InvalidMagic(magic.0));
        }
        let total_length = cursor.read_u32()?;
        if total_length < ICON_FAMILY_HEADER_LENGTH {
            return Err(IcnsError::InvalidLength {
                ostype: magic,
                length: total_length,
            });
        }
        let end = total_length as usize;
        let body = data.get(..end).ok_or(IcnsError::Truncated {
            offset: 0,
            needed: end,
            available: data.len(),
        })?;
        let mut cursor = ByteCursor {
            data: body,
            position: cursor.position,
        };

        let mut entries: Vec<IconEntry<'a>> = Vec::new();
        let mut seen: HashSet<IconType> = HashSet::new();
        while cursor.position < end {
            let offset = cursor.position;
            let ostype = cursor.read_ostype()?;
            let icon_type = IconType::from_ostype(ostype);
            if icon_type.is_none() && !ostype.is_skipped() {
                return Err(IcnsError::UnrecognizedElement { ostype, offset });
            }
            let length = cursor.read_u32()?;
            if length < ICON_ELEMENT_HEADER_LENGTH {
                return Err(IcnsError::InvalidLength { ostype, length });
            }
            let payload = cursor
                .take((length - ICON_ELEMENT_HEADER_LENGTH) as usize)?;
            match icon_type {
                Some(icon_type) => {
                    // The first element of each type wins.
                    if !seen.insert(icon_type) {
                        trace!("ignoring duplicate '{}' at offset {}",
                               ostype,
                               offset);
                        continue;
                    }
                    trace!("found '{}' at offset {} ({} byte payload)",
                           ostype,
                           offset,
                           payload.len());
                    entries.push(IconEntry {
                        icon_type,
                        offset,
                        data: payload,
                    });
                }
                None => {
                    trace!("skipping '{}' at offset {} ({} bytes)",
                           ostype,
                           offset,
                           length);
                }
            }
        }
        // Every read is capped at `end`, so the walk stops exactly there.
        debug_assert_eq!(cursor.position, end);
        debug!("parsed {} image element(s) from {} bytes",
               entries.len(),
               total_length);
        Ok(IconReader {
            total_length,
            entries,
        })
    }

    /// Returns the file length declared in the ICNS header.
    pub fn total_length(&self) -> u32 {
        self.total_length
    }

    /// Returns the accepted image elements, in file order.
    pub fn entries(&self) -> &[IconEntry<'a>] {
        &self.entries
    }

    /// Returns the element with the largest pixel size, preferring the
    /// earliest one on ties, or `None` if there are no image elements.
    pub fn largest(&self) -> Option<&IconEntry<'a>> {
        let mut best: Option<&IconEntry<'a>> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.pixels() > b.pixels()) {
                best = Some(entry);
            }
        }
        best
    }

    /// Decodes the largest image in the file.
    pub fn decode_largest(&self) -> Result<Image> {
        self.largest()
            .ok_or(IcnsError::NoImagesFound)?
            .decode_image()
    }

    /// Decodes every image in the file, in file order.  A file with no
    /// image elements yields an empty list.
    pub fn decode_all(&self) -> Result<Vec<Image>> {
        self.entries.iter().map(IconEntry::decode_image).collect()
    }

    /// Copies the accepted image elements into an owned icon family, which
    /// can be written back out as a new ICNS file.
    pub fn to_family(&self) -> IconFamily {
        let elements = self.entries
            .iter()
            .map(|entry| {
                IconElement::new(entry.icon_type.ostype(), entry.data.to_vec())
            })
            .collect();
        IconFamily::from_elements(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_truncated(input: &[u8]) {
        match IconReader::parse(input) {
            Err(IcnsError::Truncated { .. }) => {}
            other => panic!("expected Truncated, got {:?}", other),
        }
    }

    #[test]
    fn read_empty_icon_family() {
        let reader = IconReader::parse(b"icns\0\0\0\x08").expect("parse failed");
        assert_eq!(reader.total_length(), 8);
        assert!(reader.entries().is_empty());
        assert!(reader.largest().is_none());
        assert!(reader.decode_all().unwrap().is_empty());
        assert!(matches!(reader.decode_largest(),
                         Err(IcnsError::NoImagesFound)));
    }

    #[test]
    fn read_elements_by_declared_length() {
        let input = b"icns\0\0\0\x21ic07\0\0\0\x0efoobaric11\0\0\0\x0bxyz";
        let reader = IconReader::parse(input).expect("parse failed");
        let entries = reader.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].icon_type(), IconType::RGBA32_128x128);
        assert_eq!(entries[0].offset(), 8);
        assert_eq!(entries[0].data(), b"foobar");
        assert_eq!(entries[1].icon_type(), IconType::RGBA32_16x16_2x);
        assert_eq!(entries[1].offset(), 22);
        assert_eq!(entries[1].data(), b"xyz");
        assert_eq!(reader.largest().map(|e| e.pixels()), Some(128));
    }

    #[test]
    fn skip_metadata_elements() {
        let input = b"icns\0\0\0\x2cTOC \0\0\0\x10ic07\0\0\0\x09icnV\0\0\0\x0c\
                      \x42\0\0\0ic07\0\0\0\x08";
        let reader = IconReader::parse(input).expect("parse failed");
        assert_eq!(reader.entries().len(), 1);
        assert_eq!(reader.entries()[0].offset(), 36);
        assert!(reader.entries()[0].data().is_empty());
    }

    #[test]
    fn duplicate_types_keep_first() {
        let input = b"icns\0\0\0\x1aic11\0\0\0\x09aic11\0\0\0\x09b";
        let reader = IconReader::parse(input).expect("parse failed");
        assert_eq!(reader.entries().len(), 1);
        assert_eq!(reader.entries()[0].data(), b"a");
    }

    #[test]
    fn interleaved_duplicates_keep_first_of_each_type() {
        let input = b"icns\0\0\0\x2cic11\0\0\0\x09aic12\0\0\0\x09b\
                      ic11\0\0\0\x09cic12\0\0\0\x09d";
        let reader = IconReader::parse(input).expect("parse failed");
        let payloads: Vec<&[u8]> =
            reader.entries().iter().map(|entry| entry.data()).collect();
        assert_eq!(payloads, vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(reader.largest().map(|entry| entry.data()), Some(&b"b"[..]));
    }

    #[test]
    fn bad_magic() {
        match IconReader::parse(b"pngs\0\0\0\x08") {
            Err(IcnsError::InvalidMagic(magic)) => assert_eq!(&magic, b"pngs"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_headers() {
        assert_truncated(b"");
        assert_truncated(b"icn");
        assert_truncated(b"icns\0\0");
        assert_truncated(b"icns\0\0\0\x10");
    }

    #[test]
    fn element_longer_than_file() {
        assert_truncated(b"icns\0\0\0\x12ic07\0\0\0\x0cab");
        assert_truncated(b"icns\0\0\0\x0aic");
        assert_truncated(b"icns\0\0\0\x0eic07\0\0\0\x09x");
    }

    #[test]
    fn element_with_huge_length() {
        assert_truncated(b"icns\0\0\0\x10ic07\xff\xff\xff\xff");
    }

    #[test]
    fn element_length_below_header() {
        match IconReader::parse(b"icns\0\0\0\x10ic07\0\0\0\x04") {
            Err(IcnsError::InvalidLength { ostype, length }) => {
                assert_eq!(ostype, OSType(*b"ic07"));
                assert_eq!(length, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn file_length_below_header() {
        assert!(matches!(IconReader::parse(b"icns\0\0\0\x04"),
                         Err(IcnsError::InvalidLength { .. })));
    }

    #[test]
    fn unrecognized_element() {
        let input = b"icns\0\0\0\x0equux\0\0\0\x0e";
        match IconReader::parse(input) {
            Err(IcnsError::UnrecognizedElement { ostype, offset }) => {
                assert_eq!(ostype, OSType(*b"quux"));
                assert_eq!(offset, 8);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let reader = IconReader::parse(b"icns\0\0\0\x08garbage").unwrap();
        assert!(reader.entries().is_empty());
    }

    #[test]
    fn to_family_round_trip() {
        let input: &[u8] = b"icns\0\0\0\x21ic07\0\0\0\x0efoobaric11\0\0\0\x0bxyz";
        let family = IconReader::parse(input).unwrap().to_family();
        assert_eq!(family.to_bytes().unwrap(), input.to_vec());
    }
}
