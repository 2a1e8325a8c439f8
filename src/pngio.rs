use std::io::{self, BufRead, Cursor, Error, ErrorKind, Seek, Write};

use super::image::{Image, PixelFormat, MAX_DECODED_BYTES};

/// The eight-byte signature every PNG stream starts with.
pub(crate) const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

impl Image {
    /// Reads an image from a PNG file.  Returns an error without decoding
    /// any pixel data if the header declares an image too large to hold in
    /// memory.
    pub fn read_png<R: BufRead + Seek>(input: R) -> io::Result<Image> {
        read_png_checked(input, None)
    }

    /// Reads an image from PNG data held in memory.
    pub fn from_png_bytes(data: &[u8]) -> io::Result<Image> {
        Image::read_png(Cursor::new(data))
    }

    /// Reads a `size` by `size` image from PNG data held in memory.  The
    /// header dimensions are checked before any pixel data is decoded.
    pub(crate) fn from_sized_png_bytes(data: &[u8],
                                       size: u32)
                                       -> io::Result<Image> {
        read_png_checked(Cursor::new(data), Some(size))
    }

    /// Writes the image to a PNG file.
    pub fn write_png<W: Write>(&self, output: W) -> io::Result<()> {
        let color_type = match self.format {
            PixelFormat::RGBA => png::ColorType::Rgba,
            PixelFormat::RGB => png::ColorType::Rgb,
            PixelFormat::GrayAlpha => png::ColorType::GrayscaleAlpha,
            PixelFormat::Gray => png::ColorType::Grayscale,
            PixelFormat::Alpha => {
                return self.convert_to(PixelFormat::GrayAlpha)
                    .write_png(output);
            }
        };
        let mut encoder = png::Encoder::new(output, self.width, self.height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        writer.finish()?;
        Ok(())
    }

    /// Encodes the image as PNG data held in memory.
    pub fn to_png_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write_png(&mut output)?;
        Ok(output)
    }
}

fn read_png_checked<R: BufRead + Seek>(input: R,
                                       size: Option<u32>)
                                       -> io::Result<Image> {
    let limits = png::Limits { bytes: MAX_DECODED_BYTES };
    let mut decoder = png::Decoder::new_with_limits(input, limits);
    decoder.set_transformations(png::Transformations::STRIP_16 |
                                png::Transformations::EXPAND);
    let (width, height) = {
        let info = decoder.read_header_info()?;
        (info.width, info.height)
    };
    if let Some(size) = size {
        if width != size || height != size {
            let msg = format!("PNG is {}x{} instead of {}x{}",
                              width,
                              height,
                              size,
                              size);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
    }

    let mut reader = decoder.read_info()?;
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        let msg = format!("unexpected PNG output bit depth {:?}", bit_depth);
        return Err(Error::new(ErrorKind::InvalidData, msg));
    }
    let pixel_format = match color_type {
        png::ColorType::Rgba => PixelFormat::RGBA,
        png::ColorType::Rgb => PixelFormat::RGB,
        png::ColorType::GrayscaleAlpha => PixelFormat::GrayAlpha,
        png::ColorType::Grayscale => PixelFormat::Gray,
        png::ColorType::Indexed => {
            // EXPAND should have removed the palette.
            return Err(Error::new(ErrorKind::InvalidData,
                                  "paletted PNG output"));
        }
    };

    let frame_bytes = pixel_format.checked_data_len(width, height)
        .ok_or_else(|| {
            let msg = format!("{}x{} PNG is too large to decode",
                              width,
                              height);
            Error::new(ErrorKind::InvalidData, msg)
        })?;
    if reader.output_buffer_size() != Some(frame_bytes) {
        return Err(Error::new(ErrorKind::InvalidData,
                              "PNG frame size does not match header"));
    }
    let mut image = Image::new(pixel_format, width, height);
    reader.next_frame(image.data_mut())?;
    reader.finish()?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip() {
        let mut image = Image::new(PixelFormat::RGBA, 3, 2);
        image.data_mut()[5] = 77;
        let bytes = image.to_png_bytes().expect("failed to encode PNG");
        assert!(bytes.starts_with(PNG_SIGNATURE));
        let decoded = Image::from_png_bytes(&bytes).expect("decode failed");
        assert_eq!(decoded, image);
    }

    #[test]
    fn alpha_mask_written_as_gray_alpha() {
        let image = Image::new(PixelFormat::Alpha, 2, 2);
        let bytes = image.to_png_bytes().unwrap();
        let decoded = Image::from_png_bytes(&bytes).unwrap();
        assert_eq!(decoded.pixel_format(), PixelFormat::GrayAlpha);
    }

    fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = !0u32;
        for &byte in bytes {
            crc ^= u32::from(byte);
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (0xedb8_8320 & mask);
            }
        }
        !crc
    }

    fn push_chunk(data: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
        let mut chunk = kind.to_vec();
        chunk.extend_from_slice(body);
        data.extend_from_slice(&(body.len() as u32).to_be_bytes());
        data.extend_from_slice(&chunk);
        data.extend_from_slice(&crc32(&chunk).to_be_bytes());
    }

    // A well-formed RGBA PNG header with an empty image data chunk.
    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr);
        push_chunk(&mut data, b"IDAT", b"");
        push_chunk(&mut data, b"IEND", b"");
        data
    }

    #[test]
    fn sized_png_checks_header_first() {
        let header = png_header(65535, 65535);
        let err = Image::from_sized_png_bytes(&header, 128).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("65535x65535"), "{}", err);
    }

    #[test]
    fn oversized_png_is_rejected() {
        assert!(Image::from_png_bytes(&png_header(65535, 65535)).is_err());
    }

    #[test]
    fn sized_png_round_trip() {
        let image = Image::new(PixelFormat::RGBA, 32, 32);
        let bytes = image.to_png_bytes().unwrap();
        assert_eq!(Image::from_sized_png_bytes(&bytes, 32).unwrap(), image);
        assert!(Image::from_sized_png_bytes(&bytes, 64).is_err());
    }

    #[test]
    fn garbage_is_not_png() {
        assert!(Image::from_png_bytes(b"definitely not a png").is_err());
    }
}
