use super::error::{IcnsError, Result};

/// The largest pixel buffer a decoder will allocate for one image, in bytes.
pub(crate) const MAX_DECODED_BYTES: usize = 1 << 28;

/// A decoded raster image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub(crate) format: PixelFormat,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Image {
        let data_bytes = format.data_len(width, height);
        Image {
            format,
            width,
            height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Creates an image from existing pixel data.  Returns an error if the
    /// length of `data` does not match the format and dimensions.
    pub fn from_data(format: PixelFormat,
                     width: u32,
                     height: u32,
                     data: Vec<u8>)
                     -> Result<Image> {
        let expected = format.data_len(width, height);
        if data.len() != expected {
            let msg = format!("pixel data has {} bytes, but a {}x{} {:?} \
                               image needs {}",
                              data.len(),
                              width,
                              height,
                              format,
                              expected);
            return Err(IcnsError::InvalidInput(msg));
        }
        Ok(Image {
            format,
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    /// Creates a copy of this image stored in the given pixel format.
    /// Channels that the source lacks are filled in (opaque alpha, or gray
    /// copied into each color channel); dropped channels are discarded, with
    /// color reduced to gray by averaging.
    pub fn convert_to(&self, format: PixelFormat) -> Image {
        if self.format == format {
            return self.clone();
        }
        let src_channels = self.format.channels();
        let dst_channels = format.channels();
        let mut data = Vec::with_capacity(format.data_len(self.width,
                                                          self.height));
        for pixel in self.data.chunks_exact(src_channels) {
            let [r, g, b, a] = self.format.to_rgba_pixel(pixel);
            format.push_rgba_pixel([r, g, b, a], &mut data);
        }
        debug_assert_eq!(data.len() % dst_channels, 0);
        Image {
            format,
            width: self.width,
            height: self.height,
            data: data.into_boxed_slice(),
        }
    }

    /// Returns the format in which this image's pixel data is stored.
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// A format for storing pixel data in an image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit color with alpha channel.
    RGBA,
    /// 24-bit color with no alpha.
    RGB,
    /// 16-bit grayscale-with-alpha.
    GrayAlpha,
    /// 8-bit grayscale with no alpha.
    Gray,
    /// 8-bit alpha mask with no color.
    Alpha,
}

impl PixelFormat {
    /// Returns the number of 8-bit channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::RGB => 3,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Gray | PixelFormat::Alpha => 1,
        }
    }

    fn data_len(self, width: u32, height: u32) -> usize {
        self.channels() * (width as usize) * (height as usize)
    }

    /// Returns the size of a `width` by `height` pixel buffer in this
    /// format, or `None` if it would exceed the decoder allocation limit.
    pub(crate) fn checked_data_len(self,
                                   width: u32,
                                   height: u32)
                                   -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(self.channels()))
            .filter(|&bytes| bytes <= MAX_DECODED_BYTES)
    }

    fn to_rgba_pixel(self, pixel: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::RGBA => [pixel[0], pixel[1], pixel[2], pixel[3]],
            PixelFormat::RGB => [pixel[0], pixel[1], pixel[2], u8::MAX],
            PixelFormat::GrayAlpha => [pixel[0], pixel[0], pixel[0], pixel[1]],
            PixelFormat::Gray => [pixel[0], pixel[0], pixel[0], u8::MAX],
            PixelFormat::Alpha => [0, 0, 0, pixel[0]],
        }
    }

    fn push_rgba_pixel(self, [r, g, b, a]: [u8; 4], out: &mut Vec<u8>) {
        let gray = ((r as u32 + g as u32 + b as u32) / 3) as u8;
        match self {
            PixelFormat::RGBA => out.extend_from_slice(&[r, g, b, a]),
            PixelFormat::RGB => out.extend_from_slice(&[r, g, b]),
            PixelFormat::GrayAlpha => out.extend_from_slice(&[gray, a]),
            PixelFormat::Gray => out.push(gray),
            PixelFormat::Alpha => out.push(a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_data_checks_length() {
        assert!(Image::from_data(PixelFormat::RGB, 2, 2, vec![0; 12]).is_ok());
        match Image::from_data(PixelFormat::RGBA, 2, 2, vec![0; 12]) {
            Err(IcnsError::InvalidInput(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn checked_data_len_caps_allocations() {
        assert_eq!(PixelFormat::RGBA.checked_data_len(1024, 1024),
                   Some(4 << 20));
        assert_eq!(PixelFormat::RGBA.checked_data_len(65535, 65535), None);
        assert_eq!(PixelFormat::Gray.checked_data_len(u32::MAX, u32::MAX),
                   None);
    }

    #[test]
    fn convert_rgb_to_rgba() {
        let image = Image::from_data(PixelFormat::RGB, 1, 1, vec![1, 2, 3])
            .unwrap();
        let rgba = image.convert_to(PixelFormat::RGBA);
        assert_eq!(rgba.pixel_format(), PixelFormat::RGBA);
        assert_eq!(rgba.data(), &[1, 2, 3, 255]);
    }

    #[test]
    fn convert_gray_alpha_to_rgba_and_back() {
        let image =
            Image::from_data(PixelFormat::GrayAlpha, 1, 1, vec![90, 7])
                .unwrap();
        let rgba = image.convert_to(PixelFormat::RGBA);
        assert_eq!(rgba.data(), &[90, 90, 90, 7]);
        assert_eq!(rgba.convert_to(PixelFormat::GrayAlpha), image);
    }

    #[test]
    fn convert_alpha_mask() {
        let image = Image::from_data(PixelFormat::Alpha, 2, 1, vec![0, 200])
            .unwrap();
        let gray_alpha = image.convert_to(PixelFormat::GrayAlpha);
        assert_eq!(gray_alpha.data(), &[0, 0, 0, 200]);
    }
}
