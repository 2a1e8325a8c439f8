//! Chooses which icon resolutions a source image is encoded at.

use super::icontype::RESOLUTION_TABLE;

/// Returns the smallest pixel size any supported icon type has.
pub fn smallest_supported_size() -> u32 {
    RESOLUTION_TABLE
        .iter()
        .map(|icon_type| icon_type.pixel_width())
        .min()
        .unwrap_or(0)
}

/// Returns the largest supported pixel size that an image of the given
/// dimensions can fill, judged by its larger side.  An image that exactly
/// matches a supported size selects that size.  Returns `None` if the image
/// is smaller than every supported size.
///
/// # Examples
/// ```
/// use icnsify::nearest_supported_size;
/// assert_eq!(nearest_supported_size(100, 100), Some(64));
/// assert_eq!(nearest_supported_size(256, 40), Some(256));
/// assert_eq!(nearest_supported_size(16, 16), None);
/// ```
pub fn nearest_supported_size(width: u32, height: u32) -> Option<u32> {
    let side = width.max(height);
    RESOLUTION_TABLE
        .iter()
        .map(|icon_type| icon_type.pixel_width())
        .find(|&pixels| side >= pixels)
}

/// Returns every supported pixel size no larger than `max_pixels`, largest
/// first.
pub fn resolutions_up_to(max_pixels: u32) -> Vec<u32> {
    RESOLUTION_TABLE
        .iter()
        .map(|icon_type| icon_type.pixel_width())
        .filter(|&pixels| pixels <= max_pixels)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_size() {
        assert_eq!(nearest_supported_size(100, 100), Some(64));
        assert_eq!(nearest_supported_size(256, 256), Some(256));
        assert_eq!(nearest_supported_size(1024, 1024), Some(1024));
        assert_eq!(nearest_supported_size(16, 16), None);
        assert_eq!(nearest_supported_size(33, 33), Some(32));
        assert_eq!(nearest_supported_size(0, 0), None);
    }

    #[test]
    fn nearest_size_uses_larger_side() {
        assert_eq!(nearest_supported_size(50, 100), Some(64));
        assert_eq!(nearest_supported_size(100, 50), Some(64));
        assert_eq!(nearest_supported_size(0, 32), Some(32));
        assert_eq!(nearest_supported_size(17, 77), Some(64));
        assert_eq!(nearest_supported_size(u32::MAX, 1), Some(1024));
    }

    #[test]
    fn resolutions() {
        assert_eq!(resolutions_up_to(100), vec![64, 32]);
        assert_eq!(resolutions_up_to(99999),
                   vec![1024, 512, 256, 128, 64, 32]);
        assert_eq!(resolutions_up_to(128), vec![128, 64, 32]);
        assert_eq!(resolutions_up_to(31), Vec::<u32>::new());
        assert_eq!(resolutions_up_to(0), Vec::<u32>::new());
    }

    #[test]
    fn smallest_size() {
        assert_eq!(smallest_supported_size(), 32);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn selected_size_fits_within_larger_side(w in 0u32..4096,
                                                 h in 0u32..4096) {
            match nearest_supported_size(w, h) {
                Some(pixels) => {
                    prop_assert!(pixels <= w.max(h));
                    prop_assert_eq!(resolutions_up_to(w.max(h))[0], pixels);
                }
                None => prop_assert!(w.max(h) < smallest_supported_size()),
            }
        }
    }
}
