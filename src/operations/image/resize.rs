use image::DynamicImage;
use image::imageops::FilterType;
use log::debug;

/// Resize dimensions so that the larger side equals `max_dimension`, preserving
/// aspect ratio. Dimensions already within bounds are returned unchanged.
pub fn fit_width_height(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = |side: u32, longest: u32| {
        ((side as u64 * max_dimension as u64) / longest as u64).max(1) as u32
    };

    if width >= std::cmp::max(height, max_dimension) {
        (max_dimension, scale(height, width))
    } else if height >= std::cmp::max(width, max_dimension) {
        (scale(width, height), max_dimension)
    } else {
        (width, height)
    }
}

/// Shrink `dynamic_image` to fit within `max_dimension` using Lanczos3.
/// Never upscales.
pub fn resize_to_fit(dynamic_image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (dynamic_image.width(), dynamic_image.height());
    let (new_width, new_height) = fit_width_height(width, height, max_dimension);
    if (new_width, new_height) == (width, height) {
        return dynamic_image;
    }

    let resized = dynamic_image.resize_exact(new_width, new_height, FilterType::Lanczos3);
    debug!(
        "Resized from {}x{} to {}x{}",
        width, height, new_width, new_height
    );
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn landscape_is_bounded_by_width() {
        assert_eq!(fit_width_height(4000, 3000, 1024), (1024, 768));
    }

    #[test]
    fn portrait_is_bounded_by_height() {
        assert_eq!(fit_width_height(3000, 4000, 1024), (768, 1024));
    }

    #[test]
    fn images_within_bounds_are_untouched() {
        assert_eq!(fit_width_height(800, 600, 1024), (800, 600));
        assert_eq!(fit_width_height(1024, 1024, 1024), (1024, 1024));
        assert_eq!(fit_width_height(1, 1, 1024), (1, 1));
    }

    #[test]
    fn extreme_aspect_ratio_keeps_a_pixel() {
        assert_eq!(fit_width_height(20_000, 3, 1024), (1024, 1));
    }

    #[test]
    fn resizing_twice_is_a_no_op() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(1500, 900));
        let once = resize_to_fit(image, 1024);
        assert_eq!((once.width(), once.height()), (1024, 614));
        let twice = resize_to_fit(once, 1024);
        assert_eq!((twice.width(), twice.height()), (1024, 614));
    }
}
