use crate::detector::FaceBox;

/// Multiplier applied to the larger face dimension to keep shoulders and hair in frame.
pub const EXPAND_FACTOR: f64 = 2.5;

/// Pixel dimensions of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Square region within the source image.
///
/// Always lies inside the image. A `size` of 0 means the planner could not
/// fit any pixels and the region must not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

impl CropRegion {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Center of the region in source pixels.
    pub fn center(&self) -> (f64, f64) {
        let half = f64::from(self.size) / 2.0;
        (f64::from(self.left) + half, f64::from(self.top) + half)
    }
}

/// Rounds halves toward positive infinity, so -2.5 becomes -2 and 2.5 becomes 3.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Plan a square crop centered on `face`, expanded by `expand_factor` and
/// clamped to the image.
///
/// When the expanded square does not fit it is first clipped to the image,
/// then shrunk to the shorter clipped side and re-centered inside the clipped
/// rectangle. Degenerate faces produce an empty region instead of an error.
pub fn plan_crop(face: &FaceBox, image: ImageDimensions, expand_factor: f64) -> CropRegion {
    let expanded = (face.width.max(face.height) * expand_factor).floor().max(0.0) as i64;

    let center_x = face.x + face.width / 2.0;
    let center_y = face.y + face.height / 2.0;

    let image_width = i64::from(image.width);
    let image_height = i64::from(image.height);

    let mut left = round_half_up(center_x - expanded as f64 / 2.0).max(0);
    let mut top = round_half_up(center_y - expanded as f64 / 2.0).max(0);

    let right = image_width.min(left + expanded);
    let bottom = image_height.min(top + expanded);

    // A face entirely past the right or bottom edge leaves nothing to keep.
    let crop_width = (right - left).max(0);
    let crop_height = (bottom - top).max(0);
    let size = crop_width.min(crop_height);

    left += (crop_width - size) / 2;
    top += (crop_height - size) / 2;

    CropRegion {
        left: left.min(image_width - size) as u32,
        top: top.min(image_height - size) as u32,
        size: size as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: f64, y: f64, width: f64, height: f64) -> FaceBox {
        FaceBox {
            x,
            y,
            width,
            height,
        }
    }

    fn dims(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions { width, height }
    }

    fn assert_within(region: CropRegion, image: ImageDimensions) {
        assert!(region.left + region.size <= image.width, "{region:?} overflows {image:?}");
        assert!(region.top + region.size <= image.height, "{region:?} overflows {image:?}");
    }

    #[test]
    fn centered_face_keeps_full_expanded_square() {
        // 100px face centered at (500, 400); 2.5x -> 250px square
        let region = plan_crop(&face(450.0, 350.0, 100.0, 100.0), dims(1000, 800), EXPAND_FACTOR);
        assert_eq!(
            region,
            CropRegion {
                left: 375,
                top: 275,
                size: 250
            }
        );
        assert_eq!(region.center(), (500.0, 400.0));
    }

    #[test]
    fn uses_larger_face_dimension() {
        let region = plan_crop(&face(100.0, 100.0, 40.0, 80.0), dims(1000, 1000), EXPAND_FACTOR);
        assert_eq!(region.size, 200);
        // center (120, 140) -> left 20, top 40
        assert_eq!((region.left, region.top), (20, 40));
    }

    #[test]
    fn expanded_size_is_floored() {
        // 33 * 2.5 = 82.5 -> 82
        let region = plan_crop(&face(200.0, 200.0, 33.0, 33.0), dims(1000, 1000), EXPAND_FACTOR);
        assert_eq!(region.size, 82);
    }

    #[test]
    fn oversized_crop_falls_back_to_whole_image() {
        let image = dims(5, 5);
        let region = plan_crop(&face(0.0, 0.0, 10.0, 10.0), image, EXPAND_FACTOR);
        assert_eq!(
            region,
            CropRegion {
                left: 0,
                top: 0,
                size: 5
            }
        );
    }

    #[test]
    fn oversized_crop_on_wide_image_takes_shorter_side() {
        // expanded 500 on a 300x200 image: clipped to 300x200, squared to 200,
        // re-centered horizontally by (300 - 200) / 2
        let image = dims(300, 200);
        let region = plan_crop(&face(100.0, 50.0, 200.0, 100.0), image, EXPAND_FACTOR);
        assert_eq!(
            region,
            CropRegion {
                left: 50,
                top: 0,
                size: 200
            }
        );
        assert_within(region, image);
    }

    #[test]
    fn face_near_top_left_is_clamped() {
        let image = dims(640, 480);
        let region = plan_crop(&face(10.0, 5.0, 60.0, 60.0), image, EXPAND_FACTOR);
        // expanded 150, raw top-left (-35, -40) clamped to (0, 0)
        assert_eq!(
            region,
            CropRegion {
                left: 0,
                top: 0,
                size: 150
            }
        );
    }

    #[test]
    fn face_near_bottom_right_shrinks_square() {
        let image = dims(640, 480);
        let region = plan_crop(&face(580.0, 440.0, 40.0, 40.0), image, EXPAND_FACTOR);
        // expanded 100, left 550 top 410 -> clipped to 90x70 -> size 70,
        // left shifted by (90 - 70) / 2
        assert_eq!(
            region,
            CropRegion {
                left: 560,
                top: 410,
                size: 70
            }
        );
        assert_within(region, image);
    }

    #[test]
    fn half_pixel_offsets_round_up() {
        // center 50, expanded 25 -> 37.5 rounds to 38
        let region = plan_crop(&face(45.0, 45.0, 10.0, 10.0), dims(200, 200), EXPAND_FACTOR);
        assert_eq!((region.left, region.top), (38, 38));
    }

    #[test]
    fn zero_expanded_size_is_empty_not_rounded_up() {
        let region = plan_crop(&face(10.0, 10.0, 0.2, 0.2), dims(100, 100), EXPAND_FACTOR);
        assert_eq!(region.size, 0);
        assert!(region.is_empty());
    }

    #[test]
    fn face_outside_image_yields_empty_region_inside_bounds() {
        let image = dims(100, 100);
        let region = plan_crop(&face(400.0, 20.0, 30.0, 30.0), image, EXPAND_FACTOR);
        assert!(region.is_empty());
        assert_within(region, image);
    }

    #[test]
    fn planning_is_deterministic() {
        let f = face(123.4, 56.7, 89.1, 77.7);
        let image = dims(333, 444);
        assert_eq!(plan_crop(&f, image, 2.5), plan_crop(&f, image, 2.5));
    }

    #[test]
    fn regions_stay_square_and_bounded_across_inputs() {
        let images = [dims(1, 1), dims(5, 5), dims(64, 480), dims(640, 48), dims(1024, 768)];
        let factors = [0.5, 1.0, 2.5, 7.0];
        for image in images {
            for &factor in &factors {
                for x in (0..1100).step_by(97) {
                    for y in (0..800).step_by(83) {
                        for size in [1.0, 7.0, 33.0, 150.0, 900.0] {
                            let f = face(x as f64, y as f64, size, size * 1.3);
                            let region = plan_crop(&f, image, factor);
                            assert_within(region, image);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn unclamped_crop_is_centered_on_face() {
        let image = dims(2000, 2000);
        for (x, y, w, h) in [(500.0, 600.0, 101.0, 99.0), (800.5, 700.25, 64.0, 80.0), (900.0, 900.0, 3.0, 3.0)] {
            let f = face(x, y, w, h);
            let region = plan_crop(&f, image, EXPAND_FACTOR);
            let (cx, cy) = region.center();
            assert!((cx - (x + w / 2.0)).abs() <= 1.0, "x center drifted for {f:?}: {region:?}");
            assert!((cy - (y + h / 2.0)).abs() <= 1.0, "y center drifted for {f:?}: {region:?}");
        }
    }
}
