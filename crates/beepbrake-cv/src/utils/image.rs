//! Detector-private frame copy and smoothing

use beepbrake_core::Size;
use image::GrayImage;

/// Side of the square smoothing kernel
pub const BLUR_KERNEL: usize = 5;

/// Frame dimensions as a signed pixel size
pub fn frame_size(frame: &GrayImage) -> Size {
    let (width, height) = frame.dimensions();
    Size::new(
        i32::try_from(width).unwrap_or(i32::MAX),
        i32::try_from(height).unwrap_or(i32::MAX),
    )
}

/// Reused copy of the current frame plus scratch space for the blur
///
/// Both buffers keep their allocation between frames and only grow or
/// shrink when the incoming frame has different dimensions.
#[derive(Debug, Default)]
pub struct WorkingBuffer {
    image: Option<GrayImage>,
    row_sums: Vec<u16>,
}

impl WorkingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last prepared image, if any frame was accepted yet
    pub fn image(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    /// Copy `frame` in and smooth the copy in place
    pub fn prepare(&mut self, frame: &GrayImage) -> &GrayImage {
        self.copy_from(frame);
        self.blur();
        // copy_from always leaves an image behind
        self.image.get_or_insert_with(|| GrayImage::new(0, 0))
    }

    fn copy_from(&mut self, frame: &GrayImage) {
        match &mut self.image {
            Some(image) if image.dimensions() == frame.dimensions() => {
                image.copy_from_slice(frame.as_raw());
            }
            slot => *slot = Some(frame.clone()),
        }
    }

    /// Normalized 5x5 box filter, separable, with reflected borders
    fn blur(&mut self) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width == 0 || height == 0 {
            return;
        }

        self.row_sums.resize(width * height, 0);
        let radius = (BLUR_KERNEL / 2) as isize;
        let pixels: &mut [u8] = image;

        for y in 0..height {
            let row = &pixels[y * width..(y + 1) * width];
            for x in 0..width {
                let mut sum = 0u16;
                for dx in -radius..=radius {
                    sum += u16::from(row[reflect(x as isize + dx, width)]);
                }
                self.row_sums[y * width + x] = sum;
            }
        }

        let area = (BLUR_KERNEL * BLUR_KERNEL) as u16;
        for y in 0..height {
            for x in 0..width {
                let mut sum = 0u16;
                for dy in -radius..=radius {
                    sum += self.row_sums[reflect(y as isize + dy, height) * width + x];
                }
                pixels[y * width + x] = ((sum + area / 2) / area) as u8;
            }
        }
    }
}

/// Mirror an out-of-range index around the edge pixel (`cb|abcd|cb`)
fn reflect(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }

    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }
    i as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 5), 1);
        assert_eq!(reflect(-2, 5), 2);
        assert_eq!(reflect(5, 5), 3);
        assert_eq!(reflect(6, 5), 2);
        assert_eq!(reflect(2, 5), 2);
        assert_eq!(reflect(-2, 2), 0);
        assert_eq!(reflect(3, 1), 0);
    }

    #[test]
    fn test_uniform_frame_unchanged() {
        let frame = GrayImage::from_pixel(16, 9, Luma([77]));
        let mut buffer = WorkingBuffer::new();

        assert_eq!(buffer.prepare(&frame), &frame);
    }

    #[test]
    fn test_single_bright_pixel_spreads() {
        let mut frame = GrayImage::new(9, 9);
        frame.put_pixel(4, 4, Luma([250]));
        let mut buffer = WorkingBuffer::new();

        let blurred = buffer.prepare(&frame);

        // 250 / 25 = 10 over the whole 5x5 neighbourhood
        assert_eq!(blurred.get_pixel(4, 4)[0], 10);
        assert_eq!(blurred.get_pixel(2, 6)[0], 10);
        assert_eq!(blurred.get_pixel(1, 4)[0], 0);
        assert_eq!(blurred.get_pixel(4, 7)[0], 0);
    }

    #[test]
    fn test_reuses_allocation_for_same_dimensions() {
        let mut buffer = WorkingBuffer::new();
        buffer.prepare(&GrayImage::from_pixel(8, 8, Luma([1])));
        let before = buffer.image().map(|image| image.as_raw().as_ptr());

        buffer.prepare(&GrayImage::from_pixel(8, 8, Luma([2])));
        let after = buffer.image().map(|image| image.as_raw().as_ptr());

        assert_eq!(before, after);
        assert_eq!(buffer.image().map(|image| image.get_pixel(3, 3)[0]), Some(2));
    }

    #[test]
    fn test_follows_new_dimensions() {
        let mut buffer = WorkingBuffer::new();
        buffer.prepare(&GrayImage::new(8, 8));
        buffer.prepare(&GrayImage::new(3, 12));

        assert_eq!(buffer.image().map(|image| image.dimensions()), Some((3, 12)));
    }

    #[test]
    fn test_frame_size() {
        assert_eq!(frame_size(&GrayImage::new(640, 480)), Size::new(640, 480));
    }
}
