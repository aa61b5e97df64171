use std::collections::VecDeque;

use image::{DynamicImage, Rgba, RgbaImage};

use super::{BackgroundRemover, RemoverError};

/// Removes a roughly uniform backdrop.
///
/// The backdrop colour is the per-channel median of the border pixels. Pixels
/// connected to the border whose colour stays within `tolerance` of it (largest
/// channel difference) become fully transparent. Matching pixels enclosed by the
/// subject are kept.
#[derive(Clone, Debug)]
pub struct ColorKeyRemover {
    tolerance: u8,
}

impl ColorKeyRemover {
    pub fn new(tolerance: u8) -> Self {
        ColorKeyRemover { tolerance }
    }

    fn backdrop(image: &RgbaImage) -> Rgba<u8> {
        let (w, h) = image.dimensions();
        let mut channels: [Vec<u8>; 3] = Default::default();
        for (x, y, px) in image.enumerate_pixels() {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                for (c, values) in channels.iter_mut().enumerate() {
                    values.push(px[c]);
                }
            }
        }
        let mut median = [0u8; 3];
        for (c, values) in channels.iter_mut().enumerate() {
            values.sort_unstable();
            median[c] = values[values.len() / 2];
        }
        Rgba([median[0], median[1], median[2], u8::MAX])
    }

    fn matches(&self, px: &Rgba<u8>, backdrop: &Rgba<u8>) -> bool {
        if px[3] == 0 {
            return true;
        }
        (0..3).all(|c| px[c].abs_diff(backdrop[c]) <= self.tolerance)
    }
}

impl Default for ColorKeyRemover {
    fn default() -> Self {
        ColorKeyRemover::new(32)
    }
}

impl BackgroundRemover for ColorKeyRemover {
    fn remove_background(&self, image: DynamicImage) -> Result<RgbaImage, RemoverError> {
        let mut rgba = image.into_rgba8();
        let (w, h) = rgba.dimensions();
        if w == 0 || h == 0 {
            return Err(RemoverError::EmptyImage);
        }
        let backdrop = Self::backdrop(&rgba);

        let mut visited = vec![false; (w as usize) * (h as usize)];
        let mut queue = VecDeque::new();
        let index = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;

        for x in 0..w {
            queue.push_back((x, 0));
            queue.push_back((x, h - 1));
        }
        for y in 0..h {
            queue.push_back((0, y));
            queue.push_back((w - 1, y));
        }

        while let Some((x, y)) = queue.pop_front() {
            let i = index(x, y);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if !self.matches(rgba.get_pixel(x, y), &backdrop) {
                continue;
            }
            rgba.get_pixel_mut(x, y)[3] = 0;

            if x > 0 {
                queue.push_back((x - 1, y));
            }
            if y > 0 {
                queue.push_back((x, y - 1));
            }
            if x + 1 < w {
                queue.push_back((x + 1, y));
            }
            if y + 1 < h {
                queue.push_back((x, y + 1));
            }
        }

        Ok(rgba)
    }
}
