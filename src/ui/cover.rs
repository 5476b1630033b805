use std::path::Path;

use image::{RgbImage, imageops::FilterType};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";

/// A decoded cover image, scaled on demand to the drawing area.
pub struct CoverArt {
    source: RgbImage,
    /// Last scaled copy and the cell area it was made for.
    scaled: Option<(Rect, RgbImage)>,
}

impl CoverArt {
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        Ok(Self::new(image::open(path)?.to_rgb8()))
    }

    pub fn new(source: RgbImage) -> Self {
        Self {
            source,
            scaled: None,
        }
    }

    /// Draw the image letterboxed and centered in `area`, two pixels per cell.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let pixel_area = (u32::from(area.width), u32::from(area.height) * 2);
        let (tw, th) = fit(self.source.dimensions(), pixel_area);
        if tw == 0 || th == 0 {
            return;
        }

        let stale = self.scaled.as_ref().is_none_or(|(r, _)| *r != area);
        if stale {
            let img = image::imageops::resize(&self.source, tw, th, FilterType::Triangle);
            self.scaled = Some((area, img));
        }
        let Some((_, img)) = &self.scaled else {
            return;
        };

        let x0 = (pixel_area.0 - tw) / 2;
        let y0 = (pixel_area.1 - th) / 2;
        let pixel = |x: u32, y: u32| -> Color {
            if x < x0 || y < y0 || x >= x0 + tw || y >= y0 + th {
                return Color::Black;
            }
            let [r, g, b] = img.get_pixel(x - x0, y - y0).0;
            Color::Rgb(r, g, b)
        };

        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (u32::from(col), u32::from(row) * 2);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(pixel(x, y))
                        .set_bg(pixel(x, y + 1));
                }
            }
        }
    }
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
pub fn fit(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (iw, ih) = source;
    let (bw, bh) = bounds;
    if iw == 0 || ih == 0 || bw == 0 || bh == 0 {
        return (0, 0);
    }
    // Compare bw/iw against bh/ih without floating point.
    if u64::from(bw) * u64::from(ih) <= u64::from(bh) * u64::from(iw) {
        let h = (u64::from(ih) * u64::from(bw) / u64::from(iw)) as u32;
        (bw, h.clamp(1, bh))
    } else {
        let w = (u64::from(iw) * u64::from(bh) / u64::from(ih)) as u32;
        (w.clamp(1, bw), bh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn fit_letterboxes_wide_and_tall_images() {
        assert_eq!(fit((100, 100), (40, 20)), (20, 20));
        assert_eq!(fit((200, 100), (40, 40)), (40, 20));
        assert_eq!(fit((100, 400), (40, 40)), (10, 40));
        assert_eq!(fit((0, 10), (40, 40)), (0, 0));
        assert_eq!(fit((1000, 1), (10, 10)), (10, 1));
    }

    #[test]
    fn square_image_is_centered_with_black_bars() {
        let red = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let mut art = CoverArt::new(red);
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);

        art.render(area, &mut buf);

        // 8x4 pixels: the 4x4 image sits in columns 2..6.
        let bar = &buf[(0, 0)];
        assert_eq!(bar.fg, Color::Black);
        assert_eq!(bar.bg, Color::Black);
        let inside = &buf[(3, 1)];
        assert_eq!(inside.symbol(), HALF_BLOCK);
        assert_eq!(inside.fg, Color::Rgb(255, 0, 0));
        assert_eq!(inside.bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(6, 0)].fg, Color::Black);
    }
}
