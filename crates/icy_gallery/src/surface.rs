//! Drawing target abstraction.
//!
//! The gallery paints through [`Surface`] so it can run inside any host toolkit. [`RgbaSurface`] is the
//! software implementation used by the demo and the tests.

use std::path::Path;

use image::{ImageFormat, Pixel, Rgba, RgbaImage};

use crate::error::{GalleryError, Result};
use crate::geometry::{Point, Rect, Size};

pub trait Surface {
    fn size(&self) -> Size;

    /// Fills `rect`, blending when `color` is translucent
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Draws a `width` px border inside `rect`
    fn stroke_rect(&mut self, rect: Rect, width: i32, color: Rgba<u8>) {
        if rect.is_empty() || width <= 0 {
            return;
        }
        let w = width.min(rect.width / 2 + 1).min(rect.height / 2 + 1);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, w), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - w, rect.width, w), color);
        let inner_h = rect.height - 2 * w;
        if inner_h > 0 {
            self.fill_rect(Rect::new(rect.x, rect.y + w, w, inner_h), color);
            self.fill_rect(Rect::new(rect.right() - w, rect.y + w, w, inner_h), color);
        }
    }

    /// Draws `image` with its top left corner at `pos`, alpha blended
    fn draw_image(&mut self, pos: Point, image: &RgbaImage);

    /// Draws a single line of text, clipped to `clip`
    fn draw_text(&mut self, pos: Point, text: &str, color: Rgba<u8>, clip: Rect);
}

/// Text drawn on an [`RgbaSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub pos: Point,
    pub text: String,
    pub color: Rgba<u8>,
    pub clip: Rect,
}

/// Software surface over an RGBA buffer.
///
/// Text is not rasterized, font rendering belongs to the host. Runs are recorded and can be inspected
/// with [`RgbaSurface::labels`].
pub struct RgbaSurface {
    image: RgbaImage,
    labels: Vec<TextRun>,
}

impl RgbaSurface {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(GalleryError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: RgbaImage::new(width as u32, height as u32),
            labels: Vec::new(),
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn labels(&self) -> &[TextRun] {
        &self.labels
    }

    pub fn pixel(&self, p: Point) -> Option<Rgba<u8>> {
        if !self.bounds().contains(p) {
            return None;
        }
        Some(*self.image.get_pixel(p.x as u32, p.y as u32))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        log::info!("[RgbaSurface] wrote {}x{} to {}", self.image.width(), self.image.height(), path.display());
        Ok(())
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.image.width() as i32, self.image.height() as i32)
    }

    fn blend_at(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        match color.0[3] {
            0 => {}
            255 => *pixel = color,
            _ => pixel.blend(&color),
        }
    }
}

impl Surface for RgbaSurface {
    fn size(&self) -> Size {
        self.bounds().size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some(clipped) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.blend_at(x, y, color);
            }
        }
    }

    fn draw_image(&mut self, pos: Point, image: &RgbaImage) {
        let target = Rect::new(pos.x, pos.y, image.width() as i32, image.height() as i32);
        let Some(clipped) = target.intersection(&self.bounds()) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                let src = *image.get_pixel((x - pos.x) as u32, (y - pos.y) as u32);
                self.blend_at(x, y, src);
            }
        }
    }

    fn draw_text(&mut self, pos: Point, text: &str, color: Rgba<u8>, clip: Rect) {
        if text.is_empty() || clip.intersection(&self.bounds()).is_none() {
            return;
        }
        self.labels.push(TextRun {
            pos,
            text: text.to_string(),
            color,
            clip,
        });
    }
}
