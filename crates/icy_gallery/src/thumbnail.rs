//! Per item derived thumbnails
//!
//! Every item keeps a color thumbnail scaled to the current tile edge and, on demand, a grayscale copy of it
//! for desaturated (filtered out) tiles. Both are dropped when the zoom step or the aspect policy changes.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// How a non square source image is mapped into the square image box of a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectPolicy {
    /// Keep aspect, letter/pillar box inside the tile
    #[default]
    Fit,
    /// Keep aspect, center crop to fill the tile
    Fill,
    /// Ignore aspect, scale both axes to the tile
    Stretch,
}

impl AspectPolicy {
    pub const ALL: [AspectPolicy; 3] = [AspectPolicy::Fit, AspectPolicy::Fill, AspectPolicy::Stretch];

    pub fn name(self) -> &'static str {
        match self {
            AspectPolicy::Fit => "Fit",
            AspectPolicy::Fill => "Fill",
            AspectPolicy::Stretch => "Stretch",
        }
    }
}

/// Scales `source` into an `edge x edge` box according to `aspect`.
///
/// * `Fit` returns an image whose larger side is `edge`
/// * `Fill` and `Stretch` return exactly `edge x edge`
pub fn scale_to_tile(source: &RgbaImage, edge: u32, aspect: AspectPolicy) -> RgbaImage {
    let edge = edge.max(1);
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return RgbaImage::new(edge, edge);
    }

    match aspect {
        AspectPolicy::Fit => {
            let scale = f64::from(edge) / f64::from(w.max(h));
            let (dw, dh) = scaled(w, h, scale);
            imageops::resize(source, dw.min(edge), dh.min(edge), FilterType::Triangle)
        }
        AspectPolicy::Fill => {
            let scale = f64::from(edge) / f64::from(w.min(h));
            let (dw, dh) = scaled(w, h, scale);
            let (dw, dh) = (dw.max(edge), dh.max(edge));
            let resized = imageops::resize(source, dw, dh, FilterType::Triangle);
            imageops::crop_imm(&resized, (dw - edge) / 2, (dh - edge) / 2, edge, edge).to_image()
        }
        AspectPolicy::Stretch => imageops::resize(source, edge, edge, FilterType::Triangle),
    }
}

fn scaled(w: u32, h: u32, scale: f64) -> (u32, u32) {
    let dw = (f64::from(w) * scale).round().max(1.0) as u32;
    let dh = (f64::from(h) * scale).round().max(1.0) as u32;
    (dw, dh)
}

/// Grayscale copy using integer luminance weights (~0.2126 R + 0.7152 G + 0.0722 B), alpha is kept
pub fn to_grayscale(color: &RgbaImage) -> RgbaImage {
    let mut gray = RgbaImage::new(color.width(), color.height());
    for (dst, src) in gray.pixels_mut().zip(color.pixels()) {
        let [r, g, b, a] = src.0;
        let l = ((54 * u32::from(r) + 183 * u32::from(g) + 19 * u32::from(b)) >> 8) as u8;
        *dst = Rgba([l, l, l, a]);
    }
    gray
}

/// Cached color and grayscale variants of one item
#[derive(Debug, Clone, Default)]
pub struct DerivedThumbs {
    /// Edge and aspect the color variant was built for
    key: Option<(u32, AspectPolicy)>,
    color: Option<RgbaImage>,
    gray: Option<RgbaImage>,
}

impl DerivedThumbs {
    /// Builds the color variant if it is missing or was built for other parameters
    pub fn ensure(&mut self, source: &RgbaImage, edge: u32, aspect: AspectPolicy) -> &RgbaImage {
        if self.key != Some((edge, aspect)) {
            self.invalidate();
        }
        self.key = Some((edge, aspect));
        self.color.get_or_insert_with(|| scale_to_tile(source, edge, aspect))
    }

    /// Grayscale variant of the color thumbnail, `ensure` must have been called first
    pub fn gray(&mut self) -> Option<&RgbaImage> {
        let color = self.color.as_ref()?;
        Some(self.gray.get_or_insert_with(|| to_grayscale(color)))
    }

    pub fn color(&self) -> Option<&RgbaImage> {
        self.color.as_ref()
    }

    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    pub fn has_gray(&self) -> bool {
        self.gray.is_some()
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.color = None;
        self.gray = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, c: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(c))
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let thumb = scale_to_tile(&solid(200, 100, [255, 0, 0, 255]), 64, AspectPolicy::Fit);
        assert_eq!(thumb.dimensions(), (64, 32));
        let tall = scale_to_tile(&solid(30, 90, [255, 0, 0, 255]), 48, AspectPolicy::Fit);
        assert_eq!(tall.dimensions(), (16, 48));
    }

    #[test]
    fn test_fill_crops_to_square() {
        let mut src = solid(300, 100, [0, 0, 255, 255]);
        // mark the center column red, it must survive the center crop
        for y in 0..100 {
            src.put_pixel(150, y, Rgba([255, 0, 0, 255]));
        }
        let thumb = scale_to_tile(&src, 64, AspectPolicy::Fill);
        assert_eq!(thumb.dimensions(), (64, 64));
        assert!(thumb.get_pixel(32, 32).0[0] > 0);
    }

    #[test]
    fn test_stretch_fills_tile() {
        let thumb = scale_to_tile(&solid(17, 300, [1, 2, 3, 255]), 32, AspectPolicy::Stretch);
        assert_eq!(thumb.dimensions(), (32, 32));
    }

    #[test]
    fn test_degenerate_source() {
        let thumb = scale_to_tile(&RgbaImage::new(0, 0), 32, AspectPolicy::Fit);
        assert_eq!(thumb.dimensions(), (32, 32));
        let sliver = scale_to_tile(&solid(1000, 1, [9, 9, 9, 255]), 32, AspectPolicy::Fit);
        assert_eq!(sliver.dimensions(), (32, 1));
    }

    #[test]
    fn test_grayscale_weights() {
        let gray = to_grayscale(&solid(1, 1, [255, 255, 255, 128]));
        assert_eq!(gray.get_pixel(0, 0).0, [255, 255, 255, 128]);
        let green = to_grayscale(&solid(1, 1, [0, 255, 0, 255]));
        let l = green.get_pixel(0, 0).0[0];
        // 0.7152 * 255 = 182.4
        assert!((180..=184).contains(&l));
        let blue = to_grayscale(&solid(1, 1, [0, 0, 255, 255]));
        assert!(blue.get_pixel(0, 0).0[0] < 20);
    }

    #[test]
    fn test_derived_thumbs_cache() {
        let src = solid(100, 50, [10, 200, 30, 255]);
        let mut thumbs = DerivedThumbs::default();
        assert!(thumbs.gray().is_none());

        assert_eq!(thumbs.ensure(&src, 64, AspectPolicy::Fit).dimensions(), (64, 32));
        assert!(thumbs.gray().is_some());
        assert!(thumbs.has_gray());

        // other parameters rebuild and drop the stale gray copy
        assert_eq!(thumbs.ensure(&src, 32, AspectPolicy::Stretch).dimensions(), (32, 32));
        assert!(!thumbs.has_gray());

        thumbs.invalidate();
        assert!(!thumbs.has_color());
    }
}
