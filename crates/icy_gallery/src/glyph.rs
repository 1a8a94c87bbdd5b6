//! Procedural status glyphs
//!
//! Glyphs are drawn with tiny-skia on first use and memoized per (type, edge). The cache is shared behind
//! an `Arc<Mutex<..>>` so several galleries (and threads) can reuse the same rasterizations.

use std::collections::HashMap;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tiny_skia::{Color, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Closed set of glyphs the gallery can show instead of (or on top of) a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphType {
    Placeholder,
    Missing,
    Error,
    Warning,
    StatusOk,
    StatusWarn,
    StatusErr,
}

impl GlyphType {
    pub const ALL: [GlyphType; 7] = [
        GlyphType::Placeholder,
        GlyphType::Missing,
        GlyphType::Error,
        GlyphType::Warning,
        GlyphType::StatusOk,
        GlyphType::StatusWarn,
        GlyphType::StatusErr,
    ];
}

/// Smallest glyph edge that is rendered, smaller requests are scaled up
pub const MIN_GLYPH_EDGE: u32 = 16;
/// Largest glyph edge that is rendered
pub const MAX_GLYPH_EDGE: u32 = 512;

const LIGHT_FACE: (u8, u8, u8) = (240, 240, 240);
const SHADOW: (u8, u8, u8) = (160, 160, 160);
const PAPER: (u8, u8, u8) = (255, 255, 255);

pub type SharedGlyphCache = Arc<Mutex<GlyphCache>>;

/// Memoized glyph rasterizations keyed by type and clamped edge
#[derive(Default)]
pub struct GlyphCache {
    glyphs: HashMap<(GlyphType, u32), Arc<RgbaImage>>,
    /// Number of glyphs actually rasterized
    rendered: usize,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedGlyphCache {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Glyph `kind` at `edge x edge` pixels, `edge` clamped to 16..=512.
    ///
    /// Repeated calls with the same key return the same allocation.
    pub fn glyph(&mut self, kind: GlyphType, edge: u32) -> Arc<RgbaImage> {
        let edge = edge.clamp(MIN_GLYPH_EDGE, MAX_GLYPH_EDGE);
        if let Some(glyph) = self.glyphs.get(&(kind, edge)) {
            return glyph.clone();
        }
        log::trace!("[GlyphCache] rendering {kind:?} at {edge}px");
        let glyph = Arc::new(render_glyph(kind, edge));
        self.rendered += 1;
        self.glyphs.insert((kind, edge), glyph.clone());
        glyph
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }
}

/// Rasterizes a glyph without caching
pub fn render_glyph(kind: GlyphType, edge: u32) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(edge, edge) else {
        return RgbaImage::from_pixel(edge, edge, rgba(LIGHT_FACE));
    };
    let size = edge as f32;
    pixmap.fill(color(LIGHT_FACE));
    stroke_frame(&mut pixmap, size);

    let margin = (size / 10.0).floor().max(2.0);
    let inset = Inset {
        left: margin,
        top: margin,
        width: (size - 2.0 * margin).max(1.0),
        height: (size - 2.0 * margin).max(1.0),
    };

    match kind {
        GlyphType::Placeholder => draw_mountains(&mut pixmap, &inset, (110, 110, 110), (90, 90, 90), (150, 150, 150)),
        GlyphType::Missing => {
            draw_mountains(&mut pixmap, &inset, (120, 120, 120), (100, 100, 100), (160, 160, 160));
            let pen = (size * 0.10).max(2.0);
            if let Some(path) = line(inset.left, inset.top, inset.right(), inset.bottom()) {
                stroke(&mut pixmap, &path, pen, (70, 70, 70));
            }
        }
        GlyphType::Error | GlyphType::Warning => {
            let tri = if kind == GlyphType::Error { (245, 158, 11) } else { (255, 193, 7) };
            draw_exclamation_triangle(&mut pixmap, &inset, tri);
        }
        GlyphType::StatusOk | GlyphType::StatusWarn | GlyphType::StatusErr => {
            let dot = match kind {
                GlyphType::StatusOk => (76, 175, 80),
                GlyphType::StatusWarn => (255, 193, 7),
                _ => (244, 67, 54),
            };
            let radius = inset.width.min(inset.height) * 0.40;
            let (cx, cy) = inset.center();
            if let Some(circle) = PathBuilder::from_circle(cx, cy, radius) {
                fill(&mut pixmap, &circle, dot, None);
                stroke(&mut pixmap, &circle, 1.0, LIGHT_FACE);
            }
        }
    }

    to_rgba_image(&pixmap)
}

struct Inset {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Inset {
    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn bottom(&self) -> f32 {
        self.top + self.height
    }

    fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Point relative to the inset, factors may leave the 0..1 range
    fn at(&self, fx: f32, fy: f32) -> (f32, f32) {
        (self.left + self.width * fx, self.top + self.height * fy)
    }
}

/// Sun, picture frame and two mountains clipped to the inset
fn draw_mountains(pixmap: &mut Pixmap, inset: &Inset, back: (u8, u8, u8), front: (u8, u8, u8), sun: (u8, u8, u8)) {
    let mut clip = Mask::new(pixmap.width(), pixmap.height());
    if let (Some(mask), Some(rect)) = (clip.as_mut(), tiny_skia::Rect::from_xywh(inset.left, inset.top, inset.width, inset.height)) {
        mask.fill_path(&PathBuilder::from_rect(rect), FillRule::Winding, true, Transform::identity());
    }
    let clip = clip.as_ref();

    let (sx, sy) = inset.at(0.6675, 0.1938);
    if let Some(circle) = PathBuilder::from_circle(sx, sy, inset.width.min(inset.height) * 0.1329) {
        fill(pixmap, &circle, sun, clip);
    }

    if let Some(frame) = polygon(&[inset.at(0.0, 0.0138), inset.at(1.0, 0.0138), inset.at(1.0, 0.8667), inset.at(0.0, 0.8667)]) {
        stroke(pixmap, &frame, 4.0, front);
    }

    if let Some(back_mtn) = polygon(&[inset.at(0.2825, 0.3236), inset.at(-0.3, 1.26), inset.at(0.8, 1.26)]) {
        fill(pixmap, &back_mtn, back, clip);
    }
    if let Some(front_mtn) = polygon(&[inset.at(0.7875, 0.5633), inset.at(0.0075, 1.3833), inset.at(1.6475, 1.3833)]) {
        fill(pixmap, &front_mtn, front, clip);
    }
}

fn draw_exclamation_triangle(pixmap: &mut Pixmap, inset: &Inset, tri: (u8, u8, u8)) {
    let cx = inset.left + inset.width * 0.5;
    let top = inset.top + inset.height * 0.18;
    let base = inset.bottom() - inset.height * 0.08;
    let half = inset.width * 0.36;
    if let Some(path) = polygon(&[(cx, top), (cx - half, base), (cx + half, base)]) {
        fill(pixmap, &path, tri, None);
    }

    if let Some(bar) = tiny_skia::Rect::from_xywh(cx - inset.width * 0.035, inset.top + inset.height * 0.40, inset.width * 0.07, inset.height * 0.28) {
        fill(pixmap, &PathBuilder::from_rect(bar), PAPER, None);
    }
    if let Some(dot) = PathBuilder::from_circle(cx, inset.bottom() - inset.height * 0.14, inset.width * 0.045) {
        fill(pixmap, &dot, PAPER, None);
    }
}

fn stroke_frame(pixmap: &mut Pixmap, size: f32) {
    if let Some(rect) = tiny_skia::Rect::from_xywh(0.5, 0.5, size - 1.0, size - 1.0) {
        stroke(pixmap, &PathBuilder::from_rect(rect), 1.0, SHADOW);
    }
}

fn polygon(points: &[(f32, f32)]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.close();
    pb.finish()
}

fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    pb.line_to(x1, y1);
    pb.finish()
}

fn paint(c: (u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.0, c.1, c.2, 255);
    paint.anti_alias = true;
    paint
}

fn fill(pixmap: &mut Pixmap, path: &Path, c: (u8, u8, u8), clip: Option<&Mask>) {
    pixmap.fill_path(path, &paint(c), FillRule::Winding, Transform::identity(), clip);
}

fn stroke(pixmap: &mut Pixmap, path: &Path, width: f32, c: (u8, u8, u8)) {
    let stroke = Stroke { width, ..Stroke::default() };
    pixmap.stroke_path(path, &paint(c), &stroke, Transform::identity(), None);
}

fn color(c: (u8, u8, u8)) -> Color {
    Color::from_rgba8(c.0, c.1, c.2, 255)
}

fn rgba(c: (u8, u8, u8)) -> Rgba<u8> {
    Rgba([c.0, c.1, c.2, 255])
}

/// Converts a premultiplied tiny-skia pixmap into a straight alpha image
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_is_memoized() {
        let mut cache = GlyphCache::new();
        let a = cache.glyph(GlyphType::Missing, 64);
        let b = cache.glyph(GlyphType::Missing, 64);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.rendered_count(), 1);
        cache.glyph(GlyphType::Error, 64);
        assert_eq!(cache.rendered_count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_glyph_edge_is_clamped() {
        let mut cache = GlyphCache::new();
        let tiny = cache.glyph(GlyphType::Placeholder, 4);
        assert_eq!(tiny.dimensions(), (16, 16));
        let same = cache.glyph(GlyphType::Placeholder, 16);
        assert!(Arc::ptr_eq(&tiny, &same));
        assert_eq!(cache.glyph(GlyphType::Placeholder, 4096).dimensions(), (512, 512));
    }

    #[test]
    fn test_glyph_frame_and_face() {
        let glyph = render_glyph(GlyphType::StatusOk, 48);
        let edge = glyph.get_pixel(0, 24).0;
        assert!(edge[..3].iter().all(|&c| (155..=170).contains(&c)), "{edge:?}");
        // the center holds the green status dot
        let center = glyph.get_pixel(24, 24).0;
        assert_eq!(center, [76, 175, 80, 255]);
    }

    #[test]
    fn test_all_glyphs_render_opaque() {
        for kind in GlyphType::ALL {
            let glyph = render_glyph(kind, 32);
            assert!(glyph.pixels().all(|p| p.0[3] == 255), "{kind:?}");
        }
    }

    #[test]
    fn test_shared_cache_across_handles() {
        let shared = GlyphCache::shared();
        let other = shared.clone();
        let a = shared.lock().glyph(GlyphType::Warning, 32);
        let b = other.lock().glyph(GlyphType::Warning, 32);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(shared.lock().rendered_count(), 1);
    }
}
