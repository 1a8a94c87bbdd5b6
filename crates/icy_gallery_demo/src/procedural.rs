//! Procedural demo thumbnails

use icy_gallery::color::{hsv, mix};
use icy_gallery::glyph::to_rgba_image;
use icy_gallery::{GlyphType, SharedGlyphCache};
use image::{imageops, Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Aspect ratios picked for random thumbnails (width / height)
const RATIOS: [f32; 6] = [1.0, 4.0 / 3.0, 16.0 / 9.0, 3.0 / 2.0, 1.85, 2.39];

const FACE: Rgba<u8> = Rgba([236, 236, 236, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SHADOW: Rgba<u8> = Rgba([160, 160, 160, 255]);

/// Random "photo" whose longer side is `edge`, landscape or portrait
pub fn random_thumb(edge: u32, rng: &mut fastrand::Rng) -> RgbaImage {
    let edge = edge.max(8);
    let mut ratio = RATIOS[rng.usize(..RATIOS.len())];
    if rng.bool() {
        ratio = 1.0 / ratio;
    }
    let (w, h) = if ratio >= 1.0 {
        (edge, ((edge as f32 / ratio).round() as u32).max(1))
    } else {
        (((edge as f32 * ratio).round() as u32).max(1), edge)
    };

    let Some(mut pixmap) = Pixmap::new(w, h) else {
        return RgbaImage::from_pixel(w, h, FACE);
    };
    let (wf, hf) = (w as f32, h as f32);

    let bg_a = mix(FACE, hsv(rng.f32(), 0.15, 0.92), 64);
    let bg_b = mix(PAPER, hsv(rng.f32(), 0.12, 0.85), 64);
    pixmap.fill(tiny_skia::Color::from_rgba8(bg_a[0], bg_a[1], bg_a[2], 255));

    let mut pb = PathBuilder::new();
    pb.move_to(0.0, 0.0);
    pb.line_to(wf, 0.0);
    pb.line_to(wf, 0.35 * hf);
    pb.line_to(0.0, 0.65 * hf);
    pb.close();
    if let Some(split) = pb.finish() {
        pixmap.fill_path(&split, &paint(bg_b), FillRule::Winding, Transform::identity(), None);
    }

    let min = wf.min(hf);
    for _ in 0..2 {
        let color = hsv(rng.f32(), 0.55 + 0.3 * rng.f32(), 0.65 + 0.3 * rng.f32());
        let size = min * (0.25 + 0.3 * rng.f32());
        let cx = wf * (0.2 + 0.6 * rng.f32());
        let cy = hf * (0.2 + 0.6 * rng.f32());
        let angle = rng.f32() * 90.0;
        let transform = Transform::from_rotate_at(angle, cx, cy);

        let path = if rng.bool() {
            Rect::from_xywh(cx - size / 2.0, cy - size / 3.0, size, size * 2.0 / 3.0).map(PathBuilder::from_rect)
        } else {
            Rect::from_xywh(cx - size / 2.0, cy - size / 4.0, size, size / 2.0).and_then(PathBuilder::from_oval)
        };
        if let Some(path) = path {
            pixmap.fill_path(&path, &paint(color), FillRule::Winding, transform, None);
        }
    }

    if let Some(frame) = Rect::from_xywh(0.5, 0.5, wf - 1.0, hf - 1.0) {
        let stroke = Stroke { width: 1.0, ..Stroke::default() };
        pixmap.stroke_path(&PathBuilder::from_rect(frame), &paint(SHADOW), &stroke, Transform::identity(), None);
    }

    to_rgba_image(&pixmap)
}

/// Copy of `base` with a small status glyph in the bottom right corner
pub fn thumb_with_glyph(base: &RgbaImage, glyphs: &SharedGlyphCache, kind: GlyphType) -> RgbaImage {
    let mut out = base.clone();
    let (w, h) = out.dimensions();
    let edge = w.min(h);
    let gsz = (edge / 5).max(16);
    let glyph = glyphs.lock().glyph(kind, gsz);
    let x = i64::from(w) - i64::from(glyph.width()) - 4;
    let y = i64::from(h) - i64::from(glyph.height()) - 4;
    imageops::overlay(&mut out, &*glyph, x, y);
    out
}

fn paint(c: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c[0], c[1], c[2], c[3]);
    paint.anti_alias = true;
    paint
}
