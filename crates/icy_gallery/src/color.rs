//! Color helpers for tinting and blending

use image::Rgba;

/// 32 bit FNV-1a hash, used to derive stable per-name tints
pub fn fnv1a(text: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    text.bytes().fold(OFFSET_BASIS, |hash, b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

/// HSV to opaque RGBA. `h` is in turns (0.0..1.0), `s` and `v` are clamped to 0.0..=1.0
pub fn hsv(h: f32, s: f32, v: f32) -> Rgba<u8> {
    let h = if h.is_finite() { h.rem_euclid(1.0) } else { 0.0 };
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let sector = h * 6.0;
    let i = sector.floor();
    let f = sector - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgba([to_byte(r), to_byte(g), to_byte(b), 255])
}

fn to_byte(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Alpha free blend: `a * (255 - t) + b * t`, `t` in 0..=255. The result is opaque.
pub fn mix(a: Rgba<u8>, b: Rgba<u8>, t: u8) -> Rgba<u8> {
    let t = u32::from(t);
    let u = 255 - t;
    let channel = |i: usize| ((u32::from(a.0[i]) * u + u32::from(b.0[i]) * t) / 255) as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

pub fn with_alpha(c: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([c.0[0], c.0[1], c.0[2], alpha])
}

/// Pastel tint derived from an item name.
///
/// Hue comes from the name hash, saturation and value are fixed low/high so the tint stays readable behind
/// dark label text.
pub fn name_tint(name: &str) -> Rgba<u8> {
    hsv((fnv1a(name) % 360) as f32 / 360.0, 0.25, 0.90)
}
