use std::sync::Arc;

use icy_gallery::{AspectPolicy, Gallery, GalleryMessage, GlyphCache, GlyphType, RgbaSurface, Size, ThumbStatus};
use image::{Rgba, RgbaImage};

fn gallery_with_image() -> (Gallery, RgbaSurface) {
    let mut g = Gallery::new();
    g.set_viewport_size(Size::new(400, 300));
    g.add("photo", Some(RgbaImage::from_pixel(300, 200, Rgba([10, 120, 200, 255]))), None);
    g.take_messages();
    (g, RgbaSurface::new(400, 300).unwrap())
}

#[test]
fn painting_builds_the_color_thumbnail() {
    let (mut g, mut surface) = gallery_with_image();
    assert!(!g.item(0).unwrap().thumbs().has_color());
    g.paint(&mut surface);
    let thumbs = g.item(0).unwrap().thumbs();
    assert!(thumbs.has_color());
    let color = thumbs.color().unwrap();
    // 300x200 fit into 64
    assert_eq!(color.dimensions(), (64, 43));
}

#[test]
fn zoom_change_drops_cached_thumbnails() {
    let (mut g, mut surface) = gallery_with_image();
    g.paint(&mut surface);
    assert!(g.item(0).unwrap().thumbs().has_color());

    g.set_zoom_index(4);
    assert_eq!(g.take_messages(), vec![GalleryMessage::ZoomChanged(4)]);
    assert!(!g.item(0).unwrap().thumbs().has_color());
    assert!(g.needs_repaint());

    g.paint(&mut surface);
    assert_eq!(g.item(0).unwrap().thumbs().color().unwrap().width(), 128);
}

#[test]
fn same_zoom_keeps_cached_thumbnails() {
    let (mut g, mut surface) = gallery_with_image();
    g.paint(&mut surface);
    g.set_zoom_index(g.zoom_index());
    assert!(g.take_messages().is_empty());
    assert!(g.item(0).unwrap().thumbs().has_color());
}

#[test]
fn aspect_change_drops_cached_thumbnails() {
    let (mut g, mut surface) = gallery_with_image();
    g.paint(&mut surface);
    g.set_aspect(AspectPolicy::Fill);
    assert!(!g.item(0).unwrap().thumbs().has_color());

    g.paint(&mut surface);
    assert_eq!(g.item(0).unwrap().thumbs().color().unwrap().dimensions(), (64, 64));
}

#[test]
fn filtered_items_get_a_gray_copy() {
    let (mut g, mut surface) = gallery_with_image();
    g.set_filtered(0, true);
    g.paint(&mut surface);
    assert!(g.item(0).unwrap().thumbs().has_gray());

    g.set_zoom_index(0);
    assert!(!g.item(0).unwrap().thumbs().has_gray());
}

#[test]
fn replacing_the_source_drops_thumbnails() {
    let (mut g, mut surface) = gallery_with_image();
    g.paint(&mut surface);
    g.set_thumb_image(0, RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
    assert!(!g.item(0).unwrap().thumbs().has_color());
    g.clear_thumb_image(0);
    assert!(g.item(0).unwrap().source().is_none());
}

#[test]
fn glyphs_are_rendered_once_per_kind_and_edge() {
    let mut cache = GlyphCache::new();
    let a = cache.glyph(GlyphType::Error, 48);
    let b = cache.glyph(GlyphType::Error, 48);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.dimensions(), (48, 48));
    assert_eq!(cache.rendered_count(), 1);

    cache.glyph(GlyphType::Error, 64);
    cache.glyph(GlyphType::Missing, 48);
    assert_eq!(cache.rendered_count(), 3);
    assert_eq!(cache.len(), 3);
}

#[test]
fn galleries_share_one_glyph_cache() {
    let shared = GlyphCache::shared();
    let mut first = Gallery::with_glyph_cache(shared.clone());
    let mut second = Gallery::with_glyph_cache(shared.clone());
    for g in [&mut first, &mut second] {
        g.set_viewport_size(Size::new(200, 100));
        g.add("missing", None, None);
        g.set_status(0, ThumbStatus::Missing);
        let mut surface = RgbaSurface::new(200, 100).unwrap();
        g.paint(&mut surface);
    }
    assert_eq!(shared.lock().rendered_count(), 1);
}
