//! Painting of the visible tiles.
//!
//! Only the rows intersecting the viewport are visited. Per tile the layers are, bottom to top:
//! face, content, data flag dot, label band, hover ring, selection overlay, filter border.
//! The marquee goes on top of everything.

use image::{Rgba, RgbaImage};

use crate::color::{mix, name_tint, with_alpha};
use crate::geometry::{Point, Rect};
use crate::glyph::{GlyphType, SharedGlyphCache};
use crate::item::{GalleryItem, ThumbStatus};
use crate::layout::GridLayout;
use crate::options::GalleryOptions;
use crate::surface::Surface;

/// Approximate line height assumed when vertically centering labels
pub const LABEL_TEXT_HEIGHT: i32 = 13;

/// Alpha of the selection and marquee overlays (~10%)
const OVERLAY_ALPHA: u8 = 26;

const FLAG_DOT: Rgba<u8> = Rgba([245, 158, 11, 255]);

/// System colors used for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Widget background
    pub face: Rgba<u8>,
    /// Tile background
    pub paper: Rgba<u8>,
    pub light_face: Rgba<u8>,
    pub highlight: Rgba<u8>,
    pub text: Rgba<u8>,
    pub shadow: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            face: Rgba([236, 236, 236, 255]),
            paper: Rgba([255, 255, 255, 255]),
            light_face: Rgba([245, 245, 245, 255]),
            highlight: Rgba([51, 153, 255, 255]),
            text: Rgba([0, 0, 0, 255]),
            shadow: Rgba([160, 160, 160, 255]),
        }
    }
}

/// Interaction state that affects painting
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState {
    pub hover: Option<usize>,
    /// Marquee in content coordinates
    pub marquee: Option<Rect>,
}

/// Paints the visible part of the grid onto `surface`
pub fn paint(
    surface: &mut dyn Surface,
    items: &mut [GalleryItem],
    layout: &GridLayout,
    options: &GalleryOptions,
    palette: &Palette,
    glyphs: &SharedGlyphCache,
    view: ViewState,
) {
    let size = surface.size();
    surface.fill_rect(Rect::from_size(size), palette.face);

    let scroll = layout.scroll_offset();
    for index in layout.visible_indices() {
        let Some(item) = items.get_mut(index) else {
            break;
        };
        let tile = layout.tile_rect(index).offset(-scroll.x, -scroll.y);
        let image_rect = layout.image_rect(tile);
        let label_rect = layout.label_rect(tile);

        surface.fill_rect(tile, palette.paper);
        paint_content(surface, item, image_rect, layout, options, palette, glyphs);

        if !item.flags.is_empty() {
            let d = tile.deflate(4, 4);
            let dot = Rect::new(d.x, d.y, 6, 6);
            surface.fill_rect(dot, FLAG_DOT);
            surface.stroke_rect(dot.inflate(1), 1, palette.paper);
        }

        if !label_rect.is_empty() {
            let back = mix(palette.light_face, palette.paper, 255 - options.label_backdrop_alpha);
            surface.fill_rect(label_rect, back);
            let text_pos = Point::new(label_rect.x + 4, label_rect.y + (label_rect.height - LABEL_TEXT_HEIGHT) / 2);
            surface.draw_text(text_pos, &item.name, palette.text, label_rect);
        }

        if options.hover_enabled && view.hover == Some(index) && !item.selected {
            surface.stroke_rect(tile, 1, mix(palette.highlight, palette.face, 160));
        }

        if item.selected {
            surface.fill_rect(tile, with_alpha(palette.highlight, OVERLAY_ALPHA));
            if options.show_selection_borders {
                surface.stroke_rect(tile, 2, palette.highlight);
            }
        }

        if options.show_filter_borders && item.filtered_out {
            surface.stroke_rect(tile, 1, mix(palette.paper, palette.shadow, 200));
        }
    }

    if let Some(marquee) = view.marquee {
        let r = marquee.offset(-scroll.x, -scroll.y);
        surface.stroke_rect(r, 1, palette.highlight);
        surface.fill_rect(r, with_alpha(palette.highlight, OVERLAY_ALPHA));
    }
}

fn paint_content(
    surface: &mut dyn Surface,
    item: &mut GalleryItem,
    image_rect: Rect,
    layout: &GridLayout,
    options: &GalleryOptions,
    palette: &Palette,
    glyphs: &SharedGlyphCache,
) {
    let glyph = match (item.status, item.source.is_some()) {
        (ThumbStatus::Missing, _) => Some(GlyphType::Missing),
        (ThumbStatus::Error, _) => Some(GlyphType::Error),
        (ThumbStatus::Placeholder, _) | (ThumbStatus::Ok, false) => Some(GlyphType::Placeholder),
        (ThumbStatus::Auto, false) => {
            let tint = item.tint.unwrap_or_else(|| name_tint(&item.name));
            surface.fill_rect(image_rect, mix(palette.face, tint, 64));
            surface.fill_rect(image_rect.deflate(image_rect.width / 6, image_rect.height / 6), mix(tint, palette.paper, 48));
            None
        }
        (ThumbStatus::Auto | ThumbStatus::Ok, true) => {
            let edge = layout.edge().max(1) as u32;
            if let Some(source) = item.source.as_ref() {
                item.thumbs.ensure(source, edge, options.aspect);
            }
            let thumb = if options.desaturate_filtered && item.filtered_out {
                item.thumbs.gray()
            } else {
                item.thumbs.color()
            };
            if let Some(thumb) = thumb {
                surface.draw_image(centered(image_rect, thumb), thumb);
            }
            None
        }
    };

    if let Some(kind) = glyph {
        let edge = image_rect.width.min(image_rect.height);
        if edge > 0 {
            let glyph = glyphs.lock().glyph(kind, edge as u32);
            surface.draw_image(centered(image_rect, &glyph), &glyph);
        }
    }
}

fn centered(rect: Rect, image: &RgbaImage) -> Point {
    Point::new(
        rect.x + (rect.width - image.width() as i32) / 2,
        rect.y + (rect.height - image.height() as i32) / 2,
    )
}
