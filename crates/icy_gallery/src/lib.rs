#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::too_many_lines,
    clippy::cast_precision_loss,
    clippy::struct_excessive_bools,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::too_many_arguments
)]

//! Thumbnail gallery widget core: grid layout, cached thumbnails and glyphs, marquee/click selection and
//! painting onto a host supplied surface.

pub mod color;
pub mod double_click;
pub mod error;
pub mod events;
pub mod gallery;
pub mod geometry;
pub mod gesture;
pub mod glyph;
pub mod item;
pub mod layout;
pub mod menu;
pub mod options;
pub mod render;
pub mod selection;
pub mod surface;
pub mod thumbnail;

pub use error::{GalleryError, Result};
pub use events::GalleryMessage;
pub use gallery::{Gallery, GalleryKey};
pub use geometry::{Point, Rect, Size};
pub use gesture::GestureState;
pub use glyph::{GlyphCache, GlyphType, SharedGlyphCache};
pub use item::{DataFlags, GalleryItem, ThumbStatus};
pub use layout::{GridLayout, ScrollMode, ZOOM_STEPS};
pub use menu::{ContextMenu, MenuAction, MenuEntry, MenuItem};
pub use options::GalleryOptions;
pub use render::Palette;
pub use selection::{CombineMode, Modifiers, SelectionBindings};
pub use surface::{RgbaSurface, Surface};
pub use thumbnail::AspectPolicy;
