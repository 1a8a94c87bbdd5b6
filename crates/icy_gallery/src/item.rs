use bitflags::bitflags;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::thumbnail::DerivedThumbs;

/// Explicit display state of an item, overriding what the thumbnail data alone would show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThumbStatus {
    /// Decided by the data: source image if present, tinted placeholder otherwise
    #[default]
    Auto,
    /// Loading or not yet available
    Placeholder,
    /// The underlying file is gone
    Missing,
    /// Known good, falls back to the placeholder glyph without a source image
    Ok,
    /// Decoding or loading failed
    Error,
}

bitflags! {
    /// Independent data annotations, shown as a small dot on the tile
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DataFlags: u8 {
        const NAME_MISSING = 0b0000_0001;
        const META_MISSING = 0b0000_0010;
        const TAG_MISSING  = 0b0000_0100;
    }
}

/// One gallery entry
#[derive(Debug, Clone, Default)]
pub struct GalleryItem {
    pub(crate) name: String,
    pub(crate) source: Option<RgbaImage>,
    /// Placeholder tint, derived from the name when unset
    pub(crate) tint: Option<Rgba<u8>>,
    pub(crate) thumbs: DerivedThumbs,
    pub(crate) status: ThumbStatus,
    /// Only written through the selection commit
    pub(crate) selected: bool,
    pub(crate) filtered_out: bool,
    pub(crate) flags: DataFlags,
}

impl GalleryItem {
    pub fn new(name: impl Into<String>, source: Option<RgbaImage>, tint: Option<Rgba<u8>>) -> Self {
        Self {
            name: name.into(),
            source,
            tint,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    pub fn tint(&self) -> Option<Rgba<u8>> {
        self.tint
    }

    pub fn thumbs(&self) -> &DerivedThumbs {
        &self.thumbs
    }

    pub fn status(&self) -> ThumbStatus {
        self.status
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_filtered_out(&self) -> bool {
        self.filtered_out
    }

    pub fn flags(&self) -> DataFlags {
        self.flags
    }

    /// Replaces the source image and drops the derived thumbnails built from the old one
    pub(crate) fn set_source(&mut self, source: Option<RgbaImage>) {
        self.source = source;
        self.thumbs.invalidate();
    }
}
