use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::double_click::DEFAULT_DOUBLE_CLICK_MS;
use crate::error::{GalleryError, Result};
use crate::gesture::DEFAULT_DRAG_THRESHOLD;
use crate::layout::{ScrollMode, DEFAULT_LABEL_HEIGHT, DEFAULT_TILE_PADDING, DEFAULT_ZOOM_INDEX, MAX_SPACING, ZOOM_STEPS};
use crate::selection::SelectionBindings;
use crate::thumbnail::AspectPolicy;

/// Default opacity of the label backdrop
pub const DEFAULT_LABEL_BACKDROP_ALPHA: u8 = 170;

/// Persistent gallery configuration, stored as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GalleryOptions {
    /// Index into `ZOOM_STEPS`
    pub zoom_index: usize,
    pub aspect: AspectPolicy,
    pub tile_padding: i32,
    pub label_height: i32,
    pub scroll_mode: ScrollMode,

    pub show_selection_borders: bool,
    pub show_filter_borders: bool,
    /// Draw filtered out items in grayscale
    pub desaturate_filtered: bool,
    pub hover_enabled: bool,
    pub label_backdrop_alpha: u8,

    /// Pixels a press must travel on either axis before it becomes a marquee drag
    pub drag_threshold: i32,
    /// Synthesize double-clicks from two presses; for hosts without native double-click events
    pub detect_double_click: bool,
    pub double_click_ms: u64,

    pub bindings: SelectionBindings,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            zoom_index: DEFAULT_ZOOM_INDEX,
            aspect: AspectPolicy::Fit,
            tile_padding: DEFAULT_TILE_PADDING,
            label_height: DEFAULT_LABEL_HEIGHT,
            scroll_mode: ScrollMode::Auto,
            show_selection_borders: true,
            show_filter_borders: true,
            desaturate_filtered: true,
            hover_enabled: true,
            label_backdrop_alpha: DEFAULT_LABEL_BACKDROP_ALPHA,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            detect_double_click: false,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            bindings: SelectionBindings::default(),
        }
    }
}

impl GalleryOptions {
    pub fn load_from(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).map_err(|err| GalleryError::read_options(path, err.to_string()))?;
        let options: GalleryOptions = toml::from_str(&txt)?;
        Ok(options.sanitized())
    }

    pub fn store_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let text = toml::to_string(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Loads the options from `path`, falling back to defaults if the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("[GalleryOptions] {} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(options) => options,
            Err(err) => {
                log::error!("Error reading options file: {err}");
                Self::default()
            }
        }
    }

    /// Copy with every field clamped into its valid range
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            zoom_index: self.zoom_index.min(ZOOM_STEPS.len() - 1),
            tile_padding: self.tile_padding.clamp(0, MAX_SPACING),
            label_height: self.label_height.clamp(0, MAX_SPACING),
            drag_threshold: self.drag_threshold.max(0),
            double_click_ms: self.double_click_ms.clamp(50, 5000),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps() {
        let options = GalleryOptions {
            zoom_index: 40,
            tile_padding: -3,
            label_height: 500,
            drag_threshold: -1,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(options.zoom_index, ZOOM_STEPS.len() - 1);
        assert_eq!(options.tile_padding, 0);
        assert_eq!(options.label_height, MAX_SPACING);
        assert_eq!(options.drag_threshold, 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: GalleryOptions = toml::from_str("zoom_index = 4\naspect = \"Fill\"\n").unwrap();
        assert_eq!(options.zoom_index, 4);
        assert_eq!(options.aspect, AspectPolicy::Fill);
        assert_eq!(options.tile_padding, DEFAULT_TILE_PADDING);
        assert_eq!(options.bindings, SelectionBindings::default());
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gallery.toml");
        let options = GalleryOptions {
            zoom_index: 1,
            scroll_mode: ScrollMode::VerticalOnly,
            hover_enabled: false,
            label_backdrop_alpha: 12,
            ..Default::default()
        };
        options.store_to(&path).unwrap();
        assert_eq!(GalleryOptions::load_from(&path).unwrap(), options);
    }

    #[test]
    fn test_load_or_default_on_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        fs::write(&path, "zoom_index = \"very large\"").unwrap();
        assert!(matches!(GalleryOptions::load_from(&path), Err(GalleryError::OptionsParse(_))));
        assert_eq!(GalleryOptions::load_or_default(&path), GalleryOptions::default());
        assert_eq!(GalleryOptions::load_or_default(&dir.path().join("missing.toml")), GalleryOptions::default());
    }
}
