//! Grid layout for the gallery
//!
//! Maps between item index, tile rectangle and pixel position. Tiles are laid out row major:
//!
//! ```text
//! pad | tile | pad | tile | pad ...
//! ```
//!
//! A tile is `edge` pixels wide and `edge + label_height` pixels high. All rectangles returned here
//! are in CONTENT coordinates; `to_content`/`to_view` convert from and to viewport coordinates.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Tile edge lengths selected by the zoom index (ascending)
pub const ZOOM_STEPS: [i32; 5] = [32, 48, 64, 96, 128];

/// Zoom index used by a fresh gallery (64px tiles)
pub const DEFAULT_ZOOM_INDEX: usize = 2;

/// Default gap around tiles in pixels
pub const DEFAULT_TILE_PADDING: i32 = 8;

/// Default height of the label band below each tile
pub const DEFAULT_LABEL_HEIGHT: i32 = 18;

/// Upper bound for padding and label height
pub const MAX_SPACING: i32 = 64;

/// Which axes may scroll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollMode {
    #[default]
    Auto,
    VerticalOnly,
    HorizontalOnly,
    None,
}

/// Tile edge for a zoom index, clamped into the step table
pub fn zoom_edge(zoom_index: usize) -> i32 {
    ZOOM_STEPS[zoom_index.min(ZOOM_STEPS.len() - 1)]
}

/// `padding + cells * cell` in pixels, saturated to `i32::MAX`
fn span(cells: usize, cell: i32, padding: i32) -> i32 {
    let cells = i64::try_from(cells).unwrap_or(i64::MAX);
    let total = cells.saturating_mul(i64::from(cell)).saturating_add(i64::from(padding));
    i32::try_from(total).unwrap_or(i32::MAX)
}

/// Geometry state of the grid: inputs (viewport, tile metrics, count) and derived values
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Size of the visible area in screen pixels
    viewport: Size,
    /// Tile edge (image box is `edge x edge`)
    edge: i32,
    /// Gap around tiles
    padding: i32,
    /// Height of the label band below the image box
    label_height: i32,
    scroll_mode: ScrollMode,
    /// Number of items laid out
    count: usize,

    // derived by reflow()
    columns: usize,
    rows: usize,
    content: Size,
    scroll: Point,
}

impl Default for GridLayout {
    fn default() -> Self {
        let mut layout = Self {
            viewport: Size::ZERO,
            edge: zoom_edge(DEFAULT_ZOOM_INDEX),
            padding: DEFAULT_TILE_PADDING,
            label_height: DEFAULT_LABEL_HEIGHT,
            scroll_mode: ScrollMode::Auto,
            count: 0,
            columns: 1,
            rows: 0,
            content: Size::ZERO,
            scroll: Point::ORIGIN,
        };
        layout.reflow();
        layout
    }
}

impl GridLayout {
    pub fn new(viewport: Size, edge: i32, padding: i32, label_height: i32) -> Self {
        let mut layout = Self {
            viewport,
            edge: edge.max(1),
            padding: padding.clamp(0, MAX_SPACING),
            label_height: label_height.clamp(0, MAX_SPACING),
            ..Default::default()
        };
        layout.reflow();
        layout
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn edge(&self) -> i32 {
        self.edge
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn label_height(&self) -> i32 {
        self.label_height
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    pub fn tile_width(&self) -> i32 {
        self.edge
    }

    pub fn tile_height(&self) -> i32 {
        self.edge + self.label_height
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = Size::new(viewport.width.max(0), viewport.height.max(0));
        self.reflow();
    }

    pub fn set_edge(&mut self, edge: i32) {
        self.edge = edge.max(1);
        self.reflow();
    }

    pub fn set_padding(&mut self, padding: i32) {
        self.padding = padding.clamp(0, MAX_SPACING);
        self.reflow();
    }

    pub fn set_label_height(&mut self, label_height: i32) {
        self.label_height = label_height.clamp(0, MAX_SPACING);
        self.reflow();
    }

    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        self.scroll_mode = mode;
        self.reflow();
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.reflow();
    }

    /// Recomputes columns, rows and content size, then re-clamps the scroll offset
    pub fn reflow(&mut self) {
        let cell_w = self.tile_width() + self.padding;
        let cell_h = self.tile_height() + self.padding;

        self.columns = (self.viewport.width.saturating_add(self.padding) / cell_w).max(1) as usize;
        self.rows = self.count.div_ceil(self.columns);

        self.content = if self.count == 0 {
            Size::ZERO
        } else {
            Size::new(span(self.columns, cell_w, self.padding), span(self.rows, cell_h, self.padding))
        };

        match self.scroll_mode {
            ScrollMode::Auto => {}
            ScrollMode::VerticalOnly => {
                self.content.width = self.viewport.width;
            }
            ScrollMode::HorizontalOnly => {
                self.content.height = self.viewport.height;
            }
            ScrollMode::None => {
                self.content = self.viewport;
            }
        }

        self.scroll = self.clamp_scroll(self.scroll);
    }

    /// Largest scroll offset on each axis
    pub fn max_scroll(&self) -> Point {
        Point::new(
            (self.content.width - self.viewport.width).max(0),
            (self.content.height - self.viewport.height).max(0),
        )
    }

    fn clamp_scroll(&self, p: Point) -> Point {
        let max = self.max_scroll();
        let x = match self.scroll_mode {
            ScrollMode::VerticalOnly | ScrollMode::None => 0,
            _ => p.x.clamp(0, max.x),
        };
        let y = match self.scroll_mode {
            ScrollMode::HorizontalOnly | ScrollMode::None => 0,
            _ => p.y.clamp(0, max.y),
        };
        Point::new(x, y)
    }

    /// Sets the scroll offset, returns true if it changed
    pub fn set_scroll(&mut self, p: Point) -> bool {
        let clamped = self.clamp_scroll(p);
        let changed = clamped != self.scroll;
        self.scroll = clamped;
        changed
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        self.set_scroll(self.scroll.offset(dx, dy))
    }

    /// Scroll distance of one wheel notch or arrow key press
    pub fn line_step(&self) -> i32 {
        ((self.tile_height() + self.padding) / 3).max(8)
    }

    pub fn to_content(&self, view: Point) -> Point {
        view.offset(self.scroll.x, self.scroll.y)
    }

    pub fn to_view(&self, content: Point) -> Point {
        content.offset(-self.scroll.x, -self.scroll.y)
    }

    /// Tile rectangle of `index` in content coordinates, `Rect::EMPTY` if out of range
    pub fn tile_rect(&self, index: usize) -> Rect {
        if index >= self.count {
            return Rect::EMPTY;
        }
        let row = index / self.columns;
        let col = index % self.columns;
        // rows past i32::MAX pile up at the bottom edge instead of wrapping
        let x = span(col, self.tile_width() + self.padding, self.padding).min(i32::MAX - self.tile_width());
        let y = span(row, self.tile_height() + self.padding, self.padding).min(i32::MAX - self.tile_height());
        Rect::new(x, y, self.tile_width(), self.tile_height())
    }

    /// The image box of a tile: the tile minus its bottom label band
    pub fn image_rect(&self, tile: Rect) -> Rect {
        Rect::new(tile.x, tile.y, tile.width, (tile.height - self.label_height).max(0))
    }

    /// Label band of a tile
    pub fn label_rect(&self, tile: Rect) -> Rect {
        let image = self.image_rect(tile);
        Rect::new(tile.x, image.bottom(), tile.width, tile.bottom() - image.bottom())
    }

    /// Index of the tile containing a content point.
    ///
    /// Points in the padding between tiles, right of the last column or past the last item map to `None`.
    pub fn index_from_point(&self, p: Point) -> Option<usize> {
        let cell_w = self.tile_width() + self.padding;
        let cell_h = self.tile_height() + self.padding;
        let lx = p.x.saturating_sub(self.padding);
        let ly = p.y.saturating_sub(self.padding);
        if lx < 0 || ly < 0 {
            return None;
        }
        if lx % cell_w >= self.tile_width() || ly % cell_h >= self.tile_height() {
            return None;
        }
        let col = (lx / cell_w) as usize;
        let row = (ly / cell_h) as usize;
        if col >= self.columns {
            return None;
        }
        let index = row * self.columns + col;
        (index < self.count).then_some(index)
    }

    /// First and last row intersecting the viewport, `None` when nothing is visible
    pub fn visible_rows(&self) -> Option<(usize, usize)> {
        if self.rows == 0 || self.viewport.is_empty() {
            return None;
        }
        let cell_h = self.tile_height() + self.padding;
        let first = ((self.scroll.y - self.padding).max(0) / cell_h) as usize;
        let last = (((self.scroll.y + self.viewport.height - 1) / cell_h) as usize).min(self.rows - 1);
        (first <= last).then_some((first, last))
    }

    /// Indices of all tiles in the visible rows
    pub fn visible_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        if let Some((first, last)) = self.visible_rows() {
            for row in first..=last {
                let base = row * self.columns;
                for col in 0..self.columns {
                    let index = base + col;
                    if index >= self.count {
                        break;
                    }
                    indices.push(index);
                }
            }
        }
        indices
    }

    /// Indices of all tiles intersecting a content rectangle.
    ///
    /// Only the rows and columns spanned by `rect` are visited.
    pub fn indices_in_rect(&self, rect: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        if rect.is_empty() || self.count == 0 {
            return out;
        }
        let cell_w = self.tile_width() + self.padding;
        let cell_h = self.tile_height() + self.padding;

        let row_lo = (rect.y.saturating_sub(self.padding).max(0) / cell_h) as usize;
        let row_hi = ((rect.bottom().saturating_sub(1 + self.padding).max(0) / cell_h) as usize).min(self.rows.saturating_sub(1));
        let col_lo = (rect.x.saturating_sub(self.padding).max(0) / cell_w) as usize;
        let col_hi = ((rect.right().saturating_sub(1 + self.padding).max(0) / cell_w) as usize).min(self.columns - 1);
        if rect.bottom() <= self.padding || rect.right() <= self.padding {
            return out;
        }

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let index = row * self.columns + col;
                if index >= self.count {
                    break;
                }
                if self.tile_rect(index).intersects(&rect) {
                    out.push(index);
                }
            }
        }
        out
    }
}
