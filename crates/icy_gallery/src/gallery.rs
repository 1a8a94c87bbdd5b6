//! The gallery widget core.
//!
//! [`Gallery`] owns the items, the grid layout and the interaction state. The host forwards pointer, wheel
//! and key events in viewport coordinates, drains [`GalleryMessage`]s after each call and repaints when
//! [`Gallery::needs_repaint`] is set.

use std::collections::BTreeSet;

use image::{Rgba, RgbaImage};

use crate::double_click::DoubleClickDetector;
use crate::events::{ContextMenuHook, GalleryMessage, SelectionVeto};
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{CaptureChange, GestureContext, GestureInput, GestureOutcome, GestureState};
use crate::glyph::{GlyphCache, SharedGlyphCache};
use crate::item::{DataFlags, GalleryItem, ThumbStatus};
use crate::layout::{zoom_edge, GridLayout, ScrollMode, MAX_SPACING, ZOOM_STEPS};
use crate::menu::{ContextMenu, MenuAction, MenuEntry};
use crate::options::GalleryOptions;
use crate::render::{self, Palette, ViewState};
use crate::selection::Modifiers;
use crate::surface::Surface;
use crate::thumbnail::AspectPolicy;

/// Keys the gallery reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Plus,
    Minus,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitResult {
    Vetoed,
    Unchanged,
    Changed,
}

pub struct Gallery {
    items: Vec<GalleryItem>,
    layout: GridLayout,
    options: GalleryOptions,
    palette: Palette,
    glyphs: SharedGlyphCache,

    hover: Option<usize>,
    /// Last click target, start of shift-range clicks
    anchor: Option<usize>,
    gesture: GestureState,
    has_capture: bool,
    /// The button of a gesture dropped by a structural change is still down
    stale_button: bool,
    double_click: DoubleClickDetector<usize>,

    messages: Vec<GalleryMessage>,
    selection_veto: Option<SelectionVeto>,
    context_menu_hook: Option<ContextMenuHook>,
    dirty: bool,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self::with_glyph_cache(GlyphCache::shared())
    }

    /// Gallery using a glyph cache shared with other instances
    pub fn with_glyph_cache(glyphs: SharedGlyphCache) -> Self {
        let options = GalleryOptions::default();
        let layout = GridLayout::new(Size::ZERO, zoom_edge(options.zoom_index), options.tile_padding, options.label_height);
        Self {
            items: Vec::new(),
            layout,
            double_click: DoubleClickDetector::with_window_ms(options.double_click_ms),
            options,
            palette: Palette::default(),
            glyphs,
            hover: None,
            anchor: None,
            gesture: GestureState::Idle,
            has_capture: false,
            stale_button: false,
            messages: Vec::new(),
            selection_veto: None,
            context_menu_hook: None,
            dirty: true,
        }
    }

    pub fn with_options(options: &GalleryOptions) -> Self {
        let mut gallery = Self::new();
        gallery.apply_options(options);
        gallery.messages.clear();
        gallery
    }

    pub fn glyph_cache(&self) -> SharedGlyphCache {
        self.glyphs.clone()
    }

    // === Items ===

    /// Appends an item and returns its index
    pub fn add(&mut self, name: impl Into<String>, image: Option<RgbaImage>, tint: Option<Rgba<u8>>) -> usize {
        self.items.push(GalleryItem::new(name, image, tint));
        self.layout.set_count(self.items.len());
        self.dirty = true;
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn set_thumb_image(&mut self, index: usize, image: RgbaImage) {
        if let Some(item) = self.items.get_mut(index) {
            item.set_source(Some(image));
            self.dirty = true;
        }
    }

    pub fn clear_thumb_image(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.set_source(None);
            self.dirty = true;
        }
    }

    pub fn set_status(&mut self, index: usize, status: ThumbStatus) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = status;
            self.dirty = true;
        }
    }

    pub fn clear_status(&mut self, index: usize) {
        self.set_status(index, ThumbStatus::Auto);
    }

    pub fn set_data_flags(&mut self, index: usize, flags: DataFlags) {
        if let Some(item) = self.items.get_mut(index) {
            item.flags = flags;
            self.dirty = true;
        }
    }

    pub fn clear_data_flags(&mut self, index: usize) {
        self.set_data_flags(index, DataFlags::empty());
    }

    /// Data flags of an item, empty for out of range indices
    pub fn data_flags(&self, index: usize) -> DataFlags {
        self.items.get(index).map_or(DataFlags::empty(), GalleryItem::flags)
    }

    pub fn set_filtered(&mut self, index: usize, filtered_out: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.filtered_out = filtered_out;
            self.dirty = true;
        }
    }

    pub fn clear_filter_flags(&mut self) {
        for item in &mut self.items {
            item.filtered_out = false;
        }
        self.dirty = true;
    }

    /// Removes all selected items, returns how many were removed
    pub fn remove_selected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.selected);
        let removed = before - self.items.len();
        if removed > 0 {
            log::debug!("[Gallery] removed {removed} selected items");
            self.reset_interaction();
            self.layout.set_count(self.items.len());
            self.messages.push(GalleryMessage::SelectionChanged);
            self.dirty = true;
        }
        removed
    }

    /// Removes all items and scrolls back to the origin
    pub fn clear(&mut self) {
        let had_selection = self.items.iter().any(|item| item.selected);
        self.items.clear();
        self.reset_interaction();
        self.layout.set_count(0);
        self.layout.set_scroll(Point::ORIGIN);
        if had_selection {
            self.messages.push(GalleryMessage::SelectionChanged);
        }
        self.dirty = true;
    }

    /// Drops every piece of interaction state that refers to item positions
    fn reset_interaction(&mut self) {
        if !self.gesture.is_idle() {
            log::debug!("[Gallery] structural change during gesture, resetting");
        }
        // moves and the release of that press must not start or end anything
        self.stale_button = !self.gesture.is_idle();
        self.gesture = GestureState::Idle;
        self.release_capture();
        self.double_click.reset();
        self.set_anchor(None);
        self.set_hover(None);
    }

    // === Selection ===

    /// Selected indices in ascending order
    pub fn selection(&self) -> Vec<usize> {
        self.items.iter().enumerate().filter(|(_, item)| item.selected).map(|(i, _)| i).collect()
    }

    /// Runs `indices` through the commit protocol. Returns `true` if the selection changed.
    pub fn commit_selection(&mut self, indices: impl IntoIterator<Item = usize>) -> bool {
        let candidate: BTreeSet<usize> = indices.into_iter().collect();
        self.commit(candidate) == CommitResult::Changed
    }

    pub fn clear_selection(&mut self) -> bool {
        self.commit(BTreeSet::new()) == CommitResult::Changed
    }

    pub fn select_all(&mut self) -> bool {
        self.commit((0..self.items.len()).collect()) == CommitResult::Changed
    }

    pub fn invert_selection(&mut self) -> bool {
        let inverted = self.items.iter().enumerate().filter(|(_, item)| !item.selected).map(|(i, _)| i).collect();
        self.commit(inverted) == CommitResult::Changed
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    /// Marquee rectangle in content coordinates while a drag is in progress
    pub fn marquee(&self) -> Option<Rect> {
        self.gesture.marquee()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn has_capture(&self) -> bool {
        self.has_capture
    }

    fn commit(&mut self, candidate: BTreeSet<usize>) -> CommitResult {
        let count = self.items.len();
        let candidate: BTreeSet<usize> = candidate.into_iter().filter(|&i| i < count).collect();

        if let Some(veto) = self.selection_veto.as_mut() {
            let sorted: Vec<usize> = candidate.iter().copied().collect();
            if !veto(&sorted) {
                log::debug!("[Gallery] selection of {} items vetoed", sorted.len());
                return CommitResult::Vetoed;
            }
        }

        let current: BTreeSet<usize> = self.selection().into_iter().collect();
        if current == candidate {
            return CommitResult::Unchanged;
        }

        for &i in &current {
            self.items[i].selected = false;
        }
        for &i in &candidate {
            self.items[i].selected = true;
        }
        log::trace!("[Gallery] selection committed: {} items", candidate.len());
        self.messages.push(GalleryMessage::SelectionChanged);
        self.dirty = true;
        CommitResult::Changed
    }

    fn set_anchor(&mut self, anchor: Option<usize>) {
        if self.anchor != anchor {
            self.anchor = anchor;
            self.messages.push(GalleryMessage::AnchorChanged(anchor));
        }
    }

    fn set_hover(&mut self, hover: Option<usize>) {
        if self.hover != hover {
            self.hover = hover;
            self.messages.push(GalleryMessage::HoverChanged(hover));
            self.dirty = true;
        }
    }

    // === Hooks & messages ===

    /// Installs a hook that may reject a selection change before it is applied
    pub fn set_selection_veto(&mut self, veto: impl FnMut(&[usize]) -> bool + 'static) {
        self.selection_veto = Some(Box::new(veto));
    }

    pub fn clear_selection_veto(&mut self) {
        self.selection_veto = None;
    }

    pub fn set_context_menu_hook(&mut self, hook: impl FnMut(&mut ContextMenu) + 'static) {
        self.context_menu_hook = Some(Box::new(hook));
    }

    /// Drains the queued notifications
    pub fn take_messages(&mut self) -> Vec<GalleryMessage> {
        std::mem::take(&mut self.messages)
    }

    // === Configuration ===

    pub fn options(&self) -> &GalleryOptions {
        &self.options
    }

    pub fn apply_options(&mut self, options: &GalleryOptions) {
        let options = options.sanitized();
        self.set_zoom_index(options.zoom_index);
        self.set_aspect(options.aspect);
        self.set_tile_padding(options.tile_padding);
        self.set_label_height(options.label_height);
        self.set_scroll_mode(options.scroll_mode);
        self.set_show_selection_borders(options.show_selection_borders);
        self.set_show_filter_borders(options.show_filter_borders);
        self.set_desaturate_filtered(options.desaturate_filtered);
        self.set_hover_enabled(options.hover_enabled);
        self.set_label_backdrop_alpha(options.label_backdrop_alpha);
        self.double_click.set_window_ms(options.double_click_ms);
        self.options.drag_threshold = options.drag_threshold;
        self.options.detect_double_click = options.detect_double_click;
        self.options.double_click_ms = options.double_click_ms;
        self.options.bindings = options.bindings;
    }

    pub fn zoom_index(&self) -> usize {
        self.options.zoom_index
    }

    /// Selects a tile edge from `ZOOM_STEPS`. Cached thumbnails are dropped on change.
    pub fn set_zoom_index(&mut self, zoom_index: usize) {
        let zoom_index = zoom_index.min(ZOOM_STEPS.len() - 1);
        if self.options.zoom_index == zoom_index {
            return;
        }
        self.options.zoom_index = zoom_index;
        self.invalidate_thumbs();
        self.layout.set_edge(zoom_edge(zoom_index));
        log::debug!("[Gallery] zoom step {zoom_index} ({}px)", self.layout.edge());
        self.messages.push(GalleryMessage::ZoomChanged(zoom_index));
        self.dirty = true;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom_index(self.options.zoom_index + 1);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom_index(self.options.zoom_index.saturating_sub(1));
    }

    pub fn aspect(&self) -> AspectPolicy {
        self.options.aspect
    }

    pub fn set_aspect(&mut self, aspect: AspectPolicy) {
        if self.options.aspect == aspect {
            return;
        }
        self.options.aspect = aspect;
        self.invalidate_thumbs();
        self.dirty = true;
    }

    fn invalidate_thumbs(&mut self) {
        for item in &mut self.items {
            item.thumbs.invalidate();
        }
    }

    pub fn set_tile_padding(&mut self, padding: i32) {
        let padding = padding.clamp(0, MAX_SPACING);
        if self.options.tile_padding != padding {
            self.options.tile_padding = padding;
            self.layout.set_padding(padding);
            self.dirty = true;
        }
    }

    pub fn set_label_height(&mut self, label_height: i32) {
        let label_height = label_height.clamp(0, MAX_SPACING);
        if self.options.label_height != label_height {
            self.options.label_height = label_height;
            self.layout.set_label_height(label_height);
            self.dirty = true;
        }
    }

    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        if self.options.scroll_mode != mode {
            self.options.scroll_mode = mode;
            self.layout.set_scroll_mode(mode);
            self.dirty = true;
        }
    }

    pub fn set_show_selection_borders(&mut self, show: bool) {
        self.options.show_selection_borders = show;
        self.dirty = true;
    }

    pub fn set_show_filter_borders(&mut self, show: bool) {
        self.options.show_filter_borders = show;
        self.dirty = true;
    }

    pub fn set_desaturate_filtered(&mut self, desaturate: bool) {
        self.options.desaturate_filtered = desaturate;
        self.dirty = true;
    }

    pub fn set_hover_enabled(&mut self, enabled: bool) {
        self.options.hover_enabled = enabled;
        if !enabled {
            self.set_hover(None);
        }
        self.dirty = true;
    }

    pub fn set_label_backdrop_alpha(&mut self, alpha: u8) {
        if self.options.label_backdrop_alpha != alpha {
            self.options.label_backdrop_alpha = alpha;
            self.dirty = true;
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.dirty = true;
    }

    // === Viewport & scrolling ===

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.layout.set_viewport(size);
        self.dirty = true;
    }

    pub fn scroll_offset(&self) -> Point {
        self.layout.scroll_offset()
    }

    pub fn set_scroll_offset(&mut self, offset: Point) -> bool {
        let changed = self.layout.set_scroll(offset);
        self.dirty |= changed;
        changed
    }

    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        let changed = self.layout.scroll_by(dx, dy);
        self.dirty |= changed;
        changed
    }

    // === Input ===

    /// Primary button pressed at `p` (viewport coordinates)
    pub fn pointer_down(&mut self, p: Point, modifiers: Modifiers) {
        self.stale_button = false;
        let content = self.layout.to_content(p);
        let hit = self.layout.index_from_point(content);

        if self.options.detect_double_click {
            match hit {
                Some(index) if self.double_click.is_double_click(index) => {
                    self.activate(index);
                    return;
                }
                Some(_) => {}
                None => self.double_click.reset(),
            }
        }

        self.step_gesture(GestureInput::Press {
            point: content,
            hit,
            modifiers,
        });
    }

    /// Pointer moved. `left_held` tells whether the primary button is down; a move with the button held
    /// and no gesture in progress adopts a drag that started outside the gallery.
    pub fn pointer_move(&mut self, p: Point, modifiers: Modifiers, left_held: bool) {
        let content = self.layout.to_content(p);
        if self.stale_button {
            if left_held {
                return;
            }
            self.stale_button = false;
        }

        if self.gesture.is_idle() {
            if left_held && !self.has_capture {
                self.step_gesture(GestureInput::Adopt { point: content });
                return;
            }
            if self.options.hover_enabled {
                let hit = self.layout.index_from_point(content);
                self.set_hover(hit);
            }
            return;
        }

        self.step_gesture(GestureInput::Move { point: content, modifiers });
    }

    pub fn pointer_up(&mut self, p: Point, modifiers: Modifiers) {
        if std::mem::take(&mut self.stale_button) {
            log::debug!("[Gallery] ignoring release of a dropped gesture");
            return;
        }
        let content = self.layout.to_content(p);
        self.step_gesture(GestureInput::Release { point: content, modifiers });
    }

    /// Native double-click from the host
    pub fn double_click(&mut self, p: Point) {
        if let Some(index) = self.layout.index_from_point(self.layout.to_content(p)) {
            self.activate(index);
        }
    }

    /// Builds the context menu for a right click at `p`. The selection is left alone.
    pub fn right_click(&mut self, p: Point) -> ContextMenu {
        let target = self.layout.index_from_point(self.layout.to_content(p));
        let has_items = !self.items.is_empty();
        let has_selection = self.items.iter().any(|item| item.selected);
        let zoom = self.options.zoom_index;

        let mut menu = ContextMenu::new(target);
        menu.add(MenuEntry::new("Select all", MenuAction::SelectAll).enabled(has_items));
        menu.add(MenuEntry::new("Clear selection", MenuAction::ClearSelection).enabled(has_selection));
        menu.add(MenuEntry::new("Invert selection", MenuAction::InvertSelection).enabled(has_items));
        menu.separator();
        menu.add(MenuEntry::new("Zoom in", MenuAction::ZoomIn).enabled(zoom + 1 < ZOOM_STEPS.len()));
        menu.add(MenuEntry::new("Zoom out", MenuAction::ZoomOut).enabled(zoom > 0));

        if let Some(hook) = self.context_menu_hook.as_mut() {
            hook(&mut menu);
        }
        menu
    }

    /// Performs a built-in menu action. Returns `false` for `Custom` actions, which belong to the host.
    pub fn execute(&mut self, action: MenuAction) -> bool {
        match action {
            MenuAction::SelectAll => {
                self.select_all();
            }
            MenuAction::ClearSelection => {
                self.clear_selection();
            }
            MenuAction::InvertSelection => {
                self.invert_selection();
            }
            MenuAction::ZoomIn => self.zoom_in(),
            MenuAction::ZoomOut => self.zoom_out(),
            MenuAction::SetAspect(aspect) => self.set_aspect(aspect),
            MenuAction::Custom(_) => return false,
        }
        true
    }

    pub fn pointer_leave(&mut self) {
        if self.options.hover_enabled {
            self.set_hover(None);
        }
    }

    /// The host revoked pointer capture; any gesture is dropped, the last committed selection stays
    pub fn capture_lost(&mut self) {
        let was_active = !self.gesture.is_idle();
        self.step_gesture(GestureInput::CaptureLost);
        self.has_capture = false;
        self.dirty |= was_active;
    }

    /// Wheel notch. Ctrl zooms, Shift scrolls horizontally, otherwise vertically. Positive `delta` is
    /// away from the user (zoom in / scroll up).
    pub fn wheel(&mut self, delta: i32, modifiers: Modifiers) -> bool {
        if delta == 0 {
            return false;
        }
        if modifiers.contains(Modifiers::CTRL) {
            let before = self.options.zoom_index;
            if delta > 0 {
                self.zoom_in();
            } else {
                self.zoom_out();
            }
            return before != self.options.zoom_index;
        }

        let step = if delta > 0 { -self.layout.line_step() } else { self.layout.line_step() };
        if modifiers.contains(Modifiers::SHIFT) {
            self.scroll_by(step, 0)
        } else {
            self.scroll_by(0, step)
        }
    }

    /// Keyboard input, returns `true` if the key was handled
    pub fn key_down(&mut self, key: GalleryKey, modifiers: Modifiers) -> bool {
        let line = self.layout.line_step();
        let page = self.layout.viewport();
        let ctrl = modifiers.contains(Modifiers::CTRL);

        match key {
            GalleryKey::Char('a' | 'A') if ctrl => {
                self.select_all();
            }
            GalleryKey::Plus if ctrl => self.zoom_in(),
            GalleryKey::Minus if ctrl => self.zoom_out(),
            GalleryKey::Up => {
                self.scroll_by(0, -line);
            }
            GalleryKey::Down => {
                self.scroll_by(0, line);
            }
            GalleryKey::Left => {
                self.scroll_by(-line, 0);
            }
            GalleryKey::Right => {
                self.scroll_by(line, 0);
            }
            GalleryKey::PageUp => {
                self.scroll_by(0, -page.height.max(line));
            }
            GalleryKey::PageDown => {
                self.scroll_by(0, page.height.max(line));
            }
            GalleryKey::Home => {
                self.set_scroll_offset(Point::ORIGIN);
            }
            GalleryKey::End => {
                let max = self.layout.max_scroll();
                self.set_scroll_offset(Point::new(self.scroll_offset().x, max.y));
            }
            GalleryKey::Enter => match self.anchor {
                Some(anchor) if anchor < self.items.len() => self.activate(anchor),
                _ => return false,
            },
            _ => return false,
        }
        true
    }

    fn activate(&mut self, index: usize) {
        log::debug!("[Gallery] activate {index}");
        self.messages.push(GalleryMessage::Activated(index));
    }

    fn step_gesture(&mut self, input: GestureInput) {
        let state = std::mem::take(&mut self.gesture);
        let was_dragging = state.is_dragging();
        let ctx = SelectionContext {
            items: &self.items,
            layout: &self.layout,
            anchor: self.anchor,
        };
        let (next, outcome) = state.step(input, &ctx, &self.options.bindings, self.options.drag_threshold);
        if next.is_dragging() || was_dragging {
            self.dirty = true;
        }
        self.gesture = next;
        if self.apply_outcome(outcome) {
            // a rejected clear leaves the old selection in place, modifiers combine against it
            let current: BTreeSet<usize> = self.selection().into_iter().collect();
            if let GestureState::PendingClick(pending) = &mut self.gesture {
                if pending.click.is_none() {
                    pending.baseline = current;
                }
            }
        }
    }

    /// Applies capture, selection and anchor changes. Returns true if the selection commit was vetoed
    fn apply_outcome(&mut self, outcome: GestureOutcome) -> bool {
        if let Some(CaptureChange::Request) = outcome.capture {
            if !self.has_capture {
                self.has_capture = true;
                self.messages.push(GalleryMessage::CaptureRequested);
            }
        }

        let vetoed = match outcome.commit {
            Some(candidate) => self.commit(candidate) == CommitResult::Vetoed,
            None => false,
        };
        if let Some(anchor) = outcome.anchor {
            if !vetoed {
                self.set_anchor(Some(anchor));
            }
        }

        if let Some(CaptureChange::Release) = outcome.capture {
            self.release_capture();
            self.dirty = true;
        }
        vetoed
    }

    fn release_capture(&mut self) {
        if self.has_capture {
            self.has_capture = false;
            self.messages.push(GalleryMessage::CaptureReleased);
        }
    }

    // === Painting ===

    pub fn needs_repaint(&self) -> bool {
        self.dirty
    }

    /// Paints the visible tiles and clears the repaint flag
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        let view = ViewState {
            hover: self.hover.filter(|_| self.options.hover_enabled),
            marquee: self.gesture.marquee(),
        };
        render::paint(surface, &mut self.items, &self.layout, &self.options, &self.palette, &self.glyphs, view);
        self.dirty = false;
    }
}

/// Read-only view of the gallery handed to the gesture machine
struct SelectionContext<'a> {
    items: &'a [GalleryItem],
    layout: &'a GridLayout,
    anchor: Option<usize>,
}

impl GestureContext for SelectionContext<'_> {
    fn current_selection(&self) -> BTreeSet<usize> {
        self.items.iter().enumerate().filter(|(_, item)| item.selected).map(|(i, _)| i).collect()
    }

    fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    fn hits_in(&self, rect: Rect) -> BTreeSet<usize> {
        self.layout.indices_in_rect(rect).into_iter().collect()
    }
}
