use std::cell::Cell;
use std::rc::Rc;

use icy_gallery::{Gallery, GalleryMessage, Modifiers, Point, Rect, Size};

/// One row of ten 64px tiles (viewport wide enough for 11 columns)
fn strip() -> Gallery {
    let mut g = Gallery::new();
    g.set_viewport_size(Size::new(800, 300));
    for i in 0..10 {
        g.add(format!("Item {}", i + 1), None, None);
    }
    g.take_messages();
    g
}

fn center(g: &Gallery, index: usize) -> Point {
    g.layout().to_view(g.layout().tile_rect(index).center())
}

/// Point in the gap left of tile `index`
fn gap_before(g: &Gallery, index: usize) -> Point {
    let tile = g.layout().tile_rect(index);
    g.layout().to_view(Point::new(tile.x - 4, tile.y + 20))
}

fn drag(g: &mut Gallery, from: Point, to: Point, modifiers: Modifiers) {
    g.pointer_down(from, modifiers);
    g.pointer_move(Point::new(from.x + 5, from.y), modifiers, true);
    g.pointer_move(to, modifiers, true);
    g.pointer_up(to, modifiers);
}

/// Sweeps from the gap before tile 3 into tile 5, hitting {3, 4, 5}
fn sweep_3_to_5(g: &mut Gallery, modifiers: Modifiers) {
    let from = gap_before(g, 3);
    let to = center(g, 5);
    assert_eq!(g.layout().index_from_point(from), None);
    drag(g, from, to, modifiers);
}

fn with_123() -> Gallery {
    let mut g = strip();
    assert!(g.commit_selection([1, 2, 3]));
    g.take_messages();
    g
}

#[test]
fn marquee_replace() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::empty());
    assert_eq!(g.selection(), vec![3, 4, 5]);
}

#[test]
fn marquee_add() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn marquee_subtract() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::ALT);
    assert_eq!(g.selection(), vec![1, 2]);
}

#[test]
fn marquee_intersect() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::CTRL | Modifiers::ALT);
    assert_eq!(g.selection(), vec![3]);
}

#[test]
fn marquee_toggle() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::CTRL);
    assert_eq!(g.selection(), vec![1, 2, 4, 5]);
}

#[test]
fn logo_key_does_not_change_mode() {
    let mut g = with_123();
    sweep_3_to_5(&mut g, Modifiers::SHIFT | Modifiers::LOGO);
    assert_eq!(g.selection(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn toggle_binding_can_be_switched_off() {
    let mut g = with_123();
    let mut options = g.options().clone();
    options.bindings.marquee_toggle = false;
    g.apply_options(&options);
    // Ctrl alone now falls through to Add
    sweep_3_to_5(&mut g, Modifiers::CTRL);
    assert_eq!(g.selection(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn shift_click_selects_range_from_anchor() {
    let mut g = strip();
    let p = center(&g, 2);
    g.pointer_down(p, Modifiers::empty());
    g.pointer_up(p, Modifiers::empty());
    assert_eq!(g.selection(), vec![2]);
    assert_eq!(g.anchor(), Some(2));

    let p = center(&g, 5);
    g.pointer_down(p, Modifiers::SHIFT);
    g.pointer_up(p, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![2, 3, 4, 5]);
    assert_eq!(g.anchor(), Some(2));

    // range backwards from the same anchor
    let p = center(&g, 0);
    g.pointer_down(p, Modifiers::SHIFT);
    g.pointer_up(p, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![0, 1, 2]);
}

#[test]
fn ctrl_click_toggles_single_item() {
    let mut g = with_123();
    let p = center(&g, 2);
    g.pointer_down(p, Modifiers::CTRL);
    g.pointer_up(p, Modifiers::CTRL);
    assert_eq!(g.selection(), vec![1, 3]);
    assert_eq!(g.anchor(), Some(2));
}

#[test]
fn click_is_resolved_on_release_not_on_press() {
    let mut g = with_123();
    let p = center(&g, 7);
    g.pointer_down(p, Modifiers::empty());
    assert_eq!(g.selection(), vec![1, 2, 3]);
    // jitter inside the threshold keeps it a click
    g.pointer_move(Point::new(p.x + 2, p.y - 2), Modifiers::empty(), true);
    g.pointer_up(Point::new(p.x + 2, p.y - 2), Modifiers::empty());
    assert_eq!(g.selection(), vec![7]);
}

#[test]
fn drag_past_threshold_supersedes_click() {
    let mut g = strip();
    let from = center(&g, 4);
    let to = gap_before(&g, 6);
    assert_eq!(g.layout().index_from_point(to), None);

    g.pointer_down(from, Modifiers::empty());
    g.pointer_move(Point::new(from.x + 10, from.y), Modifiers::empty(), true);
    assert!(g.gesture().is_dragging());
    let marquee = Rect::from_points(g.layout().to_content(from), g.layout().to_content(to));
    g.pointer_move(to, Modifiers::empty(), true);
    g.pointer_up(to, Modifiers::empty());

    // the marquee decides, the pressed item does not become a click selection
    assert!(g.gesture().is_idle());
    assert_eq!(g.anchor(), None);
    assert_eq!(g.selection(), g.layout().indices_in_rect(marquee));
    // 4 is in there because the marquee starts inside its tile, a click would have left the anchor on it
    assert_eq!(g.selection(), vec![4, 5]);
}

#[test]
fn empty_space_press_clears_selection() {
    let mut g = with_123();
    let p = gap_before(&g, 8);
    g.pointer_down(p, Modifiers::empty());
    assert!(g.selection().is_empty());
    g.pointer_up(p, Modifiers::empty());
    assert!(g.selection().is_empty());
    assert!(!g.has_capture());
}

#[test]
fn empty_space_press_with_modifier_keeps_selection() {
    let mut g = with_123();
    let p = gap_before(&g, 8);
    g.pointer_down(p, Modifiers::SHIFT);
    g.pointer_up(p, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![1, 2, 3]);
}

#[test]
fn capture_loss_keeps_last_committed_selection() {
    let mut g = strip();
    let from = gap_before(&g, 3);
    g.pointer_down(from, Modifiers::empty());
    g.pointer_move(center(&g, 4), Modifiers::empty(), true);
    assert_eq!(g.selection(), vec![3, 4]);

    g.capture_lost();
    assert!(g.gesture().is_idle());
    assert!(!g.has_capture());
    assert_eq!(g.selection(), vec![3, 4]);

    // a late release is ignored
    g.pointer_up(center(&g, 9), Modifiers::empty());
    assert_eq!(g.selection(), vec![3, 4]);
}

#[test]
fn adopted_drag_starts_a_marquee() {
    let mut g = with_123();
    let from = gap_before(&g, 6);
    g.pointer_move(from, Modifiers::empty(), true);
    assert!(g.has_capture());
    assert_eq!(g.take_messages(), vec![GalleryMessage::CaptureRequested]);

    g.pointer_move(center(&g, 7), Modifiers::empty(), true);
    g.pointer_up(center(&g, 7), Modifiers::empty());
    assert_eq!(g.selection(), vec![6, 7]);
    assert!(!g.has_capture());
}

#[test]
fn commit_is_noop_when_equal() {
    let mut g = strip();
    assert!(g.commit_selection([2, 1]));
    assert_eq!(g.take_messages(), vec![GalleryMessage::SelectionChanged]);
    assert!(!g.commit_selection([1, 2, 1]));
    assert!(g.take_messages().is_empty());
}

#[test]
fn vetoed_commit_changes_nothing() {
    let mut g = with_123();
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();
    g.set_selection_veto(move |candidate| {
        seen.set(seen.get() + 1);
        candidate.len() <= 2
    });

    assert!(!g.commit_selection([4, 5, 6]));
    assert_eq!(g.selection(), vec![1, 2, 3]);
    assert!(g.take_messages().is_empty());

    // out of range indices are dropped before the veto sees them
    assert!(g.commit_selection([4, 99, 100]));
    assert_eq!(g.selection(), vec![4]);
    assert_eq!(calls.get(), 2);

    g.clear_selection_veto();
    assert!(g.select_all());
    assert_eq!(g.selection().len(), 10);
}

#[test]
fn vetoed_click_keeps_anchor() {
    let mut g = strip();
    g.set_selection_veto(|candidate| !candidate.contains(&3));
    let p = center(&g, 3);
    g.pointer_down(p, Modifiers::empty());
    g.pointer_up(p, Modifiers::empty());
    assert!(g.selection().is_empty());
    assert_eq!(g.anchor(), None);
}

#[test]
fn vetoed_clear_keeps_selection_as_marquee_baseline() {
    let mut g = with_123();
    g.set_selection_veto(|candidate| !candidate.is_empty());
    let from = gap_before(&g, 6);
    let to = center(&g, 7);

    g.pointer_down(from, Modifiers::empty());
    assert_eq!(g.selection(), vec![1, 2, 3]);
    // shift pressed after the button went down, the marquee adds to what is still selected
    g.pointer_move(Point::new(from.x + 5, from.y), Modifiers::SHIFT, true);
    g.pointer_move(to, Modifiers::SHIFT, true);
    g.pointer_up(to, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![1, 2, 3, 6, 7]);
}

#[test]
fn accepted_clear_starts_marquee_from_nothing() {
    let mut g = with_123();
    let from = gap_before(&g, 6);
    let to = center(&g, 7);

    g.pointer_down(from, Modifiers::empty());
    assert!(g.selection().is_empty());
    g.pointer_move(Point::new(from.x + 5, from.y), Modifiers::SHIFT, true);
    g.pointer_move(to, Modifiers::SHIFT, true);
    g.pointer_up(to, Modifiers::SHIFT);
    assert_eq!(g.selection(), vec![6, 7]);
}
