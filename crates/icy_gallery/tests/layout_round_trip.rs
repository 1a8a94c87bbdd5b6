use icy_gallery::{Gallery, GridLayout, Point, Rect, ScrollMode, Size, ZOOM_STEPS};

#[test]
fn center_of_every_tile_maps_back_to_its_index() {
    for edge in ZOOM_STEPS {
        for (width, padding, label) in [(400, 8, 18), (1, 0, 0), (333, 64, 64), (1024, 3, 12)] {
            let mut layout = GridLayout::new(Size::new(width, 300), edge, padding, label);
            layout.set_count(257);
            for i in 0..257 {
                let rect = layout.tile_rect(i);
                assert_eq!(layout.index_from_point(rect.center()), Some(i), "edge {edge} width {width} index {i}");
                assert_eq!(layout.index_from_point(Point::new(rect.x, rect.y)), Some(i));
                assert_eq!(layout.index_from_point(Point::new(rect.right() - 1, rect.bottom() - 1)), Some(i));
            }
        }
    }
}

#[test]
fn points_between_tiles_hit_nothing() {
    let mut layout = GridLayout::new(Size::new(400, 300), 64, 8, 18);
    layout.set_count(12);
    let a = layout.tile_rect(0);
    let b = layout.tile_rect(1);
    for x in a.right()..b.x {
        assert_eq!(layout.index_from_point(Point::new(x, a.center().y)), None);
    }
    let below = layout.tile_rect(5);
    for y in a.bottom()..below.y {
        assert_eq!(layout.index_from_point(Point::new(a.center().x, y)), None);
    }
}

#[test]
fn out_of_range_tile_rect_is_empty() {
    let mut layout = GridLayout::new(Size::new(400, 300), 64, 8, 18);
    layout.set_count(3);
    assert_eq!(layout.tile_rect(3), Rect::EMPTY);
    assert_eq!(layout.tile_rect(usize::MAX), Rect::EMPTY);
}

#[test]
fn zero_width_viewport_keeps_one_column() {
    let mut layout = GridLayout::new(Size::new(0, 0), 128, 8, 18);
    layout.set_count(5);
    assert_eq!(layout.columns(), 1);
    assert_eq!(layout.rows(), 5);
}

#[test]
fn scroll_clamps_when_items_go_away() {
    let mut g = Gallery::new();
    g.set_viewport_size(Size::new(400, 300));
    for i in 0..500 {
        g.add(format!("Item {i}"), None, None);
    }
    g.set_scroll_offset(Point::new(0, 5000));
    assert_eq!(g.scroll_offset().y, 5000);

    g.clear();
    assert_eq!(g.scroll_offset(), Point::ORIGIN);
    assert_eq!(g.content_size(), Size::ZERO);
}

#[test]
fn scroll_clamps_when_count_shrinks() {
    let mut layout = GridLayout::new(Size::new(400, 300), 64, 8, 18);
    layout.set_count(500);
    layout.set_scroll(Point::new(0, 100_000));
    layout.set_count(10);
    // 2 rows fit into the viewport, nothing left to scroll
    assert_eq!(layout.scroll_offset(), Point::ORIGIN);
    layout.set_count(0);
    assert_eq!(layout.scroll_offset(), Point::ORIGIN);
    assert_eq!(layout.content_size(), Size::ZERO);
}

#[test]
fn vertical_only_never_scrolls_horizontally() {
    let mut layout = GridLayout::new(Size::new(40, 100), 64, 8, 18);
    layout.set_scroll_mode(ScrollMode::VerticalOnly);
    layout.set_count(30);
    assert!(!layout.set_scroll(Point::new(500, 0)));
    assert_eq!(layout.scroll_offset().x, 0);
    assert!(layout.scroll_by(0, 50));
}

#[test]
fn visible_rows_bound_the_work() {
    let mut layout = GridLayout::new(Size::new(400, 300), 64, 8, 18);
    layout.set_count(1_000_000);
    layout.set_scroll(Point::new(0, 4_500_000));
    let visible = layout.visible_indices();
    // 300px viewport over 90px rows: at most 5 rows of 5 columns
    assert!(visible.len() <= 25, "{}", visible.len());
    let viewport = Rect::new(0, layout.scroll_offset().y, 400, 300);
    for i in visible {
        let rect = layout.tile_rect(i);
        assert!(rect.y < viewport.bottom() && rect.bottom() > viewport.y - 8);
    }
}

#[test]
fn huge_single_column_grid_saturates_instead_of_overflowing() {
    // 0 wide viewport forces one column, 15M rows of 154px exceed i32
    let mut layout = GridLayout::new(Size::new(0, 300), 128, 8, 18);
    layout.set_count(15_000_000);
    assert_eq!(layout.columns(), 1);
    assert_eq!(layout.rows(), 15_000_000);
    assert_eq!(layout.content_size(), Size::new(144, i32::MAX));

    layout.set_scroll(Point::new(0, i32::MAX));
    assert_eq!(layout.scroll_offset().y, i32::MAX - 300);
    assert!(!layout.scroll_by(0, i32::MAX));
    let visible = layout.visible_indices();
    assert!(!visible.is_empty() && visible.len() <= 3, "{visible:?}");

    let rect = layout.tile_rect(1_000_000);
    assert_eq!(rect.y, 8 + 1_000_000 * 154);
    assert_eq!(layout.index_from_point(rect.center()), Some(1_000_000));

    let last = layout.tile_rect(14_999_999);
    assert_eq!(last.bottom(), i32::MAX);
    assert_eq!(last.height, 146);
}
