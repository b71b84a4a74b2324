//! Integration tests for collage-layout.
//!
//! These tests drive the engine through the public API the way an editor
//! session would: a sequence of edits, each either committed or rejected.

use collage_layout::{
    Axis, CellDelta, CollageGrid, GridDims, GridState, History, ImagePool, LayoutError,
    LayoutTemplate, RejectionKind, ResizeHandle, TemplateSlot, Tray,
};

fn row_template(name: &str, columns: usize, slots: usize) -> LayoutTemplate {
    LayoutTemplate::new(name, 1, columns, (0..slots).map(TemplateSlot::cell))
}

// =============================================================================
// Walkthrough Scenarios
// =============================================================================

#[test]
fn test_add_into_occupied_cell_is_rejected() {
    let mut grid = CollageGrid::with_size(2, 2);
    let id = grid.add_item(0, "img1").unwrap();
    let item = grid.item(id).unwrap();
    assert_eq!((item.position, item.row_span, item.col_span), (0, 1, 1));

    let err = grid.add_item(0, "img2").unwrap_err();
    assert_eq!(err.kind(), RejectionKind::Occupied);
    assert_eq!(grid.items().len(), 1);
}

#[test]
fn test_remove_column_of_full_grid_is_rejected() {
    let mut grid = CollageGrid::with_size(2, 2);
    for position in 0..4 {
        grid.add_item(position, format!("p{position}")).unwrap();
    }
    let before = grid.clone();

    let err = grid.remove_column(0).unwrap_err();
    assert_eq!(
        err,
        LayoutError::NotEmpty {
            axis: Axis::Column,
            index: 0
        }
    );
    assert_eq!(grid, before);
}

#[test]
fn test_resize_past_right_edge_is_rejected() {
    let mut grid = CollageGrid::with_size(1, 3);
    let id = grid.add_item_spanning(1, "wide", 1, 2).unwrap();

    let err = grid
        .resize_item(id, ResizeHandle::E, CellDelta::new(0, 1))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::OutOfBounds);
    let item = grid.item(id).unwrap();
    assert_eq!((item.position, item.row_span, item.col_span), (1, 1, 2));
}

#[test]
fn test_template_on_single_item_creates_placeholders() {
    let mut grid = CollageGrid::with_size(3, 3);
    let id = grid.add_item(4, "only").unwrap();
    let mut tray = Tray::new();

    let outcome = grid
        .apply_template_with_pool(&row_template("trio", 3, 3), &mut tray)
        .unwrap();
    assert_eq!(grid.items().len(), 1);
    assert_eq!(grid.item(id).unwrap().position, 0);
    let slots: Vec<_> = grid.placeholders().iter().map(|p| p.tag.slot).collect();
    assert_eq!(slots, vec![1, 2]);
    assert!(outcome.surplus.is_empty());
    assert!(tray.is_empty());
}

#[test]
fn test_place_all_fills_slots_then_cells() {
    let mut grid = CollageGrid::default();
    grid.apply_template(&row_template("pair", 3, 2)).unwrap();
    assert_eq!(grid.placeholders().len(), 2);
    assert_eq!(grid.empty_cells(), vec![2]);

    let mut tray: Tray = (1..=5).map(|n| format!("img{n}")).collect();
    let outcome = grid.place_all(&mut tray);

    assert_eq!((outcome.placed, outcome.remaining), (3, 2));
    assert!(grid.placeholders().is_empty());
    assert!(grid.is_full());
    assert_eq!(tray.available(), 2);
}

// =============================================================================
// Editing Sequences
// =============================================================================

#[test]
fn test_swap_twice_is_identity() {
    let mut grid = CollageGrid::with_size(3, 3);
    let a = grid.add_item_spanning(0, "a", 2, 2).unwrap();
    let b = grid.add_item(8, "b").unwrap();
    let before = grid.clone();

    grid.swap_items(a, b).unwrap();
    assert_eq!(grid.item(a).unwrap().position, 8);
    assert_eq!(grid.item(b).unwrap().col_span, 2);
    grid.swap_items(a, b).unwrap();
    assert_eq!(grid, before);
}

#[test]
fn test_move_preserves_span() {
    let mut grid = CollageGrid::with_size(3, 4);
    let id = grid.add_item_spanning(0, "tall", 2, 1).unwrap();
    grid.move_item(id, 3).unwrap();

    let item = grid.item(id).unwrap();
    assert_eq!((item.position, item.row_span, item.col_span), (3, 2, 1));
    assert_eq!(grid.item_at(7).map(|i| i.id), Some(id));
}

#[test]
fn test_insert_then_remove_row_restores_layout() {
    let mut grid = CollageGrid::with_size(3, 3);
    grid.add_item_spanning(0, "a", 1, 2).unwrap();
    grid.add_item(8, "b").unwrap();
    let before = grid.clone();

    grid.insert_row(1).unwrap();
    assert_eq!(grid.dims(), GridDims::new(4, 3));
    assert_eq!(grid.items()[1].position, 11);
    grid.remove_row(1).unwrap();
    assert_eq!(grid, before);
}

#[test]
fn test_resize_drag_stream_keeps_last_valid_geometry() {
    let mut grid = CollageGrid::with_size(2, 4);
    let id = grid.add_item(0, "grow").unwrap();
    grid.add_item(3, "wall").unwrap();

    let mut committed = None;
    for _ in 0..4 {
        if let Ok(area) = grid.resize_item(id, ResizeHandle::E, CellDelta::new(0, 1)) {
            committed = Some(area);
        }
    }
    assert_eq!(committed.map(|a| a.col_span_count()), Some(3));
    assert_eq!(grid.item(id).unwrap().col_span, 3);
}

#[test]
fn test_delete_returns_image_to_pool() {
    let mut grid = CollageGrid::with_size(1, 2);
    let id = grid.add_item(1, "gone").unwrap();
    let mut tray = Tray::new();

    let item = grid.delete_item(id).unwrap();
    tray.release(item.image);
    assert_eq!(grid.empty_cells(), vec![0, 1]);
    assert_eq!(tray.len(), 1);
    assert_eq!(grid.delete_item(id).unwrap_err().kind(), RejectionKind::NotFound);
}

// =============================================================================
// Persistence and History
// =============================================================================

#[test]
fn test_state_survives_json() {
    let mut grid = CollageGrid::default();
    grid.apply_template(&row_template("pair", 3, 2)).unwrap();
    grid.add_item(0, "first").unwrap();

    let json = grid.snapshot().to_json().unwrap();
    let restored = CollageGrid::from_state(GridState::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(restored.placeholders()[0].tag.template, "pair");
}

#[test]
fn test_history_round_trip_over_structural_edit() {
    let mut grid = CollageGrid::with_size(2, 2);
    let mut history: History = History::default();
    history.apply(&mut grid, "add", |g| g.add_item(3, "x")).unwrap();
    let after_add = grid.clone();

    history
        .apply(&mut grid, "insert column", |g| g.insert_column(0))
        .unwrap();
    assert_eq!(grid.columns(), 3);

    history.undo_grid(&mut grid).unwrap();
    assert_eq!(grid, after_add);
    history.redo_grid(&mut grid).unwrap();
    assert_eq!(grid.item_at(5).map(|i| i.image.as_str()), Some("x"));
}
