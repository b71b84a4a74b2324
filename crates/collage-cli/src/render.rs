//! Plain-text rendering of a grid for the `show` command.

use collage_layout::{CollageGrid, ItemId, Owner};

/// Occupancy map: item ids, `+` for placeholders, `.` for empty cells.
/// The selected item is starred.
pub(crate) fn occupancy_map(grid: &CollageGrid, selection: Option<ItemId>) -> String {
    let dims = grid.dims();
    let occupancy = grid.occupancy();
    let label = |position: usize| match occupancy.owner_at(position) {
        Some(Owner::Item(id)) if Some(id) == selection => format!("{}*", id.as_u64()),
        Some(Owner::Item(id)) => id.as_u64().to_string(),
        Some(Owner::Placeholder(_)) => "+".to_string(),
        None => ".".to_string(),
    };

    let labels: Vec<String> = (0..dims.cell_count()).map(label).collect();
    let width = labels
        .iter()
        .map(String::len)
        .chain([dims.columns.saturating_sub(1).to_string().len()])
        .max()
        .unwrap_or(1)
        + 1;
    let gutter = dims.rows.saturating_sub(1).to_string().len() + 1;

    let header: String = (0..dims.columns).map(|col| format!("{col:>width$}")).collect();
    let mut lines = vec![format!("{:gutter$}{header}", "")];
    for row in 0..dims.rows {
        let cells: String = (0..dims.columns)
            .map(|col| format!("{:>width$}", labels[dims.position(row, col)]))
            .collect();
        lines.push(format!("{row:<gutter$}{cells}"));
    }
    lines.join("\n") + "\n"
}

/// One line per item and placeholder.
pub(crate) fn entity_list(grid: &CollageGrid) -> String {
    let items = grid.items().iter().map(|item| {
        format!(
            "item {:<4} at {:<3} {}x{}  {}\n",
            item.id.as_u64(),
            item.position,
            item.row_span,
            item.col_span,
            item.image
        )
    });
    let slots = grid.placeholders().iter().map(|slot| {
        format!(
            "slot {:<4} at {:<3} {}x{}  {}\n",
            slot.id.as_u64(),
            slot.position,
            slot.row_span,
            slot.col_span,
            slot.tag
        )
    });
    items.chain(slots).collect()
}
