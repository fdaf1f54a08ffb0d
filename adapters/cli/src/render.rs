use gridpack_core::ItemId;
use gridpack_grid::query::OccupancyView;

const FREE_CELL: char = '.';

/// Renders the grid as one text line per row.
pub(crate) fn render_grid(view: OccupancyView<'_>, out: &mut Vec<String>) {
    let dimensions = view.dimensions();
    out.push(format!("grid {}x{}", dimensions.width(), dimensions.height()));
    for row in view.rows() {
        out.push(row.iter().map(|cell| glyph(*cell)).collect());
    }
}

const UNNAMED_ITEM: char = '#';

// Catalogs stop at 35 items, so every catalog id has its own digit.
fn glyph(cell: Option<ItemId>) -> char {
    match cell {
        Some(id) => char::from_digit(id.get(), 36).unwrap_or(UNNAMED_ITEM),
        None => FREE_CELL,
    }
}
