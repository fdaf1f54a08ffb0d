use std::{cell::RefCell, rc::Rc};

use gridpack_core::{
    CellCoord, DimensionError, GridDimensions, Item, ItemId, PlacementError, MAX_EXTENT,
};
use gridpack_grid::{query, Grid};
use gridpack_system_history::{CommandHistory, CommandOutcome};
use gridpack_system_placement::{PlaceItemCommand, PlacementHooks, Session};
use proptest::prelude::*;

fn item(id: u32, width: u32, height: u32) -> Item {
    Item::new(ItemId::new(id), width, height, 0).expect("valid item")
}

fn occupied_cells(grid: &Grid) -> Vec<(CellCoord, ItemId)> {
    let dimensions = grid.dimensions();
    let mut cells = Vec::new();
    for y in 0..dimensions.height() as i32 {
        for x in 0..dimensions.width() as i32 {
            let cell = CellCoord::new(x, y);
            if let Some(occupant) = query::occupant(grid, cell) {
                cells.push((cell, occupant));
            }
        }
    }
    cells
}

#[test]
fn undo_restores_square_after_bar_placement() {
    let mut grid = Grid::new(10, 6).expect("valid grid");
    let mut history = CommandHistory::new();
    let square = item(1, 2, 2);
    let bar = item(2, 3, 1);

    assert!(grid.can_place(&square, CellCoord::new(0, 0)));
    let outcome = history.execute_command(
        &mut grid,
        Box::new(PlaceItemCommand::new(square, CellCoord::new(0, 0))),
    );
    assert_eq!(outcome, CommandOutcome::Applied);
    let square_only = occupied_cells(&grid);

    assert!(!grid.can_place(&bar, CellCoord::new(1, 0)));
    assert!(grid.can_place(&bar, CellCoord::new(2, 0)));
    let outcome = history.execute_command(
        &mut grid,
        Box::new(PlaceItemCommand::new(bar, CellCoord::new(2, 0))),
    );
    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(query::occupied_count(&grid), 7);

    assert!(history.undo_last(&mut grid));

    assert_eq!(occupied_cells(&grid), square_only);
    assert_eq!(
        square_only,
        vec![
            (CellCoord::new(0, 0), square.id()),
            (CellCoord::new(1, 0), square.id()),
            (CellCoord::new(0, 1), square.id()),
            (CellCoord::new(1, 1), square.id()),
        ],
    );
}

#[test]
fn execute_then_undo_restores_empty_grid() {
    let dimensions = GridDimensions::new(10, 6).expect("valid dimensions");
    let mut session = Session::new(dimensions).expect("grid allocates");

    session
        .try_place(item(1, 3, 2), CellCoord::new(4, 3), PlacementHooks::new())
        .expect("placement fits");
    assert_eq!(query::occupied_count(session.grid()), 6);

    assert!(session.undo_last());
    assert_eq!(query::occupied_count(session.grid()), 0);
    assert!(!session.undo_last(), "second undo must be a no-op");
}

#[test]
fn session_refuses_grid_that_cannot_be_allocated() {
    let dimensions = GridDimensions::new(MAX_EXTENT, MAX_EXTENT).expect("extents are in range");

    let error = Session::new(dimensions).expect_err("table is too large");

    assert_eq!(
        error,
        DimensionError::TooManyCells {
            width: MAX_EXTENT,
            height: MAX_EXTENT,
        }
    );
}

#[test]
fn rejected_placement_is_not_recorded() {
    let dimensions = GridDimensions::new(10, 6).expect("valid dimensions");
    let mut session = Session::new(dimensions).expect("grid allocates");
    session
        .try_place(item(1, 2, 2), CellCoord::new(0, 0), PlacementHooks::new())
        .expect("placement fits");

    let result = session.try_place(item(2, 3, 1), CellCoord::new(1, 0), PlacementHooks::new());

    assert_eq!(
        result,
        Err(PlacementError::Occupied {
            cell: CellCoord::new(1, 0),
            occupant: ItemId::new(1),
        })
    );
    assert_eq!(session.history_len(), 1);

    let result = session.try_place(item(3, 1, 1), CellCoord::new(-1, 2), PlacementHooks::new());
    assert_eq!(
        result,
        Err(PlacementError::OutOfBounds {
            cell: CellCoord::new(-1, 2),
        })
    );
    assert_eq!(session.history_len(), 1);
}

#[test]
fn skipped_command_is_recorded_and_its_undo_frees_covered_cells() {
    let dimensions = GridDimensions::new(10, 6).expect("valid dimensions");
    let mut session = Session::new(dimensions).expect("grid allocates");
    let removals = Rc::new(RefCell::new(0_u32));

    session
        .try_place(item(1, 2, 2), CellCoord::new(0, 0), PlacementHooks::new())
        .expect("placement fits");

    let counter = Rc::clone(&removals);
    let hooks = PlacementHooks::new().on_remove(move |_, _| *counter.borrow_mut() += 1);
    let ghost = PlaceItemCommand::with_hooks(item(2, 3, 1), CellCoord::new(1, 0), hooks);
    let outcome = session.execute(Box::new(ghost));

    assert_eq!(outcome, CommandOutcome::Skipped);
    assert_eq!(session.history_len(), 2);
    assert_eq!(query::occupied_count(session.grid()), 4);

    // The ghost's undo clears its whole footprint, including the square's
    // cell at (1, 0), and still fires the removal hook.
    assert!(session.undo_last());
    assert_eq!(*removals.borrow(), 1);
    assert!(!query::is_occupied(session.grid(), CellCoord::new(1, 0)));
    assert!(query::is_occupied(session.grid(), CellCoord::new(1, 1)));
    assert_eq!(query::occupied_count(session.grid()), 3);
}

#[test]
fn clear_history_keeps_placed_items() {
    let dimensions = GridDimensions::new(10, 6).expect("valid dimensions");
    let mut session = Session::new(dimensions).expect("grid allocates");
    session
        .try_place(item(1, 1, 1), CellCoord::new(9, 5), PlacementHooks::new())
        .expect("placement fits");

    session.clear_history();

    assert_eq!(session.history_len(), 0);
    assert!(!session.undo_last());
    assert!(query::is_occupied(session.grid(), CellCoord::new(9, 5)));
}

#[test]
fn hooks_fire_once_per_mutation() {
    let dimensions = GridDimensions::new(4, 4).expect("valid dimensions");
    let mut session = Session::new(dimensions).expect("grid allocates");
    let log = Rc::new(RefCell::new(Vec::new()));

    for (id, x) in [(1, 0), (2, 1), (3, 2)] {
        let placed = Rc::clone(&log);
        let removed = Rc::clone(&log);
        let hooks = PlacementHooks::new()
            .on_place(move |item, _| placed.borrow_mut().push(format!("place {}", item.id().get())))
            .on_remove(move |item, _| {
                removed.borrow_mut().push(format!("remove {}", item.id().get()));
            });
        session
            .try_place(item(id, 1, 1), CellCoord::new(x, 0), hooks)
            .expect("placement fits");
    }
    while session.undo_last() {}

    assert_eq!(
        *log.borrow(),
        vec!["place 1", "place 2", "place 3", "remove 3", "remove 2", "remove 1"],
    );
}

fn placement_strategy() -> impl Strategy<Value = Vec<(u32, u32, i32, i32)>> {
    prop::collection::vec((1u32..=3, 1u32..=3, 0i32..10, 0i32..6), 1..12)
}

proptest! {
    #[test]
    fn undo_walks_back_through_every_grid_state(placements in placement_strategy()) {
        let dimensions = GridDimensions::new(10, 6).expect("valid dimensions");
        let mut session = Session::new(dimensions).expect("grid allocates");
        let mut states = vec![session.grid().clone()];

        for (index, (width, height, x, y)) in placements.into_iter().enumerate() {
            let candidate = item(index as u32 + 1, width, height);
            let accepted = session
                .try_place(candidate, CellCoord::new(x, y), PlacementHooks::new())
                .is_ok();
            if accepted {
                states.push(session.grid().clone());
            }
        }
        prop_assert_eq!(session.history_len(), states.len() - 1);

        let _ = states.pop();
        while let Some(expected) = states.pop() {
            prop_assert!(session.undo_last());
            prop_assert_eq!(session.grid(), &expected);
        }
        prop_assert!(!session.undo_last());
    }
}
