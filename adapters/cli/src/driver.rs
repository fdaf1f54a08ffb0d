use std::{cell::RefCell, collections::HashMap, rc::Rc};

use gridpack_core::{CellCoord, DimensionError, Item, ItemId};
use gridpack_grid::query;
use gridpack_system_placement::{PlacementHooks, Session};
use tracing::debug;

use crate::{
    config::{CatalogEntry, Config},
    render::render_grid,
    script::Action,
};

/// Running score plus the placements it was earned from.
#[derive(Debug, Default)]
struct Scoreboard {
    score: i64,
    placed: HashMap<CellCoord, ItemId>,
}

impl Scoreboard {
    fn record_place(&mut self, item: &Item, origin: CellCoord) {
        let _ = self.placed.insert(origin, item.id());
        self.score += i64::from(item.score_value());
    }

    // Undoing a skipped placement finds nothing recorded at the origin and
    // leaves the score alone.
    fn record_remove(&mut self, item: &Item, origin: CellCoord) {
        if self.placed.remove(&origin).is_some() {
            self.score -= i64::from(item.score_value());
        }
    }
}

/// Interprets script actions against one placement session.
pub(crate) struct Driver {
    config: Config,
    session: Session,
    held: Option<CatalogEntry>,
    scoreboard: Rc<RefCell<Scoreboard>>,
}

impl Driver {
    pub(crate) fn new(config: Config) -> Result<Self, DimensionError> {
        Ok(Self {
            session: Session::new(config.dimensions)?,
            config,
            held: None,
            scoreboard: Rc::new(RefCell::new(Scoreboard::default())),
        })
    }

    /// Applies one action, appending transcript lines to `out`.
    pub(crate) fn apply(&mut self, action: Action, out: &mut Vec<String>) {
        match action {
            Action::Pick(name) => match self.config.catalog.find(&name) {
                Some(entry) => {
                    out.push(format!(
                        "holding {} ({}x{})",
                        entry.name,
                        entry.item.width(),
                        entry.item.height()
                    ));
                    self.held = Some(entry.clone());
                }
                None => out.push(format!("unknown item `{name}`")),
            },
            Action::Place(origin) => self.place_held(origin, out),
            Action::Undo => {
                if self.session.undo_last() {
                    out.push("undone".to_owned());
                } else {
                    out.push("nothing to undo".to_owned());
                }
            }
            Action::Forget => {
                self.session.clear_history();
                out.push("history cleared".to_owned());
            }
            Action::Reset => {
                self.session.reset();
                self.held = None;
                *self.scoreboard.borrow_mut() = Scoreboard::default();
                out.push("session reset".to_owned());
            }
            Action::Show => render_grid(query::occupancy_view(self.session.grid()), out),
            Action::Score => out.push(format!("score: {}", self.score())),
        }
    }

    fn place_held(&mut self, origin: CellCoord, out: &mut Vec<String>) {
        let Some(entry) = self.held.take() else {
            out.push("no item held".to_owned());
            return;
        };

        let hooks = self.hooks();
        match self.session.try_place(entry.item, origin, hooks) {
            Ok(()) => {
                debug!(item = %entry.name, x = origin.x(), y = origin.y(), "item placed");
                out.push(format!(
                    "placed {} at ({}, {})",
                    entry.name,
                    origin.x(),
                    origin.y()
                ));
            }
            Err(error) => {
                out.push(format!(
                    "cannot place {} at ({}, {}): {error}",
                    entry.name,
                    origin.x(),
                    origin.y()
                ));
                self.held = Some(entry);
            }
        }
    }

    fn hooks(&self) -> PlacementHooks {
        let placed = Rc::clone(&self.scoreboard);
        let removed = Rc::clone(&self.scoreboard);
        PlacementHooks::new()
            .on_place(move |item, origin| placed.borrow_mut().record_place(item, origin))
            .on_remove(move |item, origin| removed.borrow_mut().record_remove(item, origin))
    }

    pub(crate) fn score(&self) -> i64 {
        self.scoreboard.borrow().score
    }
}
