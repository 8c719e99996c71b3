// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/handler.rs
//
// Container handler backed by a shared tier board.

use std::cell::RefCell;
use std::rc::Rc;

use super::registry::ContainerHandler;
use super::signal::{DropEvent, FileDrop};
use crate::domain::board::{ContainerId, Item, MoveOutcome, TierBoard};

/// Applies drops on one container to the board.
pub struct BoardDropHandler {
    board: Rc<RefCell<TierBoard>>,
    container: ContainerId,
}

impl BoardDropHandler {
    pub fn new(board: Rc<RefCell<TierBoard>>, container: ContainerId) -> Self {
        Self { board, container }
    }
}

impl ContainerHandler for BoardDropHandler {
    fn on_drop(&mut self, event: &DropEvent) {
        let outcome = self.board.borrow_mut().move_item(
            event.item,
            &event.from_container,
            event.from_index,
            &event.to_container,
            event.to_index,
        );
        if let MoveOutcome::Stale(reason) = outcome {
            log::debug!("Drop on {} ignored: {reason:?}", self.container);
        }
    }

    fn on_file_drop(&mut self, drop: &FileDrop) {
        let mut board = self.board.borrow_mut();
        let Some(mut index) = board.list(&self.container).map(<[Item]>::len) else {
            return;
        };
        for path in &drop.files {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let item = Item::new(board.next_item_id(), title, path.to_string_lossy());
            if let Some(at) = board.add_item(&self.container, index, item) {
                index = at + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::app::drag::input::Point;
    use crate::domain::board::{ItemId, Tier};

    fn shared() -> Rc<RefCell<TierBoard>> {
        let mut s = Tier::new("s", "S", "#ff7f7f");
        s.items = vec![Item::new(ItemId(0), "zero", "0.png"), Item::new(ItemId(1), "one", "1.png")];
        Rc::new(RefCell::new(TierBoard::new(vec![s])))
    }

    #[test]
    fn drop_moves_item_on_board() {
        let board = shared();
        let mut handler = BoardDropHandler::new(board.clone(), "s".into());
        handler.on_drop(&DropEvent {
            item: ItemId(0),
            from_container: "s".into(),
            from_index: 0,
            to_container: "s".into(),
            to_index: 1,
        });
        assert_eq!(board.borrow().position_of(ItemId(0)), Some(("s".into(), 1)));
    }

    #[test]
    fn stale_drop_leaves_board_untouched() {
        let board = shared();
        let before = board.borrow().clone();
        let mut handler = BoardDropHandler::new(board.clone(), "s".into());
        handler.on_drop(&DropEvent {
            item: ItemId(1),
            from_container: "s".into(),
            from_index: 0,
            to_container: TierBoard::POOL.into(),
            to_index: 0,
        });
        assert_eq!(*board.borrow(), before);
    }

    #[test]
    fn file_drop_appends_items() {
        let board = shared();
        let mut handler = BoardDropHandler::new(board.clone(), TierBoard::POOL.into());
        handler.on_file_drop(&FileDrop {
            container: TierBoard::POOL.into(),
            position: Point::default(),
            files: vec![PathBuf::from("art/a.png"), PathBuf::from("b.jpg")],
        });

        let board = board.borrow();
        let titles: Vec<&str> = board.pool.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(board.pool[0].id, ItemId(2));
        assert_eq!(board.pool[1].id, ItemId(3));
    }
}
