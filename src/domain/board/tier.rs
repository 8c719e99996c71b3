// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/board/tier.rs
//
// Tier board: ordered item lists keyed by container id, and the list
// mutation applied when a drag is dropped.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId};

/// Identifier of a list that can receive dropped items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: ContainerId,
    pub label: String,
    /// Row color as `#rrggbb`.
    #[serde(default = "default_tier_color")]
    pub color: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_tier_color() -> String {
    "#808080".to_string()
}

impl Tier {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: ContainerId::new(id),
            label: label.into(),
            color: color.into(),
            items: Vec::new(),
        }
    }
}

/// Why a drop was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    UnknownContainer(ContainerId),
    IndexOutOfRange { index: usize, len: usize },
    ItemMismatch { expected: ItemId, found: ItemId },
}

/// Result of applying a drop to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Item was removed from the source list and inserted at `to_index`.
    Moved { to_index: usize },
    /// The recorded source position no longer holds the item; nothing changed.
    Stale(StaleReason),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Board of tiers plus the unranked pool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TierBoard {
    #[serde(default)]
    pub tiers: Vec<Tier>,
    /// Unranked items, addressed as [`TierBoard::POOL`].
    #[serde(default)]
    pub pool: Vec<Item>,
}

impl TierBoard {
    /// Container id of the unranked pool.
    pub const POOL: &'static str = "pool";

    pub fn new(tiers: Vec<Tier>) -> Self {
        Self {
            tiers,
            pool: Vec::new(),
        }
    }

    /// Load a board from a JSON file.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse board {}", path.display()))
    }

    /// Ids of all containers, tiers first, pool last.
    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.tiers
            .iter()
            .map(|t| t.id.clone())
            .chain(std::iter::once(ContainerId::new(Self::POOL)))
            .collect()
    }

    pub fn list(&self, id: &ContainerId) -> Option<&[Item]> {
        if id.as_str() == Self::POOL {
            return Some(self.pool.as_slice());
        }
        self.tiers
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.items.as_slice())
    }

    pub fn list_mut(&mut self, id: &ContainerId) -> Option<&mut Vec<Item>> {
        if id.as_str() == Self::POOL {
            return Some(&mut self.pool);
        }
        self.tiers
            .iter_mut()
            .find(|t| &t.id == id)
            .map(|t| &mut t.items)
    }

    /// Every item on the board, in display order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.tiers
            .iter()
            .flat_map(|t| t.items.iter())
            .chain(self.pool.iter())
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.tiers
            .iter_mut()
            .flat_map(|t| t.items.iter_mut())
            .chain(self.pool.iter_mut())
    }

    /// Locate an item by id.
    pub fn position_of(&self, item: ItemId) -> Option<(ContainerId, usize)> {
        self.container_ids().into_iter().find_map(|id| {
            let index = self.list(&id)?.iter().position(|i| i.id == item)?;
            Some((id, index))
        })
    }

    /// Smallest id not used by any item on the board.
    pub fn next_item_id(&self) -> ItemId {
        ItemId(self.items().map(|i| i.id.0 + 1).max().unwrap_or(0))
    }

    /// Insert `item` into container `to` at `index` (clamped). Returns the
    /// final index, or `None` for an unknown container.
    pub fn add_item(&mut self, to: &ContainerId, index: usize, item: Item) -> Option<usize> {
        let list = self.list_mut(to)?;
        let index = index.min(list.len());
        log::debug!("Added {} to {to}[{index}]", item.id);
        list.insert(index, item);
        Some(index)
    }

    /// Write the board as pretty JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize board")?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write board {}", path.display()))
    }

    /// Move `item` from `from[from_index]` to `to[to_index]`.
    ///
    /// Always remove-then-insert: `to_index` addresses the destination after
    /// removal and is clamped into `[0, len]`. If the source slot no longer
    /// holds `item` (the list changed mid-drag) nothing is mutated.
    pub fn move_item(
        &mut self,
        item: ItemId,
        from: &ContainerId,
        from_index: usize,
        to: &ContainerId,
        to_index: usize,
    ) -> MoveOutcome {
        if self.list(to).is_none() {
            return MoveOutcome::Stale(StaleReason::UnknownContainer(to.clone()));
        }
        let Some(source) = self.list_mut(from) else {
            return MoveOutcome::Stale(StaleReason::UnknownContainer(from.clone()));
        };
        let Some(found) = source.get(from_index).map(|i| i.id) else {
            log::debug!(
                "Stale drop of {item}: index {from_index} out of range in {from} (len {})",
                source.len()
            );
            return MoveOutcome::Stale(StaleReason::IndexOutOfRange {
                index: from_index,
                len: source.len(),
            });
        };
        if found != item {
            log::debug!("Stale drop of {item}: {from}[{from_index}] now holds {found}");
            return MoveOutcome::Stale(StaleReason::ItemMismatch {
                expected: item,
                found,
            });
        }

        let moved = source.remove(from_index);
        let Some(destination) = self.list_mut(to) else {
            return MoveOutcome::Stale(StaleReason::UnknownContainer(to.clone()));
        };
        let to_index = to_index.min(destination.len());
        destination.insert(to_index, moved);

        log::debug!("Moved {item} from {from}[{from_index}] to {to}[{to_index}]");
        MoveOutcome::Moved { to_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> TierBoard {
        let mut s = Tier::new("s", "S", "#ff7f7f");
        s.items = (0..3).map(|i| Item::new(ItemId(i), format!("s{i}"), "x.png")).collect();
        let mut a = Tier::new("a", "A", "#ffbf7f");
        a.items = (10..12).map(|i| Item::new(ItemId(i), format!("a{i}"), "x.png")).collect();
        TierBoard::new(vec![s, a])
    }

    fn ids(board: &TierBoard, id: &str) -> Vec<u64> {
        board
            .list(&ContainerId::from(id))
            .unwrap()
            .iter()
            .map(|i| i.id.0)
            .collect()
    }

    #[test]
    fn reorders_within_a_tier() {
        let mut board = board();
        let s = ContainerId::from("s");
        let outcome = board.move_item(ItemId(0), &s, 0, &s, 2);
        assert_eq!(outcome, MoveOutcome::Moved { to_index: 2 });
        assert_eq!(ids(&board, "s"), vec![1, 2, 0]);
    }

    #[test]
    fn same_index_is_a_stable_noop_move() {
        let mut board = board();
        let s = ContainerId::from("s");
        assert!(board.move_item(ItemId(1), &s, 1, &s, 1).is_moved());
        assert_eq!(ids(&board, "s"), vec![0, 1, 2]);
    }

    #[test]
    fn moves_between_tiers_and_clamps_index() {
        let mut board = board();
        let outcome = board.move_item(
            ItemId(1),
            &ContainerId::from("s"),
            1,
            &ContainerId::from("a"),
            99,
        );
        assert_eq!(outcome, MoveOutcome::Moved { to_index: 2 });
        assert_eq!(ids(&board, "s"), vec![0, 2]);
        assert_eq!(ids(&board, "a"), vec![10, 11, 1]);
    }

    #[test]
    fn moves_into_the_pool() {
        let mut board = board();
        let pool = ContainerId::from(TierBoard::POOL);
        assert!(board.move_item(ItemId(10), &"a".into(), 0, &pool, 0).is_moved());
        assert_eq!(ids(&board, TierBoard::POOL), vec![10]);
        assert_eq!(board.position_of(ItemId(10)), Some((pool, 0)));
    }

    #[test]
    fn stale_index_is_ignored() {
        let mut board = board();
        let s = ContainerId::from("s");
        board.list_mut(&s).unwrap().remove(2);
        let before = board.clone();

        let outcome = board.move_item(ItemId(2), &s, 2, &"a".into(), 0);
        assert_eq!(
            outcome,
            MoveOutcome::Stale(StaleReason::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn shifted_item_is_ignored() {
        let mut board = board();
        let s = ContainerId::from("s");
        board.list_mut(&s).unwrap().remove(0);

        let outcome = board.move_item(ItemId(1), &s, 1, &s, 0);
        assert_eq!(
            outcome,
            MoveOutcome::Stale(StaleReason::ItemMismatch {
                expected: ItemId(1),
                found: ItemId(2),
            })
        );
        assert_eq!(ids(&board, "s"), vec![1, 2]);
    }

    #[test]
    fn unknown_containers_are_ignored() {
        let mut board = board();
        let outcome = board.move_item(ItemId(0), &"s".into(), 0, &"z".into(), 0);
        assert_eq!(
            outcome,
            MoveOutcome::Stale(StaleReason::UnknownContainer("z".into()))
        );
        assert_eq!(ids(&board, "s"), vec![0, 1, 2]);
    }

    #[test]
    fn added_items_get_fresh_ids() {
        let mut board = board();
        let id = board.next_item_id();
        assert_eq!(id, ItemId(12));

        let pool = ContainerId::from(TierBoard::POOL);
        assert_eq!(board.add_item(&pool, 5, Item::new(id, "new", "new.png")), Some(0));
        assert_eq!(board.position_of(id), Some((pool, 0)));
        assert_eq!(board.add_item(&"z".into(), 0, Item::new(ItemId(13), "x", "x.png")), None);
        assert_eq!(TierBoard::default().next_item_id(), ItemId(0));
    }

    #[test]
    fn saved_board_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        let board = board();
        board.save(&path).unwrap();
        assert_eq!(TierBoard::open(&path).unwrap(), board);
    }

    #[test]
    fn parses_board_json() {
        let board: TierBoard = serde_json::from_str(
            r#"{"tiers":[{"id":"s","label":"S","items":[{"id":1,"title":"One","image":"1.png"}]}],
                "pool":[{"id":2,"title":"Two","image":"2.png"}]}"#,
        )
        .unwrap();
        assert_eq!(board.tiers[0].color, "#808080");
        assert_eq!(board.items().count(), 2);
        assert_eq!(
            board.container_ids(),
            vec![ContainerId::from("s"), ContainerId::from(TierBoard::POOL)]
        );
    }
}
