// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/board/mod.rs
//
// Board data layer: items, tiers and list mutation.

mod item;
mod tier;

pub use item::{Item, ItemId};
pub use tier::{ContainerId, MoveOutcome, StaleReason, Tier, TierBoard};
