// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Application layer: drag coordination, image loading, export and state.

pub mod drag;
pub mod export;
pub mod loader;
pub mod message;
pub mod model;
mod update;

pub use message::AppMessage;
pub use model::AppModel;
