// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure domain layer: no UI, no I/O beyond loading board files.

pub mod board;
pub mod crop;
