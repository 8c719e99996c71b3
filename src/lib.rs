// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Tier list engine: pointer drag and drop between ranked rows, and crop
// geometry shared by the live view and image export.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;
