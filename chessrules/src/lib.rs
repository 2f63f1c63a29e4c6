/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use chessrules_types::*;

/// Turn flow on top of a position: scoring, promotion, anarchy placement and game-end detection.
mod game;
/// Pseudo-legal and legal move generation, and the attack queries they depend on.
mod movegen;
/// Results of executing a move.
mod moves;
/// The board grid, its metadata, setup from placement strings, and move execution.
mod position;

pub use game::*;
pub use movegen::*;
pub use moves::*;
pub use position::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::game::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::position::*;
    pub use chessrules_types::*;
}
