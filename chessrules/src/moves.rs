/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Piece, Square};

/// The result of asking the executor to move a piece.
///
/// These three outcomes are the complete contract of a move command: hosts use them to decide whether to
/// revert a dragged piece, play a capture sound, or hand the turn over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MoveOutcome {
    /// Nothing changed.
    #[default]
    Rejected,

    /// The piece was relocated and nothing was captured.
    Moved,

    /// The piece was relocated and exactly one piece was removed from the board.
    Captured,
}

impl MoveOutcome {
    /// Returns `true` if the move was carried out.
    #[inline(always)]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Returns `true` if the move removed a piece from the board.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        matches!(self, Self::Captured)
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rejected => "rejected",
            Self::Moved => "moved",
            Self::Captured => "captured",
        };
        write!(f, "{s}")
    }
}

/// Everything a single move did to a [`Board`](crate::Board).
///
/// Produced both by the executor and by the legality filter's simulations, so that both see exactly the same
/// side effects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Transition {
    /// The moving piece, as it stands after the move.
    pub moved: Piece,

    /// The piece that was removed, if any. For en passant, this is the pawn that was passed, not an occupant of the destination.
    pub captured: Option<Piece>,

    /// The Rook that accompanied a castling King, and the square it came from.
    pub castled_rook: Option<(Piece, Square)>,

    /// Whether this move was a Pawn advancing two ranks.
    pub double_push: bool,
}

impl Transition {
    /// The [`MoveOutcome`] reported for this transition.
    #[inline(always)]
    pub const fn outcome(&self) -> MoveOutcome {
        if self.captured.is_some() {
            MoveOutcome::Captured
        } else {
            MoveOutcome::Moved
        }
    }
}
