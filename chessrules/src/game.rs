/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use super::{
    legal_moves, Color, MoveOutcome, Piece, PieceId, PieceKind, Position, RuleMode, Square,
    Transition,
};

/// Whether the game goes on, and if not, how it ended.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    #[default]
    Ongoing,

    /// The contained side is in check and has no legal moves.
    Checkmate(Color),

    /// The side to move is not in check but has no legal moves.
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if the game has ended.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// The side that delivered checkmate, if any.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Checkmate(loser) => Some(loser.opponent()),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate(loser) => write!(f, "checkmate, {} wins", loser.opponent()),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// What [`Game::end_turn`] found after handing the turn over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TurnReport {
    /// The side whose turn it now is.
    pub side_to_move: Color,

    /// Whether that side's King is in check.
    pub in_check: bool,

    /// Whether that side can still move.
    pub status: GameStatus,
}

/// Decides whether `side` can escape, given whether its King is in `check`.
///
/// `side` has no escape exactly when none of its pieces has a legal move. Without an escape, the game is
/// checkmate if `in_check`, and stalemate otherwise.
///
/// # Example
/// ```
/// # use chessrules::{game_status, Color, GameStatus, Position};
/// let pos = Position::from_fen("k7/2Q5/1K6/8/8/8/8/8").unwrap();
/// assert_eq!(game_status(&pos, Color::Black, false), GameStatus::Stalemate);
/// assert_eq!(game_status(&pos, Color::Black, true), GameStatus::Checkmate(Color::Black));
/// assert_eq!(game_status(&pos, Color::White, false), GameStatus::Ongoing);
/// ```
pub fn game_status(position: &Position, side: Color, in_check: bool) -> GameStatus {
    let can_move = position.pieces(side).any(|piece| {
        !legal_moves(
            &piece,
            position.board(),
            position.ep_target(),
            position.rule_mode(),
        )
        .is_empty()
    });

    if can_move {
        GameStatus::Ongoing
    } else if in_check {
        GameStatus::Checkmate(side)
    } else {
        GameStatus::Stalemate
    }
}

/// A [`Position`] together with everything that happens between turns: scoring, promotion, anarchy placement,
/// and detecting the end of the game.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Game {
    /// The current [`Position`] of the game, including piece layouts, side to move, and rule mode.
    position: Position,

    /// Material captured by each side.
    scores: [u32; Color::COUNT],

    /// Result of the last call to [`Game::end_turn`].
    status: GameStatus,
}

impl Game {
    /// Creates a new [`Game`] from the provided [`Position`].
    #[inline(always)]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            scores: [0; Color::COUNT],
            status: GameStatus::Ongoing,
        }
    }

    /// Creates a new [`Game`] under Standard rules from the provided FEN string.
    #[inline(always)]
    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    /// Fetches this game's [`Position`].
    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Replaces the position with the one described by `fen`, and clears scores and status.
    ///
    /// The rule mode is kept. On failure, the game is left untouched.
    #[instrument(skip(self))]
    pub fn load(&mut self, fen: &str) -> Result<()> {
        self.position.load(fen)?;
        self.scores = [0; Color::COUNT];
        self.status = GameStatus::Ongoing;
        Ok(())
    }

    /// Returns to the standard starting position, and clears scores and status.
    pub fn reset(&mut self) {
        self.position.reset();
        self.scores = [0; Color::COUNT];
        self.status = GameStatus::Ongoing;
    }

    /// Switches the rules in force.
    #[inline(always)]
    pub fn set_rule_mode(&mut self, rule_mode: RuleMode) {
        self.position.set_rule_mode(rule_mode);
    }

    /// Switches to the other set of rules, returning the new mode.
    pub fn toggle_rule_mode(&mut self) -> RuleMode {
        let rule_mode = self.rule_mode().toggled();
        self.set_rule_mode(rule_mode);
        debug!(%rule_mode, "Toggled rule mode");
        rule_mode
    }

    /// Material captured so far by `color`.
    #[inline(always)]
    pub const fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    /// Result of the last call to [`Game::end_turn`]; [`GameStatus::Ongoing`] after setup.
    #[inline(always)]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Drops the piece `id` on `to`.
    ///
    /// Under Standard rules, the legal moves of the piece are computed now, against the current position, and
    /// the move is rejected unless `to` is among them. Under Anarchy rules, any destination is accepted.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Game, MoveOutcome, Square};
    /// let mut game = Game::default();
    /// let knight = game.piece_at(Square::G1).unwrap().id();
    ///
    /// assert_eq!(game.play(knight, Square::G3), MoveOutcome::Rejected);
    /// assert_eq!(game.play(knight, Square::F3), MoveOutcome::Moved);
    /// ```
    #[instrument(skip_all, fields(piece = %id, to = %to))]
    pub fn play(&mut self, id: PieceId, to: Square) -> MoveOutcome {
        match self.rule_mode() {
            RuleMode::Anarchy => self.play_anarchy(id, to),
            RuleMode::Standard => {
                let legal = self.position.legal_moves(id);
                self.play_standard(id, to, &legal)
            }
        }
    }

    /// Drops the piece `id` on `to`, trusting `legal` as its legal moves.
    ///
    /// `legal` is usually computed when the piece was picked up. Under Anarchy rules it is ignored.
    #[instrument(skip_all, fields(piece = %id, to = %to))]
    pub fn play_with_legal_moves(&mut self, id: PieceId, to: Square, legal: &[Square]) -> MoveOutcome {
        match self.rule_mode() {
            RuleMode::Anarchy => self.play_anarchy(id, to),
            RuleMode::Standard => self.play_standard(id, to, legal),
        }
    }

    fn play_standard(&mut self, id: PieceId, to: Square, legal: &[Square]) -> MoveOutcome {
        if !legal.contains(&to) {
            debug!("Rejected illegal move");
            return MoveOutcome::Rejected;
        }

        let transition = self.position.apply_move(id, to);
        self.record(transition)
    }

    fn play_anarchy(&mut self, id: PieceId, to: Square) -> MoveOutcome {
        let transition = self.position.apply_anarchy_move(id, to);
        self.record(transition)
    }

    /// Awards the value of a captured piece to its owner's opponent.
    fn record(&mut self, transition: Option<Transition>) -> MoveOutcome {
        let Some(transition) = transition else {
            return MoveOutcome::Rejected;
        };

        if let Some(captured) = transition.captured {
            let scorer = captured.color().opponent();
            self.scores[scorer] += captured.kind().value();
        }

        transition.outcome()
    }

    /// Hands the turn to the other side and checks whether it can still play.
    ///
    /// Under Standard rules, this computes whether the new side to move is in check and whether the game has
    /// ended, and remembers the result as [`Game::status`]. Under Anarchy rules, the game never ends.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Color, Game, GameStatus, Square};
    /// let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1").unwrap();
    /// let rook = game.piece_at(Square::A1).unwrap().id();
    /// game.play(rook, Square::A8);
    ///
    /// let report = game.end_turn();
    /// assert!(report.in_check);
    /// assert_eq!(report.status, GameStatus::Checkmate(Color::Black));
    /// ```
    #[instrument(skip(self))]
    pub fn end_turn(&mut self) -> TurnReport {
        self.position.toggle_side_to_move();
        let side = self.side_to_move();

        let (in_check, status) = if self.rule_mode().is_standard() {
            let in_check = self.position.is_in_check(side);
            (in_check, game_status(&self.position, side, in_check))
        } else {
            (false, GameStatus::Ongoing)
        };

        match status {
            GameStatus::Ongoing if in_check => info!(%side, "Check"),
            GameStatus::Ongoing => {}
            GameStatus::Checkmate(loser) => info!(%loser, "Checkmate"),
            GameStatus::Stalemate => info!(%side, "Stalemate"),
        }

        self.status = status;
        TurnReport {
            side_to_move: side,
            in_check,
            status,
        }
    }

    /// Replaces the Pawn `id`, which must be awaiting promotion, with a new piece of `kind`.
    ///
    /// See [`Position::promote`].
    #[instrument(skip_all, fields(piece = %id, kind = %kind))]
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) -> Option<PieceId> {
        self.position.promote(id, kind)
    }

    /// Creates a new piece on an empty square. Only allowed under Anarchy rules.
    pub fn spawn(&mut self, color: Color, kind: PieceKind, square: Square) -> Option<PieceId> {
        if self.rule_mode().is_standard() {
            warn!(%color, %kind, square = %square, "Pieces can only be spawned under anarchy rules");
            return None;
        }

        self.position.spawn(color, kind, square)
    }

    /// Takes a piece off the board. Only allowed under Anarchy rules.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        if self.rule_mode().is_standard() {
            warn!(piece = %id, "Pieces can only be removed under anarchy rules");
            return None;
        }

        self.position.remove(id)
    }
}

impl Deref for Game {
    type Target = Position;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nScore: White {}, Black {}\nStatus: {}",
            self.position,
            self.score(Color::White),
            self.score(Color::Black),
            self.status
        )
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position)
            .field("scores", &self.scores)
            .field("status", &self.status)
            .finish()
    }
}
