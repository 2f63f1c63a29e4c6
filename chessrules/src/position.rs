/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{anyhow, bail, Result};
use tracing::{debug, instrument, warn};

use super::{
    is_king_in_check, is_square_attacked, legal_moves, pseudo_legal_moves, Color, MoveList,
    MoveOutcome, Piece, PieceId, PieceKind, Square, Transition, FEN_STARTPOS,
};

/// Which set of rules governs a [`Position`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum RuleMode {
    /// Every move is checked for full legality.
    #[default]
    Standard,

    /// No legality checking: pieces may go anywhere and capture anything, including their own side.
    Anarchy,
}

impl RuleMode {
    #[inline(always)]
    pub const fn is_standard(&self) -> bool {
        matches!(self, Self::Standard)
    }

    #[inline(always)]
    pub const fn is_anarchy(&self) -> bool {
        matches!(self, Self::Anarchy)
    }

    /// Returns the other rule mode.
    #[inline(always)]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Standard => Self::Anarchy,
            Self::Anarchy => Self::Standard,
        }
    }
}

impl FromStr for RuleMode {
    type Err = anyhow::Error;
    /// Parses `"standard"` or `"anarchy"`, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use chessrules::RuleMode;
    /// assert_eq!("Anarchy".parse::<RuleMode>().unwrap(), RuleMode::Anarchy);
    /// assert!("chaos".parse::<RuleMode>().is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "anarchy" => Ok(Self::Anarchy),
            _ => bail!("Invalid rule mode {s:?}: expected \"standard\" or \"anarchy\""),
        }
    }
}

impl fmt::Display for RuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standard => "standard",
            Self::Anarchy => "anarchy",
        };
        write!(f, "{s}")
    }
}

/// Represents the current state of the game: the board, whose turn it is, the en passant target, and the rules in force.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Mailbox representation of the game board.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// The Pawn, if any, that advanced two ranks on the previous turn.
    ep_target: Option<PieceId>,

    /// The rules currently in force.
    rule_mode: RuleMode,

    /// Identifier handed to the next piece created in this position.
    next_id: u16,
}

impl Position {
    /// Creates a new, empty [`Position`] with the following properties:
    /// * No pieces on the board
    /// * White moves first
    /// * No en passant target
    /// * Standard rules
    ///
    /// # Example
    /// ```
    /// # use chessrules::Position;
    /// let pos = Position::new();
    /// assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    pub fn new() -> Self {
        Self::from_board(Board::new(), RuleMode::Standard)
    }

    /// Creates a new [`Position`] under Standard rules from the provided FEN string.
    ///
    /// Only the piece placement field is read; any further fields are ignored.
    pub fn from_fen(fen: &str) -> Result<Self> {
        Self::from_fen_with_mode(fen, RuleMode::Standard)
    }

    /// Creates a new [`Position`] under `rule_mode` from the provided FEN string.
    ///
    /// Under Standard rules, a placement with more than one King of a color is rejected.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Position, RuleMode};
    /// let two_kings = "k6k/8/8/8/8/8/8/4K3";
    /// assert!(Position::from_fen_with_mode(two_kings, RuleMode::Standard).is_err());
    /// assert!(Position::from_fen_with_mode(two_kings, RuleMode::Anarchy).is_ok());
    /// ```
    pub fn from_fen_with_mode(fen: &str, rule_mode: RuleMode) -> Result<Self> {
        let board = Board::from_fen(fen)?;

        if rule_mode.is_standard() {
            check_king_counts(&board)?;
        }

        Ok(Self::from_board(board, rule_mode))
    }

    /// Wraps a [`Board`] with White to move and no en passant target.
    fn from_board(board: Board, rule_mode: RuleMode) -> Self {
        let next_id = board
            .iter()
            .map(|piece| piece.id().inner() + 1)
            .max()
            .unwrap_or(0);

        Self {
            board,
            side_to_move: Color::White,
            ep_target: None,
            rule_mode,
            next_id,
        }
    }

    /// Replaces this position with the one described by `fen`, keeping the current rule mode.
    ///
    /// On failure, this position is left untouched.
    ///
    /// # Example
    /// ```
    /// # use chessrules::Position;
    /// let mut pos = Position::default();
    /// assert!(pos.load("8/8/8").is_err());
    /// assert_eq!(pos, Position::default());
    /// ```
    #[instrument(skip(self), fields(rule_mode = %self.rule_mode))]
    pub fn load(&mut self, fen: &str) -> Result<()> {
        *self = Self::from_fen_with_mode(fen, self.rule_mode)?;
        debug!(pieces = self.board.population(), "Loaded position");
        Ok(())
    }

    /// Returns to the standard starting position, keeping the current rule mode.
    pub fn reset(&mut self) {
        *self = Self::from_board(Board::default(), self.rule_mode);
    }

    /// Generates the FEN placement string of this position.
    #[inline(always)]
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Fetches this position's [`Board`]
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The [`Color`] of the current player.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Hands the turn to the other player.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// The identifier of the Pawn that advanced two ranks on the previous turn, if any.
    #[inline(always)]
    pub const fn ep_target(&self) -> Option<PieceId> {
        self.ep_target
    }

    /// The Pawn that advanced two ranks on the previous turn, if any.
    #[inline(always)]
    pub fn ep_target_piece(&self) -> Option<Piece> {
        self.ep_target.and_then(|id| self.board.find(id))
    }

    /// The rules currently in force.
    #[inline(always)]
    pub const fn rule_mode(&self) -> RuleMode {
        self.rule_mode
    }

    /// Switches the rules in force.
    ///
    /// Switching to Standard rules with extra Kings on the board is allowed, but check detection will only
    /// consider one King per color until the extras are removed.
    pub fn set_rule_mode(&mut self, rule_mode: RuleMode) {
        if rule_mode.is_standard() && check_king_counts(&self.board).is_err() {
            warn!("Switching to standard rules with more than one King of a color on the board");
        }
        self.rule_mode = rule_mode;
    }

    /// Fetches a snapshot of the piece with the provided identifier, if it is still on the board.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        self.board.find(id)
    }

    /// Fetches the piece with the provided identifier, reporting unknown identifiers.
    fn lookup(&self, id: PieceId) -> Option<Piece> {
        let piece = self.board.find(id);
        if piece.is_none() {
            warn!(piece = %id, "No piece with this identifier is on the board");
        }
        piece
    }

    /// Hands out the next unused piece identifier.
    fn allocate_id(&mut self) -> PieceId {
        let id = PieceId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Creates a new piece on an empty square, returning its identifier.
    ///
    /// Refuses occupied squares, and under Standard rules refuses a second King of the same color.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Color, PieceKind, Position, Square};
    /// let mut pos = Position::new();
    /// let id = pos.spawn(Color::Black, PieceKind::King, Square::E8).unwrap();
    /// assert_eq!(pos.piece(id).unwrap().square(), Square::E8);
    /// assert!(pos.spawn(Color::Black, PieceKind::King, Square::D8).is_none());
    /// ```
    pub fn spawn(&mut self, color: Color, kind: PieceKind, square: Square) -> Option<PieceId> {
        if self.board.has(square) {
            warn!(square = %square, "Cannot spawn a piece on an occupied square");
            return None;
        }

        if kind == PieceKind::King && self.rule_mode.is_standard() && self.board.king(color).is_some() {
            warn!(%color, "Standard rules allow only one King per color");
            return None;
        }

        let id = self.allocate_id();
        self.board.place(Piece::new(id, color, kind, square), square);
        debug!(piece = %id, %color, %kind, square = %square, "Spawned piece");

        Some(id)
    }

    /// Takes a piece off the board, returning it as captured.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.lookup(id)?;
        let removed = self.board.take(piece.square())?.into_captured();

        if self.ep_target == Some(id) {
            self.ep_target = None;
        }

        debug!(piece = %id, square = %removed.square(), "Removed piece");
        Some(removed)
    }

    /// Returns `true` if the Pawn `id` stands on its promotion rank, awaiting a choice of piece.
    #[inline(always)]
    pub fn promotion_pending(&self, id: PieceId) -> bool {
        self.board.find(id).is_some_and(|piece| piece.reached_promotion_rank())
    }

    /// Replaces the Pawn `id`, which must be awaiting promotion, with a new piece of `kind`.
    ///
    /// Returns the identifier of the piece now on that square. Choosing [`PieceKind::Pawn`] keeps the Pawn,
    /// and choosing [`PieceKind::King`] is refused.
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) -> Option<PieceId> {
        if !self.promotion_pending(id) {
            warn!(piece = %id, "Piece is not awaiting promotion");
            return None;
        }

        match kind {
            PieceKind::King => {
                warn!(piece = %id, "Pawns cannot promote to a King");
                None
            }
            PieceKind::Pawn => Some(id),
            _ => {
                let pawn = self.board.take(self.board.find(id)?.square())?;
                let new_id = self.allocate_id();

                let mut promoted = Piece::new(new_id, pawn.color(), kind, pawn.square());
                promoted.mark_moved();
                self.board.place(promoted, pawn.square());

                if self.ep_target == Some(id) {
                    self.ep_target = None;
                }

                debug!(pawn = %id, piece = %new_id, %kind, square = %pawn.square(), "Promoted");
                Some(new_id)
            }
        }
    }

    /// Returns `true` if `color`'s King is in check. A side without a King is never in check.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Color, Position};
    /// let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3").unwrap();
    /// assert!(pos.is_in_check(Color::White));
    /// assert!(!pos.is_in_check(Color::Black));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board
            .king(color)
            .is_some_and(|king| is_king_in_check(king.square(), &self.board, color))
    }

    /// Returns `true` if `square` is attacked by any piece belonging to the opponent of `color`.
    #[inline(always)]
    pub fn is_square_attacked(&self, square: Square, color: Color) -> bool {
        is_square_attacked(square, color, &self.board)
    }

    /// Generates every square the piece `id` could move to, ignoring the safety of its own King.
    pub fn pseudo_legal_moves(&self, id: PieceId) -> MoveList {
        self.lookup(id)
            .map(|piece| pseudo_legal_moves(&piece, &self.board, self.ep_target, self.rule_mode))
            .unwrap_or_default()
    }

    /// Generates every square the piece `id` may legally move to.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Position, Square};
    /// let pos = Position::default();
    /// let knight = pos.piece_at(Square::G1).unwrap().id();
    /// let moves = pos.legal_moves(knight);
    /// assert_eq!(moves.len(), 2);
    /// assert!(moves.contains(&Square::F3) && moves.contains(&Square::H3));
    /// ```
    pub fn legal_moves(&self, id: PieceId) -> MoveList {
        self.lookup(id)
            .map(|piece| legal_moves(&piece, &self.board, self.ep_target, self.rule_mode))
            .unwrap_or_default()
    }

    /// Moves the piece `id` to `to` under standard movement, without checking legality.
    ///
    /// Resolves captures, en passant, and castling, then records or clears the en passant target.
    /// Returns `None`, leaving the position untouched, if the piece is unknown or `to` holds a friendly piece.
    pub fn apply_move(&mut self, id: PieceId, to: Square) -> Option<Transition> {
        let piece = self.lookup(id)?;
        let from = piece.square();

        let Some(transition) = self.board.transition(from, to, self.ep_target) else {
            warn!(piece = %id, from = %from, to = %to, "Cannot move onto a friendly piece");
            return None;
        };

        self.ep_target = transition.double_push.then_some(id);

        if let Some(captured) = transition.captured {
            debug!(piece = %id, from = %from, to = %to, captured = %captured.id(), on = %captured.square(), "Captured");
        } else {
            debug!(piece = %id, from = %from, to = %to, "Moved");
        }
        if let Some((rook, rook_from)) = transition.castled_rook {
            debug!(rook = %rook.id(), from = %rook_from, to = %rook.square(), "Castled");
        }

        Some(transition)
    }

    /// Moves the piece `id` to `to` under standard movement, without checking legality.
    #[inline(always)]
    pub fn make_move(&mut self, id: PieceId, to: Square) -> MoveOutcome {
        self.apply_move(id, to)
            .map(|transition| transition.outcome())
            .unwrap_or_default()
    }

    /// Moves the piece `id` to `to` if `to` is one of its `legal` destinations.
    ///
    /// `legal` is usually the result of [`Position::legal_moves`] computed when the piece was picked up.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{MoveOutcome, Position, Square};
    /// let mut pos = Position::default();
    /// let pawn = pos.piece_at(Square::E2).unwrap().id();
    /// let legal = pos.legal_moves(pawn);
    ///
    /// assert_eq!(pos.make_move_checked(pawn, Square::E5, &legal), MoveOutcome::Rejected);
    /// assert_eq!(pos.make_move_checked(pawn, Square::E4, &legal), MoveOutcome::Moved);
    /// ```
    pub fn make_move_checked(&mut self, id: PieceId, to: Square, legal: &[Square]) -> MoveOutcome {
        if !legal.contains(&to) {
            debug!(piece = %id, to = %to, "Rejected illegal move");
            return MoveOutcome::Rejected;
        }

        self.make_move(id, to)
    }

    /// Moves the piece `id` to `to` with no rules at all.
    ///
    /// Whatever else stands on `to` is captured, regardless of its color. The moved piece is marked as moved
    /// and the en passant target is cleared, so a King or Rook dragged here can no longer castle, and a Pawn
    /// can no longer double-push, even after it is dragged back.
    pub fn apply_anarchy_move(&mut self, id: PieceId, to: Square) -> Option<Transition> {
        let piece = self.lookup(id)?;
        let from = piece.square();

        self.board.clear(from);
        let captured = self.board.take(to).map(Piece::into_captured);
        let moved = self.board.relocate(piece, to);
        self.ep_target = None;

        debug!(piece = %id, from = %from, to = %to, captured = ?captured.map(|p| p.id()), "Anarchy move");

        Some(Transition {
            moved,
            captured,
            castled_rook: None,
            double_push: false,
        })
    }

    /// Moves the piece `id` to `to` with no rules at all. See [`Position::apply_anarchy_move`].
    ///
    /// # Example
    /// ```
    /// # use chessrules::{MoveOutcome, Position, RuleMode, Square, FEN_STARTPOS};
    /// let mut pos = Position::from_fen_with_mode(FEN_STARTPOS, RuleMode::Anarchy).unwrap();
    /// let queen = pos.piece_at(Square::D1).unwrap().id();
    ///
    /// // Queens can eat their own King in anarchy
    /// assert_eq!(pos.make_anarchy_move(queen, Square::E1), MoveOutcome::Captured);
    /// ```
    #[inline(always)]
    pub fn make_anarchy_move(&mut self, id: PieceId, to: Square) -> MoveOutcome {
        self.apply_anarchy_move(id, to)
            .map(|transition| transition.outcome())
            .unwrap_or_default()
    }
}

/// Fails if any color has more than one King on `board`.
fn check_king_counts(board: &Board) -> Result<()> {
    for color in Color::all() {
        let kings = board.count(color, PieceKind::King);
        if kings > 1 {
            bail!("Found {kings} {color} Kings, but standard rules allow at most one per color");
        }
    }

    Ok(())
}

impl FromStr for Position {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Deref for Position {
    type Target = Board;
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Default for Position {
    #[inline(always)]
    fn default() -> Self {
        Self::from_board(Board::default(), RuleMode::Standard)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ep = self
            .ep_target_piece()
            .map(|pawn| pawn.square().to_string())
            .unwrap_or_else(|| String::from("-"));

        write!(
            f,
            "{}\n\nSide to move: {}\nRules: {}\nEn passant target: {ep}",
            self.board, self.side_to_move, self.rule_mode
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("side_to_move", &self.side_to_move)
            .field("ep_target", &self.ep_target)
            .field("rule_mode", &self.rule_mode)
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// The 8x8 grid: exactly one piece or nothing on every square.
///
/// Every [`Piece`] stored here knows its own square, and that square is always the one it is stored under.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use chessrules::Board;
    /// let board = Board::new();
    /// assert_eq!(board.population(), 0);
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Constructs a [`Board`] from the piece placement field of the provided FEN string.
    ///
    /// Pieces are numbered in the order they are found, starting from `a1` and working up to `h8`.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        // If this FEN string contains more than just the initial placements, extract the placements
        let placements = fen.split_whitespace().next().ok_or(anyhow!(
            "Invalid FEN string: FEN string must have piece placements."
        ))?;

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != Square::SIDE as usize {
            bail!(
                "Invalid FEN string: expected placements for 8 ranks, found {}.",
                ranks.len()
            );
        }

        let mut next_id = PieceId::default();

        // Need to reverse this so that White pieces are at the "bottom" of the board
        for (rank, placements) in ranks.into_iter().rev().enumerate() {
            let rank = rank as u8;
            let mut file = 0;

            for piece_char in placements.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        bail!("Invalid FEN string: {piece_char:?} is not a valid count of empty squares.");
                    }
                    file += empty as u8;
                } else {
                    let Some(square) = Square::new(file, rank) else {
                        bail!("Invalid FEN string: rank {} has more than 8 files.", rank + 1);
                    };

                    board.place(Piece::from_char(next_id, piece_char, square)?, square);
                    next_id = next_id.next();
                    file += 1;
                }

                if file > Square::SIDE {
                    bail!("Invalid FEN string: rank {} has more than 8 files.", rank + 1);
                }
            }

            if file != Square::SIDE {
                bail!("Invalid FEN string: rank {} has {file} files instead of 8.", rank + 1);
            }
        }

        Ok(board)
    }

    /// Returns `true` if there is a piece at the given [`Square`].
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Square};
    /// let board = Board::default();
    /// assert!(board.has(Square::B1));
    /// assert!(!board.has(Square::E4));
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Places `piece` on `square`, replacing whatever was there, and updates the piece's own square to match.
    ///
    /// The piece is not removed from wherever it stood before; use [`Board::take`] first.
    #[inline(always)]
    pub fn place(&mut self, mut piece: Piece, square: Square) {
        piece.set_square(square);
        self.mailbox[square] = Some(piece);
    }

    /// Clears the given [`Square`].
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.mailbox[square] = None;
    }

    /// Removes and returns the piece on `square`, if there is one.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, PieceKind, Square};
    /// let mut board = Board::default();
    /// let knight = board.take(Square::B1).unwrap();
    /// assert_eq!(knight.kind(), PieceKind::Knight);
    /// assert!(!board.has(Square::B1));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square].take()
    }

    /// Removes every piece from the board.
    #[inline(always)]
    pub fn clear_all(&mut self) {
        self.mailbox = [None; Square::COUNT];
    }

    /// Fetches the piece on `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Fetches the [`Color`] of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.piece_at(square).map(|piece| piece.kind())
    }

    /// Finds the piece with the provided identifier.
    pub fn find(&self, id: PieceId) -> Option<Piece> {
        self.iter().find(|piece| piece.id() == id)
    }

    /// An iterator over every piece on the board, from `a1` to `h8`.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.mailbox.iter().flatten().copied()
    }

    /// An iterator over every piece of `color`.
    #[inline(always)]
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.iter().filter(move |piece| piece.color() == color)
    }

    /// Fetches the King of `color`. If there is more than one, the first from `a1` is returned.
    #[inline(always)]
    pub fn king(&self, color: Color) -> Option<Piece> {
        self.pieces(color).find(|piece| piece.is_king())
    }

    /// Counts the pieces of `color` and `kind`.
    #[inline(always)]
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces(color).filter(|piece| piece.kind() == kind).count()
    }

    /// Number of pieces on the board.
    #[inline(always)]
    pub fn population(&self) -> usize {
        self.iter().count()
    }

    /// If a Pawn moving to `to` would capture en passant, returns the square of the Pawn it would capture.
    ///
    /// That is the case when the Pawn changes file onto an empty square, and the square beside it on the
    /// destination file holds `ep_target`, an enemy Pawn.
    pub fn en_passant_victim(
        &self,
        pawn: &Piece,
        to: Square,
        ep_target: Option<PieceId>,
    ) -> Option<Square> {
        let target = ep_target?;
        let from = pawn.square();

        if !pawn.is_pawn() || from.file() == to.file() || self.has(to) {
            return None;
        }

        Square::new(to.file(), from.rank()).filter(|&square| {
            self.piece_at(square).is_some_and(|victim| {
                victim.id() == target && victim.is_pawn() && victim.color() != pawn.color()
            })
        })
    }

    /// Moves the piece on `from` to `to`, following standard movement.
    ///
    /// Any piece on `to` is captured, as is the Pawn passed by an en passant capture. A King moving two files
    /// brings along the Rook from the edge it moved towards. Legality is not checked, but nothing happens
    /// (and `None` is returned) if `from` is empty or `to` holds a piece of the mover's color.
    pub fn transition(
        &mut self,
        from: Square,
        to: Square,
        ep_target: Option<PieceId>,
    ) -> Option<Transition> {
        let mover = self.piece_at(from)?;
        if self.color_at(to) == Some(mover.color()) {
            return None;
        }

        let captured = match self.en_passant_victim(&mover, to, ep_target) {
            Some(victim) => self.take(victim),
            None => self.take(to),
        }
        .map(Piece::into_captured);

        self.clear(from);

        let castled_rook = if mover.is_king()
            && from.rank() == to.rank()
            && from.distance_files(to) == 2
        {
            self.castle_rook(&mover, to)
        } else {
            None
        };

        let double_push = mover.is_pawn() && from.distance_ranks(to) == 2;
        let moved = self.relocate(mover, to);

        Some(Transition {
            moved,
            captured,
            castled_rook,
            double_push,
        })
    }

    /// Moves the Rook accompanying a King castling onto `king_to` to the square beside the King.
    fn castle_rook(&mut self, king: &Piece, king_to: Square) -> Option<(Piece, Square)> {
        let towards: i8 = if king_to.file() > king.square().file() {
            1
        } else {
            -1
        };
        let rook_file = if towards > 0 { Square::SIDE - 1 } else { 0 };

        let rook_from = Square::new(rook_file, king_to.rank()).filter(|&square| {
            self.piece_at(square)
                .is_some_and(|rook| rook.is_rook() && rook.color() == king.color())
        });

        let (Some(rook_from), Some(rook_to)) = (rook_from, king_to.offset(-towards, 0)) else {
            warn!(king = %king.id(), to = %king_to, "King moved two files without a Rook to castle with");
            return None;
        };

        let rook = self.take(rook_from)?;
        Some((self.relocate(rook, rook_to), rook_from))
    }

    /// Puts `piece` on `to` and marks it as moved, returning the updated piece.
    fn relocate(&mut self, mut piece: Piece, to: Square) -> Piece {
        piece.set_square(to);
        piece.mark_moved();
        self.mailbox[to] = Some(piece);
        piece
    }

    /// Generates a [FEN](https://www.chess.com/terms/fen-chess) placement string of this [`Board`].
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, FEN_STARTPOS};
    /// assert_eq!(Board::default().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = Vec::with_capacity(Square::SIDE as usize);

        for rank in (0..Square::SIDE).rev() {
            let mut placement = String::new();
            let mut empty_spaces = 0;

            for file in 0..Square::SIDE {
                match Square::new(file, rank).and_then(|square| self.piece_at(square)) {
                    Some(piece) => {
                        if empty_spaces != 0 {
                            placement += &empty_spaces.to_string();
                            empty_spaces = 0;
                        }
                        placement.push(piece.char());
                    }
                    None => empty_spaces += 1,
                }
            }

            if empty_spaces != 0 {
                placement += &empty_spaces.to_string();
            }
            placements.push(placement);
        }

        placements.join("/")
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        // Safe unwrap because the FEN for startpos is always valid
        Self::from_fen(FEN_STARTPOS).unwrap()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for rank in (0..Square::SIDE).rev() {
            board += &format!("{}| ", rank + 1);

            for file in 0..Square::SIDE {
                let occupant = Square::new(file, rank)
                    .and_then(|square| self.piece_at(square))
                    .map(|piece| piece.char())
                    .unwrap_or('.');

                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in 0..Square::SIDE {
            board += "--";
        }
        board += "\n   ";
        for file in 0..Square::SIDE {
            board += &format!("{} ", (b'a' + file) as char);
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
