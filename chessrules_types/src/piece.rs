/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Not},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::Square;

/// Represents the color of a player, piece, square, etc. within a chess board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub enum Color {
    /// The player who moves first.
    #[default]
    White,
    /// The player who moves second.
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Index of this color, for indexing into lists of two elements.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns this color's opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns `true` if this color is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// The rank on which this color's King and Rooks start.
    #[inline(always)]
    pub const fn home_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// The rank on which this color's Pawns start.
    #[inline(always)]
    pub const fn pawn_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// The rank on which this color's Pawns become eligible for promotion: the opponent's home rank.
    #[inline(always)]
    pub const fn promotion_rank(&self) -> u8 {
        self.opponent().home_rank()
    }

    /// The rank direction in which this color's Pawns advance.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Human-readable name of this color.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl Not for Color {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

/// Represents the kind (or "role") of a chess piece, independent of its color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PieceKind {
    /// Advances one square (two from its starting rank) and captures diagonally.
    Pawn,
    /// Jumps in an "L" shape.
    Knight,
    /// Slides diagonally.
    Bishop,
    /// Slides orthogonally.
    Rook,
    /// Slides orthogonally and diagonally.
    Queen,
    /// Steps one square in any direction, and may castle.
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all piece kinds, starting with Pawn.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
        ]
    }

    /// Index of this kind, for indexing into lists of six elements.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a [`PieceKind`] from a FEN character, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::PieceKind;
    /// assert_eq!(PieceKind::from_char('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Found non-piece, non-numeric char {c:?} when parsing FEN."),
        }
    }

    /// The lowercase FEN character of this kind.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Relative material value of this kind. The King is priceless, so it is worth nothing here.
    #[inline(always)]
    pub const fn value(&self) -> u32 {
        match self {
            Self::Pawn => 1,
            Self::Knight | Self::Bishop => 3,
            Self::Rook => 5,
            Self::Queen => 9,
            Self::King => 0,
        }
    }

    /// Human-readable name of this kind.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(kind) = Self::all().into_iter().find(|k| k.name().eq_ignore_ascii_case(s)) {
            return Ok(kind);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => bail!("Invalid piece kind {s:?}"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Stable identity of a single piece for as long as it exists.
///
/// Identifiers are never reused within a game, so a [`PieceId`] held by a caller
/// will never silently start referring to a different piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct PieceId(u16);

impl PieceId {
    /// Wraps a raw identifier.
    #[inline(always)]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Fetches the raw identifier.
    #[inline(always)]
    pub const fn inner(&self) -> u16 {
        self.0
    }

    /// The identifier following this one.
    #[inline(always)]
    pub const fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single chess piece: its identity, kind, color, location and movement history.
///
/// The board owns every [`Piece`]. Copies handed out by queries are snapshots,
/// valid for the duration of that query.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    square: Square,
    has_moved: bool,
    alive: bool,
}

impl Piece {
    /// Creates a new, unmoved, living [`Piece`].
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::{Color, Piece, PieceId, PieceKind, Square};
    /// let knight = Piece::new(PieceId::new(0), Color::White, PieceKind::Knight, Square::B1);
    /// assert_eq!(knight.char(), 'N');
    /// assert!(!knight.has_moved());
    /// ```
    #[inline(always)]
    pub const fn new(id: PieceId, color: Color, kind: PieceKind, square: Square) -> Self {
        Self {
            id,
            kind,
            color,
            square,
            has_moved: false,
            alive: true,
        }
    }

    /// Creates a new [`Piece`] from a FEN character. Uppercase is White, lowercase is Black.
    pub fn from_char(id: PieceId, c: char, square: Square) -> Result<Self> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Self::new(id, color, kind, square))
    }

    /// This piece's stable identifier.
    #[inline(always)]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// This piece's kind.
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// This piece's color.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The square this piece stands on.
    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Whether this piece has completed at least one move.
    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Whether this piece is still in play (not captured or removed).
    #[inline(always)]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    #[inline(always)]
    pub const fn is_rook(&self) -> bool {
        matches!(self.kind, PieceKind::Rook)
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns `true` if this is a Pawn standing on its promotion rank.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::{Color, Piece, PieceId, PieceKind, Square};
    /// let pawn = Piece::new(PieceId::new(0), Color::Black, PieceKind::Pawn, Square::C1);
    /// assert!(pawn.reached_promotion_rank());
    /// ```
    #[inline(always)]
    pub const fn reached_promotion_rank(&self) -> bool {
        self.is_pawn() && self.square.rank() == self.color.promotion_rank()
    }

    /// The FEN character of this piece. Uppercase is White, lowercase is Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        if self.color.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Moves this record to `square`. Only the board should call this, to keep the grid in sync.
    #[inline(always)]
    pub fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    /// Records that this piece has completed a move.
    #[inline(always)]
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Returns this piece as it looks after being taken off the board.
    #[inline(always)]
    pub const fn into_captured(self) -> Self {
        Self {
            alive: false,
            ..self
        }
    }

    /// Packs this piece's file, rank, color and moved flag into a single byte.
    ///
    /// Layout, from the most significant bit: file (3 bits), rank (3 bits), White (1 bit), moved (1 bit).
    /// Kind and identity are not part of the byte; they are fixed for the lifetime of a piece.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::{Color, Piece, PieceId, PieceKind, Square};
    /// let rook = Piece::new(PieceId::new(7), Color::White, PieceKind::Rook, Square::H1);
    /// assert_eq!(rook.packed_state(), 0b111_000_1_0);
    /// ```
    #[inline(always)]
    pub const fn packed_state(&self) -> u8 {
        (self.square.file() << 5)
            | (self.square.rank() << 2)
            | ((self.color.is_white() as u8) << 1)
            | self.has_moved as u8
    }

    /// Overwrites this piece's file, rank, color and moved flag from a byte made by [`Piece::packed_state`].
    pub fn apply_packed_state(&mut self, state: u8) {
        let file = state >> 5;
        let rank = (state >> 2) & 0b111;

        // Three bits each can never leave the board
        if let Some(square) = Square::new(file, rank) {
            self.square = square;
        }

        self.color = if (state >> 1) & 1 == 1 {
            Color::White
        } else {
            Color::Black
        };
        self.has_moved = state & 1 == 1;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_opposites() {
        for color in Color::all() {
            assert_ne!(color, color.opponent());
            assert_eq!(color, !!color);
            assert_eq!(color.promotion_rank(), color.opponent().home_rank());
        }
    }

    #[test]
    fn fen_chars_round_trip() {
        for kind in PieceKind::all() {
            for c in [kind.char(), kind.char().to_ascii_uppercase()] {
                let piece = Piece::from_char(PieceId::new(0), c, Square::D4).unwrap();
                assert_eq!(piece.kind(), kind);
                assert_eq!(piece.char(), c);
            }
        }
        assert!(Piece::from_char(PieceId::new(0), '?', Square::D4).is_err());
    }

    #[test]
    fn kinds_parse_from_names() {
        assert_eq!("queen".parse::<PieceKind>().unwrap(), PieceKind::Queen);
        assert_eq!("N".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert!("dragon".parse::<PieceKind>().is_err());
    }

    #[test]
    fn packed_state_survives_the_wire() {
        let mut sent = Piece::new(PieceId::new(3), Color::Black, PieceKind::Pawn, Square::F7);
        sent.mark_moved();
        sent.set_square(Square::F5);

        let mut received = Piece::new(PieceId::new(3), Color::White, PieceKind::Pawn, Square::A1);
        received.apply_packed_state(sent.packed_state());

        assert_eq!(received, sent);
    }

    #[test]
    fn captured_pieces_keep_their_identity() {
        let queen = Piece::new(PieceId::new(9), Color::White, PieceKind::Queen, Square::D1);
        let taken = queen.into_captured();
        assert!(!taken.is_alive());
        assert_eq!(taken.id(), queen.id());
        assert_eq!(taken.kind(), queen.kind());
    }
}
