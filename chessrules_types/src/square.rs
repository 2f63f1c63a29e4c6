/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

/// Declares a named constant for every square on the board.
macro_rules! square_consts {
    ($($name:ident = $index:literal),* $(,)?) => {
        $(
            #[allow(missing_docs)]
            pub const $name: Self = Self($index);
        )*
    };
}

/// Represents a single square on an 8x8 chessboard.
///
/// Internally stored as `rank * 8 + file`, where both the file and the rank are zero-indexed.
/// White's back rank is rank `0` and Black's is rank `7`, so `(0, 0)` is `a1` and `(7, 7)` is `h8`.
///
/// A [`Square`] can only be constructed through checked constructors, so every value is on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Number of files (and ranks) on the board.
    pub const SIDE: u8 = 8;

    square_consts! {
        A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
        A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
        A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
        A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
        A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
        A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
        A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
        A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
    }

    /// Creates a new [`Square`] from a file and a rank, if both are within `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::new(4, 1), Some(Square::E2));
    /// assert_eq!(Square::new(8, 0), None);
    /// ```
    #[inline(always)]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < Self::SIDE && rank < Self::SIDE {
            Some(Self(rank * Self::SIDE + file))
        } else {
            None
        }
    }

    /// Creates a new [`Square`] from signed coordinates, discarding anything off the board.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::from_coords(7, 7), Some(Square::H8));
    /// assert_eq!(Square::from_coords(-1, 3), None);
    /// ```
    #[inline(always)]
    pub const fn from_coords(file: i32, rank: i32) -> Option<Self> {
        if file < 0 || rank < 0 {
            return None;
        }

        // Upper bound is checked by `new`
        if file > u8::MAX as i32 || rank > u8::MAX as i32 {
            return None;
        }

        Self::new(file as u8, rank as u8)
    }

    /// Creates a new [`Square`] from an index in `[0, 63]`.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Fetches the index of this square, in `[0, 63]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Fetches the zero-indexed file (column) of this square.
    #[inline(always)]
    pub const fn file(&self) -> u8 {
        self.0 % Self::SIDE
    }

    /// Fetches the zero-indexed rank (row) of this square.
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        self.0 / Self::SIDE
    }

    /// Returns the square `files` files and `ranks` ranks away from this one, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::E2.offset(0, 2), Some(Square::E4));
    /// assert_eq!(Square::H1.offset(1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, files: i8, ranks: i8) -> Option<Self> {
        Self::from_coords(self.file() as i32 + files as i32, self.rank() as i32 + ranks as i32)
    }

    /// Absolute difference between the files of `self` and `other`.
    #[inline(always)]
    pub const fn distance_files(&self, other: Self) -> u8 {
        self.file().abs_diff(other.file())
    }

    /// Absolute difference between the ranks of `self` and `other`.
    #[inline(always)]
    pub const fn distance_ranks(&self, other: Self) -> u8 {
        self.rank().abs_diff(other.rank())
    }

    /// Chebyshev distance (the number of King steps) between `self` and `other`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::A1.distance(Square::H8), 7);
    /// assert_eq!(Square::E4.distance(Square::F5), 1);
    /// ```
    #[inline(always)]
    pub const fn distance(&self, other: Self) -> u8 {
        let files = self.distance_files(other);
        let ranks = self.distance_ranks(other);
        if files > ranks {
            files
        } else {
            ranks
        }
    }

    /// An iterator over every square on the board, from `a1` to `h8`.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Parses a [`Square`] from algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::from_uci("e4").unwrap(), Square::E4);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let mut chars = uci.trim().chars();

        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid square {uci:?}: expected a file letter followed by a rank digit");
        };

        let file = match file.to_ascii_lowercase() {
            f @ 'a'..='h' => f as u8 - b'a',
            _ => bail!("Invalid square {uci:?}: file must be within a-h"),
        };

        let rank = rank
            .to_digit(10)
            .filter(|rank| (1..=8).contains(rank))
            .ok_or(anyhow!("Invalid square {uci:?}: rank must be within 1-8"))?;

        // Both halves were range-checked above
        Self::new(file, rank as u8 - 1).ok_or(anyhow!("Invalid square {uci:?}"))
    }

    /// Formats this square in algebraic notation, such as `e4`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        format!("{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.to_uci(), self.file(), self.rank())
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_round_trip_through_index() {
        for square in Square::iter() {
            assert_eq!(Square::new(square.file(), square.rank()), Some(square));
            assert_eq!(Square::from_index(square.index()), Some(square));
        }
        assert_eq!(Square::iter().len(), Square::COUNT);
    }

    #[test]
    fn off_board_coordinates_are_rejected() {
        assert_eq!(Square::from_coords(8, 0), None);
        assert_eq!(Square::from_coords(0, 8), None);
        assert_eq!(Square::from_coords(-1, -1), None);
        assert_eq!(Square::from_coords(i32::MAX, 0), None);
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn offsets_stay_on_the_board() {
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::A1.offset(1, 2), Some(Square::B3));
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::D4.offset(-3, -3), Some(Square::A1));
    }

    #[test]
    fn algebraic_notation() {
        assert_eq!(Square::from_uci("a1").unwrap(), Square::A1);
        assert_eq!(Square::from_uci("H8").unwrap(), Square::H8);
        assert_eq!(Square::E4.to_string(), "e4");
        assert!(Square::from_uci("e").is_err());
        assert!(Square::from_uci("e0").is_err());
        assert!(Square::from_uci("e44").is_err());
        assert!(Square::from_uci("z4").is_err());
    }
}
