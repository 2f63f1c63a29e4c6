/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::warn;

use super::{Board, Color, Piece, PieceId, PieceKind, RuleMode, Square};

/// Maximum number of destinations any single piece can have: a Queen in the middle of an empty board.
pub const MAX_NUM_DESTINATIONS: usize = 27;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_DESTINATIONS`] squares.
///
/// Order carries no meaning; treat it as a set.
pub type MoveList = arrayvec::ArrayVec<Square, MAX_NUM_DESTINATIONS>;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Files a Rook must start on to take part in castling.
const ROOK_FILES: [u8; 2] = [0, Square::SIDE - 1];

/// Whether a generator is producing destinations to move to, or squares to threaten.
///
/// The two differ only for Pawns (which push without threatening) and Kings (which never threaten by castling).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Purpose {
    Moves,
    Attacks,
}

/// Generates every square `piece` could move to on `board`, ignoring the safety of its own King.
///
/// Whose turn it is does not matter. Castling is included for an eligible King; under [`RuleMode::Standard`]
/// it also requires that the King is not in check and does not pass through or land on an attacked square.
///
/// `piece` must be exactly as it stands on `board`. A stale copy yields no moves.
///
/// # Example
/// ```
/// # use chessrules::{pseudo_legal_moves, Board, RuleMode, Square};
/// let board = Board::from_fen("8/8/8/3Q4/8/8/8/8").unwrap();
/// let queen = board.piece_at(Square::D5).unwrap();
/// assert_eq!(pseudo_legal_moves(&queen, &board, None, RuleMode::Standard).len(), 27);
/// ```
pub fn pseudo_legal_moves(
    piece: &Piece,
    board: &Board,
    ep_target: Option<PieceId>,
    rule_mode: RuleMode,
) -> MoveList {
    if !stands_on(piece, board) {
        return MoveList::new();
    }

    generate(piece, board, ep_target, rule_mode, Purpose::Moves)
}

/// Generates every square `piece` threatens on `board`.
///
/// This is [`pseudo_legal_moves`] without Pawn pushes, en passant or castling. A Pawn only threatens the enemy
/// pieces diagonally in front of it, never an empty square. Squares held by `piece`'s own side are never included.
///
/// # Example
/// ```
/// # use chessrules::{attacks_for, Board, Square};
/// let board = Board::from_fen("8/8/8/8/8/5n2/4P3/8").unwrap();
/// let pawn = board.piece_at(Square::E2).unwrap();
/// assert_eq!(attacks_for(&pawn, &board).as_slice(), [Square::F3]);
/// ```
pub fn attacks_for(piece: &Piece, board: &Board) -> MoveList {
    if !stands_on(piece, board) {
        return MoveList::new();
    }

    generate(piece, board, None, RuleMode::Anarchy, Purpose::Attacks)
}

/// Returns `true` if `board` holds exactly `piece` on the square `piece` claims.
fn stands_on(piece: &Piece, board: &Board) -> bool {
    let current = board.piece_at(piece.square());
    if current != Some(*piece) {
        warn!(piece = %piece.id(), square = %piece.square(), found = ?current.map(|p| p.id()), "Piece does not match the board");
        return false;
    }

    true
}

fn generate(
    piece: &Piece,
    board: &Board,
    ep_target: Option<PieceId>,
    rule_mode: RuleMode,
    purpose: Purpose,
) -> MoveList {
    let mut moves = MoveList::new();

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(piece, board, ep_target, purpose, &mut moves),
        PieceKind::Knight => jumps(piece, board, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => slides(piece, board, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Rook => slides(piece, board, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            slides(piece, board, &ROOK_DIRECTIONS, &mut moves);
            slides(piece, board, &BISHOP_DIRECTIONS, &mut moves);
        }
        PieceKind::King => {
            jumps(piece, board, &KING_OFFSETS, &mut moves);
            if purpose == Purpose::Moves {
                castling_moves(piece, board, rule_mode, &mut moves);
            }
        }
    }

    moves
}

/// Single steps to each offset, onto empty or enemy squares.
fn jumps(piece: &Piece, board: &Board, offsets: &[(i8, i8)], moves: &mut MoveList) {
    for &(files, ranks) in offsets {
        if let Some(to) = piece.square().offset(files, ranks) {
            if board.color_at(to) != Some(piece.color()) {
                moves.push(to);
            }
        }
    }
}

/// Rays in each direction, stopping at the edge of the board or the first piece in the way.
fn slides(piece: &Piece, board: &Board, directions: &[(i8, i8)], moves: &mut MoveList) {
    for &(files, ranks) in directions {
        let mut current = piece.square();

        while let Some(to) = current.offset(files, ranks) {
            match board.color_at(to) {
                None => moves.push(to),
                Some(color) => {
                    // Blockers can only be captured if they're enemies
                    if color != piece.color() {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

fn pawn_moves(
    pawn: &Piece,
    board: &Board,
    ep_target: Option<PieceId>,
    purpose: Purpose,
    moves: &mut MoveList,
) {
    let color = pawn.color();
    let from = pawn.square();
    let forward = color.forward();

    if purpose == Purpose::Moves {
        if let Some(single) = from.offset(0, forward).filter(|&sq| !board.has(sq)) {
            moves.push(single);

            // Double pushes are only available to unmoved Pawns on their starting rank
            if !pawn.has_moved() && from.rank() == color.pawn_rank() {
                if let Some(double) = single.offset(0, forward).filter(|&sq| !board.has(sq)) {
                    moves.push(double);
                }
            }
        }
    }

    for side in [-1, 1] {
        let Some(to) = from.offset(side, forward) else {
            continue;
        };

        match board.color_at(to) {
            Some(occupant) if occupant != color => moves.push(to),
            Some(_) => {}
            None => {
                if purpose == Purpose::Moves && board.en_passant_victim(pawn, to, ep_target).is_some() {
                    moves.push(to);
                }
            }
        }
    }
}

fn castling_moves(king: &Piece, board: &Board, rule_mode: RuleMode, moves: &mut MoveList) {
    let color = king.color();
    let from = king.square();

    if king.has_moved() || from.rank() != color.home_rank() {
        return;
    }

    // Only computed once a castle is otherwise available
    let mut in_check = None;

    for rook_file in ROOK_FILES {
        let Some(rook_square) = Square::new(rook_file, from.rank()) else {
            continue;
        };

        let has_rook = board.piece_at(rook_square).is_some_and(|rook| {
            rook.is_rook() && rook.color() == color && !rook.has_moved()
        });
        if !has_rook {
            continue;
        }

        let (low, high) = if rook_file < from.file() {
            (rook_file + 1, from.file())
        } else {
            (from.file() + 1, rook_file)
        };
        let blocked = (low..high)
            .filter_map(|file| Square::new(file, from.rank()))
            .any(|square| board.has(square));
        if blocked {
            continue;
        }

        let towards = if rook_file < from.file() { -1 } else { 1 };
        let (Some(through), Some(to)) = (from.offset(towards, 0), from.offset(2 * towards, 0)) else {
            continue;
        };
        if board.has(through) || board.has(to) {
            continue;
        }

        if rule_mode.is_standard() {
            if *in_check.get_or_insert_with(|| is_square_attacked(from, color, board)) {
                return;
            }

            if is_square_attacked(through, color, board) || is_square_attacked(to, color, board) {
                continue;
            }
        }

        moves.push(to);
    }
}

/// Cheap geometric test of whether a piece of `kind` on `from` could possibly threaten `target`.
///
/// Never returns `false` for a square the piece actually threatens; it may return `true` for squares it does not.
///
/// # Example
/// ```
/// # use chessrules::{is_capture_feasible, PieceKind, Square};
/// assert!(is_capture_feasible(PieceKind::Bishop, Square::C1, Square::H6));
/// assert!(!is_capture_feasible(PieceKind::Bishop, Square::C1, Square::C8));
/// ```
pub const fn is_capture_feasible(kind: PieceKind, from: Square, target: Square) -> bool {
    let files = from.distance_files(target);
    let ranks = from.distance_ranks(target);

    match kind {
        PieceKind::Pawn => files == 1 && ranks == 1,
        PieceKind::Knight => files < 3 && ranks < 3,
        PieceKind::Bishop => files == ranks,
        PieceKind::Rook => files == 0 || ranks == 0,
        PieceKind::Queen => files == ranks || files == 0 || ranks == 0,
        PieceKind::King => from.distance(target) < 3,
    }
}

/// Returns `true` if `square` is threatened by any piece belonging to the opponent of `color`.
///
/// A square is threatened when it is among the pseudo-legal destinations of an opposing piece, leaving out
/// castling and Pawn pushes. An empty square diagonally in front of a Pawn is therefore not threatened.
/// En passant never threatens anything but a Pawn that just double-pushed, so the en passant target plays no
/// part here.
///
/// # Example
/// ```
/// # use chessrules::{is_square_attacked, Board, Color, Square};
/// let board = Board::from_fen("4k3/8/8/8/8/8/6p1/4K2R").unwrap();
/// assert!(is_square_attacked(Square::H1, Color::White, &board));
/// assert!(!is_square_attacked(Square::F1, Color::White, &board));
/// assert!(!is_square_attacked(Square::G1, Color::White, &board));
/// ```
pub fn is_square_attacked(square: Square, color: Color, board: &Board) -> bool {
    board
        .pieces(color.opponent())
        .filter(|attacker| is_capture_feasible(attacker.kind(), attacker.square(), square))
        .any(|attacker| {
            generate(&attacker, board, None, RuleMode::Anarchy, Purpose::Attacks).contains(&square)
        })
}

/// Returns `true` if a King of `king_color` standing on `king_square` would be in check.
#[inline(always)]
pub fn is_king_in_check(king_square: Square, board: &Board, king_color: Color) -> bool {
    is_square_attacked(king_square, king_color, board)
}

/// Generates every square `piece` may legally move to: its pseudo-legal moves that do not leave its own King in check.
///
/// Each candidate is played out on a private copy of `board`. If `piece`'s side has no King, nothing is filtered.
/// A copy of `piece` that no longer matches `board` yields no moves.
///
/// # Example
/// ```
/// # use chessrules::{legal_moves, Board, RuleMode, Square};
/// // The Bishop is pinned to its King
/// let board = Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3").unwrap();
/// let bishop = board.piece_at(Square::E2).unwrap();
/// assert!(legal_moves(&bishop, &board, None, RuleMode::Standard).is_empty());
/// ```
pub fn legal_moves(
    piece: &Piece,
    board: &Board,
    ep_target: Option<PieceId>,
    rule_mode: RuleMode,
) -> MoveList {
    let mut moves = pseudo_legal_moves(piece, board, ep_target, rule_mode);

    let Some(king) = board.king(piece.color()) else {
        return moves;
    };

    moves.retain(|to| {
        let mut scratch = *board;
        let Some(transition) = scratch.transition(piece.square(), *to, ep_target) else {
            return false;
        };

        let threatened = if piece.is_king() {
            transition.moved.square()
        } else {
            king.square()
        };

        !is_king_in_check(threatened, &scratch, piece.color())
    });

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_STARTPOS};

    const POSITIONS: [&str; 8] = [
        FEN_STARTPOS,
        FEN_KIWIPETE,
        "4k3/4r3/8/8/8/8/4B3/4K3",
        "r3k2r/8/8/8/8/8/8/R3K2R",
        "6k1/5ppp/8/8/8/8/8/R5K1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
        "k7/2Q5/1K6/8/8/8/8/8",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N",
    ];

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    fn sorted(mut moves: MoveList) -> Vec<Square> {
        moves.sort();
        moves.to_vec()
    }

    #[test]
    fn pseudo_legal_moves_stay_off_friendly_pieces() {
        for fen in POSITIONS {
            let board = board(fen);
            for piece in board.iter() {
                for to in pseudo_legal_moves(&piece, &board, None, RuleMode::Standard) {
                    assert_ne!(to, piece.square(), "{fen}: {piece:?} moves onto itself");
                    assert_ne!(
                        board.color_at(to),
                        Some(piece.color()),
                        "{fen}: {piece:?} moves onto a friendly piece at {to}"
                    );
                }
            }
        }
    }

    #[test]
    fn legal_moves_are_pseudo_legal() {
        for fen in POSITIONS {
            let board = board(fen);
            for piece in board.iter() {
                let pseudo = pseudo_legal_moves(&piece, &board, None, RuleMode::Standard);
                for to in legal_moves(&piece, &board, None, RuleMode::Standard) {
                    assert!(pseudo.contains(&to), "{fen}: {piece:?} to {to}");
                }
            }
        }
    }

    /// Plays a double push on `fen`, returning the board and the Pawn that may now be taken en passant.
    fn after_double_push(fen: &str, from: Square, to: Square) -> (Board, Option<PieceId>) {
        let mut board = board(fen);
        let transition = board.transition(from, to, None).unwrap();
        assert!(transition.double_push, "{fen}: {from}{to} is not a double push");
        (board, Some(transition.moved.id()))
    }

    fn assert_legal_moves_keep_the_king_safe(name: &str, board: &Board, ep_target: Option<PieceId>) {
        for piece in board.iter() {
            for to in legal_moves(&piece, board, ep_target, RuleMode::Standard) {
                let mut after = *board;
                after.transition(piece.square(), to, ep_target).unwrap();

                let king = after.king(piece.color()).unwrap();
                assert!(
                    !is_king_in_check(king.square(), &after, piece.color()),
                    "{name}: {piece:?} to {to} leaves its King in check"
                );
            }
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_in_check() {
        for fen in POSITIONS {
            assert_legal_moves_keep_the_king_safe(fen, &board(fen), None);
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_in_check_after_a_double_push() {
        let pushes = [
            (FEN_STARTPOS, Square::E2, Square::E4),
            (FEN_KIWIPETE, Square::A2, Square::A4),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8", Square::E2, Square::E4),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8", Square::G2, Square::G4),
            ("4k3/2p5/8/KP5r/8/8/8/8", Square::C7, Square::C5),
        ];

        for (fen, from, to) in pushes {
            let (board, ep_target) = after_double_push(fen, from, to);
            assert_legal_moves_keep_the_king_safe(&format!("{fen} after {from}{to}"), &board, ep_target);
        }
    }

    #[test]
    fn en_passant_cannot_expose_the_king_along_its_rank() {
        // Taking c6 en passant would lift both Pawns off the fifth rank, leaving the King open to the Rook
        let (board, ep_target) = after_double_push("4k3/2p5/8/KP5r/8/8/8/8", Square::C7, Square::C5);
        let pawn = board.piece_at(Square::B5).unwrap();

        assert!(pseudo_legal_moves(&pawn, &board, ep_target, RuleMode::Standard).contains(&Square::C6));
        assert_eq!(sorted(legal_moves(&pawn, &board, ep_target, RuleMode::Standard)), [Square::B6]);

        // With nothing behind them, the capture is fine
        let (board, ep_target) = after_double_push("4k3/2p5/8/KP6/8/8/8/8", Square::C7, Square::C5);
        let pawn = board.piece_at(Square::B5).unwrap();
        assert_eq!(
            sorted(legal_moves(&pawn, &board, ep_target, RuleMode::Standard)),
            [Square::B6, Square::C6]
        );
    }

    #[test]
    fn en_passant_can_remove_a_checking_pawn() {
        // The Pawn arriving on d5 checks the King on e4, and only en passant takes it
        let (board, ep_target) = after_double_push("4k3/3p4/8/4P3/4K3/8/8/8", Square::D7, Square::D5);
        assert!(is_king_in_check(Square::E4, &board, Color::White));

        let pawn = board.piece_at(Square::E5).unwrap();
        assert_eq!(sorted(legal_moves(&pawn, &board, ep_target, RuleMode::Standard)), [Square::D6]);
        assert!(legal_moves(&pawn, &board, None, RuleMode::Standard).is_empty());
    }

    #[test]
    fn castling_rook_shields_the_king_on_the_scratch_board() {
        // Without attack checks the castle is generated, and the Rook arriving on f1 blocks the Rook on a1
        let board = board("4k3/8/8/8/8/8/8/r3K2R");
        let king = board.piece_at(Square::E1).unwrap();

        assert!(pseudo_legal_moves(&king, &board, None, RuleMode::Anarchy).contains(&Square::G1));
        let legal = legal_moves(&king, &board, None, RuleMode::Anarchy);
        assert!(legal.contains(&Square::G1));
        assert!(!legal.contains(&Square::F1));
        assert!(!legal.contains(&Square::D1));
    }

    #[test]
    fn stale_pieces_have_no_moves() {
        let mut board = board("4k3/8/8/8/8/8/4P3/4K3");
        let pawn = board.piece_at(Square::E2).unwrap();
        board.transition(Square::E2, Square::E4, None).unwrap();

        // The copy still claims e2, which is now empty
        assert!(pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard).is_empty());
        assert!(legal_moves(&pawn, &board, None, RuleMode::Standard).is_empty());
        assert!(attacks_for(&pawn, &board).is_empty());

        // A copy from before the piece moved no longer matches, even on its old square
        let mut board = self::board("4k3/8/8/8/8/8/8/R3K3");
        let rook = board.piece_at(Square::A1).unwrap();
        board.transition(Square::A1, Square::A2, None).unwrap();
        board.transition(Square::A2, Square::A1, None).unwrap();
        assert!(pseudo_legal_moves(&rook, &board, None, RuleMode::Standard).is_empty());

        let moved = board.piece_at(Square::A1).unwrap();
        assert!(!pseudo_legal_moves(&moved, &board, None, RuleMode::Standard).is_empty());
    }

    #[test]
    fn capture_feasibility_has_no_false_negatives() {
        for kind in PieceKind::all() {
            for color in Color::all() {
                for from in Square::iter() {
                    let mut board = Board::new();
                    let piece = Piece::new(PieceId::new(0), color, kind, from);
                    board.place(piece, from);

                    for target in attacks_for(&piece, &board) {
                        assert!(
                            is_capture_feasible(kind, from, target),
                            "{color} {kind} on {from} attacks {target}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn pawn_pushes() {
        let board = board(FEN_STARTPOS);
        let pawn = board.piece_at(Square::E2).unwrap();
        assert_eq!(
            sorted(pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard)),
            [Square::E3, Square::E4]
        );

        let black = board.piece_at(Square::D7).unwrap();
        assert_eq!(
            sorted(pseudo_legal_moves(&black, &board, None, RuleMode::Standard)),
            [Square::D5, Square::D6]
        );

        // Off its starting rank, a Pawn only steps once
        let board = self::board("4k3/8/8/8/8/4P3/8/4K3");
        let pawn = board.piece_at(Square::E3).unwrap();
        assert_eq!(
            sorted(pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard)),
            [Square::E4]
        );

        // A blocked Pawn cannot jump
        let board = self::board("4k3/8/8/8/8/4n3/4P3/4K3");
        let pawn = board.piece_at(Square::E2).unwrap();
        assert!(pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard).is_empty());
    }

    #[test]
    fn pawns_capture_diagonally() {
        let board = board("4k3/8/8/3p1P2/4P3/8/8/4K3");
        let pawn = board.piece_at(Square::E4).unwrap();
        assert_eq!(
            sorted(pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard)),
            [Square::D5, Square::E5]
        );
    }

    #[test]
    fn en_passant_needs_the_target() {
        let board = board("4k3/8/8/4Pp2/8/8/8/4K3");
        let pawn = board.piece_at(Square::E5).unwrap();
        let passed = board.piece_at(Square::F5).unwrap();

        let without = pseudo_legal_moves(&pawn, &board, None, RuleMode::Standard);
        assert!(!without.contains(&Square::F6));

        let with = pseudo_legal_moves(&pawn, &board, Some(passed.id()), RuleMode::Standard);
        assert!(with.contains(&Square::F6));

        // Only the recorded Pawn can be taken en passant
        let passed_id = Some(passed.id());
        assert!(!pseudo_legal_moves(&passed, &board, passed_id, RuleMode::Standard).contains(&Square::E4));
    }

    #[test]
    fn knights_jump() {
        let board = board(FEN_STARTPOS);
        let knight = board.piece_at(Square::B1).unwrap();
        assert_eq!(
            sorted(pseudo_legal_moves(&knight, &board, None, RuleMode::Standard)),
            [Square::A3, Square::C3]
        );

        let board = self::board("8/8/8/3N4/8/8/8/8");
        let knight = board.piece_at(Square::D5).unwrap();
        assert_eq!(attacks_for(&knight, &board).len(), 8);
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let board = board("4k3/8/8/8/1p1R2P1/8/8/4K3");
        let rook = board.piece_at(Square::D4).unwrap();
        let moves = pseudo_legal_moves(&rook, &board, None, RuleMode::Standard);

        assert!(moves.contains(&Square::B4));
        assert!(!moves.contains(&Square::A4));
        assert!(moves.contains(&Square::F4));
        assert!(!moves.contains(&Square::G4));
        assert!(moves.contains(&Square::D8));
        assert!(moves.contains(&Square::D1));
        assert_eq!(moves.len(), 11);
    }

    #[test]
    fn startpos_is_mostly_blocked() {
        let board = board(FEN_STARTPOS);
        for square in [Square::A1, Square::C1, Square::D1, Square::E1, Square::F1, Square::H1] {
            let piece = board.piece_at(square).unwrap();
            assert!(legal_moves(&piece, &board, None, RuleMode::Standard).is_empty());
        }
    }

    #[test]
    fn pinned_pieces_cannot_move() {
        let board = board("4k3/4r3/8/8/8/8/4B3/4K3");
        let bishop = board.piece_at(Square::E2).unwrap();

        assert!(!pseudo_legal_moves(&bishop, &board, None, RuleMode::Standard).is_empty());
        assert!(legal_moves(&bishop, &board, None, RuleMode::Standard).is_empty());
    }

    #[test]
    fn kings_cannot_step_along_a_checking_ray() {
        let board = board("4k3/4r3/8/8/8/8/8/4K3");
        let king = board.piece_at(Square::E1).unwrap();
        let moves = legal_moves(&king, &board, None, RuleMode::Standard);

        assert!(!moves.contains(&Square::E2));
        assert_eq!(sorted(moves), [Square::D1, Square::F1, Square::D2, Square::F2]);
    }

    #[test]
    fn kingless_sides_are_not_filtered() {
        let board = board("4k3/4r3/8/8/8/8/4B3/8");
        let bishop = board.piece_at(Square::E2).unwrap();
        assert_eq!(
            legal_moves(&bishop, &board, None, RuleMode::Standard),
            pseudo_legal_moves(&bishop, &board, None, RuleMode::Standard)
        );
    }

    #[test]
    fn pawns_only_threaten_pieces_they_could_capture() {
        let board = board("4k3/8/8/8/8/8/6p1/4K2R");
        assert!(is_square_attacked(Square::H1, Color::White, &board));
        assert!(!is_square_attacked(Square::F1, Color::White, &board));
        assert!(!is_square_attacked(Square::G1, Color::White, &board));

        let pawn = board.piece_at(Square::G2).unwrap();
        assert_eq!(attacks_for(&pawn, &board).as_slice(), [Square::H1]);
    }
}
