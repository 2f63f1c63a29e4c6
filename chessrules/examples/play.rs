/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use chessrules::{Game, GameStatus, MoveOutcome, PieceKind, RuleMode, Square, FEN_STARTPOS};

/// Play a sequence of moves from a position, printing the board and the outcome of every move.
#[derive(Debug, Parser)]
struct Cli {
    /// The FEN placement string of the starting position.
    #[arg(short, long, default_value = FEN_STARTPOS)]
    fen: String,

    /// The rules to play by: "standard" or "anarchy".
    #[arg(short, long, default_value_t = RuleMode::Standard)]
    mode: RuleMode,

    /// Moves to play, such as `e2e4`. Append a piece letter to promote, such as `e7e8q`.
    #[arg(required = false)]
    moves: Vec<String>,
}

/// Splits a move like `e7e8q` into its origin, destination and promotion choice.
fn parse_move(mv: &str) -> Result<(Square, Square, Option<PieceKind>)> {
    if !mv.is_ascii() || !(4..=5).contains(&mv.len()) {
        bail!("Invalid move {mv:?}: expected a move like e2e4 or e7e8q");
    }

    let from = Square::from_uci(&mv[0..2])?;
    let to = Square::from_uci(&mv[2..4])?;
    let promotion = mv[4..]
        .chars()
        .next()
        .map(PieceKind::from_char)
        .transpose()?;

    Ok((from, to, promotion))
}

/// Prints the board, with White in bold and Black in red.
fn print_board(game: &Game) {
    for rank in (0..Square::SIDE).rev() {
        let row = (0..Square::SIDE)
            .filter_map(|file| Square::new(file, rank))
            .map(|square| match game.piece_at(square) {
                Some(piece) if piece.color().is_white() => piece.to_string().bold().to_string(),
                Some(piece) => piece.to_string().red().to_string(),
                None => ".".dimmed().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        println!("{}| {row}", rank + 1);
    }
    println!(" +----------------\n   a b c d e f g h\n");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();

    let mut game = Game::from_fen(&args.fen)?;
    game.set_rule_mode(args.mode);
    print_board(&game);

    for mv in &args.moves {
        let (from, to, promotion) = parse_move(mv)?;
        let piece = game
            .piece_at(from)
            .ok_or(anyhow!("There is no piece on {from} to move"))?;

        let outcome = game.play(piece.id(), to);
        let label = match outcome {
            MoveOutcome::Rejected => outcome.to_string().yellow(),
            MoveOutcome::Moved => outcome.to_string().green(),
            MoveOutcome::Captured => outcome.to_string().bright_green(),
        };
        println!("{} {mv}: {label}", piece.color());

        if !outcome.is_accepted() {
            continue;
        }

        if game.promotion_pending(piece.id()) {
            let kind = promotion.unwrap_or(PieceKind::Queen);
            game.promote(piece.id(), kind)
                .with_context(|| format!("Cannot promote to a {kind}"))?;
        }

        let report = game.end_turn();
        print_board(&game);

        match report.status {
            GameStatus::Ongoing if report.in_check => {
                println!("{}", format!("{} is in check", report.side_to_move).yellow())
            }
            GameStatus::Ongoing => {}
            status => {
                println!("{}", status.to_string().bold());
                break;
            }
        }
    }

    println!(
        "{}\nScore: White {}, Black {}",
        game.to_fen(),
        game.score(chessrules::Color::White),
        game.score(chessrules::Color::Black)
    );

    Ok(())
}
