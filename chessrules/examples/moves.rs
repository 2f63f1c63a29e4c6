/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use chessrules::{Position, RuleMode, Square, FEN_STARTPOS};

/// List the pseudo-legal and legal moves of pieces in a position.
#[derive(Debug, Parser)]
struct Cli {
    /// The FEN placement string of the position.
    #[arg(short, long, default_value = FEN_STARTPOS)]
    fen: String,

    /// The rules to generate moves under: "standard" or "anarchy".
    #[arg(short, long, default_value_t = RuleMode::Standard)]
    mode: RuleMode,

    /// Squares of the pieces to list moves for. Every piece is listed if none are given.
    #[arg(required = false)]
    squares: Vec<Square>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let pos = Position::from_fen_with_mode(&args.fen, args.mode)?;
    println!("{pos}\n");

    let pieces = if args.squares.is_empty() {
        pos.iter().collect::<Vec<_>>()
    } else {
        args.squares
            .iter()
            .map(|&square| {
                pos.piece_at(square)
                    .ok_or(anyhow!("There is no piece on {square}"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    for piece in pieces {
        let pseudo = pos.pseudo_legal_moves(piece.id());
        let legal = pos.legal_moves(piece.id());

        let moves = pseudo
            .iter()
            .map(|to| {
                if legal.contains(to) {
                    to.to_string().green().to_string()
                } else {
                    to.to_string().red().strikethrough().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "{} {} on {} ({}): {moves}",
            piece.color(),
            piece.kind(),
            piece.square(),
            legal.len()
        );
    }

    for color in [chessrules::Color::White, chessrules::Color::Black] {
        if pos.is_in_check(color) {
            println!("{}", format!("{color} is in check").yellow());
        }
    }

    Ok(())
}
