use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use minesweeper_ai::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;

/// Autonomous minesweeper bot: plays proven-safe cells first, guesses otherwise.
#[derive(Parser)]
#[command(name = "minesweeper-ai")]
struct Cli {
    /// Number of rows.
    #[arg(long, default_value = "8")]
    height: usize,

    /// Number of columns.
    #[arg(long, default_value = "8")]
    width: usize,

    /// Number of randomly placed mines. Ignored when `--mine` is given.
    #[arg(short, long, default_value = "8")]
    mines: usize,

    /// Fixed mine position as `row,col`. Repeat for each mine.
    #[arg(long = "mine", value_name = "ROW,COL")]
    fixed_mines: Vec<Cell>,

    /// Random seed for mine placement and guesses.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves.
    #[arg(long)]
    max_moves: Option<usize>,

    /// Also derive constraints from nested pairs of sentences.
    #[arg(long)]
    subset: bool,

    /// Pause between moves, in milliseconds.
    #[arg(long, default_value = "0")]
    delay_ms: u64,

    /// Print where the mines are before playing.
    #[arg(long)]
    show_mines: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --- 1. Initialization ---
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let grid = Grid::new(cli.height, cli.width);
    let board = if cli.fixed_mines.is_empty() {
        Board::new(grid, cli.mines, &mut rng)
    } else {
        Board::with_mines(grid, cli.fixed_mines.iter().copied())
    }
    .context("failed to set up the board")?;

    let config = if cli.subset {
        EngineConfig::with_subset_inference()
    } else {
        EngineConfig::default()
    };
    let mut session = Session::new(board, config);
    let mut selector = Random(rng);

    println!("--- Autonomous Minesweeper Bot ---");
    println!("Strategy: Prioritize logically safe moves, guess randomly otherwise.");
    if cli.show_mines {
        println!("{}", session.board());
    }

    // --- 2. Game Loop ---
    let mut move_count = 0;
    while cli.max_moves.is_none_or(|max| move_count < max) {
        let Some(turn) = session.step(&mut selector) else {
            break;
        };
        move_count += 1;
        println!("\n--- Move #{} ---", move_count);

        match &turn {
            Turn::Probed {
                play,
                count,
                deductions,
            } => {
                match play {
                    Move::Safe(cell) => println!("AI making safe move at {cell}."),
                    Move::Random(cell) => {
                        println!("No known safe moves, AI making random move at {cell}.")
                    }
                }
                println!("Board reports {count} nearby mine(s).");
                print_deductions(deductions);
            }
            Turn::Detonated(play) => println!("AI probes {} and hits a mine.", play.cell()),
        }
        print_board(&session);

        if cli.delay_ms > 0 {
            thread::sleep(Duration::from_millis(cli.delay_ms));
        }
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");
    match session.state() {
        GameState::Won => println!("Result: The bot won!"),
        GameState::Lost(cell) => println!("Result: The bot hit a mine at {cell} and lost."),
        GameState::Exhausted => println!("Result: No moves left to make."),
        GameState::Playing => println!("Result: Stopped after {move_count} moves."),
    }
    println!(
        "Known mines: {}",
        session.ai().mines().iter().sorted().join(" ")
    );

    Ok(())
}

fn print_deductions(deductions: &Deductions) {
    if !deductions.safes.is_empty() {
        println!(
            "Deduced safe: {}",
            deductions.safes.iter().sorted().join(" ")
        );
    }
    if !deductions.mines.is_empty() {
        println!(
            "Deduced mine: {}",
            deductions.mines.iter().sorted().join(" ")
        );
    }
}

fn print_board(session: &Session) {
    let grid = session.board().grid();

    // Print header
    print!("   ");
    for col in 0..grid.width {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(grid.width));

    // Print rows
    for row in 0..grid.height {
        print!("{:^2}|", row);
        for col in 0..grid.width {
            let cell = Cell::new(row, col);
            let display = match session.revealed().get(&cell) {
                Some(count) => format!(" {} ", count),
                None if session.state() == GameState::Lost(cell) => " * ".to_string(),
                None if session.ai().mines().contains(&cell) => " F ".to_string(),
                None => " ■ ".to_string(),
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
