use itertools::Itertools;
use minesweeper_ai as ms;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

const HIDDEN: i8 = -1;
const KNOWN_MINE: i8 = -2;

/// New session bytes. With a `seed` both the mine layout and every guess
/// the bot makes are reproducible.
#[wasm_bindgen]
pub fn create_session(
    height: u8,
    width: u8,
    mines: u16,
    seed: Option<u64>,
    subset: bool,
) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let grid = ms::Grid::new(height as usize, width as usize);
    let board = match seed {
        Some(seed) => ms::Board::new(grid, mines as usize, &mut StdRng::seed_from_u64(seed)),
        None => ms::Board::new(grid, mines as usize, &mut rand::rng()),
    }
    .map_err(|e| e.to_string())?;
    let config = if subset {
        ms::EngineConfig::with_subset_inference()
    } else {
        ms::EngineConfig::default()
    };

    let session = ms::Session::new(board, config);
    let session = match seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    };
    session.serialize().map_err(|e| e.to_string())
}

/// Plays one bot move. The returned bytes are the new session state.
#[wasm_bindgen]
pub fn step(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    session.advance();
    session.serialize().map_err(|e| e.to_string())
}

/// 0 while playing, 1 won, 2 lost, 3 out of moves.
#[wasm_bindgen]
pub fn status(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(match session.state() {
        ms::GameState::Playing => 0,
        ms::GameState::Won => 1,
        ms::GameState::Lost(_) => 2,
        ms::GameState::Exhausted => 3,
    })
}

/// Row-major cells: the reported count for probed cells, -2 for cells the
/// bot proved to be mines, -1 for everything else.
#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    let grid = session.board().grid();
    Ok(grid
        .cells()
        .map(|cell| match session.revealed().get(&cell) {
            Some(&count) => count as i8,
            None if session.ai().mines().contains(&cell) => KNOWN_MINE,
            None => HIDDEN,
        })
        .collect())
}

/// Probed cells as flat `[row, col, count, row, col, count, ...]`, row-major.
#[wasm_bindgen]
pub fn revealed(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(session
        .revealed()
        .iter()
        .flat_map(|(cell, &count)| [cell.row as u32, cell.col as u32, count as u32])
        .collect())
}

/// Cells the bot proved to be mines as flat `[row, col, row, col, ...]`, row-major.
#[wasm_bindgen]
pub fn known_mines(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let session = ms::Session::deserialize(&bts).map_err(|e| e.to_string())?;
    Ok(session
        .ai()
        .mines()
        .iter()
        .sorted()
        .flat_map(|cell| [cell.row as u32, cell.col as u32])
        .collect())
}
