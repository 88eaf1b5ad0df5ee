//! Collision checks and committing piece moves onto the board

use crate::board::Board;
use crate::tetromino::Tetromino;

/// Cells in `new` that `old` does not already cover
pub fn newly_claimed(old: &Tetromino, new: &Tetromino) -> Vec<(i32, i32)> {
    let old_cells = old.cells();
    new.cells()
        .into_iter()
        .filter(|cell| !old_cells.contains(cell))
        .collect()
}

/// A move is legal when every cell it newly claims reads as empty.
/// Off-grid cells read as `OUT_OF_BOUNDS`, so they always fail here.
pub fn can_move(old: &Tetromino, new: &Tetromino, board: &Board) -> bool {
    newly_claimed(old, new)
        .into_iter()
        .all(|(row, col)| board.is_free(row, col))
}

/// Clear `old`'s footprint, then stamp `new` with its id.
/// Cells shared by both poses end up holding the id, not zero.
pub fn commit_move(board: &mut Board, old: &Tetromino, new: &Tetromino) {
    board.fill(&old.cells(), 0);
    board.fill(&new.cells(), new.kind.id());
}

/// Validate and commit in one step. Returns the new board when the move is
/// legal, leaving the input untouched either way.
pub fn try_move(board: &Board, old: &Tetromino, new: &Tetromino) -> Option<Board> {
    if !can_move(old, new, board) {
        return None;
    }
    let mut next = *board;
    commit_move(&mut next, old, new);
    Some(next)
}
