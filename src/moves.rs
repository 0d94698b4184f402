use std::collections::HashSet;
use crate::board::{Board, Color, HEIGHT, Move, on_board, PieceType, Square, WIDTH};

/// True when no piece stands strictly between `from` and `to`.
/// Only meaningful for straight or diagonal lines.
pub fn clear_path(board: &Board, from: Square, to: Square) -> bool {
    let d_row = (to.0 as i8 - from.0 as i8).signum();
    let d_col = (to.1 as i8 - from.1 as i8).signum();
    let mut row = from.0 as i8 + d_row;
    let mut col = from.1 as i8 + d_col;
    while (row, col) != (to.0 as i8, to.1 as i8) {
        if row < 0 || col < 0 || !on_board((row as usize, col as usize)) {
            return false;
        }
        if board.squares[row as usize][col as usize].is_some() {
            return false;
        }
        row += d_row;
        col += d_col;
    }
    true
}

fn pawn_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let d_row = to.0 as i8 - from.0 as i8;
    let d_col = to.1 as i8 - from.1 as i8;
    let forward = color.forward();
    match board.get(to) {
        None if d_col == 0 && d_row == forward => true,
        None if d_col == 0 && d_row == 2 * forward => {
            let middle = ((from.0 as i8 + forward) as usize, from.1);
            from.0 == color.pawn_rank() && board.is_empty(middle)
        }
        Some(target) => d_col.abs() == 1 && d_row == forward && target.color != color,
        None => false,
    }
}

/// Simplified legality: movement pattern, friendly fire and blocked lines.
/// Check is never considered, kings may be captured.
pub fn is_legal(board: &Board, from: Square, to: Square, color: Color) -> bool {
    if !on_board(from) || !on_board(to) || from == to {
        return false;
    }
    let piece = match board.get(from) {
        Some(p) if p.color == color => p,
        _ => return false,
    };
    if board.get(to).is_some_and(|target| target.color == color) {
        return false;
    }
    let d_row = (to.0 as i8 - from.0 as i8).abs();
    let d_col = (to.1 as i8 - from.1 as i8).abs();
    match piece.kind {
        PieceType::Pawn => pawn_move(board, from, to, color),
        PieceType::Knight => (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2),
        PieceType::Bishop => d_row == d_col && clear_path(board, from, to),
        PieceType::Rook => (d_row == 0 || d_col == 0) && clear_path(board, from, to),
        PieceType::Queen => (d_row == d_col || d_row == 0 || d_col == 0) && clear_path(board, from, to),
        PieceType::King => d_row <= 1 && d_col <= 1,
    }
}

pub fn legal_destinations(board: &Board, from: Square, color: Color) -> HashSet<Square> {
    (0..HEIGHT)
        .flat_map(|r| (0..WIDTH).map(move |c| (r, c)))
        .filter(|&to| is_legal(board, from, to, color))
        .collect()
}

/// Every legal move for `color`, scanned row by row.
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    board.occupied_squares(color)
        .flat_map(|from| (0..HEIGHT)
            .flat_map(|r| (0..WIDTH).map(move |c| (r, c)))
            .filter(move |&to| is_legal(board, from, to, color))
            .map(move |to| (from, to)))
        .collect()
}
