use rand::Rng;
use rand::seq::SliceRandom;
use crate::board::{Board, Color, Move};
use crate::moves::all_legal_moves;

/// Uniformly random pick among every legal move of `color`.
/// `None` when `color` cannot move at all.
pub fn select_move<R: Rng + ?Sized>(board: &Board, color: Color, rng: &mut R) -> Option<Move> {
    let moves = all_legal_moves(board, color);
    log::debug!("{} has {} legal moves", color.name(), moves.len());
    moves.choose(rng).copied()
}
