use std::collections::HashSet;
use rand::Rng;
use crate::board::{Board, Color, Move, new_board, on_board, Square, to_glyphs};
use crate::computer::select_move;
use crate::moves::{is_legal, legal_destinations};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameMode {
    SinglePlayer,
    TwoPlayer,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Win(Color),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(Square),
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Square),
    Deselected,
    Moved(Move),
}

/// Snapshot taken when a computer move is scheduled. Only valid while the
/// game it was issued for has not changed since.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ComputerTicket {
    generation: u64,
}

/// Color the computer plays in single player games.
pub const COMPUTER_COLOR: Color = Color::Black;

#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub active_color: Color,
    pub selected: Option<Square>,
    pub is_over: bool,
    pub mode: GameMode,
    status: GameStatus,
    generation: u64,
}

impl GameState {
    pub fn new(mode: GameMode) -> Self {
        GameState {
            board: new_board(),
            active_color: Color::White,
            selected: None,
            is_over: false,
            mode,
            status: GameStatus::InProgress,
            generation: 0,
        }
    }

    pub fn start(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.board = new_board();
        self.active_color = Color::White;
        self.selected = None;
        self.is_over = false;
        self.status = GameStatus::InProgress;
        self.generation += 1;
        log::debug!("Game reset, mode {:?}", self.mode);
    }

    pub fn phase(&self) -> Phase {
        match (self.is_over, self.selected) {
            (true, _) => Phase::GameOver,
            (false, Some(square)) => Phase::PieceSelected(square),
            (false, None) => Phase::AwaitingSelection,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn result_text(&self) -> Option<String> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Win(color) => Some(format!("{} wins!", color.name())),
        }
    }

    fn human_to_move(&self) -> bool {
        self.mode == GameMode::TwoPlayer || self.active_color != COMPUTER_COLOR
    }

    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if !on_board(square) {
            log::warn!("Click outside the board {:?}", square);
            return ClickOutcome::Ignored;
        }
        if !self.human_to_move() {
            log::debug!("Click on {:?} ignored, computer to move", square);
            return ClickOutcome::Ignored;
        }
        match self.phase() {
            Phase::GameOver => ClickOutcome::Ignored,
            Phase::AwaitingSelection => {
                if self.board.get(square).is_some_and(|p| p.color == self.active_color) {
                    self.selected = Some(square);
                    ClickOutcome::Selected(square)
                }
                else {
                    ClickOutcome::Ignored
                }
            }
            Phase::PieceSelected(from) if from == square => {
                self.selected = None;
                ClickOutcome::Deselected
            }
            Phase::PieceSelected(from) => {
                if is_legal(&self.board, from, square, self.active_color) {
                    self.selected = None;
                    self.apply_move(from, square);
                    ClickOutcome::Moved((from, square))
                }
                else {
                    ClickOutcome::Ignored
                }
            }
        }
    }

    /// Plays a move already known to be legal, flips the turn and looks for
    /// a missing king.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        self.board.make_move(from, to);
        self.active_color = self.active_color.opposite();
        self.generation += 1;
        log::trace!("Board after {:?} -> {:?}\n{}", from, to, to_glyphs(&self.board));
        self.status = game_result(&self.board);
        if let GameStatus::Win(color) = self.status {
            log::info!("{} wins", color.name());
            self.is_over = true;
            self.selected = None;
        }
    }

    /// Destinations of the currently selected piece.
    pub fn possible_moves(&self) -> HashSet<Square> {
        match self.selected {
            None => HashSet::new(),
            Some(square) => legal_destinations(&self.board, square, self.active_color),
        }
    }

    /// A ticket when the computer should answer next, `None` otherwise.
    pub fn pending_computer_move(&self) -> Option<ComputerTicket> {
        (self.mode == GameMode::SinglePlayer && !self.is_over && self.active_color == COMPUTER_COLOR)
            .then_some(ComputerTicket { generation: self.generation })
    }

    pub fn is_current(&self, ticket: ComputerTicket) -> bool {
        self.pending_computer_move() == Some(ticket)
    }

    /// Plays a random computer move if `ticket` still describes this game.
    /// Stale tickets and positions without legal moves leave the game untouched.
    pub fn play_computer_move<R: Rng + ?Sized>(&mut self, ticket: ComputerTicket, rng: &mut R) -> Option<Move> {
        if !self.is_current(ticket) {
            log::debug!("Dropping stale computer move {:?}", ticket);
            return None;
        }
        let (from, to) = select_move(&self.board, self.active_color, rng)?;
        self.apply_move(from, to);
        Some((from, to))
    }
}

/// The side whose king is gone has lost.
pub fn game_result(board: &Board) -> GameStatus {
    match (board.has_king(Color::White), board.has_king(Color::Black)) {
        (true, true) => GameStatus::InProgress,
        (false, _) => GameStatus::Win(Color::Black),
        (true, false) => GameStatus::Win(Color::White),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::board::{Board, new_board, Piece, PieceType};
    use crate::board::Color::{Black, White};
    use crate::game::{ClickOutcome, GameMode, GameState, GameStatus, Phase, game_result};

    fn game_with_board(mode: GameMode, board: Board) -> GameState {
        let mut game = GameState::new(mode);
        game.board = board;
        game
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new(GameMode::TwoPlayer);
        assert_eq!(game.board, new_board());
        assert_eq!(game.active_color, White);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.result_text(), None);
    }

    #[test]
    fn test_select_only_own_pieces() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        assert_eq!(game.click((1, 0)), ClickOutcome::Ignored);
        assert_eq!(game.click((4, 4)), ClickOutcome::Ignored);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.click((6, 4)), ClickOutcome::Selected((6, 4)));
        assert_eq!(game.phase(), Phase::PieceSelected((6, 4)));
        assert_eq!(game.possible_moves(), HashSet::from([(5, 4), (4, 4)]));
    }

    #[test]
    fn test_click_selected_square_deselects() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        game.click((7, 1));
        assert_eq!(game.click((7, 1)), ClickOutcome::Deselected);
        assert_eq!(game.selected, None);
        assert_eq!(game.board, new_board());
        assert_eq!(game.active_color, White);
    }

    #[test]
    fn test_illegal_destination_keeps_selection() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        game.click((6, 4));
        assert_eq!(game.click((3, 4)), ClickOutcome::Ignored);
        assert_eq!(game.click((6, 5)), ClickOutcome::Ignored);
        assert_eq!(game.selected, Some((6, 4)));
        assert_eq!(game.board, new_board());
    }

    #[test]
    fn test_click_outside_board() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        assert_eq!(game.click((8, 0)), ClickOutcome::Ignored);
        assert_eq!(game.click((0, 8)), ClickOutcome::Ignored);
        assert_eq!(game.phase(), Phase::AwaitingSelection);

        game.click((6, 4));
        assert_eq!(game.click((8, 4)), ClickOutcome::Ignored);
        assert_eq!(game.click((usize::MAX, 4)), ClickOutcome::Ignored);
        assert_eq!(game.phase(), Phase::PieceSelected((6, 4)));
        assert_eq!(game.board, new_board());
    }

    #[test]
    fn test_move_flips_turn() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        game.click((6, 4));
        assert_eq!(game.click((4, 4)), ClickOutcome::Moved(((6, 4), (4, 4))));
        assert_eq!(game.selected, None);
        assert_eq!(game.active_color, Black);
        assert_eq!(game.board.get((4, 4)), Some(Piece::new(White, PieceType::Pawn)));
        assert!(game.board.is_empty((6, 4)));

        assert_eq!(game.click((6, 3)), ClickOutcome::Ignored);
        assert_eq!(game.click((1, 4)), ClickOutcome::Selected((1, 4)));
        assert_eq!(game.click((3, 4)), ClickOutcome::Moved(((1, 4), (3, 4))));
        assert_eq!(game.active_color, White);
    }

    #[test]
    fn test_promotion_through_click() {
        let mut board = new_board();
        board.squares[1][0] = Some(Piece::new(White, PieceType::Pawn));
        board.squares[0][0] = None;
        let mut game = game_with_board(GameMode::TwoPlayer, board);
        game.click((1, 0));
        assert_eq!(game.click((0, 0)), ClickOutcome::Moved(((1, 0), (0, 0))));
        assert_eq!(game.board.get((0, 0)), Some(Piece::new(White, PieceType::Queen)));
        assert!(!game.is_over);
    }

    #[test]
    fn test_capture_black_king() {
        let mut board = Board::empty();
        board.squares[7][4] = Some(Piece::new(White, PieceType::King));
        board.squares[5][2] = Some(Piece::new(White, PieceType::Rook));
        board.squares[0][2] = Some(Piece::new(Black, PieceType::King));
        let mut game = game_with_board(GameMode::TwoPlayer, board);
        game.click((5, 2));
        assert_eq!(game.click((0, 2)), ClickOutcome::Moved(((5, 2), (0, 2))));
        assert!(game.is_over);
        assert_eq!(game.status(), GameStatus::Win(White));
        assert_eq!(game.result_text(), Some("White wins!".to_string()));
        assert_eq!(game.phase(), Phase::GameOver);

        assert_eq!(game.click((0, 2)), ClickOutcome::Ignored);
        assert_eq!(game.click((7, 4)), ClickOutcome::Ignored);
        assert_eq!(game.selected, None);
    }

    #[test]
    fn test_capture_white_king() {
        let mut board = Board::empty();
        board.squares[7][4] = Some(Piece::new(White, PieceType::King));
        board.squares[5][3] = Some(Piece::new(Black, PieceType::Knight));
        board.squares[0][0] = Some(Piece::new(Black, PieceType::King));
        let mut game = game_with_board(GameMode::TwoPlayer, board);
        game.active_color = Black;
        game.click((5, 3));
        game.click((7, 4));
        assert!(game.is_over);
        assert_eq!(game.result_text(), Some("Black wins!".to_string()));
    }

    #[test]
    fn test_game_result() {
        assert_eq!(game_result(&new_board()), GameStatus::InProgress);
        let mut board = new_board();
        board.squares[7][4] = None;
        assert_eq!(game_result(&board), GameStatus::Win(Black));
        board.squares[7][4] = Some(Piece::new(White, PieceType::King));
        board.squares[0][4] = None;
        assert_eq!(game_result(&board), GameStatus::Win(White));
    }

    #[test]
    fn test_reset() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        game.click((6, 4));
        game.click((4, 4));
        game.click((1, 3));
        game.click((3, 3));
        game.click((4, 4));
        game.click((3, 3));
        game.click((0, 3));
        game.reset();
        assert_eq!(game.board, new_board());
        assert_eq!(game.selected, None);
        assert_eq!(game.active_color, White);
        assert!(!game.is_over);
        assert_eq!(game.mode, GameMode::TwoPlayer);

        game.start(GameMode::SinglePlayer);
        assert_eq!(game.mode, GameMode::SinglePlayer);
        assert_eq!(game.board, new_board());
    }

    #[test]
    fn test_computer_turn() {
        let mut game = GameState::new(GameMode::SinglePlayer);
        assert_eq!(game.pending_computer_move(), None);
        game.click((6, 4));
        game.click((4, 4));
        let ticket = game.pending_computer_move().unwrap();

        assert_eq!(game.click((1, 4)), ClickOutcome::Ignored);

        let mut rng = StdRng::seed_from_u64(3);
        let (from, to) = game.play_computer_move(ticket, &mut rng).unwrap();
        assert_eq!(game.board.get(to).map(|p| p.color), Some(Black));
        assert!(game.board.is_empty(from));
        assert_eq!(game.active_color, White);
        assert_eq!(game.pending_computer_move(), None);
        assert_eq!(game.play_computer_move(ticket, &mut rng), None);
    }

    #[test]
    fn test_stale_ticket_after_reset() {
        let mut game = GameState::new(GameMode::SinglePlayer);
        game.click((6, 0));
        game.click((5, 0));
        let ticket = game.pending_computer_move().unwrap();
        game.reset();
        game.click((6, 0));
        game.click((5, 0));
        assert!(!game.is_current(ticket));
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(game.play_computer_move(ticket, &mut rng), None);
        assert_eq!(game.active_color, Black);

        let ticket = game.pending_computer_move().unwrap();
        game.start(GameMode::TwoPlayer);
        assert_eq!(game.play_computer_move(ticket, &mut rng), None);
        assert_eq!(game.board, new_board());
    }

    #[test]
    fn test_two_player_has_no_computer() {
        let mut game = GameState::new(GameMode::TwoPlayer);
        game.click((6, 4));
        game.click((4, 4));
        assert_eq!(game.pending_computer_move(), None);
        assert_eq!(game.click((1, 4)), ClickOutcome::Selected((1, 4)));
    }
}
