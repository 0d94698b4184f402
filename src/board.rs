use serde::Serializer;

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;

/// `(row, col)`, row 0 is black's home rank.
pub type Square = (usize, usize);
pub type Move = (Square, Square);

pub fn on_board((row, col): Square) -> bool {
    row < HEIGHT && col < WIDTH
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Color {
    White, Black
}

impl Color {
    pub fn opposite(&self) -> Color {
        if self == &Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// Row a pawn of this color starts on.
    pub fn pawn_rank(&self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row where a pawn of this color promotes.
    pub fn promotion_rank(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => HEIGHT - 1,
        }
    }

    /// Row delta of a single pawn step.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    pub fn letter(&self) -> char {
        let c = match self.kind {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        };
        if self.color == Color::White { c } else { c.to_ascii_lowercase() }
    }

    pub fn glyph(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceType::King) => '♔',
            (Color::White, PieceType::Queen) => '♕',
            (Color::White, PieceType::Rook) => '♖',
            (Color::White, PieceType::Bishop) => '♗',
            (Color::White, PieceType::Knight) => '♘',
            (Color::White, PieceType::Pawn) => '♙',
            (Color::Black, PieceType::King) => '♚',
            (Color::Black, PieceType::Queen) => '♛',
            (Color::Black, PieceType::Rook) => '♜',
            (Color::Black, PieceType::Bishop) => '♝',
            (Color::Black, PieceType::Knight) => '♞',
            (Color::Black, PieceType::Pawn) => '♟',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Piece>; WIDTH]; HEIGHT],
}

impl Board {
    pub fn empty() -> Self {
        Board { squares: [[None; WIDTH]; HEIGHT] }
    }

    /// `None` for empty squares and squares outside the board.
    pub fn get(&self, (row, col): Square) -> Option<Piece> {
        self.squares.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn set(&mut self, (row, col): Square, piece: Option<Piece>) {
        self.squares[row][col] = piece;
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Moves whatever stands on `move_from` to `move_to`. A piece on the
    /// destination is overwritten; a pawn reaching its last rank becomes a queen.
    pub fn make_move(&mut self, move_from: Square, move_to: Square) {
        let piece = match self.get(move_from) {
            None => {
                log::warn!("No piece to move on {:?}", move_from);
                return;
            }
            Some(p) => p,
        };
        self.set(move_from, None);
        if piece.kind == PieceType::Pawn && move_to.0 == piece.color.promotion_rank() {
            self.set(move_to, Some(Piece::new(piece.color, PieceType::Queen)));
        }
        else {
            self.set(move_to, Some(piece));
        }
    }

    pub fn has_king(&self, color: Color) -> bool {
        self.squares.iter()
            .flatten()
            .any(|square| *square == Some(Piece::new(color, PieceType::King)))
    }

    pub fn occupied_squares(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        (0..HEIGHT)
            .flat_map(|r| (0..WIDTH).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.squares[r][c].is_some_and(|p| p.color == color))
    }
}

pub fn to_string(board: &Board) -> String {
    board.squares.iter()
        .map(|row| row.iter().map(|square| square.map_or(' ', |p| p.letter())).collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn to_glyphs(board: &Board) -> String {
    let mut result = String::new();
    for row in board.squares.iter() {
        for square in row {
            result.push('|');
            result.push(square.map_or(' ', |p| p.glyph()));
        }
        result.push_str("|\n");
    }
    result
}

impl serde::Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str(to_string(self).as_str())
    }
}

fn new_pieces(color: Color) -> [Option<Piece>; WIDTH] {
    [
        Some(Piece::new(color, PieceType::Rook)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Queen)),
        Some(Piece::new(color, PieceType::King)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Rook))
    ]
}

fn new_pawns(color: Color) -> [Option<Piece>; WIDTH] {
    [Some(Piece::new(color, PieceType::Pawn)); WIDTH]
}

fn new_empty() -> [Option<Piece>; WIDTH] {
    [None; WIDTH]
}

/// Fresh copy of the starting position, black on top.
pub fn new_board() -> Board {
    Board {
        squares: [
            new_pieces(Color::Black),
            new_pawns(Color::Black),
            new_empty(),
            new_empty(),
            new_empty(),
            new_empty(),
            new_pawns(Color::White),
            new_pieces(Color::White)
        ]
    }
}
