use std::fmt;
use std::str::FromStr;

use log::trace;

use super::player::Player;
use crate::error::BoardError;

/// Side length of the standard square board.
pub const BOARD_SIZE: usize = 7;

/// Number of same-player cells that make a winning line.
pub const LINE_LEN: usize = 4;

/// Line directions checked from each anchor cell: right, down, down-right,
/// down-left. Rows grow downward.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Player(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The player occupying this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Player(player) => Some(player),
        }
    }

    fn digit(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Player(player) => player.digit(),
        }
    }

    fn from_digit(digit: char) -> Option<Cell> {
        match digit {
            '0' => Some(Cell::Empty),
            '1' => Some(Cell::Player(Player::One)),
            '2' => Some(Cell::Player(Player::Two)),
            _ => None,
        }
    }
}

/// A cell coordinate: `x` is the column, `y` the row (0 is the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

/// A piece moved by gravity, from its old cell to the cell it came to rest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub from: Position,
    pub to: Position,
}

/// A completed four-in-a-row, positions in traversal order from the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Victory {
    pub player: Player,
    pub line: [Position; LINE_LEN],
}

/// Square grid of cells, stored column-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Rotation swaps the axes, so only square boards
    /// are accepted.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width != height {
            return Err(BoardError::NonSquareBoard { width, height });
        }
        Ok(Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        })
    }

    /// Create an empty `BOARD_SIZE` x `BOARD_SIZE` board
    pub fn standard() -> Self {
        Board {
            width: BOARD_SIZE,
            height: BOARD_SIZE,
            cells: vec![Cell::Empty; BOARD_SIZE * BOARD_SIZE],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "position ({x}, {y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        x * self.height + y
    }

    /// Get the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the board.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Overwrite a cell regardless of what it holds. Only for speculative
    /// evaluation on a private copy.
    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// Row of the lowest empty cell in `column`, or `None` if it has none
    pub fn lowest_in_column(&self, column: usize) -> Option<usize> {
        (0..self.height)
            .rev()
            .find(|&y| self.get(column, y).is_empty())
    }

    /// Check if a column is full (its top cell is occupied)
    pub fn column_blocked(&self, column: usize) -> bool {
        !self.get(column, 0).is_empty()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, column: usize, player: Player) -> Result<usize, BoardError> {
        if column >= self.width {
            return Err(BoardError::OutOfRange {
                column,
                width: self.width,
            });
        }

        let row = self
            .lowest_in_column(column)
            .ok_or(BoardError::InvalidMove { column })?;
        self.set(column, row, player.to_cell());
        Ok(row)
    }

    /// Columns whose top cell is still empty, in index order
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&column| !self.column_blocked(column))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|column| self.column_blocked(column))
    }

    /// True when no occupied cell has an empty cell directly beneath it
    pub fn is_settled(&self) -> bool {
        (0..self.width).all(|x| {
            (1..self.height).all(|y| !(self.get(x, y).is_empty() && !self.get(x, y - 1).is_empty()))
        })
    }

    /// Move every piece down into the empty cells beneath it. Returns how many
    /// pieces moved.
    pub fn apply_gravity(&mut self) -> usize {
        self.falls().count()
    }

    /// Resolve gravity one piece at a time, yielding each piece that moves.
    ///
    /// Rows are visited from the second-lowest up to the top, columns left to
    /// right within a row. The board is mutated as the iterator advances, so
    /// draining it leaves the same board as [`Board::apply_gravity`].
    pub fn falls(&mut self) -> Falls<'_> {
        let row = if self.width == 0 {
            None
        } else {
            self.height.checked_sub(2)
        };
        Falls {
            board: self,
            column: 0,
            row,
        }
    }

    /// Drop the piece at (column, row) as far as it will go. Returns the row
    /// it landed on if it moved.
    fn settle_piece(&mut self, column: usize, row: usize) -> Option<usize> {
        let cell = self.get(column, row);
        if cell.is_empty() {
            return None;
        }

        let mut landed = row;
        while landed + 1 < self.height && self.get(column, landed + 1).is_empty() {
            landed += 1;
        }
        if landed == row {
            return None;
        }

        self.set(column, row, Cell::Empty);
        self.set(column, landed, cell);
        Some(landed)
    }

    /// Rotate the grid a quarter turn: the left column becomes the top row.
    /// Pieces are left where they land; call [`Board::apply_gravity`] after.
    pub fn rotate(&mut self) {
        let n = self.height;
        let mut cells = vec![Cell::Empty; self.cells.len()];
        for x in 0..self.width {
            for y in 0..self.height {
                cells[x * n + y] = self.get(n - 1 - y, x);
            }
        }
        self.cells = cells;
    }

    /// Every four-in-a-row on the board.
    ///
    /// Anchors are visited column by column, top to bottom; from each occupied
    /// anchor the right, down, down-right and down-left lines that fit inside
    /// the board are checked. A cell shared by several lines shows up in each
    /// of them, and a run of five yields two lines.
    pub fn victories(&self) -> impl Iterator<Item = Victory> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
            .filter_map(move |anchor| {
                self.get(anchor.x, anchor.y)
                    .player()
                    .map(|player| (anchor, player))
            })
            .flat_map(move |(anchor, player)| {
                DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
                    let line = self.line_from(anchor, dx, dy)?;
                    line[1..]
                        .iter()
                        .all(|pos| self.get(pos.x, pos.y) == player.to_cell())
                        .then_some(Victory { player, line })
                })
            })
    }

    /// Collected form of [`Board::victories`]
    pub fn check_victory(&self) -> Vec<Victory> {
        self.victories().collect()
    }

    /// Distinct players owning at least one line, in detection order
    pub fn winners(&self) -> Vec<Player> {
        let mut winners = Vec::with_capacity(2);
        for victory in self.victories() {
            if !winners.contains(&victory.player) {
                winners.push(victory.player);
            }
        }
        winners
    }

    fn line_from(&self, anchor: Position, dx: isize, dy: isize) -> Option<[Position; LINE_LEN]> {
        let mut line = [anchor; LINE_LEN];
        for (step, slot) in line.iter_mut().enumerate().skip(1) {
            let x = anchor.x.checked_add_signed(dx * step as isize)?;
            let y = anchor.y.checked_add_signed(dy * step as isize)?;
            if x >= self.width || y >= self.height {
                return None;
            }
            *slot = Position::new(x, y);
        }
        Some(line)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Iterator returned by [`Board::falls`].
pub struct Falls<'a> {
    board: &'a mut Board,
    column: usize,
    row: Option<usize>,
}

impl Iterator for Falls<'_> {
    type Item = Fall;

    fn next(&mut self) -> Option<Fall> {
        while let Some(row) = self.row {
            let column = self.column;
            self.column += 1;
            if self.column == self.board.width {
                self.column = 0;
                self.row = row.checked_sub(1);
            }

            if let Some(landed) = self.board.settle_piece(column, row) {
                trace!("piece at ({column}, {row}) fell to row {landed}");
                return Some(Fall {
                    from: Position::new(column, row),
                    to: Position::new(column, landed),
                });
            }
        }
        None
    }
}

/// Rows of digits, top row first: `0` empty, `1`/`2` for the players.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).digit())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().map_or(0, |row| row.chars().count());

        let mut board = Board::new(width, rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(BoardError::RaggedRow {
                    row: y,
                    found,
                    expected: width,
                });
            }
            for (x, digit) in row.chars().enumerate() {
                let cell =
                    Cell::from_digit(digit).ok_or(BoardError::InvalidCell { found: digit, x, y })?;
                board.set(x, y, cell);
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::standard();
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                assert_eq!(board.get(x, y), Cell::Empty);
            }
        }
        assert!(board.is_settled());
        assert!(board.check_victory().is_empty());
    }

    #[test]
    fn test_non_square_board_rejected() {
        assert_eq!(
            Board::new(7, 6),
            Err(BoardError::NonSquareBoard {
                width: 7,
                height: 6
            })
        );
        assert!(Board::new(5, 5).is_ok());
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::standard();

        let row = board.drop_piece(3, Player::One).unwrap();
        assert_eq!(row, 6);
        assert_eq!(board.get(3, 6), Cell::Player(Player::One));

        let row = board.drop_piece(3, Player::Two).unwrap();
        assert_eq!(row, 5);
        assert_eq!(board.get(3, 5), Cell::Player(Player::Two));
    }

    #[test]
    fn test_drop_into_full_column_is_rejected() {
        let mut board = Board::standard();
        for _ in 0..BOARD_SIZE {
            board.drop_piece(0, Player::One).unwrap();
        }

        assert!(board.column_blocked(0));
        let before = board.clone();
        assert_eq!(
            board.drop_piece(0, Player::Two),
            Err(BoardError::InvalidMove { column: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_drop_out_of_range() {
        let mut board = Board::standard();
        assert_eq!(
            board.drop_piece(7, Player::One),
            Err(BoardError::OutOfRange {
                column: 7,
                width: 7
            })
        );
    }

    #[test]
    #[should_panic(expected = "outside the 7x7 board")]
    fn test_get_out_of_range_panics() {
        Board::standard().get(0, 7);
    }

    #[test]
    fn test_lowest_in_column() {
        let board = board(
            "0000000
             0000200
             0000200
             0010200
             0112200
             0112200
             1111100",
        );
        let lowest: Vec<Option<usize>> = (0..7).map(|x| board.lowest_in_column(x)).collect();
        assert_eq!(
            lowest,
            vec![Some(5), Some(3), Some(2), Some(3), Some(0), Some(6), Some(6)]
        );
        assert!(!board.column_blocked(4));
    }

    #[test]
    fn test_lowest_in_column_two_bottom_rows() {
        let mut board = Board::standard();
        board.drop_piece(2, Player::One).unwrap();
        board.drop_piece(2, Player::Two).unwrap();
        assert_eq!(board.lowest_in_column(2), Some(4));
    }

    #[test]
    fn test_full_column_has_no_lowest() {
        let board = board(
            "1000000
             2000000
             1000000
             2000000
             1000000
             2000000
             1000000",
        );
        assert_eq!(board.lowest_in_column(0), None);
        assert!(board.column_blocked(0));
        assert!(!board.column_blocked(1));
        assert_eq!(board.legal_columns(), vec![1, 2, 3, 4, 5, 6]);
        assert!(!board.is_full());
    }

    #[test]
    fn test_rotate_bottom_row_becomes_right_column() {
        let mut board = board(
            "0000000
             0000000
             0000000
             0000000
             0000000
             0000000
             1111111",
        );
        board.rotate();
        assert_eq!(
            board.to_string(),
            "0000001\n0000001\n0000001\n0000001\n0000001\n0000001\n0000001"
        );
    }

    #[test]
    fn test_rotate_mixed_board() {
        let mut board = board(
            "0000000
             0000000
             0000001
             0000002
             0000001
             0010101
             1111111",
        );
        board.rotate();
        assert_eq!(
            board.to_string(),
            "0012111\n0000001\n0000011\n0000001\n0000011\n0000001\n0000001"
        );
    }

    #[test]
    fn test_rotate_mapping() {
        let original = board(
            "1200
             0120
             2001
             1102",
        );
        let mut rotated = original.clone();
        rotated.rotate();
        let h = original.height();
        for x in 0..original.width() {
            for y in 0..h {
                assert_eq!(rotated.get(x, y), original.get(h - 1 - y, x));
            }
        }
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let original = board(
            "0012111
             0000001
             0020011
             0000001
             0100011
             0000021
             2000001",
        );
        let mut board = original.clone();
        for turn in 1..=4 {
            board.rotate();
            if turn < 4 {
                assert_ne!(board, original);
            }
        }
        assert_eq!(board, original);
    }

    #[test]
    fn test_gravity_keeps_column_order() {
        let mut board = board(
            "1000
             0000
             2000
             0000",
        );
        assert!(!board.is_settled());
        assert_eq!(board.apply_gravity(), 2);
        assert_eq!(board.to_string(), "0000\n0000\n1000\n2000");
        assert!(board.is_settled());
    }

    #[test]
    fn test_gravity_checkerboard() {
        let mut board = board(
            "2020202
             0202020
             2020202
             0202020
             2020202
             0202020
             1111111",
        );
        board.apply_gravity();
        assert_eq!(
            board.to_string(),
            "0000000\n0000000\n0000000\n2222222\n2222222\n2222222\n1111111"
        );
    }

    #[test]
    fn test_gravity_after_rotation() {
        let mut board = board(
            "1221122
             2112211
             0000001
             0000002
             0000001
             0010101
             1111111",
        );
        board.apply_gravity();
        assert_eq!(
            board.to_string(),
            "0000002\n0000001\n0000001\n0020102\n1211221\n2112111\n1111111"
        );
    }

    #[test]
    fn test_gravity_is_idempotent() {
        let mut board = board(
            "2100102
             0000000
             0201020
             0000000
             1000001
             0000000
             0000000",
        );
        board.apply_gravity();
        let settled = board.clone();
        assert!(settled.is_settled());
        assert_eq!(board.apply_gravity(), 0);
        assert_eq!(board, settled);
    }

    #[test]
    fn test_falls_reports_moves_in_scan_order() {
        let mut board = board(
            "1000
             0000
             2000
             0000",
        );
        let falls: Vec<Fall> = board.falls().collect();
        assert_eq!(
            falls,
            vec![
                Fall {
                    from: Position::new(0, 2),
                    to: Position::new(0, 3)
                },
                Fall {
                    from: Position::new(0, 0),
                    to: Position::new(0, 2)
                },
            ]
        );
    }

    #[test]
    fn test_falls_matches_batch_gravity() {
        let start = board(
            "1221122
             2112211
             0000001
             0000002
             0000001
             0010101
             1111111",
        );
        let mut batch = start.clone();
        batch.apply_gravity();

        let mut lazy = start.clone();
        let falls: Vec<Fall> = lazy.falls().collect();
        assert_eq!(lazy, batch);
        assert!(falls.iter().all(|f| f.from.x == f.to.x && f.to.y > f.from.y));
        assert!(falls.iter().all(|f| start.get(f.from.x, f.from.y) == batch.get(f.to.x, f.to.y)));
    }

    #[test]
    fn test_horizontal_victory() {
        let mut board = Board::standard();
        for x in 0..4 {
            board.drop_piece(x, Player::One).unwrap();
        }
        let victories = board.check_victory();
        assert_eq!(
            victories,
            vec![Victory {
                player: Player::One,
                line: [
                    Position::new(0, 6),
                    Position::new(1, 6),
                    Position::new(2, 6),
                    Position::new(3, 6)
                ],
            }]
        );
    }

    #[test]
    fn test_vertical_victory() {
        let mut board = Board::standard();
        for _ in 0..4 {
            board.drop_piece(2, Player::Two).unwrap();
        }
        let victories = board.check_victory();
        assert_eq!(victories.len(), 1);
        assert_eq!(victories[0].player, Player::Two);
        assert_eq!(
            victories[0].line,
            [
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(2, 5),
                Position::new(2, 6)
            ]
        );
    }

    #[test]
    fn test_diagonal_victories() {
        let down_right = board(
            "0000000
             0000000
             0000000
             1000000
             0100000
             0010000
             0001000",
        );
        let victories = down_right.check_victory();
        assert_eq!(victories.len(), 1);
        assert_eq!(victories[0].line[0], Position::new(0, 3));
        assert_eq!(victories[0].line[3], Position::new(3, 6));

        let down_left = board(
            "0000000
             0000000
             0000000
             0000002
             0000020
             0000200
             0002000",
        );
        let victories = down_left.check_victory();
        assert_eq!(victories.len(), 1);
        assert_eq!(victories[0].player, Player::Two);
        assert_eq!(victories[0].line[0], Position::new(6, 3));
        assert_eq!(victories[0].line[3], Position::new(3, 6));
    }

    #[test]
    fn test_overlapping_victories_reported_separately() {
        let board = board(
            "0000000
             0000000
             0000000
             0001000
             0010000
             0100000
             1111000",
        );
        let victories = board.check_victory();
        assert_eq!(victories.len(), 2);
        assert_eq!(victories[0].line[0], Position::new(0, 6));
        assert_eq!(victories[0].line[3], Position::new(3, 6));
        assert_eq!(victories[1].line[0], Position::new(3, 3));
        assert_eq!(victories[1].line[3], Position::new(0, 6));
        assert_eq!(board.winners(), vec![Player::One]);
    }

    #[test]
    fn test_run_of_five_yields_two_lines() {
        let board = board(
            "0000000
             0000000
             0000000
             0000000
             0000000
             0000000
             2222200",
        );
        assert_eq!(board.check_victory().len(), 2);
    }

    #[test]
    fn test_three_is_not_a_victory() {
        let mut board = Board::standard();
        for x in 0..3 {
            board.drop_piece(x, Player::One).unwrap();
        }
        assert!(board.check_victory().is_empty());
        assert!(board.winners().is_empty());
    }

    #[test]
    fn test_victories_restart_per_call() {
        let board = board(
            "0000000
             0000000
             0000000
             2000000
             2000000
             2000000
             2111100",
        );
        assert_eq!(board.victories().count(), 2);
        assert_eq!(board.victories().count(), 2);
        assert_eq!(board.winners(), vec![Player::Two, Player::One]);
    }

    #[test]
    fn test_text_dump_roundtrip() {
        let text = "0000000\n0000000\n0000000\n0000000\n0000000\n0200000\n1100000";
        assert_eq!(board(text).to_string(), text);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "00\n03".parse::<Board>(),
            Err(BoardError::InvalidCell {
                found: '3',
                x: 1,
                y: 1
            })
        );
        assert_eq!(
            "000\n000".parse::<Board>(),
            Err(BoardError::NonSquareBoard {
                width: 3,
                height: 2
            })
        );
        assert_eq!(
            "00\n0".parse::<Board>(),
            Err(BoardError::RaggedRow {
                row: 1,
                found: 1,
                expected: 2
            })
        );
    }
}
