//! Sliding-tile puzzles (8-puzzle, 15-puzzle, ...).
//!
//! A square board of numbered tiles with a single blank. Each move slides a
//! tile next to the blank into it, or equivalently, moves the blank.

use std::hash::Hash;
use std::hash::Hasher;

use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

use crate::error::SearchError;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

pub type Tile = u8;
pub const BLANK: Tile = 0;

pub const MIN_SIDE: usize = 2;
/// Keeps every tile and cell index within a `u8`.
pub const MAX_SIDE: usize = 15;

/// Every move costs the same.
pub type SlidingTileCost = u32;

/// Where the blank goes.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Move {
    #[display("↑")]
    Up,
    #[display("↓")]
    Down,
    #[display("←")]
    Left,
    #[display("→")]
    Right,
}
impl Action for Move {}

impl Move {
    /// All moves, in the order successors are generated.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The move that undoes this one.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Empty board")]
    Empty,
    #[error("Unsupported side length {0}, must be within 2..=15")]
    BadSide(usize),
    #[error("Row {row} has {len} cells, expected {side}")]
    NotSquare { row: usize, len: usize, side: usize },
    #[error("Expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },
    #[error("Tile {tile} is out of range, the largest is {max}")]
    TileOutOfRange { tile: Tile, max: usize },
    #[error("Tile {0} appears more than once")]
    DuplicateTile(Tile),
    #[error("Invalid cell '{0}'")]
    BadCell(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlidingTileError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Start is {start}x{start} but goal is {goal}x{goal}")]
    SideMismatch { start: usize, goal: usize },
}

/// A board configuration.
///
/// Tiles are stored row-major with the blank as `0`. The blank's position is
/// cached, but equality and hashing only look at the tiles, so boards reached
/// through different move sequences are the same state.
#[derive(Clone)]
pub struct Board {
    side: u8,
    blank: u8,
    tiles: SmallVec<[Tile; 16]>,
}
impl State for Board {}

impl PartialEq for Board {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}
impl Eq for Board {}

impl Hash for Board {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tiles.hash(state);
    }
}

impl Board {
    /// Builds a board from its tiles in row-major order.
    pub fn new(side: usize, tiles: &[Tile]) -> Result<Self, BoardError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(BoardError::BadSide(side));
        }
        let n = side * side;
        if tiles.len() != n {
            return Err(BoardError::WrongTileCount {
                expected: n,
                found: tiles.len(),
            });
        }

        let mut seen = [false; MAX_SIDE * MAX_SIDE];
        let mut blank = 0;
        for (i, &tile) in tiles.iter().enumerate() {
            let t = tile as usize;
            if t >= n {
                return Err(BoardError::TileOutOfRange { tile, max: n - 1 });
            }
            if seen[t] {
                return Err(BoardError::DuplicateTile(tile));
            }
            seen[t] = true;
            if tile == BLANK {
                blank = i;
            }
        }

        Ok(Self {
            side: side as u8,
            blank: blank as u8,
            tiles: SmallVec::from_slice(tiles),
        })
    }

    /// Builds a board from rows of tiles.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, BoardError> {
        let side = rows.len();
        if side == 0 {
            return Err(BoardError::Empty);
        }
        let mut tiles = Vec::with_capacity(side * side);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != side {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    side,
                });
            }
            tiles.extend_from_slice(cells);
        }
        Self::new(side, &tiles)
    }

    /// Tiles in order with the blank last.
    ///
    /// ```
    /// use statesearch::problems::sliding_tile::Board;
    /// let board = Board::solved(3).unwrap();
    /// assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
    /// ```
    pub fn solved(side: usize) -> Result<Self, BoardError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(BoardError::BadSide(side));
        }
        let n = side * side;
        let tiles: Vec<Tile> = (1..n).chain(std::iter::once(0)).map(|t| t as Tile).collect();
        Self::new(side, &tiles)
    }

    #[inline(always)]
    pub fn side(&self) -> usize {
        self.side as usize
    }
    #[inline(always)]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
    /// Row and column of the blank.
    #[inline(always)]
    pub fn blank(&self) -> (usize, usize) {
        let side = self.side();
        let i = self.blank as usize;
        (i / side, i % side)
    }
    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> Tile {
        self.tiles[row * self.side() + col]
    }

    /// Where the blank would end up, if it stays on the board.
    #[inline(always)]
    fn blank_target(&self, m: Move) -> Option<usize> {
        let side = self.side();
        let (row, col) = self.blank();
        #[rustfmt::skip]
        let (row, col) = match m {
            Move::Up    => (row.checked_sub(1)?, col),
            Move::Down  => (row + 1,             col),
            Move::Left  => (row,                 col.checked_sub(1)?),
            Move::Right => (row,                 col + 1),
        };
        (row < side && col < side).then_some(row * side + col)
    }

    #[inline(always)]
    pub fn can_move(&self, m: Move) -> bool {
        self.blank_target(m).is_some()
    }

    /// The board after moving the blank, `None` if it would fall off.
    #[must_use]
    pub fn apply_move(&self, m: Move) -> Option<Board> {
        let target = self.blank_target(m)?;
        let mut next = self.clone();
        next.tiles.swap(self.blank as usize, target);
        next.blank = target as u8;
        Some(next)
    }

    /// Legal moves, in generation order.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL.into_iter().filter(move |m| self.can_move(*m))
    }

    /// Whether `goal` can be reached from this board at all.
    ///
    /// Every move swaps the blank with a neighbour, so it flips both the
    /// parity of the permutation between the boards and the parity of the
    /// blank's distance to its goal cell. Reachable boards keep the two equal.
    pub fn is_solvable_towards(&self, goal: &Board) -> bool {
        if self.side != goal.side {
            return false;
        }
        let n = self.tiles.len();
        let mut goal_index = vec![0usize; n];
        for (i, &tile) in goal.tiles.iter().enumerate() {
            goal_index[tile as usize] = i;
        }

        // Cycle decomposition of the permutation, parity = (n - cycles) % 2.
        let mut visited = vec![false; n];
        let mut cycles = 0;
        for i in 0..n {
            if visited[i] {
                continue;
            }
            cycles += 1;
            let mut j = i;
            while !visited[j] {
                visited[j] = true;
                j = goal_index[self.tiles[j] as usize];
            }
        }
        let permutation_parity = (n - cycles) % 2;

        let (row, col) = self.blank();
        let (goal_row, goal_col) = goal.blank();
        let blank_distance = row.abs_diff(goal_row) + col.abs_diff(goal_col);

        permutation_parity == blank_distance % 2
    }

    /// A random walk of `moves` steps from this board, never undoing the
    /// previous move.
    #[must_use]
    pub fn scramble<R: rand::Rng + ?Sized>(&self, rng: &mut R, moves: usize) -> Board {
        let mut board = self.clone();
        let mut last: Option<Move> = None;
        for _ in 0..moves {
            let options: SmallVec<[Move; 4]> = board
                .moves()
                .filter(|m| last.is_none_or(|l| l.opposite() != *m))
                .collect();
            if options.is_empty() {
                break;
            }
            let m = options[rng.random_range(0..options.len())];
            if let Some(next) = board.apply_move(m) {
                board = next;
                last = Some(m);
            }
        }
        board
    }
}

/// Accepts rows separated by `;` or new lines, and cells separated by `,` or
/// whitespace. The blank is either `0` or `_`.
///
/// ```
/// use statesearch::problems::sliding_tile::Board;
/// let a: Board = "1,2,3;4,0,5;6,7,8".parse().unwrap();
/// let b: Board = "1 2 3\n4 _ 5\n6 7 8".parse().unwrap();
/// assert_eq!(a, b);
/// ```
impl std::str::FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<Tile>> = vec![];
        for line in s.split([';', '\n']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|cell| !cell.is_empty())
                .map(|cell| match cell {
                    "_" => Ok(BLANK),
                    cell => cell
                        .parse::<Tile>()
                        .map_err(|_| BoardError::BadCell(cell.to_string())),
                })
                .collect::<Result<Vec<Tile>, BoardError>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let side = self.side();
        let width = (self.tiles.len() - 1).to_string().len();
        for (row, cells) in self.tiles.chunks(side).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, &tile) in cells.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if tile == BLANK {
                    write!(f, "{:>width$}", "_")?;
                } else {
                    write!(f, "{tile:>width$}")?;
                }
            }
        }
        Ok(())
    }
}

/// Compact single-line form, parseable back with `FromStr`.
impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Board(")?;
        for (row, cells) in self.tiles.chunks(self.side()).enumerate() {
            if row > 0 {
                write!(f, ";")?;
            }
            for (col, &tile) in cells.iter().enumerate() {
                if col > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{tile}")?;
            }
        }
        write!(f, ")")
    }
}

/// All boards of a given side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlidingTileSpace {
    side: usize,
}

impl SlidingTileSpace {
    pub fn new(side: usize) -> Self {
        Self { side }
    }
    pub fn side(&self) -> usize {
        self.side
    }
}

impl Space<Board, Move, SlidingTileCost> for SlidingTileSpace {
    #[inline(always)]
    fn apply(&self, s: &Board, a: &Move) -> Option<Board> {
        if s.side() != self.side {
            return None;
        }
        s.apply_move(*a)
    }

    fn neighbours(&self, s: &Board) -> Vec<(Board, Move)> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = Vec::with_capacity(Move::ALL.len());
        for m in Move::ALL {
            if let Some(next) = s.apply_move(m) {
                v.push((next, m));
            }
        }
        v
    }

    #[inline(always)]
    fn valid(&self, s: &Board) -> bool {
        s.side() == self.side
    }
}

/// Reach `goal` from `start` by sliding tiles.
#[derive(Clone, Debug)]
pub struct SlidingTileProblem {
    space: SlidingTileSpace,
    start: Board,
    goal: Board,
}

impl SlidingTileProblem {
    pub fn new(start: Board, goal: Board) -> Result<Self, SlidingTileError> {
        if start.side() != goal.side() {
            return Err(SlidingTileError::SideMismatch {
                start: start.side(),
                goal: goal.side(),
            });
        }
        Ok(Self {
            space: SlidingTileSpace::new(start.side()),
            start,
            goal,
        })
    }

    /// Whether a search has any chance of succeeding.
    ///
    /// Unsolvable instances still run, they just exhaust half of the
    /// `(side²)!` boards first.
    pub fn is_solvable(&self) -> bool {
        self.start.is_solvable_towards(&self.goal)
    }
}

impl Problem<SlidingTileSpace, Board, Move, SlidingTileCost> for SlidingTileProblem {
    fn space(&self) -> &SlidingTileSpace {
        &self.space
    }
    fn start(&self) -> &Board {
        &self.start
    }
    #[inline(always)]
    fn is_goal(&self, s: &Board) -> bool {
        *s == self.goal
    }
    fn goal(&self) -> Option<&Board> {
        Some(&self.goal)
    }
}

/// Sum over every tile of its row and column distance to its goal cell.
///
/// Each move shifts a single tile by one cell, so this never overestimates.
#[derive(Clone, Debug)]
pub struct ManhattanDistance {
    /// Goal `(row, col)` of each tile.
    targets: Vec<(u8, u8)>,
}

impl ManhattanDistance {
    pub fn new(goal: &Board) -> Self {
        let side = goal.side();
        let mut targets = vec![(0, 0); goal.tiles.len()];
        for (i, &tile) in goal.tiles.iter().enumerate() {
            targets[tile as usize] = ((i / side) as u8, (i % side) as u8);
        }
        Self { targets }
    }

    pub fn for_problem(problem: &SlidingTileProblem) -> Self {
        Self::new(&problem.goal)
    }
}

/// Heuristics built for one board size can't rank boards of another.
fn check_board_size(start: &Board, tiles: usize) -> Result<(), SearchError> {
    if start.tiles.len() == tiles {
        return Ok(());
    }
    Err(SearchError::MismatchedHeuristic {
        state: format!("{start:?}"),
        reason: format!(
            "built for {tiles} cells, the board has {}",
            start.tiles.len()
        ),
    })
}

impl Heuristic<Board, SlidingTileCost> for ManhattanDistance {
    #[inline(always)]
    fn h(&self, s: &Board) -> SlidingTileCost {
        debug_assert_eq!(s.tiles.len(), self.targets.len());
        let side = s.side();
        let mut h = 0;
        for (i, &tile) in s.tiles.iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            let (row, col) = ((i / side) as u8, (i % side) as u8);
            let (target_row, target_col) = self.targets[tile as usize];
            h += (row.abs_diff(target_row) + col.abs_diff(target_col)) as SlidingTileCost;
        }
        h
    }

    fn validate(&self, start: &Board) -> Result<(), SearchError> {
        check_board_size(start, self.targets.len())
    }
}

/// Number of tiles off their goal cell. Weaker than `ManhattanDistance`.
#[derive(Clone, Debug)]
pub struct MisplacedTiles {
    goal: Board,
}

impl MisplacedTiles {
    pub fn new(goal: &Board) -> Self {
        Self { goal: goal.clone() }
    }

    pub fn for_problem(problem: &SlidingTileProblem) -> Self {
        Self::new(&problem.goal)
    }
}

impl Heuristic<Board, SlidingTileCost> for MisplacedTiles {
    #[inline(always)]
    fn h(&self, s: &Board) -> SlidingTileCost {
        s.tiles
            .iter()
            .zip(self.goal.tiles.iter())
            .filter(|&(&tile, &goal)| tile != BLANK && tile != goal)
            .count() as SlidingTileCost
    }

    fn validate(&self, start: &Board) -> Result<(), SearchError> {
        check_board_size(start, self.goal.tiles.len())
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;
    use rustc_hash::FxHashSet;

    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn parse_formats() {
        let expected = Board::from_rows(&[[1, 2, 3], [4, 0, 5], [6, 7, 8]]).unwrap();
        assert_eq!(board("1,2,3;4,0,5;6,7,8"), expected);
        assert_eq!(board("1 2 3\n4 _ 5\n6 7 8\n"), expected);
        assert_eq!(board(" 1, 2, 3 ; 4, _, 5 ; 6, 7, 8 "), expected);
        assert_eq!(expected.blank(), (1, 1));
        assert_eq!(expected.at(2, 0), 6);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Board>().unwrap_err(), BoardError::Empty);
        assert_eq!(
            "1,2;3".parse::<Board>().unwrap_err(),
            BoardError::NotSquare {
                row: 1,
                len: 1,
                side: 2
            }
        );
        assert_eq!(
            "1,1;2,0".parse::<Board>().unwrap_err(),
            BoardError::DuplicateTile(1)
        );
        assert_eq!(
            "1,2;3,4".parse::<Board>().unwrap_err(),
            BoardError::TileOutOfRange { tile: 4, max: 3 }
        );
        assert_eq!(
            "1,x;2,0".parse::<Board>().unwrap_err(),
            BoardError::BadCell("x".to_string())
        );
        assert_eq!("0".parse::<Board>().unwrap_err(), BoardError::BadSide(1));
        assert_eq!(Board::solved(16).unwrap_err(), BoardError::BadSide(16));
        assert_eq!(
            Board::new(2, &[1, 2, 0]).unwrap_err(),
            BoardError::WrongTileCount {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn identity_ignores_history() {
        let start = board("1,2,3;4,0,5;6,7,8");
        // Around a 2x2 block and back.
        let mut looped = start.clone();
        for m in [Move::Right, Move::Down, Move::Left, Move::Up] {
            looped = looped.apply_move(m).unwrap();
        }
        for m in [Move::Down, Move::Right, Move::Up, Move::Left] {
            looped = looped.apply_move(m).unwrap();
        }
        assert_eq!(looped, start);

        let mut set = FxHashSet::default();
        set.insert(start.clone());
        assert!(set.contains(&looped));
        assert_eq!(looped.blank(), start.blank());
    }

    #[test]
    fn moves_stay_on_the_board() {
        let corner = board("0,1,2;3,4,5;6,7,8");
        assert_eq!(corner.moves().collect::<Vec<_>>(), vec![Move::Down, Move::Right]);
        assert!(corner.apply_move(Move::Up).is_none());
        assert!(corner.apply_move(Move::Left).is_none());

        let center = board("1,2,3;4,0,5;6,7,8");
        assert_eq!(center.moves().collect::<Vec<_>>(), Move::ALL.to_vec());
        assert_eq!(center.apply_move(Move::Up).unwrap(), board("1,0,3;4,2,5;6,7,8"));
        assert_eq!(center.apply_move(Move::Right).unwrap(), board("1,2,3;4,5,0;6,7,8"));
        for m in Move::ALL {
            assert_eq!(center.apply_move(m).unwrap().apply_move(m.opposite()).unwrap(), center);
        }
    }

    #[test]
    fn space_generates_ordered_successors() {
        let space = SlidingTileSpace::new(3);
        let s = board("1,2,3;4,5,6;7,8,0");
        let neighbours = space.neighbours(&s);
        assert_eq!(
            neighbours.iter().map(|(_, a)| *a).collect::<Vec<_>>(),
            vec![Move::Up, Move::Left]
        );
        assert!(neighbours.iter().all(|(n, _)| space.valid(n)));
        assert!(!space.valid(&Board::solved(4).unwrap()));
        assert_eq!(
            Space::<Board, Move, SlidingTileCost>::cost(&space, &s, &Move::Up),
            1
        );
    }

    #[test]
    fn manhattan_distance() {
        let goal = board("1,2,3;7,8,0;4,5,6");
        let h = ManhattanDistance::new(&goal);
        assert_eq!(h.h(&goal), 0);
        assert_eq!(h.h(&board("1,2,3;4,0,5;6,7,8")), 9);
        assert_eq!(h.h(&board("1,2,3;7,0,8;4,5,6")), 1);
    }

    #[test]
    fn misplaced_tiles() {
        let goal = board("1,2,3;7,8,0;4,5,6");
        let h = MisplacedTiles::new(&goal);
        assert_eq!(h.h(&goal), 0);
        assert_eq!(h.h(&board("1,2,3;4,0,5;6,7,8")), 5);
        // The blank doesn't count.
        assert_eq!(h.h(&board("1,2,3;7,0,8;4,5,6")), 1);
    }

    #[test]
    fn heuristics_reject_other_board_sizes() {
        let small = Board::solved(3).unwrap();
        let large = Board::solved(4).unwrap();
        assert!(ManhattanDistance::new(&small).validate(&small).is_ok());
        assert!(matches!(
            ManhattanDistance::new(&small).validate(&large),
            Err(SearchError::MismatchedHeuristic { .. })
        ));
        assert!(matches!(
            MisplacedTiles::new(&large).validate(&small),
            Err(SearchError::MismatchedHeuristic { .. })
        ));

        let problem = SlidingTileProblem::new(large.clone(), large).unwrap();
        assert!(ManhattanDistance::for_problem(&problem).validate(problem.start()).is_ok());
        assert!(MisplacedTiles::for_problem(&problem).validate(problem.start()).is_ok());
    }

    #[test]
    fn solvability() {
        let goal = board("1,2,3;7,8,0;4,5,6");
        assert!(board("1,2,3;4,0,5;6,7,8").is_solvable_towards(&goal));
        assert!(goal.is_solvable_towards(&goal));
        // A single swap of two tiles can't be undone by sliding.
        assert!(!board("2,1,3;7,8,0;4,5,6").is_solvable_towards(&goal));
        assert!(!goal.is_solvable_towards(&Board::solved(4).unwrap()));

        // Even sides depend on the blank row too.
        let solved = Board::solved(4).unwrap();
        let moved = solved.apply_move(Move::Up).unwrap();
        assert!(moved.is_solvable_towards(&solved));
        let swapped = board("2,1,3,4;5,6,7,8;9,10,11,12;13,14,15,0");
        assert!(!swapped.is_solvable_towards(&solved));
    }

    #[test]
    fn scrambles_are_solvable_and_seeded() {
        let solved = Board::solved(4).unwrap();
        let a = solved.scramble(&mut ChaCha8Rng::seed_from_u64(7), 40);
        let b = solved.scramble(&mut ChaCha8Rng::seed_from_u64(7), 40);
        assert_eq!(a, b);
        assert_eq!(a.side(), 4);
        assert!(a.is_solvable_towards(&solved));
        assert_eq!(solved.scramble(&mut ChaCha8Rng::seed_from_u64(7), 0), solved);
    }

    #[test]
    fn display_and_debug() {
        let b = board("1,2,3;4,0,5;6,7,8");
        assert_eq!(b.to_string(), "1 2 3\n4 _ 5\n6 7 8");
        assert_eq!(format!("{b:?}"), "Board(1,2,3;4,0,5;6,7,8)");

        let wide = Board::solved(4).unwrap();
        assert_eq!(
            wide.to_string(),
            " 1  2  3  4\n 5  6  7  8\n 9 10 11 12\n13 14 15  _"
        );
    }

    #[test]
    fn problem_rejects_mismatched_sides() {
        let err = SlidingTileProblem::new(Board::solved(3).unwrap(), Board::solved(4).unwrap())
            .unwrap_err();
        assert_eq!(err, SlidingTileError::SideMismatch { start: 3, goal: 4 });

        let problem =
            SlidingTileProblem::new(board("1,2,3;4,0,5;6,7,8"), board("1,2,3;7,8,0;4,5,6"))
                .unwrap();
        assert!(problem.is_solvable());
        assert!(problem.validate().is_ok());
        assert!(problem.is_goal(&board("1,2,3;7,8,0;4,5,6")));
    }
}
