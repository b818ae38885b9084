//! State model for the 3x3 end-game frame.
//!
//! Cells are numbered row-major from the top-left corner of the frame. Only the
//! blank and the two tracked tiles are modelled: every other tile is already in
//! place and never decides whether a move is possible.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Width and height of the frame
pub const WIDTH: u8 = 3;
/// Number of cells in the frame
pub const CELL_COUNT: u8 = WIDTH * WIDTH;

/// Target cell of tile A
pub const GOAL_A: Cell = Cell(2);
/// Target cell of tile B
pub const GOAL_B: Cell = Cell(5);

/// Move sequence; the inline capacity covers every budget the tables use
pub type MoveSeq = SmallVec<[Direction; 24]>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("cell index {0} is outside the 3x3 frame")]
    CellOutOfRange(u8),
    #[error("tile A, tile B and the blank must occupy distinct cells (a={a}, b={b}, blank={blank})")]
    Overlap { a: Cell, b: Cell, blank: Cell },
    #[error("blank at cell {blank} is outside the {region} region")]
    BlankOutsideRegion { blank: Cell, region: String },
    #[error("unknown move letter {0:?}, expected one of u, l, r, d")]
    UnknownLetter(char),
}

/// A cell of the frame, 0..=8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cell(u8);

impl Cell {
    pub fn new(index: u8) -> Result<Self, StateError> {
        if index < CELL_COUNT {
            Ok(Self(index))
        } else {
            Err(StateError::CellOutOfRange(index))
        }
    }

    /// Every cell in ascending order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT).map(Cell)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn row(self) -> u8 {
        self.0 / WIDTH
    }

    pub fn col(self) -> u8 {
        self.0 % WIDTH
    }

    pub fn manhattan(self, other: Cell) -> u8 {
        self.row().abs_diff(other.row()) + self.col().abs_diff(other.col())
    }

    /// Neighbouring cell in `direction`, or `None` if that leaves the frame
    pub fn step(self, direction: Direction) -> Option<Cell> {
        let target = self.0 as i8 + direction.delta();
        let stays_inside = match direction {
            Direction::Up => self.row() > 0,
            Direction::Down => self.row() < WIDTH - 1,
            Direction::Left => self.col() > 0,
            Direction::Right => self.col() < WIDTH - 1,
        };
        stays_inside.then(|| Cell(target as u8))
    }

    /// Label of this cell on the full board when the frame covers the last
    /// two cells of a column.
    pub fn board_label(self) -> u8 {
        (self.0 + 1 - self.row()) % 2 + 2 * self.row()
    }
}

impl TryFrom<u8> for Cell {
    type Error = StateError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Cell::new(index)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction the blank travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// Enumeration order of the search. Among equally short solutions the
    /// first one in this order wins.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    /// Change in cell index
    pub fn delta(self) -> i8 {
        match self {
            Direction::Up => -(WIDTH as i8),
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Down => WIDTH as i8,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Down => 'd',
        }
    }

    pub fn from_letter(letter: char) -> Result<Self, StateError> {
        match letter {
            'u' => Ok(Direction::Up),
            'l' => Ok(Direction::Left),
            'r' => Ok(Direction::Right),
            'd' => Ok(Direction::Down),
            other => Err(StateError::UnknownLetter(other)),
        }
    }

    fn mask(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Set of candidate directions. Copied into every search call, never shared
/// between siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const ALL: Self = Self(0b1111);
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.mask() != 0
    }

    pub fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.mask())
    }

    pub fn without(self, direction: Direction) -> Self {
        Self(self.0 & !direction.mask())
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in `Direction::ALL` order
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DirectionSet::EMPTY, |set, direction| set.with(direction))
    }
}

/// Positions of tile A, tile B and the blank. The three cells are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SearchState {
    a: Cell,
    b: Cell,
    blank: Cell,
}

impl SearchState {
    pub fn new(a: Cell, b: Cell, blank: Cell) -> Result<Self, StateError> {
        if a == b || a == blank || b == blank {
            return Err(StateError::Overlap { a, b, blank });
        }
        Ok(Self { a, b, blank })
    }

    pub fn from_indices(a: u8, b: u8, blank: u8) -> Result<Self, StateError> {
        Self::new(Cell::new(a)?, Cell::new(b)?, Cell::new(blank)?)
    }

    pub fn a(&self) -> Cell {
        self.a
    }

    pub fn b(&self) -> Cell {
        self.b
    }

    pub fn blank(&self) -> Cell {
        self.blank
    }

    pub fn is_goal(&self) -> bool {
        self.a == GOAL_A && self.b == GOAL_B
    }

    /// Manhattan distance of both tracked tiles to their goal cells. Every
    /// move shifts at most one tile by one cell, so this never overestimates.
    pub fn lower_bound(&self) -> u8 {
        self.a.manhattan(GOAL_A) + self.b.manhattan(GOAL_B)
    }

    /// Slide the blank one cell. A tracked tile sitting in the target cell
    /// takes the blank's old place.
    pub fn apply(self, direction: Direction) -> Option<Self> {
        let target = self.blank.step(direction)?;
        let mut next = self;
        if target == self.a {
            next.a = self.blank;
        } else if target == self.b {
            next.b = self.blank;
        }
        next.blank = target;
        Some(next)
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(a={}, b={}, blank={})", self.a, self.b, self.blank)
    }
}

pub fn to_letters(moves: &[Direction]) -> String {
    moves.iter().map(|direction| direction.letter()).collect()
}

pub fn parse_letters(letters: &str) -> Result<MoveSeq, StateError> {
    letters
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(Direction::from_letter)
        .collect()
}
