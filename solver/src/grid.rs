use crate::error::{MazeError, MazeResult};
use crate::find::{MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult};
use crate::palette::Label;
use log::warn;
use std::fmt::Display;

/// Neighbor expansion order as (row, col) offsets: east, south, west, north, then
/// north-west, north-east, south-west, south-east
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance, i.e. the number of 8-connected moves on an empty grid
    pub fn chebyshev(&self, other: Point) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// The labeled grid: a MapTrait implementation over a rectangular grid of labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<Label>>,
}

impl GridMap {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Label::Space; columns]; rows],
        }
    }

    pub fn get(&self, point: Point) -> Label {
        self.cells[point.row][point.col]
    }

    pub fn set(&mut self, point: Point, label: Label) {
        self.cells[point.row][point.col] = label;
    }

    /// Iterate over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Point, Label)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, label)| (Point { row, col }, *label))
        })
    }

    /// Shortest path in number of moves from `source` to `destination`.
    ///
    /// An endpoint outside the grid gives `NotFound`, the same as an unreachable one.
    pub fn shortest_path(&self, source: Point, destination: Point) -> MazeResult<PathResult<Point>> {
        if !self.is_valid(source) || !self.is_valid(destination) {
            warn!(
                "{} or {} is outside the {}x{} grid",
                source, destination, self.columns, self.rows
            );
            return Err(MazeError::NotFound);
        }

        let parents: CellStorage<Option<Point>> = self.create_storage();
        let (state, _) = PathFinder::new(source, destination, parents).finish(self);

        match state {
            PathFinderState::PathFound(result) => Ok(result),
            _ => Err(MazeError::NotFound),
        }
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A MapStorage that uses a rectangular grid of cells (a vec in a vec)
#[derive(Debug)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.0.len() && node.col < self.0[node.row].len()
    }

    fn get(&self, node: Self::Reference) -> T {
        self.0[node.row][node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.0[node.row][node.col]
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(NEIGHBOR_OFFSETS.len());

        for (d_row, d_col) in NEIGHBOR_OFFSETS {
            let (Some(row), Some(col)) = (
                node.row.checked_add_signed(d_row),
                node.col.checked_add_signed(d_col),
            ) else {
                continue;
            };
            points.push(Point { row, col });
        }

        // filter to only keep cells inside the grid that are not walls
        points.retain(|p| self.is_valid(*p) && self.get(*p) != Label::Block);

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage(vec![vec![Default::default(); self.columns]; self.rows])
    }
}
