pub mod classify;
pub mod error;
pub mod find;
pub mod grid;
pub mod palette;
pub mod render;
pub mod util;

pub use classify::{classify, Classified};
pub use error::{MazeError, MazeResult};
pub use find::{MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult};
pub use grid::{CellStorage, GridMap, Point};
pub use palette::{Label, Palette};
pub use render::{animate, still, Animation, Frame};
pub use util::{solve, OutputKind, SolveConfig};
