use std::collections::VecDeque;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the traversable neighbors of the provided node.
    /// The order is part of the contract: the search visits neighbors in exactly this order.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The found path. `path` excludes `start` and ends with `goal`.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
}

impl<R> PathResult<R> {
    /// Number of moves from start to goal
    pub fn hops(&self) -> usize {
        self.path.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Breadth-first search with unit cost per move.
///
/// `parents` doubles as the visited set: `None` means unvisited and the start
/// is its own parent.
#[derive(Debug)]
pub struct PathFinder<
    R: NodeReference,
    S: MapStorage<Option<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Option<R>> = S>,
> {
    start: R,
    goal: R,
    parents: S,
    visit_list: VecDeque<R>,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Option<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Option<R>> = S>,
    > PathFinder<R, S, M>
{
    pub fn new(start: R, goal: R, mut parents: S) -> Self {
        debug_assert!(parents.is_valid(start) && parents.is_valid(goal));
        *parents.get_mut(start) = Some(start);

        Self {
            start,
            goal,
            parents,
            visit_list: VecDeque::from([start]),
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> (PathFinderState<R>, S) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.parents),
            }
        }
    }

    /// Expand the next node in the queue
    pub fn step(&mut self, map: &M) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.visit_list.pop_front() else {
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        for point in map.neighbors_of(current) {
            if self.parents.get(point).is_some() {
                continue;
            }

            *self.parents.get_mut(point) = Some(current);

            // the goal only counts once it is reached from a neighbor, so start == goal never succeeds
            if point == self.goal {
                self.state = PathFinderState::PathFound(PathResult {
                    path: self.backtrack(),
                    start: self.start,
                    goal: self.goal,
                });
                return self.state.clone();
            }

            self.visit_list.push_back(point);
        }

        self.state.clone()
    }

    /// Walk the parents from the goal back to the start, excluding the start itself
    fn backtrack(&self) -> Vec<R> {
        let mut path: Vec<R> = Vec::new();
        let mut trace = self.goal;

        while trace != self.start {
            path.push(trace);
            trace = match self.parents.get(trace) {
                Some(from) => from,
                None => panic!("Backtracking lead to a node that was never visited"),
            };
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn get_parents(&self) -> &S {
        &self.parents
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}
