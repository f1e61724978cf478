//! A* search over a [`TerrainPather`].
//!
//! [`find_path`] runs a whole search. [`AStarSearch`] exposes the same search
//! as a session that advances one node expansion per [`step`], for callers
//! that want to visualise or cancel it.
//!
//! [`step`]: AStarSearch::step

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::ControlFlow;

use terranav_core::Position;
use thiserror::Error;

use crate::graph::GraphError;
use crate::heap::{HeapError, HeapItem, IndexedMinHeap};
use crate::traits::TerrainPather;

/// A found route and its total cost.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Start to goal, both included.
    pub positions: Vec<Position>,
    pub cost: f32,
}

impl Path {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no path from {start} to {goal} ({expanded} nodes expanded)")]
    NoPathFound {
        start: Position,
        goal: Position,
        expanded: usize,
    },
    #[error("search cancelled after {expanded} expansions")]
    Cancelled { expanded: usize },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Search state of one position.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub position: Position,
    pub g_cost: f32,
    pub h_cost: f32,
    pub closed: bool,
    parent: Option<usize>,
    seq: usize,
    heap_index: Option<usize>,
}

impl SearchNode {
    #[inline]
    pub fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }
}

impl HeapItem for SearchNode {
    #[inline]
    fn heap_index(&self) -> Option<usize> {
        self.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: Option<usize>) {
        self.heap_index = index;
    }

    fn heap_cmp(&self, other: &Self) -> Ordering {
        self.f_cost()
            .total_cmp(&other.f_cost())
            .then(self.h_cost.total_cmp(&other.h_cost))
            .then(self.seq.cmp(&other.seq))
    }
}

/// Summary of one node expansion, handed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expansion {
    pub position: Position,
    pub g_cost: f32,
    /// Nodes left in the open set after the expansion.
    pub open: usize,
    pub closed: usize,
    pub expanded: usize,
}

/// Outcome of [`AStarSearch::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Expanded(Expansion),
    Found(Path),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Searching,
    Found(usize),
    Exhausted,
}

/// One A* query in progress.
pub struct AStarSearch<'g, G: TerrainPather + ?Sized> {
    graph: &'g G,
    start: Position,
    goal: Position,
    nodes: Vec<SearchNode>,
    lookup: HashMap<Position, usize>,
    open: IndexedMinHeap,
    closed: usize,
    nbuf: Vec<Position>,
    state: State,
}

impl<'g, G: TerrainPather + ?Sized> AStarSearch<'g, G> {
    /// Start a search with `start` as the only open node.
    pub fn new(graph: &'g G, start: Position, goal: Position) -> Self {
        let mut search = Self {
            graph,
            start,
            goal,
            nodes: Vec::new(),
            lookup: HashMap::new(),
            open: IndexedMinHeap::new(),
            closed: 0,
            nbuf: Vec::new(),
            state: State::Searching,
        };
        let h = graph.estimate(start, goal);
        let id = search.create_node(start, 0.0, h, None);
        // Unreachable with a growable heap.
        if search.open.add(&mut search.nodes, id).is_err() {
            search.state = State::Exhausted;
        }
        search
    }

    #[inline]
    pub fn start(&self) -> Position {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Node expansions performed so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.closed
    }

    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Search state of `p`, if it has been reached.
    pub fn node(&self, p: Position) -> Option<&SearchNode> {
        self.lookup.get(&p).map(|&id| &self.nodes[id])
    }

    /// Every node reached so far, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.iter()
    }

    /// Expand the cheapest open node.
    ///
    /// Once the goal is found every further call returns the same path; once
    /// the open set runs dry every further call reports `NoPathFound`.
    pub fn step(&mut self) -> Result<Step, PathError> {
        match self.state {
            State::Found(id) => return Ok(Step::Found(self.reconstruct(id))),
            State::Exhausted => return Err(self.no_path()),
            State::Searching => {}
        }
        if self.open.is_empty() {
            self.state = State::Exhausted;
            log::debug!(
                "astar: open set exhausted after {} expansions, no path {} -> {}",
                self.closed,
                self.start,
                self.goal
            );
            return Err(self.no_path());
        }

        let ci = self.open.remove_min(&mut self.nodes)?;
        self.nodes[ci].closed = true;
        self.closed += 1;
        let current = self.nodes[ci].position;
        let current_g = self.nodes[ci].g_cost;

        if current == self.goal {
            self.state = State::Found(ci);
            let path = self.reconstruct(ci);
            log::debug!(
                "astar: {} -> {} found, {} positions, cost {:.3}, {} expansions",
                self.start,
                self.goal,
                path.len(),
                path.cost,
                self.closed
            );
            return Ok(Step::Found(path));
        }

        let previous = self.nodes[ci].parent.map(|p| self.nodes[p].position);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        let relaxed = self
            .graph
            .neighbors(current, &mut nbuf)
            .map_err(PathError::from)
            .and_then(|()| self.relax(ci, previous, current, current_g, &nbuf));
        self.nbuf = nbuf;
        relaxed?;

        log::trace!(
            "astar: expanded {current} g={current_g:.3}, open {}",
            self.open.len()
        );
        Ok(Step::Expanded(Expansion {
            position: current,
            g_cost: current_g,
            open: self.open.len(),
            closed: self.closed,
            expanded: self.closed,
        }))
    }

    /// Run to completion.
    pub fn run(self) -> Result<Path, PathError> {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Run to completion, calling `observer` after every expansion. The
    /// observer cancels the search by returning `ControlFlow::Break`.
    pub fn run_with<F>(mut self, mut observer: F) -> Result<Path, PathError>
    where
        F: FnMut(&Expansion) -> ControlFlow<()>,
    {
        loop {
            match self.step()? {
                Step::Found(path) => return Ok(path),
                Step::Expanded(expansion) => {
                    if observer(&expansion).is_break() {
                        log::debug!("astar: cancelled after {} expansions", self.closed);
                        return Err(PathError::Cancelled {
                            expanded: self.closed,
                        });
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------

    fn relax(
        &mut self,
        ci: usize,
        previous: Option<Position>,
        current: Position,
        current_g: f32,
        neighbors: &[Position],
    ) -> Result<(), PathError> {
        for &np in neighbors {
            let edge = self.graph.cost(previous, current, np);
            if !edge.is_finite() {
                continue;
            }
            let g = current_g + edge;
            match self.lookup.get(&np) {
                None => {
                    let h = self.graph.estimate(np, self.goal);
                    let id = self.create_node(np, g, h, Some(ci));
                    self.open.add(&mut self.nodes, id)?;
                }
                Some(&ni) => {
                    let node = &mut self.nodes[ni];
                    if node.closed || g >= node.g_cost {
                        continue;
                    }
                    node.g_cost = g;
                    node.parent = Some(ci);
                    self.open.update(&mut self.nodes, ni)?;
                }
            }
        }
        Ok(())
    }

    fn create_node(&mut self, position: Position, g: f32, h: f32, parent: Option<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            position,
            g_cost: g,
            h_cost: h,
            closed: false,
            parent,
            seq: id,
            heap_index: None,
        });
        self.lookup.insert(position, id);
        id
    }

    fn reconstruct(&self, goal: usize) -> Path {
        let mut positions = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            positions.push(self.nodes[id].position);
            cur = self.nodes[id].parent;
        }
        positions.reverse();
        Path {
            positions,
            cost: self.nodes[goal].g_cost,
        }
    }

    fn no_path(&self) -> PathError {
        PathError::NoPathFound {
            start: self.start,
            goal: self.goal,
            expanded: self.closed,
        }
    }
}

/// Cheapest path from `start` to `goal`.
pub fn find_path<G: TerrainPather + ?Sized>(
    graph: &G,
    start: Position,
    goal: Position,
) -> Result<Path, PathError> {
    AStarSearch::new(graph, start, goal).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anisotropic::AnisotropicParams;
    use crate::graph::{GraphVariant, TerrainGraph, build_terrain_graph};
    use crate::grid::GridParams;
    use terranav_core::{HeightField, TerrainMesh};

    fn terrain(width: usize, height: usize, f: impl FnMut(usize, usize) -> f32) -> TerrainMesh {
        TerrainMesh::from_height_field(&HeightField::from_fn(width, height, f).unwrap(), 1.0)
    }

    fn graph(terrain: &TerrainMesh, variant: GraphVariant) -> TerrainGraph {
        build_terrain_graph(terrain.vertices.clone(), terrain.width, terrain.height, variant)
            .unwrap()
    }

    fn at(x: f32, y: f32, z: f32) -> Position {
        Position::new(x, y, z)
    }

    #[test]
    fn flat_grid_takes_the_diagonal() {
        let t = terrain(3, 3, |_, _| 0.0);
        let g = graph(&t, GraphVariant::Grid(GridParams::default()));
        let path = find_path(&g, at(0.0, 0.0, 0.0), at(2.0, 0.0, 2.0)).unwrap();
        assert_eq!(
            path.positions,
            vec![at(0.0, 0.0, 0.0), at(1.0, 0.0, 1.0), at(2.0, 0.0, 2.0)]
        );
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn start_equals_goal() {
        let t = terrain(3, 3, |_, _| 0.0);
        let g = graph(&t, GraphVariant::Grid(GridParams::default()));
        let p = at(1.0, 0.0, 1.0);
        let path = find_path(&g, p, p).unwrap();
        assert_eq!(path.positions, vec![p]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn cliff_blocks_anisotropic_search() {
        // Column x = 0 sits 5 units below the rest.
        let t = terrain(3, 3, |x, _| if x == 0 { 0.0 } else { 5.0 });
        let g = graph(&t, GraphVariant::default());
        let err = find_path(&g, at(0.0, 0.0, 0.0), at(2.0, 5.0, 2.0)).unwrap_err();
        assert_eq!(
            err,
            PathError::NoPathFound {
                start: at(0.0, 0.0, 0.0),
                goal: at(2.0, 5.0, 2.0),
                expanded: 3,
            }
        );
    }

    #[test]
    fn detour_avoids_impassable_edges() {
        // A two-row ridge along z = 2..=3 with a gap at x = 4.
        let t = terrain(6, 7, |x, z| {
            if (2..=3).contains(&z) && x != 4 { 3.0 } else { 0.0 }
        });
        let g = graph(&t, GraphVariant::default());
        let path = find_path(&g, at(0.0, 0.0, 0.0), at(0.0, 0.0, 6.0)).unwrap();
        assert!(path.positions.iter().all(|p| p.y == 0.0));
        assert!(path.positions.iter().any(|p| p.z == 2.0 || p.z == 3.0));
        let mut total = 0.0;
        for (i, w) in path.positions.windows(2).enumerate() {
            let prev = i.checked_sub(1).map(|j| path.positions[j]);
            let c = g.cost(prev, w[0], w[1]);
            assert!(c.is_finite());
            total += c;
        }
        assert!((total - path.cost).abs() < 1e-3);
    }

    #[test]
    fn straight_diagonal_costs_pure_distance() {
        let t = terrain(5, 5, |_, _| 0.0);
        let g = graph(&t, GraphVariant::Anisotropic(AnisotropicParams::default()));
        let path = find_path(&g, at(0.0, 0.0, 0.0), at(4.0, 0.0, 4.0)).unwrap();
        assert_eq!(path.positions.len(), 5);
        assert!((path.cost - 4.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn unknown_start_is_a_graph_error() {
        let t = terrain(3, 3, |_, _| 0.0);
        let g = graph(&t, GraphVariant::default());
        let start = at(-5.0, 0.0, 0.0);
        assert_eq!(
            find_path(&g, start, at(1.0, 0.0, 1.0)),
            Err(PathError::Graph(GraphError::InvalidVertexLookup(start)))
        );
    }

    #[test]
    fn observer_can_cancel() {
        let t = terrain(8, 8, |_, _| 0.0);
        let g = graph(&t, GraphVariant::default());
        let mut seen = 0;
        let err = AStarSearch::new(&g, at(0.0, 0.0, 0.0), at(7.0, 0.0, 7.0))
            .run_with(|_| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap_err();
        assert_eq!(err, PathError::Cancelled { expanded: 2 });
    }

    #[test]
    fn stepping_matches_find_path() {
        let t = terrain(6, 6, |x, z| 0.05 * (x + z) as f32);
        let g = graph(&t, GraphVariant::Grid(GridParams::default()));
        let start = t.vertex(0, 5).unwrap();
        let goal = t.vertex(5, 0).unwrap();
        let expected = find_path(&g, start, goal).unwrap();

        let mut search = AStarSearch::new(&g, start, goal);
        let mut expansions = 0;
        let path = loop {
            match search.step().unwrap() {
                Step::Expanded(e) => {
                    expansions += 1;
                    assert_eq!(e.expanded, expansions);
                    assert!(search.node(e.position).is_some_and(|n| n.closed));
                }
                Step::Found(path) => break path,
            }
        };
        assert_eq!(path, expected);
        // Finished sessions keep reporting the same result.
        assert_eq!(search.step().unwrap(), Step::Found(expected));
        assert!(search.nodes().count() >= path.len());
    }
}
