use super::constants::LOOP_DISTANCE_FRACTION;
use super::nodes::LatticeNodes;
use super::torus::TorusDomain;
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Undirected edge between two node indices, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    /// Normalized edge, or `None` for a self-loop
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { a: i, b: j }),
            std::cmp::Ordering::Greater => Some(Self { a: j, b: i }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Simple graph over the lattice nodes: no self-loops, no duplicate pairs
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeGraph {
    pub node_count: usize,
    pub edges: Vec<Edge>,
}

impl LatticeGraph {
    /// Connect every node to its right and bottom grid neighbours (wrapping at
    /// the last column/row), then add up to `extra_loops` short extra edges.
    pub fn build(nodes: &LatticeNodes, domain: &TorusDomain, extra_loops: u32) -> Self {
        let node_count = nodes.len();
        let mut graph = Self {
            node_count,
            edges: Vec::new(),
        };

        if node_count <= 1 {
            return graph;
        }

        let mut seen = HashSet::new();
        let columns = nodes.columns.max(1);
        let rows = node_count.div_ceil(columns);

        for i in 0..node_count {
            let row = i / columns;
            let col = i % columns;
            let row_start = row * columns;
            let row_len = (node_count - row_start).min(columns);

            let right = if col + 1 < row_len { i + 1 } else { row_start };
            let below = if row + 1 < rows && i + columns < node_count {
                i + columns
            } else {
                col
            };

            graph.push_unique(&mut seen, i, right);
            graph.push_unique(&mut seen, i, below);
        }
        let structural = graph.edges.len();

        let added = graph.add_loop_edges(&mut seen, nodes, domain, extra_loops);

        tracing::debug!(
            nodes = node_count,
            structural_edges = structural,
            loop_edges = added,
            "built lattice graph"
        );

        graph
    }

    /// Shortest unused pairs within the loop distance, in stable distance order
    fn add_loop_edges(
        &mut self,
        seen: &mut HashSet<Edge>,
        nodes: &LatticeNodes,
        domain: &TorusDomain,
        extra_loops: u32,
    ) -> usize {
        if extra_loops == 0 {
            return 0;
        }

        let threshold = LOOP_DISTANCE_FRACTION * domain.width.min(domain.height);
        let n = nodes.len();
        let mut candidates = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let d = domain.distance(nodes.points[i], nodes.points[j]);
                if d < threshold {
                    candidates.push((Edge { a: i, b: j }, d));
                }
            }
        }
        // sort_by is stable: equal distances keep enumeration order
        candidates.sort_by(|x, y| x.1.total_cmp(&y.1));

        let mut added = 0;
        for (edge, _) in candidates {
            if added >= extra_loops as usize {
                break;
            }
            if seen.insert(edge) {
                self.edges.push(edge);
                added += 1;
            }
        }
        added
    }

    fn push_unique(&mut self, seen: &mut HashSet<Edge>, i: usize, j: usize) {
        if let Some(edge) = Edge::new(i, j) {
            if seen.insert(edge) {
                self.edges.push(edge);
            }
        }
    }

    pub fn neighbors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count];
        for edge in &self.edges {
            adjacency[edge.a].push(edge.b);
            adjacency[edge.b].push(edge.a);
        }
        adjacency
    }

    /// Every node reachable from node 0
    pub fn is_connected(&self) -> bool {
        if self.node_count <= 1 {
            return true;
        }
        let adjacency = self.neighbors();
        bfs_reach(0usize, |&n| adjacency[n].clone()).count() == self.node_count
    }
}
