//! Undirected graph over a fixed node set

use serde::{Deserialize, Serialize};

/// Undirected, simple graph stored as adjacency lists.
///
/// Node indices run over `0..len()`. Generators in [`crate::topology`]
/// are the only way to add edges, so adjacency is frozen once a graph
/// is handed to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
}

/// Summary of the degree distribution
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl Graph {
    /// Empty graph with `n` isolated nodes
    pub(crate) fn with_nodes(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    /// Insert the undirected edge `u - v`.
    ///
    /// Self-loops, duplicates and out-of-range endpoints are ignored.
    /// Returns true if a new edge was added.
    pub(crate) fn add_edge(&mut self, u: usize, v: usize) -> bool {
        let n = self.adjacency.len();
        if u == v || u >= n || v >= n || self.adjacency[u].contains(&v) {
            return false;
        }
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        true
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Number of undirected edges (sum of degrees / 2)
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency.get(u).map_or(false, |nbrs| nbrs.contains(&v))
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    /// Check the structural invariants: symmetric adjacency, no self-loops,
    /// no duplicate neighbors
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(u, neighbors)| {
            neighbors.iter().enumerate().all(|(pos, &v)| {
                v != u
                    && v < self.len()
                    && !neighbors[..pos].contains(&v)
                    && self.adjacency[v].contains(&u)
            })
        })
    }

    /// Degree distribution summary (all zero for an empty graph)
    pub fn degree_stats(&self) -> DegreeStats {
        if self.is_empty() {
            return DegreeStats { min: 0, max: 0, mean: 0.0 };
        }
        let degrees = self.degrees();
        let min = degrees.iter().copied().min().unwrap_or(0);
        let max = degrees.iter().copied().max().unwrap_or(0);
        let mean = degrees.iter().sum::<usize>() as f64 / degrees.len() as f64;
        DegreeStats { min, max, mean }
    }
}
