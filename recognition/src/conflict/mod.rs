//! Conflict graph over detection hypotheses.
//!
//! Each node is a candidate detection with the scene evidence it explains.
//! Two nodes that explain a common (model point, scene point) correspondence
//! are joined by an edge, and suppressing an edge flags the weaker endpoint.
//! What survives is the accepted object list.
//!
//! Nodes and edges live in append-only vectors, so indices are stable. They
//! can be appended from many threads at once. Suppression needs `&mut self`,
//! which confines it to a phase after construction has finished.


use hashbrown::HashSet;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::ModelId;

/// A model point explained by a scene point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExplainedPoint {
    pub model_index: usize,
    pub scene_index: usize,
}

impl ExplainedPoint {
    pub const fn new(model_index: usize, scene_index: usize) -> Self {
        Self {
            model_index,
            scene_index,
        }
    }
}

/// A detection hypothesis.
#[derive(Debug, Clone)]
pub struct ConflictNode {
    pub model_id: ModelId,
    pub votes: usize,
    pub explained_count: usize,
    pub explained_points: HashSet<ExplainedPoint>,
    suppressed: bool,
}

impl ConflictNode {
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

/// Two hypotheses sharing evidence. `overlap` is the number of shared
/// explained points, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEdge {
    pub from: usize,
    pub to: usize,
    pub overlap: usize,
}

#[derive(Debug, Default)]
pub struct ConflictGraph {
    nodes: RwLock<Vec<ConflictNode>>,
    edges: RwLock<Vec<ConflictEdge>>,
}

impl ConflictGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hypothesis and return its index.
    pub fn add_node(
        &self,
        model_id: ModelId,
        votes: usize,
        explained_count: usize,
        explained_points: HashSet<ExplainedPoint>,
    ) -> usize {
        let node = ConflictNode {
            model_id,
            votes,
            explained_count,
            explained_points,
            suppressed: false,
        };
        let mut nodes = self.nodes.write();
        nodes.push(node);
        nodes.len() - 1
    }

    /// Append an edge `from -> to` if the two nodes share an explained point.
    ///
    /// Returns the new edge index, or `None` when the explained point sets are
    /// disjoint or `from == to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn add_edge(&self, from: usize, to: usize) -> Option<usize> {
        if from == to {
            return None;
        }

        let overlap = {
            let nodes = self.nodes.read();
            assert!(
                from < nodes.len() && to < nodes.len(),
                "edge ({from}, {to}) out of bounds for {} nodes",
                nodes.len()
            );
            shared_count(&nodes[from].explained_points, &nodes[to].explained_points)
        };
        if overlap == 0 {
            return None;
        }

        let mut edges = self.edges.write();
        edges.push(ConflictEdge { from, to, overlap });
        Some(edges.len() - 1)
    }

    /// Test every node pair `i < j` once, in parallel, and add an edge for
    /// each overlapping pair. Returns the number of edges added.
    pub fn connect_overlapping(&self) -> usize {
        let n = self.len();
        let added: usize = (0..n)
            .into_par_iter()
            .map(|i| (i + 1..n).filter(|&j| self.add_edge(i, j).is_some()).count())
            .sum();

        tracing::debug!(nodes = n, edges = added, "Connected overlapping hypotheses");
        added
    }

    /// Resolve one edge by suppressing its weaker endpoint and return that
    /// endpoint's index.
    ///
    /// The endpoint explaining fewer points loses. On equal counts, `from`
    /// loses if it has more votes than `to`, otherwise `to` loses. Suppressing
    /// an already suppressed node changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `edge` is out of bounds.
    pub fn suppress(&mut self, edge: usize) -> usize {
        let ConflictEdge { from, to, .. } = self.edges.get_mut()[edge];
        let nodes = self.nodes.get_mut();

        let loser = if weaker_is_from(&nodes[from], &nodes[to]) {
            from
        } else {
            to
        };
        nodes[loser].suppressed = true;
        loser
    }

    /// Apply [`ConflictGraph::suppress`] to every edge in insertion order.
    ///
    /// Edges whose endpoints were already suppressed are still evaluated, so
    /// the outcome is the per-edge rule applied in this fixed order, not a
    /// maximal independent set. Returns the number of surviving nodes.
    pub fn suppress_all(&mut self) -> usize {
        for edge in 0..self.edge_count() {
            self.suppress(edge);
        }

        let accepted = self.accepted().len();
        tracing::info!(
            nodes = self.len(),
            edges = self.edge_count(),
            accepted,
            "Resolved conflicts"
        );
        accepted
    }

    pub fn is_suppressed(&self, node: usize) -> bool {
        self.nodes.read()[node].suppressed
    }

    pub fn model_of(&self, node: usize) -> ModelId {
        self.nodes.read()[node].model_id.clone()
    }

    /// Snapshot of a node.
    pub fn node(&self, node: usize) -> ConflictNode {
        self.nodes.read()[node].clone()
    }

    pub fn edge(&self, edge: usize) -> ConflictEdge {
        self.edges.read()[edge]
    }

    /// Indices of nodes that are not suppressed, ascending.
    pub fn accepted(&self) -> Vec<usize> {
        self.nodes
            .read()
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.suppressed)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }
}

fn weaker_is_from(from: &ConflictNode, to: &ConflictNode) -> bool {
    use std::cmp::Ordering;

    match from.explained_count.cmp(&to.explained_count) {
        Ordering::Less => true,
        // Ties go against the node with more votes.
        Ordering::Equal => from.votes > to.votes,
        Ordering::Greater => false,
    }
}

fn shared_count(a: &HashSet<ExplainedPoint>, b: &HashSet<ExplainedPoint>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|p| large.contains(*p)).count()
}
