use std::collections::{BTreeMap, HashMap, VecDeque};

use meridian_core::types::NodeId;

/// Reliability assumed for links with no explicit weight.
pub const DEFAULT_LINK_RELIABILITY: f64 = 0.99;

/// Adjacency index over the known overlay topology.
///
/// Links are directed; symmetric topologies insert both directions.
/// Neighbor order is lexical, which keeps the digest-seeded walk
/// deterministic across processes. The engine treats the index as
/// read-only once constructed.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
    reverse: BTreeMap<NodeId, Vec<NodeId>>,
    reliability: HashMap<(NodeId, NodeId), f64>,
}

impl TopologyIndex {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directed link. Duplicate inserts are no-ops.
    pub fn insert_link(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) {
        let from = from.into();
        let to = to.into();
        let forward = self.adjacency.entry(from.clone()).or_default();
        if let Err(pos) = forward.binary_search(&to) {
            forward.insert(pos, to.clone());
        }
        // Destination appears as a node even with no outgoing links.
        self.adjacency.entry(to.clone()).or_default();
        let backward = self.reverse.entry(to).or_default();
        if let Err(pos) = backward.binary_search(&from) {
            backward.insert(pos, from);
        }
    }

    /// Attach a reliability weight in [0, 1] to a directed link.
    /// Values are clamped; unknown links fall back to
    /// [`DEFAULT_LINK_RELIABILITY`].
    pub fn set_link_reliability(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        reliability: f64,
    ) {
        self.reliability
            .insert((from.into(), to.into()), reliability.clamp(0.0, 1.0));
    }

    /// Whether the node is known to the topology.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Whether a directed link exists.
    pub fn has_link(&self, from: &NodeId, to: &NodeId) -> bool {
        self.adjacency
            .get(from)
            .map_or(false, |neighbors| neighbors.binary_search(to).is_ok())
    }

    /// Lexically sorted neighbors of a node.
    pub fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Reliability weight of a directed link.
    pub fn link_reliability(&self, from: &NodeId, to: &NodeId) -> f64 {
        self.reliability
            .get(&(from.clone(), to.clone()))
            .copied()
            .unwrap_or(DEFAULT_LINK_RELIABILITY)
    }

    /// True iff `path` has at least two nodes and every consecutive pair
    /// is a known directed link.
    pub fn validate(&self, path: &[NodeId]) -> bool {
        if path.len() < 2 {
            return false;
        }
        path.windows(2).all(|pair| self.has_link(&pair[0], &pair[1]))
    }

    /// Hop distance from every node that can reach `destination`, via
    /// reverse BFS. Nodes absent from the result cannot reach it.
    pub fn distances_to(&self, destination: &NodeId) -> HashMap<NodeId, u32> {
        let mut distances = HashMap::new();
        if !self.contains(destination) {
            return distances;
        }
        distances.insert(destination.clone(), 0);
        let mut queue = VecDeque::from([destination.clone()]);
        while let Some(node) = queue.pop_front() {
            let next_distance = distances[&node] + 1;
            if let Some(predecessors) = self.reverse.get(&node) {
                for pred in predecessors {
                    if !distances.contains_key(pred) {
                        distances.insert(pred.clone(), next_distance);
                        queue.push_back(pred.clone());
                    }
                }
            }
        }
        distances
    }

    /// Number of known nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}
