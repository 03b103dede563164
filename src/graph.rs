use std::collections::BTreeMap;

use petgraph::graphmap::UnGraphMap;

use crate::timeline::FrameWindow;

/// Node ids are normalized to integers at the reader boundary; METIS-style
/// inputs are 1-based.
pub type NodeId = u32;
pub type PartitionId = u32;
pub type ClusterId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttrs {
    pub weight: f64,
    pub size: f64,
    pub partition: Option<PartitionId>,
    /// 1-based rank in the global node ordering.
    pub order: Option<u32>,
    /// Global cluster memberships, primary first.
    pub clusters: Vec<ClusterId>,
    /// Comma-joined color list after fusion, one color per membership.
    pub fillcolor: Option<String>,
    /// Layout position, read back from the layout tool's dot output.
    pub pos: Option<(f64, f64)>,
    /// Animation visibility window, set by the timeline builder.
    pub frame: Option<FrameWindow>,
    pub hidden: bool,
    /// For cut-edge placeholders: `(internal, external)` endpoints of the
    /// cut edge this node stands in for.
    pub connect: Option<(NodeId, NodeId)>,
    /// Placeholders attached to this node, in creation order.
    pub hidden_nodes: Vec<NodeId>,
}

impl Default for NodeAttrs {
    fn default() -> Self {
        Self {
            weight: 1.0,
            size: 10.0,
            partition: None,
            order: None,
            clusters: Vec::new(),
            fillcolor: None,
            pos: None,
            frame: None,
            hidden: false,
            connect: None,
            hidden_nodes: Vec::new(),
        }
    }
}

impl NodeAttrs {
    pub fn primary_cluster(&self) -> Option<ClusterId> {
        self.clusters.first().copied()
    }
}

/// Undirected weighted graph with per-node attributes. Topology lives in a
/// petgraph `UnGraphMap`; attributes in an ordered map so every iteration
/// over nodes is deterministic.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Set on sub-graphs produced by the partition splitter.
    pub partition: Option<PartitionId>,
    topo: UnGraphMap<NodeId, f64>,
    attrs: BTreeMap<NodeId, NodeAttrs>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: NodeId) -> &mut NodeAttrs {
        self.topo.add_node(id);
        self.attrs.entry(id).or_default()
    }

    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_node(a);
        self.add_node(b);
        self.topo.add_edge(a, b, weight);
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.attrs.contains_key(&id)
    }

    /// Undirected containment: `(a, b)` and `(b, a)` are the same edge.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.topo.contains_edge(a, b)
    }

    pub fn node_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.topo.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.attrs.keys().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttrs)> {
        self.attrs.iter().map(|(id, a)| (*id, a))
    }

    pub fn attrs(&self, id: NodeId) -> Option<&NodeAttrs> {
        self.attrs.get(&id)
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut NodeAttrs> {
        self.attrs.get_mut(&id)
    }

    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.topo.neighbors(id).collect();
        out.sort_unstable();
        out
    }

    /// All edges normalized to `(lo, hi, weight)`, sorted.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut out: Vec<(NodeId, NodeId, f64)> = self
            .topo
            .all_edges()
            .map(|(a, b, w)| (a.min(b), a.max(b), *w))
            .collect();
        out.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        out
    }

    pub fn max_node_id(&self) -> Option<NodeId> {
        self.attrs.keys().next_back().copied()
    }

    /// Independent copy restricted to `keep`, with edges whose endpoints both
    /// survive. Attributes are cloned, not shared.
    pub fn induced_subgraph(&self, keep: &[NodeId]) -> Graph {
        let mut sub = Graph::new();
        for &id in keep {
            if let Some(a) = self.attrs.get(&id) {
                *sub.add_node(id) = a.clone();
            }
        }
        for (a, b, w) in self.edges() {
            if sub.contains_node(a) && sub.contains_node(b) {
                sub.add_edge(a, b, w);
            }
        }
        sub
    }

    /// Nodes sorted by their `order` attribute. Callers must have assigned
    /// ranks first; a missing rank here is a programming error.
    pub fn nodes_by_order(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.node_ids().collect();
        ids.sort_by_key(|id| {
            self.attrs[id]
                .order
                .unwrap_or_else(|| panic!("node {id} has no order rank; assign ranks first"))
        });
        ids
    }
}

/// Node-to-partition assignment. `None` marks an excluded node (`-1` in the
/// assignment file); excluded nodes never appear in any sub-graph.
#[derive(Clone, Debug, Default)]
pub struct Assignment {
    map: BTreeMap<NodeId, Option<PartitionId>>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, partition: Option<PartitionId>) {
        self.map.insert(node, partition);
    }

    pub fn partition_of(&self, node: NodeId) -> Option<PartitionId> {
        self.map.get(&node).copied().flatten()
    }

    pub fn is_included(&self, node: NodeId) -> bool {
        self.partition_of(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn included(&self) -> impl Iterator<Item = (NodeId, PartitionId)> + '_ {
        self.map
            .iter()
            .filter_map(|(n, p)| p.map(|p| (*n, p)))
    }

    /// Nodes assigned to `partition`, ascending.
    pub fn nodes_in(&self, partition: PartitionId) -> Vec<NodeId> {
        self.included()
            .filter(|&(_, p)| p == partition)
            .map(|(n, _)| n)
            .collect()
    }
}
