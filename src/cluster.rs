//! Cluster membership bookkeeping: the tagged per-node membership record,
//! the homeless-node fixup, singleton clustering for degenerate sub-graphs,
//! and the local-to-global cluster id namespacing.

use std::collections::BTreeMap;

use tracing::info;

use crate::graph::{ClusterId, Graph, NodeId};

/// Ordered cluster memberships of one node. The primary (first-listed)
/// cluster is the one handed to the coloring tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub node: NodeId,
    pub primary: ClusterId,
    pub secondary: Vec<ClusterId>,
}

impl Membership {
    /// Build from an ordered, non-empty id list (first entry = primary).
    pub fn from_ids(node: NodeId, ids: &[ClusterId]) -> Option<Self> {
        let (&primary, secondary) = ids.split_first()?;
        Some(Self {
            node,
            primary,
            secondary: secondary.to_vec(),
        })
    }

    pub fn singleton(node: NodeId, cluster: ClusterId) -> Self {
        Self {
            node,
            primary: cluster,
            secondary: Vec::new(),
        }
    }

    /// Full ordered membership list, primary first.
    pub fn all(&self) -> Vec<ClusterId> {
        let mut out = Vec::with_capacity(1 + self.secondary.len());
        out.push(self.primary);
        out.extend_from_slice(&self.secondary);
        out
    }

    /// Number of clusters this node belongs to. At least 1: a membership
    /// always carries a primary cluster.
    pub fn member_count(&self) -> usize {
        1 + self.secondary.len()
    }

    fn shift(&mut self, offset: ClusterId) {
        self.primary += offset;
        for c in &mut self.secondary {
            *c += offset;
        }
    }
}

/// Per-partition clustering result: node → ordered memberships.
pub type ClusterMap = BTreeMap<NodeId, Membership>;

pub fn max_cluster_id(map: &ClusterMap) -> Option<ClusterId> {
    map.values()
        .flat_map(|m| m.all())
        .max()
}

/// Fallback for zero-edge sub-graphs where running the external clustering
/// tool makes no sense: every node becomes its own 1-based singleton cluster.
pub fn singleton_clusters(sub: &Graph) -> ClusterMap {
    sub.node_ids()
        .enumerate()
        .map(|(i, node)| (node, Membership::singleton(node, i as ClusterId + 1)))
        .collect()
}

/// Drop membership entries for nodes the sub-graph does not contain (the
/// clustering tool saw the whole edge list, pruned output may reference
/// neighbors outside this partition).
pub fn prune_to_graph(map: &mut ClusterMap, sub: &Graph) {
    map.retain(|node, _| sub.contains_node(*node));
}

/// Homeless-node fixup: every node of the sub-graph missing from the cluster
/// map gets its own new singleton cluster, ids continuing past the map's
/// current maximum. Applied per partition, before namespacing.
pub fn create_homeless_clusters(sub: &Graph, map: &mut ClusterMap) {
    let mut next = max_cluster_id(map).unwrap_or(0);
    let homeless: Vec<NodeId> = sub
        .node_ids()
        .filter(|n| !map.contains_key(n))
        .collect();
    if homeless.is_empty() {
        return;
    }
    info!(nodes = ?homeless, "creating singleton clusters for homeless nodes");
    for node in homeless {
        next += 1;
        map.insert(node, Membership::singleton(node, next));
    }
}

/// Offset each partition's local cluster ids into one collision-free global
/// id space. The offset accumulator is threaded through the maps in their
/// given (fixed) partition order; each partition's recorded offset is the
/// value *before* its own ids are shifted, and the accumulator grows by the
/// partition's pre-shift local maximum, so gaps in a local id space are
/// preserved, never compacted.
///
/// Returns the per-partition offsets. Postcondition: the id sets used by any
/// two partitions are disjoint.
pub fn namespace_clusters(maps: &mut [ClusterMap]) -> Vec<ClusterId> {
    info!(partitions = maps.len(), "converting local cluster ids to global ids");
    let mut offsets = Vec::with_capacity(maps.len());
    let mut offset: ClusterId = 0;
    for map in maps.iter_mut() {
        offsets.push(offset);
        let local_max = max_cluster_id(map).unwrap_or(0);
        for membership in map.values_mut() {
            membership.shift(offset);
        }
        offset += local_max;
    }
    offsets
}

/// Merge all partitions' memberships into one node-keyed map. Partition node
/// sets are disjoint, so no entry is overwritten.
pub fn merge_cluster_maps(maps: &[ClusterMap]) -> ClusterMap {
    let mut merged = ClusterMap::new();
    for map in maps {
        for (node, membership) in map {
            merged.insert(*node, membership.clone());
        }
    }
    merged
}

/// Stamp global memberships onto the sub-graph's nodes (`clusters`
/// attribute, primary first).
pub fn attach_clusters(sub: &mut Graph, map: &ClusterMap) {
    for (node, membership) in map {
        if let Some(attrs) = sub.attrs_mut(*node) {
            attrs.clusters = membership.all();
        }
    }
}
