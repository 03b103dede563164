//! Color fusion: expand the coloring tool's one-color-per-cluster output
//! (attached to each cluster's primary member) into an ordered multi-color
//! label per node.

use std::collections::BTreeMap;

use tracing::info;

use crate::cluster::ClusterMap;
use crate::error::{PartanimError, PartanimResult};
use crate::graph::{ClusterId, NodeId};

/// Build the cluster → color map from per-node colors. A node contributes
/// its color to its primary cluster only; the first contributor wins.
pub fn cluster_color_map(
    color_per_node: &BTreeMap<NodeId, String>,
    memberships: &ClusterMap,
) -> BTreeMap<ClusterId, String> {
    let mut cluster_to_color = BTreeMap::new();
    for (node, membership) in memberships {
        if cluster_to_color.contains_key(&membership.primary) {
            continue;
        }
        if let Some(color) = color_per_node.get(node) {
            cluster_to_color.insert(membership.primary, color.trim_matches('"').to_string());
        }
    }
    cluster_to_color
}

/// For every node with a membership, emit the ordered, comma-joined colors of
/// its full membership list. Every cluster must be the primary cluster of at
/// least one colored node; a miss is an upstream contract violation, not
/// something fusion can repair.
pub fn fuse_colors(
    color_per_node: &BTreeMap<NodeId, String>,
    memberships: &ClusterMap,
) -> PartanimResult<BTreeMap<NodeId, String>> {
    if memberships.is_empty() {
        return Ok(color_per_node.clone());
    }
    info!(nodes = memberships.len(), "fusing cluster colors into per-node color lists");

    let cluster_to_color = cluster_color_map(color_per_node, memberships);

    let mut colors_per_node = BTreeMap::new();
    for (node, membership) in memberships {
        let mut colors = Vec::with_capacity(membership.member_count());
        for cluster in membership.all() {
            let color = cluster_to_color.get(&cluster).ok_or_else(|| {
                PartanimError::contract(format!(
                    "cluster {cluster} has no colored primary member (node {node})"
                ))
            })?;
            colors.push(color.as_str());
        }
        colors_per_node.insert(*node, colors.join(","));
    }
    Ok(colors_per_node)
}
