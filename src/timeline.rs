//! Node timeline builder: per-node `(frame_start, frame_count)` visibility
//! windows derived from one global node ordering shared by every partition.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{PartanimError, PartanimResult};
use crate::graph::{Graph, NodeId, PartitionId};

/// The global animation step at which a node becomes visible and how many
/// steps it stays the active node before the next arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameWindow {
    pub start: u64,
    pub count: u64,
}

/// Idle frames padded after a partition's last arrival so late-appearing
/// nodes (cut-edge placeholders in particular) have time to settle.
pub fn trailing_frame_count(settle_time_s: f64, fps: u32) -> u64 {
    (settle_time_s * f64::from(fps)).ceil() as u64
}

/// Build the node-id → 1-based rank map from the global order file contents.
/// Placeholder ids (absent from the order file by construction) are appended
/// after the ordered nodes, ascending, so they arrive last.
///
/// Order entries naming unknown nodes are a length/content mismatch with the
/// input graph: warned about and skipped, never fatal.
pub fn build_rank_map(order: &[NodeId], placeholders: &[NodeId]) -> BTreeMap<NodeId, u32> {
    let mut ranks = BTreeMap::new();
    let mut rank: u32 = 0;
    for &node in order {
        if ranks.contains_key(&node) {
            warn!(node, "duplicate entry in node order, keeping first rank");
            continue;
        }
        rank += 1;
        ranks.insert(node, rank);
    }
    let mut extras: Vec<NodeId> = placeholders
        .iter()
        .copied()
        .filter(|n| !ranks.contains_key(n))
        .collect();
    extras.sort_unstable();
    for node in extras {
        rank += 1;
        ranks.insert(node, rank);
    }
    ranks
}

/// Stamp `order` ranks onto every node of `graph` present in the rank map.
pub fn apply_ranks(graph: &mut Graph, ranks: &BTreeMap<NodeId, u32>) {
    let ids: Vec<NodeId> = graph.node_ids().collect();
    for id in ids {
        match ranks.get(&id) {
            Some(&r) => {
                if let Some(attrs) = graph.attrs_mut(id) {
                    attrs.order = Some(r);
                }
            }
            None => warn!(node = id, "node missing from order, no rank assigned"),
        }
    }
}

/// Compute the visibility windows for one partition from the full unioned
/// graph. Every node must already carry `order` and `partition`; a missing
/// rank is a programming error and panics.
///
/// The window list is positional: entry `i` belongs to the i-th node of the
/// partition's sub-graph when that sub-graph's nodes are sorted by their own
/// `order` attribute.
pub fn partition_windows(
    full: &Graph,
    partition: PartitionId,
    trailing_frame_count: u64,
) -> Vec<FrameWindow> {
    let sorted = full.nodes_by_order();
    let starts: Vec<u64> = sorted
        .iter()
        .enumerate()
        .filter(|(_, id)| {
            full.attrs(**id).map(|a| a.partition) == Some(Some(partition))
        })
        .map(|(i, _)| i as u64)
        .collect();

    let terminal = sorted.len() as u64 + trailing_frame_count;
    let mut windows = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let next = starts.get(i + 1).copied().unwrap_or(terminal);
        windows.push(FrameWindow {
            start,
            count: next - start,
        });
    }
    windows
}

/// Apply `windows` positionally to `sub`'s nodes sorted by their own `order`
/// attribute. Both lists have equal length by construction; a mismatch means
/// the sub-graph and the unioned graph disagree about this partition.
pub fn apply_windows(sub: &mut Graph, windows: &[FrameWindow]) -> PartanimResult<()> {
    let ids = sub.nodes_by_order();
    if ids.len() != windows.len() {
        return Err(PartanimError::contract(format!(
            "partition {:?}: {} sub-graph nodes but {} frame windows",
            sub.partition,
            ids.len(),
            windows.len()
        )));
    }
    for (id, window) in ids.into_iter().zip(windows) {
        if let Some(attrs) = sub.attrs_mut(id) {
            attrs.frame = Some(*window);
        }
    }
    Ok(())
}
