//! Partition splitter: one independent sub-graph per partition, with optional
//! cut-edge placeholder synthesis.

use tracing::{debug, info};

use crate::error::{PartanimError, PartanimResult};
use crate::graph::{Assignment, Graph, NodeId, PartitionId};

/// Split `graph` into one sub-graph per partition. Each sub-graph is an
/// independent copy containing exactly the nodes assigned to its partition,
/// tagged with `partition` both on the sub-graph and on every contained node.
/// Excluded nodes (assignment `-1`) appear in no sub-graph.
pub fn create_sub_graphs(
    graph: &Graph,
    partitions: &[PartitionId],
    assignment: &Assignment,
) -> Vec<Graph> {
    info!(
        partitions = partitions.len(),
        "splitting graph by partition"
    );
    let mut subs = Vec::with_capacity(partitions.len());
    for &p in partitions {
        let nodes = assignment.nodes_in(p);
        let mut sub = graph.induced_subgraph(&nodes);
        sub.partition = Some(p);
        for id in nodes {
            if let Some(attrs) = sub.attrs_mut(id) {
                attrs.partition = Some(p);
            }
        }
        debug!(
            partition = p,
            nodes = sub.node_count(),
            edges = sub.edge_count(),
            "created sub-graph"
        );
        subs.push(sub);
    }
    subs
}

/// Edges of `graph` whose endpoints are both included but do not land
/// together in any sub-graph's edge set. An edge with an excluded endpoint is
/// never a cut edge. Returned in ascending `(lo, hi)` order.
pub fn cut_edge_set(
    graph: &Graph,
    assignment: &Assignment,
    subs: &[Graph],
) -> Vec<(NodeId, NodeId)> {
    let mut cuts = Vec::new();
    for (a, b, _) in graph.edges() {
        if !assignment.is_included(a) || !assignment.is_included(b) {
            continue;
        }
        // `Graph::has_edge` is orientation-free, so both orderings of the
        // pair are covered by a single containment check.
        let resident = subs.iter().any(|s| s.has_edge(a, b));
        if !resident {
            cuts.push((a, b));
        }
    }
    cuts
}

/// Synthesize one hidden placeholder node per (sub-graph, cut-edge)
/// incidence. Placeholder ids are drawn from a single counter starting at
/// `max(original node ids) + 1` and threaded through the sub-graphs in their
/// given order; reordering partitions would change the generated ids, so the
/// caller must pass sub-graphs in the fixed partition order.
///
/// Each placeholder carries `size`, its internal neighbor's partition,
/// `connect = (internal, external)`, a single edge to the internal neighbor,
/// and is registered in the internal node's `hidden_nodes` and in the
/// assignment map. Returns the number of placeholders created.
pub fn synthesize_placeholders(
    subs: &mut [Graph],
    cuts: &[(NodeId, NodeId)],
    assignment: &mut Assignment,
    first_id: NodeId,
    size: f64,
) -> PartanimResult<usize> {
    let mut next_id = first_id;
    for sub in subs.iter_mut() {
        let p = sub
            .partition
            .ok_or_else(|| PartanimError::contract("sub-graph lost its partition tag"))?;
        for &(a, b) in cuts {
            let (internal, external) = if assignment.partition_of(a) == Some(p) {
                (a, b)
            } else if assignment.partition_of(b) == Some(p) {
                (b, a)
            } else {
                continue;
            };

            let h = next_id;
            next_id += 1;

            let attrs = sub.add_node(h);
            attrs.size = size;
            attrs.partition = Some(p);
            attrs.connect = Some((internal, external));
            attrs.hidden = true;

            sub.add_edge(internal, h, 1.0);
            if let Some(int_attrs) = sub.attrs_mut(internal) {
                int_attrs.hidden_nodes.push(h);
            }
            assignment.insert(h, Some(p));
            debug!(
                placeholder = h,
                internal, external, partition = p,
                "added cut-edge placeholder"
            );
        }
    }
    Ok((next_id - first_id) as usize)
}

/// Convenience wrapper: compute the cut-edge set and synthesize placeholders
/// with ids starting just past the original graph's highest node id.
pub fn add_cut_edge_placeholders(
    graph: &Graph,
    subs: &mut [Graph],
    assignment: &mut Assignment,
    size: f64,
) -> PartanimResult<usize> {
    let cuts = cut_edge_set(graph, assignment, subs);
    info!(cut_edges = cuts.len(), "synthesizing cut-edge placeholders");
    let first_id = graph.max_node_id().map_or(1, |m| m + 1);
    synthesize_placeholders(subs, &cuts, assignment, first_id, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn chain_graph() -> (Graph, Assignment) {
        // Scenario A: 1-2-3-4 split {1,2} / {3,4}.
        let mut g = Graph::new();
        g.add_edge(1, 2, 1.0);
        g.add_edge(2, 3, 1.0);
        g.add_edge(3, 4, 1.0);
        let mut a = Assignment::new();
        a.insert(1, Some(0));
        a.insert(2, Some(0));
        a.insert(3, Some(1));
        a.insert(4, Some(1));
        (g, a)
    }

    #[test]
    fn sub_graphs_partition_the_included_nodes() {
        let (g, a) = chain_graph();
        let subs = create_sub_graphs(&g, &[0, 1], &a);

        let s0: BTreeSet<_> = subs[0].node_ids().collect();
        let s1: BTreeSet<_> = subs[1].node_ids().collect();
        assert_eq!(s0, BTreeSet::from([1, 2]));
        assert_eq!(s1, BTreeSet::from([3, 4]));
        assert!(s0.is_disjoint(&s1));

        for sub in &subs {
            for (_, attrs) in sub.nodes() {
                assert_eq!(attrs.partition, sub.partition);
            }
        }
    }

    #[test]
    fn excluded_nodes_appear_in_no_sub_graph() {
        let (g, mut a) = chain_graph();
        a.insert(4, None);
        let subs = create_sub_graphs(&g, &[0, 1], &a);
        assert!(subs.iter().all(|s| !s.contains_node(4)));
    }

    #[test]
    fn cut_edge_set_finds_the_crossing_edge() {
        let (g, a) = chain_graph();
        let subs = create_sub_graphs(&g, &[0, 1], &a);
        assert_eq!(cut_edge_set(&g, &a, &subs), vec![(2, 3)]);
    }

    #[test]
    fn edge_with_excluded_endpoint_is_not_cut() {
        let (g, mut a) = chain_graph();
        a.insert(3, None);
        let subs = create_sub_graphs(&g, &[0, 1], &a);
        // (2,3) and (3,4) both touch the excluded node 3.
        assert_eq!(cut_edge_set(&g, &a, &subs), Vec::<(NodeId, NodeId)>::new());
    }

    #[test]
    fn scenario_a_placeholders() {
        let (g, mut a) = chain_graph();
        let mut subs = create_sub_graphs(&g, &[0, 1], &a);
        let created = add_cut_edge_placeholders(&g, &mut subs, &mut a, 4.0).unwrap();
        assert_eq!(created, 2);

        // First placeholder lands in partition 0 (internal = 2).
        let h0 = 5;
        let attrs0 = subs[0].attrs(h0).unwrap();
        assert!(attrs0.hidden);
        assert_eq!(attrs0.partition, Some(0));
        assert_eq!(attrs0.connect, Some((2, 3)));
        assert_eq!(subs[0].neighbors(h0), vec![2]);
        assert_eq!(subs[0].attrs(2).unwrap().hidden_nodes, vec![h0]);

        // Second placeholder lands in partition 1 (internal = 3).
        let h1 = 6;
        let attrs1 = subs[1].attrs(h1).unwrap();
        assert!(attrs1.hidden);
        assert_eq!(attrs1.connect, Some((3, 2)));
        assert_eq!(subs[1].neighbors(h1), vec![3]);

        // Placeholders join the assignment map with the internal partition.
        assert_eq!(a.partition_of(h0), Some(0));
        assert_eq!(a.partition_of(h1), Some(1));
    }

    #[test]
    fn placeholder_count_matches_incidences() {
        // Star: center 1 in partition 0, leaves 2..=4 in partitions 1,1,2.
        let mut g = Graph::new();
        for leaf in 2..=4 {
            g.add_edge(1, leaf, 1.0);
        }
        let mut a = Assignment::new();
        a.insert(1, Some(0));
        a.insert(2, Some(1));
        a.insert(3, Some(1));
        a.insert(4, Some(2));
        let mut subs = create_sub_graphs(&g, &[0, 1, 2], &a);
        let created = add_cut_edge_placeholders(&g, &mut subs, &mut a, 4.0).unwrap();
        // 3 cut edges, each touching 2 sub-graphs.
        assert_eq!(created, 6);
        for sub in &subs {
            for (id, attrs) in sub.nodes() {
                if attrs.hidden {
                    assert_eq!(sub.neighbors(id).len(), 1);
                }
            }
        }
    }

    #[test]
    fn untagged_sub_graph_is_a_contract_error() {
        let (g, mut a) = chain_graph();
        let mut subs = create_sub_graphs(&g, &[0, 1], &a);
        subs[1].partition = None;
        let err = add_cut_edge_placeholders(&g, &mut subs, &mut a, 4.0).unwrap_err();
        assert!(err.to_string().contains("contract error"));
    }
}
