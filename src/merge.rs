//! Sub-graph recombination for the coloring pass: shift each laid-out
//! sub-graph horizontally so none overlap, then union them into one graph.

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::graph::Graph;

/// Shift each sub-graph's x positions right of the previous one, separated by
/// `spacing`. Sub-graphs without positioned nodes contribute no offset.
pub fn offset_positions(subs: &mut [Graph], spacing: f64) {
    info!(graphs = subs.len(), spacing, "offsetting sub-graph positions to avoid overlaps");
    let mut offset = 0.0;
    for sub in subs.iter_mut() {
        let xs: Vec<f64> = sub
            .nodes()
            .filter_map(|(_, a)| a.pos.map(|(x, _)| x))
            .collect();

        let ids: Vec<_> = sub.node_ids().collect();
        for id in ids {
            if let Some(attrs) = sub.attrs_mut(id) {
                if let Some((x, y)) = attrs.pos {
                    attrs.pos = Some((x + offset, y));
                }
            }
        }

        if let (Some(min), Some(max)) = (
            xs.iter().cloned().reduce(f64::min),
            xs.iter().cloned().reduce(f64::max),
        ) {
            offset += max - min + spacing;
        }
    }
}

/// Union of disjoint sub-graphs, attributes included. Overlapping node ids
/// would mean the splitter's disjointness invariant was violated.
pub fn union_all(subs: &[Graph]) -> PartanimResult<Graph> {
    let mut merged = Graph::new();
    for sub in subs {
        for (id, attrs) in sub.nodes() {
            if merged.contains_node(id) {
                return Err(PartanimError::contract(format!(
                    "node {id} appears in more than one sub-graph"
                )));
            }
            *merged.add_node(id) = attrs.clone();
        }
        for (a, b, w) in sub.edges() {
            merged.add_edge(a, b, w);
        }
    }
    Ok(merged)
}
