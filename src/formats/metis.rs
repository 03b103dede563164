//! METIS graph file reader.
//!
//! Header: `<nodes> <edges> [fmt [ncon]]`. `fmt` encodes which weights are
//! present: 0 none, 1 edge weights, 10 node weights, 11 both. When node
//! weights are used, `ncon` gives the number of weights per vertex (only the
//! first is kept). `%` lines are comments; a blank data line is an isolated,
//! unweighted node. Nodes are 1-based both in the file's adjacency lists and
//! in the ids this reader produces.

use std::path::Path;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::formats::read_to_string;
use crate::graph::{Graph, NodeId};

pub fn read_metis(path: &Path) -> PartanimResult<Graph> {
    info!(file = %path.display(), "reading METIS file");
    let text = read_to_string(path)?;
    parse_metis(&text).map_err(|msg| {
        PartanimError::format(format!("{}: {msg}", path.display()))
    })
}

fn parse_metis(text: &str) -> Result<Graph, String> {
    let mut graph = Graph::new();

    let mut header: Option<(usize, usize)> = None;
    let mut has_edge_weights = false;
    let mut has_node_weights = false;
    let mut n_vertex_weights = 1usize;
    // Current node, 1-based.
    let mut n: NodeId = 0;

    for line in text.lines() {
        if line.starts_with('%') {
            continue;
        }

        if header.is_none() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return Err("header must contain node and edge counts".into());
            }
            let nodes = parse_usize(fields[0], "node count")?;
            let edges = parse_usize(fields[1], "edge count")?;
            if fields.len() > 2 {
                match fields[2].parse::<u32>() {
                    Ok(0) => {}
                    Ok(1) => has_edge_weights = true,
                    Ok(10) => has_node_weights = true,
                    Ok(11) => {
                        has_edge_weights = true;
                        has_node_weights = true;
                    }
                    _ => return Err(format!("unsupported fmt code '{}'", fields[2])),
                }
            }
            if fields.len() > 3 {
                n_vertex_weights = parse_usize(fields[3], "ncon")?;
            }
            header = Some((nodes, edges));
            continue;
        }

        n += 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            // Blank line: isolated node with default weight.
            graph.add_node(n).weight = 1.0;
            continue;
        }

        let skip = if has_node_weights { n_vertex_weights } else { 0 };
        if fields.len() < skip {
            return Err(format!("node {n}: expected {skip} vertex weights"));
        }
        let weight = if has_node_weights {
            parse_f64(fields[0], "node weight")?
        } else {
            1.0
        };
        graph.add_node(n).weight = weight;

        let adjacency = &fields[skip..];
        if has_edge_weights {
            if !adjacency.len().is_multiple_of(2) {
                return Err(format!(
                    "node {n}: weighted adjacency list has odd length"
                ));
            }
            for pair in adjacency.chunks_exact(2) {
                let neighbor: NodeId = parse_usize(pair[0], "neighbor id")? as NodeId;
                let w = parse_f64(pair[1], "edge weight")?;
                graph.add_edge(n, neighbor, w);
            }
        } else {
            for v in adjacency {
                let neighbor: NodeId = parse_usize(v, "neighbor id")? as NodeId;
                graph.add_edge(n, neighbor, 1.0);
            }
        }
    }

    let (m_nodes, m_edges) =
        header.ok_or_else(|| "missing header line".to_string())?;
    if graph.node_count() != m_nodes {
        return Err(format!(
            "expected {m_nodes} nodes, file contains {}",
            graph.node_count()
        ));
    }
    if graph.edge_count() != m_edges {
        return Err(format!(
            "expected {m_edges} edges, file contains {}",
            graph.edge_count()
        ));
    }
    Ok(graph)
}

fn parse_usize(s: &str, what: &str) -> Result<usize, String> {
    s.parse().map_err(|_| format!("invalid {what} '{s}'"))
}

fn parse_f64(s: &str, what: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("invalid {what} '{s}'"))
}
