//! Pajek `.net` reader/writer, restricted to the `*Vertices`/`*Edges`
//! dialect the clustering tools exchange.

use std::path::Path;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::formats::read_to_string;
use crate::graph::{Graph, NodeId};

pub fn read_pajek(path: &Path) -> PartanimResult<Graph> {
    info!(file = %path.display(), "reading pajek file");
    let text = read_to_string(path)?;
    let mut graph = Graph::new();
    let mut in_edges = false;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("*vertices") {
            in_edges = false;
            continue;
        }
        if lower.starts_with("*edges") || lower.starts_with("*arcs") {
            in_edges = true;
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let bad_line = || {
            PartanimError::format(format!(
                "{}: line {}: malformed pajek line '{line}'",
                path.display(),
                i + 1
            ))
        };
        if in_edges {
            if fields.len() < 2 {
                return Err(bad_line());
            }
            let a: NodeId = fields[0].parse().map_err(|_| bad_line())?;
            let b: NodeId = fields[1].parse().map_err(|_| bad_line())?;
            let weight: f64 = match fields.get(2) {
                Some(w) => w.parse().map_err(|_| bad_line())?,
                None => 1.0,
            };
            graph.add_edge(a, b, weight);
        } else {
            let id: NodeId = fields[0].parse().map_err(|_| bad_line())?;
            graph.add_node(id);
        }
    }
    Ok(graph)
}

/// Write the graph for Infomap: vertex list with quoted labels, weighted
/// edge list.
pub fn write_pajek(graph: &Graph, path: &Path) -> PartanimResult<()> {
    use anyhow::Context as _;
    use std::io::Write as _;

    info!(file = %path.display(), "writing pajek file");
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut w = std::io::BufWriter::new(file);
    let io = |e: std::io::Error| {
        PartanimError::format(format!("{}: write failed: {e}", path.display()))
    };

    writeln!(w, "*Vertices {}", graph.node_count()).map_err(io)?;
    for (id, _) in graph.nodes() {
        writeln!(w, "{id} \"{id}\"").map_err(io)?;
    }
    writeln!(w, "*Edges {}", graph.edge_count()).map_err(io)?;
    for (a, b, weight) in graph.edges() {
        writeln!(w, "{a} {b} {weight}").map_err(io)?;
    }
    w.flush().map_err(io)?;
    Ok(())
}
