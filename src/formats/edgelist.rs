//! Whitespace-separated edge list reader: `u v [weight]`, `#` comments.

use std::path::Path;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::formats::read_to_string;
use crate::graph::{Graph, NodeId};

pub fn read_edgelist(path: &Path) -> PartanimResult<Graph> {
    info!(file = %path.display(), "reading edgelist file");
    let text = read_to_string(path)?;
    let mut graph = Graph::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(PartanimError::format(format!(
                "{}: line {}: expected 'u v [weight]'",
                path.display(),
                i + 1
            )));
        }
        let a = parse_node(fields[0], path, i)?;
        let b = parse_node(fields[1], path, i)?;
        let weight = match fields.get(2) {
            Some(w) => w.parse().map_err(|_| {
                PartanimError::format(format!(
                    "{}: line {}: invalid edge weight '{w}'",
                    path.display(),
                    i + 1
                ))
            })?,
            None => 1.0,
        };
        graph.add_edge(a, b, weight);
    }
    Ok(graph)
}

fn parse_node(s: &str, path: &Path, line: usize) -> PartanimResult<NodeId> {
    s.parse().map_err(|_| {
        PartanimError::format(format!(
            "{}: line {}: invalid node id '{s}'",
            path.display(),
            line + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("edgelist_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_weighted_and_unweighted_lines() {
        let path = scratch("a.txt", "# header\n1 2\n2 3 2.5\n");
        let g = read_edgelist(&path).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edges(), vec![(1, 2, 1.0), (2, 3, 2.5)]);
    }

    #[test]
    fn rejects_short_lines() {
        let path = scratch("b.txt", "1\n");
        assert!(read_edgelist(&path).is_err());
    }
}
