//! Parsers for the clustering tools' outputs: OSLOM2 `tp` module files and
//! Infomap `.tree` files. Both yield 1-based local cluster ids (gvmap
//! requires 1-based cluster values).

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::cluster::{ClusterMap, Membership};
use crate::error::{PartanimError, PartanimResult};
use crate::formats::read_to_string;
use crate::graph::{ClusterId, NodeId};

/// OSLOM2 tp file: `#module <id> ...` headers followed by member node lines.
/// Module ids are shifted to 1-based; a node keeps its modules in file order
/// (first = primary).
pub fn read_oslom_tp(path: &Path) -> PartanimResult<ClusterMap> {
    info!(file = %path.display(), "reading OSLOM2 tp file");
    let text = read_to_string(path)?;
    let mut ids_per_node: BTreeMap<NodeId, Vec<ClusterId>> = BTreeMap::new();
    let mut module_id: Option<ClusterId> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            // e.g. "#module 0 size: 3 bs: 0.05"
            let raw = line
                .split_whitespace()
                .nth(1)
                .and_then(|f| f.parse::<ClusterId>().ok())
                .ok_or_else(|| {
                    PartanimError::format(format!(
                        "{}: line {}: malformed module header '{line}'",
                        path.display(),
                        i + 1
                    ))
                })?;
            module_id = Some(raw + 1);
            continue;
        }
        let current = module_id.ok_or_else(|| {
            PartanimError::format(format!(
                "{}: line {}: member line before any module header",
                path.display(),
                i + 1
            ))
        })?;
        for field in line.split_whitespace() {
            let node: NodeId = field.parse().map_err(|_| {
                PartanimError::format(format!(
                    "{}: line {}: invalid node id '{field}'",
                    path.display(),
                    i + 1
                ))
            })?;
            ids_per_node.entry(node).or_default().push(current);
        }
    }
    Ok(to_cluster_map(ids_per_node))
}

/// Infomap `.tree` file: each line `<path> <flow> "<name>" ...`. The module
/// id at `level` is the path's first `level` components joined; ids are
/// renumbered 1-based in first-seen order and de-duplicated per node.
pub fn read_infomap_tree(path: &Path, level: usize) -> PartanimResult<ClusterMap> {
    info!(file = %path.display(), level, "reading Infomap tree file");
    let text = read_to_string(path)?;
    let mut ids_per_node: BTreeMap<NodeId, Vec<ClusterId>> = BTreeMap::new();
    let mut seen_modules: Vec<String> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let bad_line = || {
            PartanimError::format(format!(
                "{}: line {}: malformed tree line '{line}'",
                path.display(),
                i + 1
            ))
        };
        if fields.len() < 3 {
            return Err(bad_line());
        }

        // "2:4:3" is module "2" at level 1, "24" at level 2, "243" at 3.
        let module_key: String = fields[0].split(':').take(level).collect();
        let module_id = match seen_modules.iter().position(|m| m == &module_key) {
            Some(idx) => idx as ClusterId + 1,
            None => {
                seen_modules.push(module_key);
                seen_modules.len() as ClusterId
            }
        };

        let node: NodeId = fields[2].trim_matches('"').parse().map_err(|_| bad_line())?;
        let ids = ids_per_node.entry(node).or_default();
        if !ids.contains(&module_id) {
            ids.push(module_id);
        }
    }
    Ok(to_cluster_map(ids_per_node))
}

fn to_cluster_map(ids_per_node: BTreeMap<NodeId, Vec<ClusterId>>) -> ClusterMap {
    ids_per_node
        .into_iter()
        .filter_map(|(node, ids)| Membership::from_ids(node, &ids).map(|m| (node, m)))
        .collect()
}

/// Tab-separated weighted edge list, the input OSLOM2 expects.
pub fn write_oslom_edges(graph: &crate::graph::Graph, path: &Path) -> PartanimResult<()> {
    use anyhow::Context as _;
    use std::io::Write as _;

    info!(file = %path.display(), "writing OSLOM2 edge list");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut w = std::io::BufWriter::new(file);
    for (a, b, weight) in graph.edges() {
        writeln!(w, "{a}\t{b}\t{weight}").map_err(|e| {
            PartanimError::format(format!("{}: write failed: {e}", path.display()))
        })?;
    }
    w.flush()
        .map_err(|e| PartanimError::format(format!("{}: write failed: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("clusters_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn oslom_modules_are_one_based_and_ordered() {
        let path = scratch(
            "tp.txt",
            "#module 0 size: 2 bs: 0.1\n1 2\n#module 1 size: 2 bs: 0.1\n2 3\n",
        );
        let map = read_oslom_tp(&path).unwrap();
        assert_eq!(map[&1].all(), vec![1]);
        assert_eq!(map[&2].all(), vec![1, 2]);
        assert_eq!(map[&3].all(), vec![2]);
    }

    #[test]
    fn infomap_level_one_concatenates_nothing() {
        let path = scratch(
            "t.tree",
            "# codelength\n1:1 0.2 \"1\" 1\n1:2 0.2 \"2\" 2\n2:1 0.2 \"3\" 3\n",
        );
        let map = read_infomap_tree(&path, 1).unwrap();
        assert_eq!(map[&1].all(), vec![1]);
        assert_eq!(map[&2].all(), vec![1]);
        assert_eq!(map[&3].all(), vec![2]);
    }

    #[test]
    fn infomap_level_two_distinguishes_submodules() {
        let path = scratch(
            "t2.tree",
            "1:1 0.2 \"1\" 1\n1:2 0.2 \"2\" 2\n",
        );
        let map = read_infomap_tree(&path, 2).unwrap();
        assert_eq!(map[&1].all(), vec![1]);
        assert_eq!(map[&2].all(), vec![2]);
    }

    #[test]
    fn infomap_duplicate_memberships_collapse() {
        let path = scratch(
            "t3.tree",
            "1:1 0.2 \"1\" 1\n1:2 0.2 \"1\" 1\n",
        );
        let map = read_infomap_tree(&path, 1).unwrap();
        assert_eq!(map[&1].all(), vec![1]);
    }

    #[test]
    fn oslom_member_line_without_header_is_rejected() {
        let path = scratch("bad_tp.txt", "1 2 3\n");
        assert!(read_oslom_tp(&path).is_err());
    }
}
