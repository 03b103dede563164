//! Readers and writers for the text formats exchanged with the external
//! collaborators: METIS/edgelist/dot/pajek network files, OSLOM2/Infomap
//! clustering outputs, and the DGS event stream consumed by the layout tool.

pub mod clusters;
pub mod dgs;
pub mod dot;
pub mod edgelist;
pub mod metis;
pub mod pajek;

use std::path::Path;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::graph::{Assignment, Graph, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Metis,
    Edgelist,
    Dot,
    Pajek,
}

/// Read a network in any supported input format, with node ids normalized to
/// integers at this boundary.
pub fn read_graph(path: &Path, format: InputFormat) -> PartanimResult<Graph> {
    match format {
        InputFormat::Metis => metis::read_metis(path),
        InputFormat::Edgelist => edgelist::read_edgelist(path),
        InputFormat::Dot => dot::read_dot(path),
        InputFormat::Pajek => pajek::read_pajek(path),
    }
}

/// Assignment file: line `i` (0-based) holds the partition of node `i + 1`,
/// or `-1` for an excluded node.
pub fn read_assignments(path: &Path) -> PartanimResult<Assignment> {
    info!(file = %path.display(), "reading assignments file");
    let text = read_to_string(path)?;
    let mut assignment = Assignment::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: i64 = line.parse().map_err(|_| {
            PartanimError::format(format!(
                "{}: line {}: invalid partition id '{line}'",
                path.display(),
                i + 1
            ))
        })?;
        let partition = if value < 0 { None } else { Some(value as u32) };
        assignment.insert(i as NodeId + 1, partition);
    }
    Ok(assignment)
}

/// Order file: one node id per line, arrival order. Rank = line number.
pub fn read_order(path: &Path) -> PartanimResult<Vec<NodeId>> {
    info!(file = %path.display(), "reading order file");
    let text = read_to_string(path)?;
    let mut order = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id: NodeId = line.parse().map_err(|_| {
            PartanimError::format(format!(
                "{}: line {}: invalid node id '{line}'",
                path.display(),
                i + 1
            ))
        })?;
        order.push(id);
    }
    Ok(order)
}

pub(crate) fn read_to_string(path: &Path) -> PartanimResult<String> {
    use anyhow::Context as _;
    Ok(std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("formats_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn assignments_map_lines_to_one_based_nodes() {
        let path = scratch("assign.txt", "0\n0\n-1\n1\n");
        let a = read_assignments(&path).unwrap();
        assert_eq!(a.partition_of(1), Some(0));
        assert_eq!(a.partition_of(2), Some(0));
        assert_eq!(a.partition_of(3), None);
        assert_eq!(a.partition_of(4), Some(1));
    }

    #[test]
    fn order_file_is_a_plain_id_list() {
        let path = scratch("order.txt", "3\n1\n2\n");
        assert_eq!(read_order(&path).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn bad_assignment_line_is_a_format_error() {
        let path = scratch("assign_bad.txt", "0\nxyz\n");
        assert!(read_assignments(&path).is_err());
    }
}
