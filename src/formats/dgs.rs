//! DGS event-stream writer: the input of the GraphStream layout/animation
//! tool. One `an` event per node in global arrival order carrying color,
//! label, size, frame window and hidden flag; `ae` events once both edge
//! endpoints are visible; one `st` step per arrival.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::graph::Graph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Id,
    Order,
    None,
}

/// Write `partition_<p>.dgs` into `output_dir`. Nodes must already carry
/// `order` ranks and frame windows.
pub fn write_dgs(output_dir: &Path, sub: &Graph, label: LabelKind) -> PartanimResult<PathBuf> {
    let partition = sub.partition.ok_or_else(|| {
        PartanimError::validation("cannot write DGS for a graph without a partition tag")
    })?;
    let path = output_dir.join(format!("partition_{partition}.dgs"));
    info!(file = %path.display(), partition, "writing DGS file");

    let mut out = String::new();
    render_dgs(&mut out, sub, partition, label)?;

    use anyhow::Context as _;
    std::fs::write(&path, out)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(path)
}

fn render_dgs(
    out: &mut String,
    sub: &Graph,
    partition: u32,
    label: LabelKind,
) -> PartanimResult<()> {
    use std::fmt::Write as _;

    out.push_str("DGS004\n");
    let _ = writeln!(out, "partition_{partition} 0 0");

    let mut edge_index = 0usize;
    let mut added: BTreeSet<u32> = BTreeSet::new();
    let mut edges_added: BTreeSet<(u32, u32)> = BTreeSet::new();

    for (step, node) in sub.nodes_by_order().into_iter().enumerate() {
        let attrs = sub
            .attrs(node)
            .ok_or_else(|| PartanimError::contract(format!("node {node} has no attributes")))?;
        let window = attrs.frame.ok_or_else(|| {
            PartanimError::contract(format!("node {node} has no frame window; run the timeline builder first"))
        })?;

        let hidden = u8::from(attrs.hidden);
        let color = attrs.fillcolor.as_deref().unwrap_or("black");
        let label_text = if attrs.hidden {
            // Placeholders stay unlabeled.
            String::new()
        } else {
            match label {
                LabelKind::Id => node.to_string(),
                LabelKind::Order => attrs
                    .order
                    .map(|o| o.to_string())
                    .unwrap_or_default(),
                LabelKind::None => String::new(),
            }
        };

        let _ = writeln!(
            out,
            "an {node} c='{color}' l='{label_text}' s='{size}' fs='{fs}' fc='{fc}' hidden='{hidden}'",
            size = attrs.size,
            fs = window.start,
            fc = window.count,
        );
        added.insert(node);

        for neighbor in sub.neighbors(node) {
            let key = (neighbor.min(node), neighbor.max(node));
            if added.contains(&neighbor) && !edges_added.contains(&key) {
                let _ = writeln!(out, "ae {edge_index} {neighbor} {node}");
                edges_added.insert(key);
                edge_index += 1;
            }
        }

        let _ = writeln!(out, "st {}", step + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::FrameWindow;

    fn sub_graph() -> Graph {
        let mut g = Graph::new();
        g.partition = Some(0);
        g.add_edge(1, 2, 1.0);
        {
            let a = g.attrs_mut(1).unwrap();
            a.order = Some(1);
            a.frame = Some(FrameWindow { start: 0, count: 1 });
            a.fillcolor = Some("#ff0000".to_string());
            a.size = 8.0;
        }
        {
            let a = g.attrs_mut(2).unwrap();
            a.order = Some(2);
            a.frame = Some(FrameWindow { start: 1, count: 5 });
            a.size = 8.0;
        }
        g
    }

    #[test]
    fn golden_two_node_stream() {
        let mut out = String::new();
        render_dgs(&mut out, &sub_graph(), 0, LabelKind::Id).unwrap();
        let expected = "\
DGS004
partition_0 0 0
an 1 c='#ff0000' l='1' s='8' fs='0' fc='1' hidden='0'
st 1
an 2 c='black' l='2' s='8' fs='1' fc='5' hidden='0'
ae 0 1 2
st 2
";
        assert_eq!(out, expected);
    }

    #[test]
    fn hidden_nodes_lose_their_label() {
        let mut g = sub_graph();
        g.attrs_mut(2).unwrap().hidden = true;
        let mut out = String::new();
        render_dgs(&mut out, &g, 0, LabelKind::Id).unwrap();
        assert!(out.contains("an 2 c='black' l='' s='8' fs='1' fc='5' hidden='1'"));
    }

    #[test]
    fn edges_wait_for_both_endpoints() {
        let mut g = sub_graph();
        g.add_edge(1, 3, 1.0);
        {
            let a = g.attrs_mut(3).unwrap();
            a.order = Some(3);
            a.frame = Some(FrameWindow { start: 2, count: 2 });
        }
        let mut out = String::new();
        render_dgs(&mut out, &g, 0, LabelKind::None).unwrap();
        // Edge (1,3) appears only after node 3's `an` event.
        let an3 = out.find("an 3").unwrap();
        let ae13 = out.find("ae 1 1 3").unwrap();
        assert!(ae13 > an3);
    }

    #[test]
    fn missing_window_is_a_contract_error() {
        let mut g = sub_graph();
        g.attrs_mut(2).unwrap().frame = None;
        let mut out = String::new();
        assert!(render_dgs(&mut out, &g, 0, LabelKind::Id).is_err());
    }
}
