//! Drive the in-process stages from raw inputs to the on-disk DGS event
//! streams and check the generated text directly.

use std::path::PathBuf;

use partanim::formats::dgs::{LabelKind, write_dgs};
use partanim::graph::{Assignment, Graph, NodeId};
use partanim::split::{add_cut_edge_placeholders, create_sub_graphs};
use partanim::timeline::{apply_ranks, apply_windows, build_rank_map, partition_windows};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("dgs_tests").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Chain 1-2-3-4 split across two partitions with cut-edge placeholders,
/// ranked by the identity order, then written out per partition.
fn prepared_sub_graphs() -> Vec<Graph> {
    let mut g = Graph::new();
    g.add_edge(1, 2, 1.0);
    g.add_edge(2, 3, 1.0);
    g.add_edge(3, 4, 1.0);
    let mut a = Assignment::new();
    for (n, p) in [(1, 0), (2, 0), (3, 1), (4, 1)] {
        a.insert(n, Some(p));
    }

    let mut subs = create_sub_graphs(&g, &[0, 1], &a);
    add_cut_edge_placeholders(&g, &mut subs, &mut a, 4.0).unwrap();

    let order: Vec<NodeId> = vec![1, 2, 3, 4];
    let placeholders = vec![5, 6];
    let ranks = build_rank_map(&order, &placeholders);

    let mut union = Graph::new();
    for sub in &subs {
        for id in sub.node_ids() {
            let attrs = union.add_node(id);
            attrs.partition = sub.attrs(id).unwrap().partition;
        }
    }
    apply_ranks(&mut union, &ranks);

    for (p, sub) in subs.iter_mut().enumerate() {
        apply_ranks(sub, &ranks);
        let windows = partition_windows(&union, p as u32, 2);
        apply_windows(sub, &windows).unwrap();
    }
    subs
}

#[test]
fn one_stream_per_partition_with_shared_header() {
    let dir = scratch_dir("per_partition");
    let subs = prepared_sub_graphs();
    for (p, sub) in subs.iter().enumerate() {
        let path = write_dgs(&dir, sub, LabelKind::Id).unwrap();
        assert_eq!(path, dir.join(format!("partition_{p}.dgs")));
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("DGS004"));
        assert_eq!(lines.next(), Some(format!("partition_{p} 0 0").as_str()));
    }
}

#[test]
fn placeholders_arrive_last_and_unlabeled() {
    let dir = scratch_dir("placeholders");
    let subs = prepared_sub_graphs();

    let path = write_dgs(&dir, &subs[0], LabelKind::Id).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    let an_nodes: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("an "))
        .map(|l| l.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(an_nodes, vec!["1", "2", "5"]);
    assert!(text.contains("an 5 c='black' l='' s='4' "));
    assert!(text.contains("hidden='1'"));
}

#[test]
fn every_visible_arrival_gets_its_own_step() {
    let dir = scratch_dir("steps");
    let subs = prepared_sub_graphs();

    let path = write_dgs(&dir, &subs[1], LabelKind::Order).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    let steps: Vec<&str> = text.lines().filter(|l| l.starts_with("st ")).collect();
    assert_eq!(steps, vec!["st 1", "st 2", "st 3"]);
}

#[test]
fn frame_windows_land_in_the_stream() {
    let dir = scratch_dir("windows");
    let subs = prepared_sub_graphs();

    let path = write_dgs(&dir, &subs[1], LabelKind::None).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    // Global arrival order is 1,2,3,4,5,6 with two trailing frames, so the
    // partition 1 arrivals sit at steps 2, 3 and 5.
    assert!(line_for(&text, 3).contains("fs='2' fc='1'"));
    assert!(line_for(&text, 4).contains("fs='3' fc='2'"));
    assert!(line_for(&text, 6).contains("fs='5' fc='3'"));
}

fn line_for(text: &str, node: u32) -> &str {
    text.lines()
        .find(|l| l.starts_with(&format!("an {node} ")))
        .unwrap()
}
