//! End-to-end checks of the partition/timeline/cluster/color bookkeeping at
//! the crate surface.

use std::collections::BTreeSet;
use std::path::PathBuf;

use partanim::cluster::{self, ClusterMap, Membership};
use partanim::color::fuse_colors;
use partanim::formats::{read_assignments, read_order};
use partanim::graph::{Assignment, Graph, NodeId};
use partanim::split::{add_cut_edge_placeholders, create_sub_graphs, cut_edge_set};
use partanim::timeline::{FrameWindow, apply_ranks, build_rank_map, partition_windows};

fn scratch(name: &str, contents: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("scenario_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn chain() -> (Graph, Assignment) {
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
fn scenario_a_cut_edge_placeholders() {
    let (g, mut a) = chain();
    let mut subs = create_sub_graphs(&g, &[0, 1], &a);

    let s0: BTreeSet<NodeId> = subs[0].node_ids().collect();
    let s1: BTreeSet<NodeId> = subs[1].node_ids().collect();
    assert_eq!(s0, BTreeSet::from([1, 2]));
    assert_eq!(s1, BTreeSet::from([3, 4]));

    assert_eq!(cut_edge_set(&g, &a, &subs), vec![(2, 3)]);

    let created = add_cut_edge_placeholders(&g, &mut subs, &mut a, 4.0).unwrap();
    assert_eq!(created, 2);

    let p0 = subs[0].attrs(5).unwrap();
    assert!(p0.hidden);
    assert_eq!(p0.connect, Some((2, 3)));
    let p1 = subs[1].attrs(6).unwrap();
    assert!(p1.hidden);
    assert_eq!(p1.connect, Some((3, 2)));
}

#[test]
fn sub_graph_union_equals_included_set() {
    // Nodes 1..=6 spread over 3 partitions with one exclusion.
    let mut g = Graph::new();
    for id in 1..=6 {
        g.add_node(id);
    }
    g.add_edge(1, 4, 1.0);
    g.add_edge(2, 5, 1.0);

    let mut a = Assignment::new();
    for (n, p) in [(1, Some(0)), (2, Some(1)), (3, Some(2)), (4, Some(0)), (5, None), (6, Some(2))]
    {
        a.insert(n, p);
    }

    let subs = create_sub_graphs(&g, &[0, 1, 2], &a);
    let mut union = BTreeSet::new();
    for sub in &subs {
        for id in sub.node_ids() {
            assert!(union.insert(id), "node {id} in two sub-graphs");
        }
    }
    let included: BTreeSet<NodeId> = a.included().map(|(n, _)| n).collect();
    assert_eq!(union, included);
}

#[test]
fn scenario_b_namespacing() {
    let mut maps: Vec<ClusterMap> = vec![
        [
            (1, Membership::from_ids(1, &[1]).unwrap()),
            (2, Membership::from_ids(2, &[1, 2]).unwrap()),
        ]
        .into_iter()
        .collect(),
        [(3, Membership::from_ids(3, &[1]).unwrap())]
            .into_iter()
            .collect(),
    ];
    let offsets = cluster::namespace_clusters(&mut maps);
    assert_eq!(offsets, vec![0, 2]);
    assert_eq!(maps[0][&1].all(), vec![1]);
    assert_eq!(maps[0][&2].all(), vec![1, 2]);
    assert_eq!(maps[1][&3].all(), vec![3]);
}

#[test]
fn scenario_c_frame_windows() {
    let mut g = Graph::new();
    for (id, p) in [(1, 0), (2, 0), (3, 1), (4, 1)] {
        let attrs = g.add_node(id);
        attrs.partition = Some(p);
        attrs.order = Some(id);
    }

    assert_eq!(
        partition_windows(&g, 0, 2),
        vec![
            FrameWindow { start: 0, count: 1 },
            FrameWindow { start: 1, count: 5 },
        ]
    );
    assert_eq!(
        partition_windows(&g, 1, 2),
        vec![
            FrameWindow { start: 2, count: 1 },
            FrameWindow { start: 3, count: 3 },
        ]
    );
}

#[test]
fn short_assignment_file_is_tolerated() {
    // Two assignment lines for a three-node graph: the run continues and the
    // unlisted node simply lands in no sub-graph.
    let path = scratch("short_assign.txt", "0\n1\n");
    let a = read_assignments(&path).unwrap();

    let mut g = Graph::new();
    g.add_edge(1, 2, 1.0);
    g.add_edge(2, 3, 1.0);
    assert!(a.len() < g.node_count());

    let subs = create_sub_graphs(&g, &[0, 1], &a);
    let s0: BTreeSet<NodeId> = subs[0].node_ids().collect();
    let s1: BTreeSet<NodeId> = subs[1].node_ids().collect();
    assert_eq!(s0, BTreeSet::from([1]));
    assert_eq!(s1, BTreeSet::from([2]));
    assert!(subs.iter().all(|s| !s.contains_node(3)));
}

#[test]
fn order_file_with_unknown_node_is_tolerated() {
    // The order file names node 9, which the graph does not contain: known
    // nodes keep their ranks and the stray entry is simply never applied.
    let path = scratch("stray_order.txt", "2\n9\n1\n");
    let order = read_order(&path).unwrap();

    let mut g = Graph::new();
    g.add_edge(1, 2, 1.0);
    let ranks = build_rank_map(&order, &[]);
    apply_ranks(&mut g, &ranks);

    assert_eq!(g.attrs(2).unwrap().order, Some(1));
    assert_eq!(g.attrs(1).unwrap().order, Some(3));
    assert_eq!(g.nodes_by_order(), vec![2, 1]);
}

#[test]
fn fused_color_lists_match_membership_lengths() {
    let memberships: ClusterMap = [
        (1, Membership::from_ids(1, &[1, 2]).unwrap()),
        (2, Membership::from_ids(2, &[2]).unwrap()),
        (3, Membership::from_ids(3, &[3, 1, 2]).unwrap()),
    ]
    .into_iter()
    .collect();
    let colors = [(1, "red"), (2, "green"), (3, "blue")]
        .into_iter()
        .map(|(n, c)| (n, c.to_string()))
        .collect();

    let fused = fuse_colors(&colors, &memberships).unwrap();
    for (node, membership) in &memberships {
        assert_eq!(fused[node].split(',').count(), membership.member_count());
    }
    assert_eq!(fused[&3], "blue,red,green");
}
