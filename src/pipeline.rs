//! Staged orchestration of a full run: read → split → cluster → namespace →
//! layout → color → fuse → DGS → frames → tiles → video.
//!
//! Per-partition stages run in a fixed ascending partition order; the cluster
//! namespacer and the color fusion are barriers that need every partition's
//! result before they run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cluster::{self, ClusterMap};
use crate::color::fuse_colors;
use crate::config::{Clustering, RunConfig};
use crate::error::{PartanimError, PartanimResult};
use crate::formats::{self, dgs, dot};
use crate::graph::{Assignment, Graph, NodeId};
use crate::merge::{offset_positions, union_all};
use crate::split::{add_cut_edge_placeholders, create_sub_graphs};
use crate::tiles::{self, TileSettings};
use crate::timeline::{apply_ranks, apply_windows, build_rank_map, partition_windows};
use crate::tools::ffmpeg::{self, EncodeConfig};
use crate::tools::graphstream::{GraphStream, RenderMode};
use crate::tools::gvmap::Gvmap;
use crate::tools::infomap::Infomap;
use crate::tools::oslom::Oslom;

#[derive(Debug)]
pub struct RunSummary {
    pub nodes: usize,
    pub edges: usize,
    pub partitions: usize,
    pub cut_placeholders: usize,
    pub joined_frames: usize,
    pub video: Option<PathBuf>,
}

#[tracing::instrument(skip_all)]
pub fn run(cfg: &RunConfig) -> PartanimResult<RunSummary> {
    cfg.validate()?;
    create_or_clean_output_dir(&cfg.output)?;
    cfg.write_resolved(&cfg.output)?;

    let graph = formats::read_graph(&cfg.network, cfg.format)?;
    let mut assignment = formats::read_assignments(&cfg.assignments)?;
    check_input_lengths(&graph, &assignment);

    let partitions = cfg.partitions();
    let mut subs = create_sub_graphs(&graph, &partitions, &assignment);

    let cut_placeholders = if cfg.cut_edges {
        add_cut_edge_placeholders(&graph, &mut subs, &mut assignment, cfg.cut_edge_node_size)?
    } else {
        0
    };

    for sub in &mut subs {
        let ids: Vec<NodeId> = sub.node_ids().collect();
        for id in ids {
            if let Some(attrs) = sub.attrs_mut(id) {
                if !attrs.hidden {
                    attrs.size = cfg.node_size;
                }
            }
        }
    }

    assign_order(cfg, &graph, &assignment, &mut subs)?;
    build_timelines(cfg, &mut subs)?;

    // Barrier: clustering needs every partition before namespacing.
    let mut maps: Vec<ClusterMap> = Vec::with_capacity(subs.len());
    for sub in &subs {
        maps.push(cluster_partition(cfg, sub)?);
    }
    cluster::namespace_clusters(&mut maps);
    for (sub, map) in subs.iter_mut().zip(&maps) {
        cluster::attach_clusters(sub, map);
    }

    compute_layouts(cfg, &mut subs)?;

    // Barrier: coloring runs once over the merged, offset graph.
    let color_per_node = color_merged_graph(cfg, &mut subs)?;
    let memberships = cluster::merge_cluster_maps(&maps);
    let fused = fuse_colors(&color_per_node, &memberships)?;
    for sub in &mut subs {
        let ids: Vec<NodeId> = sub.node_ids().collect();
        for id in ids {
            if let Some(color) = fused.get(&id) {
                if let Some(attrs) = sub.attrs_mut(id) {
                    attrs.fillcolor = Some(color.clone());
                }
            }
        }
    }

    render_frames(cfg, &subs)?;

    let joined = tiles::combine_frames(
        &cfg.output,
        subs.len(),
        &TileSettings {
            width: cfg.frame_width,
            height: cfg.frame_height,
            border: cfg.border_size,
            fps: cfg.fps,
        },
    )?;

    let video = match &cfg.video {
        Some(out) => {
            ffmpeg::encode_frames(
                &cfg.output.join("frames_joined"),
                &EncodeConfig {
                    fps: cfg.fps,
                    out_path: out.clone(),
                    overwrite: true,
                },
            )?;
            Some(out.clone())
        }
        None => None,
    };

    Ok(RunSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        partitions: subs.len(),
        cut_placeholders,
        joined_frames: joined.len(),
        video,
    })
}

/// Length mismatches between the inputs are warned about and tolerated; the
/// run continues with the data as provided.
fn check_input_lengths(graph: &Graph, assignment: &Assignment) {
    if assignment.len() != graph.node_count() {
        warn!(
            assignment_lines = assignment.len(),
            graph_nodes = graph.node_count(),
            "assignment file length does not match node count; continuing with provided data"
        );
    }
}

/// Stamp the global arrival order onto every sub-graph node. Placeholders are
/// absent from the order file and get appended ranks, so they arrive last.
fn assign_order(
    cfg: &RunConfig,
    graph: &Graph,
    assignment: &Assignment,
    subs: &mut [Graph],
) -> PartanimResult<()> {
    let order: Vec<NodeId> = match &cfg.order {
        Some(path) => {
            let order = formats::read_order(path)?;
            let included = assignment
                .included()
                .filter(|(n, _)| graph.contains_node(*n))
                .count();
            if order.len() != included {
                warn!(
                    order_lines = order.len(),
                    included_nodes = included,
                    "order file length does not match included node count; continuing with provided data"
                );
            }
            order
        }
        None => graph
            .node_ids()
            .filter(|n| assignment.is_included(*n))
            .collect(),
    };

    let placeholders: Vec<NodeId> = subs
        .iter()
        .flat_map(|s| s.nodes().filter(|(_, a)| a.hidden).map(|(id, _)| id))
        .collect();
    let ranks = build_rank_map(&order, &placeholders);
    for sub in subs.iter_mut() {
        apply_ranks(sub, &ranks);
    }
    Ok(())
}

#[tracing::instrument(skip_all)]
fn build_timelines(cfg: &RunConfig, subs: &mut [Graph]) -> PartanimResult<()> {
    let union = union_all(subs)?;
    let trailing = cfg.trailing_frame_count();
    for sub in subs.iter_mut() {
        let partition = sub.partition.ok_or_else(|| {
            PartanimError::contract("sub-graph lost its partition tag")
        })?;
        let windows = partition_windows(&union, partition, trailing);
        apply_windows(sub, &windows)?;
    }
    Ok(())
}

/// Community detection for one partition. A zero-edge sub-graph never
/// reaches the external tool: every node becomes its own singleton cluster.
#[tracing::instrument(skip_all, fields(partition = ?sub.partition))]
fn cluster_partition(cfg: &RunConfig, sub: &Graph) -> PartanimResult<ClusterMap> {
    let partition = sub
        .partition
        .ok_or_else(|| PartanimError::contract("sub-graph lost its partition tag"))?;

    let mut map = if sub.edge_count() == 0 {
        info!(partition, "sub-graph has no edges; assigning singleton clusters");
        cluster::singleton_clusters(sub)
    } else {
        match cfg.clustering {
            Clustering::Oslom2 => {
                let edges_file = cfg
                    .output
                    .join("oslom")
                    .join(format!("partition_{partition}_edges.txt"));
                formats::clusters::write_oslom_edges(sub, &edges_file)?;
                let tp = Oslom::new(&cfg.oslom2_bin).run(
                    &edges_file,
                    cfg.cluster_seed,
                    cfg.infomap_calls,
                )?;
                formats::clusters::read_oslom_tp(&tp)?
            }
            Clustering::Infomap => {
                let pajek_file = cfg.output.join(format!("partition_{partition}.net"));
                formats::pajek::write_pajek(sub, &pajek_file)?;
                let tree =
                    Infomap::new(&cfg.infomap_bin).run(&pajek_file, &cfg.output, cfg.cluster_seed)?;
                formats::clusters::read_infomap_tree(&tree, 1)?
            }
        }
    };

    cluster::prune_to_graph(&mut map, sub);
    cluster::create_homeless_clusters(sub, &mut map);
    Ok(map)
}

/// Run the layout tool over each partition's DGS stream (dot mode) and read
/// the computed positions back onto the sub-graph nodes.
#[tracing::instrument(skip_all)]
fn compute_layouts(cfg: &RunConfig, subs: &mut [Graph]) -> PartanimResult<()> {
    let gs = GraphStream::new(&cfg.graphstream_jar);
    let frames_dir = cfg.output.join("frames_partition");
    std::fs::create_dir_all(&frames_dir).map_err(|e| {
        PartanimError::tool(format!("failed to create '{}': {e}", frames_dir.display()))
    })?;

    for sub in subs.iter_mut() {
        let partition = sub
            .partition
            .ok_or_else(|| PartanimError::contract("sub-graph lost its partition tag"))?;
        let dgs_path = dgs::write_dgs(&cfg.output, sub, cfg.label)?;
        let dot_path = cfg.output.join(format!("partition_{partition}.dot"));
        let prefix = frames_dir.join(format!("p{partition}_"));
        gs.render(&dgs_path, &prefix, &dot_path, &cfg.layout, RenderMode::Dot)?;

        let positions = dot::read_positions(&dot_path)?;
        for (id, pos) in positions {
            if let Some(attrs) = sub.attrs_mut(id) {
                attrs.pos = Some(pos);
            }
        }
    }
    Ok(())
}

/// Offset the laid-out sub-graphs so they sit side by side, merge them, and
/// hand the merged dot file to gvmap. Returns gvmap's per-node colors.
#[tracing::instrument(skip_all)]
fn color_merged_graph(
    cfg: &RunConfig,
    subs: &mut [Graph],
) -> PartanimResult<BTreeMap<NodeId, String>> {
    offset_positions(subs, cfg.graph_spacing);
    let merged = union_all(subs)?;

    let merged_dot = cfg.output.join("merged.dot");
    dot::write_dot(&merged, &merged_dot)?;

    let colored_dot = cfg.output.join("gvmap.dot");
    Gvmap::new(&cfg.gvmap_bin).color(&merged_dot, &colored_dot, cfg.color_scheme, cfg.color_seed)?;
    dot::read_node_attribute(&colored_dot, "fillcolor")
}

/// Re-write the DGS streams (now carrying fused colors) and render the
/// animation frames for every partition.
#[tracing::instrument(skip_all)]
fn render_frames(cfg: &RunConfig, subs: &[Graph]) -> PartanimResult<()> {
    let gs = GraphStream::new(&cfg.graphstream_jar);
    let frames_dir = cfg.output.join("frames_partition");
    for sub in subs {
        let partition = sub
            .partition
            .ok_or_else(|| PartanimError::contract("sub-graph lost its partition tag"))?;
        let dgs_path = dgs::write_dgs(&cfg.output, sub, cfg.label)?;
        let dot_path = cfg.output.join(format!("partition_{partition}.dot"));
        let prefix = frames_dir.join(format!("p{partition}_"));
        gs.render(&dgs_path, &prefix, &dot_path, &cfg.layout, RenderMode::Images)?;
    }
    Ok(())
}

/// Delete and recreate the output directory, so every run starts clean.
pub fn create_or_clean_output_dir(dir: &Path) -> PartanimResult<()> {
    use anyhow::Context as _;
    info!(dir = %dir.display(), "cleaning output directory");
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove '{}'", dir.display()))?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create '{}'", dir.display()))?;
    Ok(())
}
