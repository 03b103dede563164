//! Run configuration. Everything is validated once, up front; a bad
//! combination of settings is fatal before any graph processing starts.

use std::path::{Path, PathBuf};

use crate::error::{PartanimError, PartanimResult};
use crate::formats::InputFormat;
use crate::formats::dgs::LabelKind;
use crate::tools::graphstream::LayoutOpts;
use crate::tools::gvmap::ColorScheme;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clustering {
    Oslom2,
    Infomap,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    /// Input network file.
    pub network: PathBuf,
    pub format: InputFormat,
    /// Partition assignment file: one partition id (or -1) per node.
    pub assignments: PathBuf,
    /// Global node arrival order file; defaults to ascending node id.
    pub order: Option<PathBuf>,
    pub output: PathBuf,
    pub num_partitions: u32,

    pub clustering: Clustering,
    pub cluster_seed: u64,
    /// Infomap calls OSLOM2 may make internally (`-infomap N`).
    pub infomap_calls: u32,

    pub layout: LayoutOpts,
    pub label: LabelKind,
    pub color_scheme: ColorScheme,
    pub color_seed: u64,

    pub node_size: f64,
    /// Synthesize hidden placeholder nodes for partition-crossing edges.
    pub cut_edges: bool,
    pub cut_edge_node_size: f64,

    pub fps: u32,
    /// Idle tail per partition, in seconds, so late nodes settle visually.
    pub settle_time_s: f64,
    /// Tile size of one partition frame.
    pub frame_width: u32,
    pub frame_height: u32,
    pub border_size: u32,
    /// Horizontal gap inserted between laid-out sub-graphs before coloring.
    pub graph_spacing: f64,

    /// Encode the joined frames into this MP4 when set.
    pub video: Option<PathBuf>,

    /// External tool locations.
    pub graphstream_jar: PathBuf,
    pub gvmap_bin: PathBuf,
    pub oslom2_bin: PathBuf,
    pub infomap_bin: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            network: PathBuf::new(),
            format: InputFormat::Metis,
            assignments: PathBuf::new(),
            order: None,
            output: PathBuf::from("output"),
            num_partitions: 4,
            clustering: Clustering::Oslom2,
            cluster_seed: 1,
            infomap_calls: 0,
            layout: LayoutOpts::default(),
            label: LabelKind::Id,
            color_scheme: ColorScheme::Pastel,
            color_seed: 1,
            node_size: 10.0,
            cut_edges: false,
            cut_edge_node_size: 4.0,
            fps: 30,
            settle_time_s: 1.0,
            frame_width: 1280,
            frame_height: 720,
            border_size: 6,
            graph_spacing: 10.0,
            video: None,
            graphstream_jar: PathBuf::from("dgs-graphstream/dist/dgs-graphstream.jar"),
            gvmap_bin: PathBuf::from("gvmap"),
            oslom2_bin: PathBuf::from("oslom_undir"),
            infomap_bin: PathBuf::from("Infomap"),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> PartanimResult<()> {
        if self.network.as_os_str().is_empty() {
            return Err(PartanimError::validation("network file must be set"));
        }
        if self.assignments.as_os_str().is_empty() {
            return Err(PartanimError::validation("assignments file must be set"));
        }
        if self.num_partitions == 0 {
            return Err(PartanimError::validation("num_partitions must be >= 1"));
        }
        if self.fps == 0 {
            return Err(PartanimError::validation("fps must be > 0"));
        }
        if !self.settle_time_s.is_finite() || self.settle_time_s < 0.0 {
            return Err(PartanimError::validation(
                "settle_time_s must be a non-negative number",
            ));
        }
        if self.node_size <= 0.0 {
            return Err(PartanimError::validation("node_size must be > 0"));
        }
        if self.cut_edges && self.cut_edge_node_size <= 0.0 {
            return Err(PartanimError::validation(
                "cut_edge_node_size must be > 0 when cut-edge placeholders are enabled",
            ));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(PartanimError::validation("frame size must be non-zero"));
        }
        if self.graph_spacing < 0.0 {
            return Err(PartanimError::validation("graph_spacing must be >= 0"));
        }
        if self.clustering == Clustering::Infomap && self.infomap_calls > 0 {
            return Err(PartanimError::validation(
                "infomap_calls applies to OSLOM2 only; it cannot be combined with Infomap clustering",
            ));
        }
        Ok(())
    }

    /// Frames padded after each partition's last arrival.
    pub fn trailing_frame_count(&self) -> u64 {
        crate::timeline::trailing_frame_count(self.settle_time_s, self.fps)
    }

    /// Fixed, deterministic partition processing order.
    pub fn partitions(&self) -> Vec<u32> {
        (0..self.num_partitions).collect()
    }

    /// Persist the resolved configuration next to the run's artifacts.
    pub fn write_resolved(&self, output_dir: &Path) -> PartanimResult<()> {
        use anyhow::Context as _;
        let path = output_dir.join("run_config.json");
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PartanimError::format(format!("failed to serialize config: {e}")))?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig {
            network: PathBuf::from("net.metis"),
            assignments: PathBuf::from("assign.txt"),
            ..RunConfig::default()
        }
    }

    #[test]
    fn default_shape_validates() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_zero_partitions_and_zero_fps() {
        let mut cfg = valid();
        cfg.num_partitions = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_infomap_with_oslom_only_option() {
        let mut cfg = valid();
        cfg.clustering = Clustering::Infomap;
        cfg.infomap_calls = 3;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_settle_time() {
        let mut cfg = valid();
        cfg.settle_time_s = -0.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn trailing_frames_round_up() {
        let mut cfg = valid();
        cfg.fps = 30;
        cfg.settle_time_s = 0.55;
        assert_eq!(cfg.trailing_frame_count(), 17);
    }

    #[test]
    fn json_roundtrip() {
        let cfg = valid();
        let s = serde_json::to_string_pretty(&cfg).unwrap();
        let de: RunConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(de.num_partitions, cfg.num_partitions);
        assert_eq!(de.format, InputFormat::Metis);
    }
}
