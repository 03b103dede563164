#![forbid(unsafe_code)]

pub mod cluster;
pub mod color;
pub mod config;
pub mod error;
pub mod formats;
pub mod graph;
pub mod merge;
pub mod pipeline;
pub mod split;
pub mod tiles;
pub mod timeline;
pub mod tools;

pub use cluster::{ClusterMap, Membership};
pub use config::{Clustering, RunConfig};
pub use error::{PartanimError, PartanimResult};
pub use formats::InputFormat;
pub use formats::dgs::LabelKind;
pub use graph::{Assignment, ClusterId, Graph, NodeId, PartitionId};
pub use timeline::FrameWindow;
pub use tools::graphstream::{LayoutKind, LayoutOpts};
pub use tools::gvmap::ColorScheme;
