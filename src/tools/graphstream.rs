//! Invocation of the GraphStream animation jar: consumes a DGS event stream,
//! produces per-step images and a position-annotated dot file.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::PartanimResult;
use crate::tools::run_logged;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    SpringBox,
    LinLog,
}

impl LayoutKind {
    fn as_arg(self) -> &'static str {
        match self {
            LayoutKind::SpringBox => "springbox",
            LayoutKind::LinLog => "linlog",
        }
    }
}

/// `-mode dot` computes the layout and writes the dot file only; `-mode
/// images` renders one image per animation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Dot,
    Images,
}

impl RenderMode {
    fn as_arg(self) -> &'static str {
        match self {
            RenderMode::Dot => "dot",
            RenderMode::Images => "images",
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayoutOpts {
    pub layout: LayoutKind,
    pub seed: u64,
    /// Force for the linlog layout.
    pub force: f64,
    /// Attraction factor for the linlog layout.
    pub attraction: f64,
    /// Repulsion factor for the linlog layout.
    pub repulsion: f64,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            layout: LayoutKind::SpringBox,
            seed: 1,
            force: 3.0,
            attraction: 0.0,
            repulsion: -1.2,
        }
    }
}

pub struct GraphStream {
    jar: PathBuf,
}

impl GraphStream {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self { jar: jar.into() }
    }

    /// Animate one partition's DGS stream. `out_prefix` is the image file
    /// prefix (`p<partition>_`); `dot_out` receives the laid-out graph.
    pub fn render(
        &self,
        dgs: &Path,
        out_prefix: &Path,
        dot_out: &Path,
        opts: &LayoutOpts,
        mode: RenderMode,
    ) -> PartanimResult<()> {
        info!(
            dgs = %dgs.display(),
            mode = mode.as_arg(),
            "running GraphStream animation"
        );
        let mut cmd = Command::new("java");
        cmd.arg("-jar")
            .arg(&self.jar)
            .arg("-dgs")
            .arg(dgs)
            .arg("-out")
            .arg(out_prefix)
            .args(["-layout", opts.layout.as_arg()])
            .args(["-seed", &opts.seed.to_string()])
            .args(["-force", &opts.force.to_string()])
            .args(["-a", &opts.attraction.to_string()])
            .args(["-r", &opts.repulsion.to_string()])
            .args(["-mode", mode.as_arg()])
            .arg("-dotfile")
            .arg(dot_out);
        run_logged(&mut cmd, "graphstream")?;
        Ok(())
    }
}
