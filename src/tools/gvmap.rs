//! gvmap invocation: community-aware coloring of a laid-out dot graph. gvmap
//! writes the colored graph to stdout; one `fillcolor` per cluster, attached
//! to that cluster's primary-member node.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::PartanimResult;
use crate::tools::run_logged;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Pastel,
    PrimaryColors,
}

impl ColorScheme {
    fn as_code(self) -> u32 {
        match self {
            ColorScheme::Pastel => 1,
            ColorScheme::PrimaryColors => 5,
        }
    }
}

pub struct Gvmap {
    binary: PathBuf,
}

impl Gvmap {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Color `dot_in` and write the annotated graph to `dot_out`.
    /// `-e` keeps edges, `-w` colors by cluster attribute (available in the
    /// patched graphviz fork this pipeline targets).
    pub fn color(
        &self,
        dot_in: &Path,
        dot_out: &Path,
        scheme: ColorScheme,
        seed: u64,
    ) -> PartanimResult<()> {
        use anyhow::Context as _;

        info!(
            input = %dot_in.display(),
            output = %dot_out.display(),
            "coloring graph with gvmap"
        );
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-e")
            .arg("-w")
            .args(["-c", &scheme.as_code().to_string()])
            .args(["-d", &seed.to_string()])
            .arg(dot_in);
        let output = run_logged(&mut cmd, "gvmap")?;
        std::fs::write(dot_out, &output.stdout)
            .with_context(|| format!("failed to write '{}'", dot_out.display()))?;
        Ok(())
    }
}
