//! Infomap community detection. Consumes a pajek network, writes a `.tree`
//! file into the output directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::tools::run_logged;

pub struct Infomap {
    binary: PathBuf,
    pub num_trials: u32,
}

impl Infomap {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            num_trials: 1,
        }
    }

    /// Cluster `pajek_file`, writing results into `output_dir`. Returns the
    /// path of the produced `.tree` file (named after the input's stem).
    pub fn run(&self, pajek_file: &Path, output_dir: &Path, seed: u64) -> PartanimResult<PathBuf> {
        info!(network = %pajek_file.display(), "running Infomap community detection");
        let mut cmd = Command::new(&self.binary);
        cmd.arg(pajek_file)
            .arg(output_dir)
            .args(["--seed", &seed.to_string()])
            .args(["--num-trials", &self.num_trials.to_string()])
            .arg("--overlapping");
        run_logged(&mut cmd, "infomap")?;

        let stem = pajek_file
            .file_stem()
            .ok_or_else(|| PartanimError::tool("pajek file has no name stem"))?;
        let tree = output_dir.join(Path::new(stem).with_extension("tree"));
        if !tree.is_file() {
            return Err(PartanimError::tool(format!(
                "Infomap finished but produced no tree file at '{}'",
                tree.display()
            )));
        }
        Ok(tree)
    }
}
