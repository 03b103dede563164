//! OSLOM2 community detection (<http://www.oslom.org/>). Consumes a weighted
//! edge list, writes its module hierarchy next to the input file; the `tp`
//! file holds the lowest-level modules.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::tools::run_logged;

pub struct Oslom {
    binary: PathBuf,
    /// `-r`: outer loops for the lowest hierarchical level.
    pub r: u32,
    /// `-hr`: loops for the higher levels.
    pub hr: u32,
}

impl Oslom {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            r: 10,
            hr: 50,
        }
    }

    /// Cluster the given edge list. Returns the path of the produced `tp`
    /// file (OSLOM writes into `<edges>_oslo_files/`).
    pub fn run(&self, edges_file: &Path, seed: u64, infomap_calls: u32) -> PartanimResult<PathBuf> {
        info!(edges = %edges_file.display(), "running OSLOM2 community detection");
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-f")
            .arg(edges_file)
            .arg("-w")
            .args(["-r", &self.r.to_string()])
            .args(["-hr", &self.hr.to_string()])
            .args(["-seed", &seed.to_string()])
            .args(["-infomap", &infomap_calls.to_string()]);
        run_logged(&mut cmd, "oslom2")?;

        let mut dir = edges_file.as_os_str().to_owned();
        dir.push("_oslo_files");
        let tp = PathBuf::from(dir).join("tp");
        if !tp.is_file() {
            return Err(PartanimError::tool(format!(
                "OSLOM2 finished but produced no tp file at '{}'",
                tp.display()
            )));
        }
        Ok(tp)
    }
}
