//! ffmpeg invocation: encode the joined frame sequence into an H.264 MP4.
//! Uses the system `ffmpeg` binary; frames are read from disk as a printf
//! pattern (`frame_%06d.png`).

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{PartanimError, PartanimResult};
use crate::tools::run_logged;

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> PartanimResult<()> {
        if self.fps == 0 {
            return Err(PartanimError::validation("encode fps must be non-zero"));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    crate::tools::is_on_path("ffmpeg", "-version")
}

pub fn ensure_parent_dir(path: &Path) -> PartanimResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `frames_dir/frame_%06d.png` into `cfg.out_path`. Montage output
/// dimensions depend on the tile grid, so odd sizes are padded up to the even
/// dimensions yuv420p requires.
pub fn encode_frames(frames_dir: &Path, cfg: &EncodeConfig) -> PartanimResult<()> {
    cfg.validate()?;
    ensure_parent_dir(&cfg.out_path)?;

    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(PartanimError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    if !is_ffmpeg_on_path() {
        return Err(PartanimError::tool(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    info!(frames = %frames_dir.display(), out = %cfg.out_path.display(), "encoding video with ffmpeg");
    let pattern = frames_dir.join("frame_%06d.png");
    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if cfg.overwrite { "-y" } else { "-n" })
        .args(["-loglevel", "error"])
        .args(["-framerate", &cfg.fps.to_string()])
        .arg("-i")
        .arg(&pattern)
        .args(["-c:v", "libx264"])
        .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"])
        .args(["-pix_fmt", "yuv420p"])
        .args(["-movflags", "+faststart"])
        .arg(&cfg.out_path);
    run_logged(&mut cmd, "ffmpeg")?;
    Ok(())
}
