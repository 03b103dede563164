//! Frame tiling: combine the per-partition image sequences produced by the
//! layout tool into one grid image per animation frame, padding the front of
//! short sequences with blank frames so all partitions end together.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PartanimError, PartanimResult};
use crate::tools::montage;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TileSettings {
    /// Tile size of each partition frame, in pixels.
    pub width: u32,
    pub height: u32,
    pub border: u32,
    pub fps: u32,
}

/// Square-ish grid: `ceil(sqrt(n))` columns.
pub fn grid_columns(partitions: usize) -> u32 {
    (partitions as f64).sqrt().ceil() as u32
}

/// Extra blank frames inserted before every sequence so the video opens on an
/// empty grid.
pub fn leading_blank_count(fps: u32) -> usize {
    (0.5 * f64::from(fps)).ceil() as usize
}

/// The partition's rendered frames (`p<partition>_*.png`), sorted by name.
pub fn collect_partition_frames(frames_dir: &Path, partition: u32) -> PartanimResult<Vec<PathBuf>> {
    use anyhow::Context as _;

    let prefix = format!("p{partition}_");
    let mut frames = Vec::new();
    let entries = std::fs::read_dir(frames_dir)
        .with_context(|| format!("failed to list '{}'", frames_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list '{}'", frames_dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&prefix) && name.ends_with(".png") {
            frames.push(entry.path());
        }
    }
    frames.sort();
    Ok(frames)
}

/// Pad the front of `frames` with the blank frame until it is `target` long.
pub fn pad_front_with_blanks(frames: &mut Vec<PathBuf>, target: usize, blank: &Path) {
    let missing = target.saturating_sub(frames.len());
    if missing > 0 {
        let mut padded = vec![blank.to_path_buf(); missing];
        padded.append(frames);
        *frames = padded;
    }
}

/// White placeholder frame, also substituted for any frame that the layout
/// tool failed to render.
pub fn write_blank_frame(path: &Path, width: u32, height: u32) -> PartanimResult<()> {
    let blank = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    blank
        .save(path)
        .map_err(|e| PartanimError::format(format!("failed to write blank frame: {e}")))?;
    Ok(())
}

/// Tile all partitions' frame sequences into `frames_joined/frame_NNNNNN.png`
/// grid images. Returns the joined frame paths in order.
pub fn combine_frames(
    output_dir: &Path,
    partitions: usize,
    settings: &TileSettings,
) -> PartanimResult<Vec<PathBuf>> {
    use anyhow::Context as _;

    info!(partitions, "combining partition frames into tiles");
    let frames_dir = output_dir.join("frames_partition");
    let mut frames: Vec<Vec<PathBuf>> = (0..partitions)
        .map(|p| collect_partition_frames(&frames_dir, p as u32))
        .collect::<PartanimResult<_>>()?;

    let max_count = frames.iter().map(Vec::len).max().unwrap_or(0);
    let frame_count = max_count + leading_blank_count(settings.fps);

    let blank = output_dir.join("frame_blank.png");
    write_blank_frame(&blank, settings.width, settings.height)?;

    for seq in &mut frames {
        pad_front_with_blanks(seq, frame_count, &blank);
    }

    let joined_dir = output_dir.join("frames_joined");
    std::fs::create_dir_all(&joined_dir)
        .with_context(|| format!("failed to create '{}'", joined_dir.display()))?;

    let columns = grid_columns(partitions);
    let mut joined = Vec::with_capacity(frame_count);
    for f in 0..frame_count {
        let tiles: Vec<&Path> = frames
            .iter()
            .enumerate()
            .map(|(p, seq)| match seq.get(f) {
                Some(path) => path.as_path(),
                None => {
                    // Absent frames are recoverable: substitute the blank
                    // and keep going.
                    warn!(partition = p, frame = f, "missing rendered frame, using blank");
                    blank.as_path()
                }
            })
            .collect();

        let out = joined_dir.join(format!("frame_{f:06}.png"));
        montage::create_png_tiles(&tiles, columns, settings.border, &out)?;
        joined.push(out);
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_square_ish() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(2), 2);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
    }

    #[test]
    fn leading_blanks_are_half_a_second() {
        assert_eq!(leading_blank_count(30), 15);
        assert_eq!(leading_blank_count(25), 13);
    }

    #[test]
    fn padding_prepends_blanks() {
        let blank = PathBuf::from("blank.png");
        let mut frames = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        pad_front_with_blanks(&mut frames, 4, &blank);
        assert_eq!(
            frames,
            vec![
                blank.clone(),
                blank.clone(),
                PathBuf::from("a.png"),
                PathBuf::from("b.png"),
            ]
        );
    }

    #[test]
    fn padding_never_truncates() {
        let blank = PathBuf::from("blank.png");
        let mut frames = vec![PathBuf::from("a.png")];
        pad_front_with_blanks(&mut frames, 0, &blank);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn collects_only_matching_partition_frames() {
        let dir = PathBuf::from("target").join("tiles_tests");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["p0_000001.png", "p0_000000.png", "p1_000000.png", "junk.txt"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        let frames = collect_partition_frames(&dir, 0).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["p0_000000.png", "p0_000001.png"]);
    }
}
