//! ImageMagick `montage` invocation: tiles one frame per partition into a
//! bordered grid image.

use std::path::Path;
use std::process::Command;

use crate::error::PartanimResult;
use crate::tools::run_logged;

pub fn create_png_tiles(
    tiles: &[impl AsRef<Path>],
    columns: u32,
    border: u32,
    out: &Path,
) -> PartanimResult<()> {
    let mut cmd = Command::new("montage");
    for tile in tiles {
        cmd.arg(tile.as_ref());
    }
    cmd.args(["-tile", &format!("{columns}x")])
        .args(["-geometry", "+0+0"])
        .args(["-border", &border.to_string()])
        .arg(out);
    run_logged(&mut cmd, "montage")?;
    Ok(())
}

pub fn is_montage_on_path() -> bool {
    crate::tools::is_on_path("montage", "-version")
}
