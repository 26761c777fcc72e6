//! LDraw model output for brick placements.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{bricks::BrickPlacement, error};

/// Author recorded in model headers.
const AUTHOR: &str = "hilbrick";

/// Format one placement as an LDraw type-1 line.
pub fn placement_line(placement: &BrickPlacement, color: u32) -> String {
    let [x, y, z] = placement.position();
    let mut fields = vec![
        "1".to_string(),
        color.to_string(),
        x.to_string(),
        y.to_string(),
        z.to_string(),
    ];
    fields.extend(placement.rotation.matrix().iter().map(i32::to_string));
    fields.push(placement.part.id.to_string());
    fields.join(" ")
}

/// Write a complete model: header lines, then one line per placement.
pub fn write_ldraw<W: Write>(
    mut writer: W,
    placements: &[BrickPlacement],
    color: u32,
    title: &str,
    file_name: &str,
) -> error::Result<()> {
    writeln!(writer, "0 FILE {file_name}")?;
    writeln!(writer, "0 Name: {title}")?;
    writeln!(writer, "0 Author: {AUTHOR}")?;
    writeln!(writer, "0 !LDRAW_ORG Unofficial_Model")?;
    writeln!(writer, "0 !LICENSE Redistributable under CC BY-SA 4.0")?;
    for placement in placements {
        writeln!(writer, "{}", placement_line(placement, color))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a model to `path`, creating missing parent directories.
pub fn save_ldraw(
    path: &Path,
    placements: &[BrickPlacement],
    color: u32,
    title: &str,
) -> error::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let writer = BufWriter::new(File::create(path)?);
    write_ldraw(writer, placements, color, title, &file_name)
}
