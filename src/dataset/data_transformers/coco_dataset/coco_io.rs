use super::coco_dataset_struct::*;
use anyhow::Context;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a COCO annotation file. Fails if the file cannot be opened or any of
/// `categories`, `images` or `annotations` is missing.
pub fn read_annotations_file<T: AsRef<Path>>(filepath: T) -> Result<CocoDatasetJson, anyhow::Error> {
    let filepath = filepath.as_ref();
    let input_file = File::open(filepath)
        .with_context(|| format!("could not open annotation file {}", filepath.display()))?;
    let coco = serde_json::from_reader(BufReader::new(input_file)).with_context(|| {
        format!(
            "{} does not contain a valid COCO annotation document",
            filepath.display()
        )
    })?;
    Ok(coco)
}

/// Writes `coco` as pretty printed JSON (2 space indentation).
///
/// The document goes to a temporary file next to `filepath` first and is renamed
/// over it once fully written, so a failed write never leaves a truncated file.
/// Missing parent directories are created. A new file gets the usual mode of newly
/// created files (0o666 minus the umask), a replaced file keeps its mode.
pub fn write_annotations_file<T: AsRef<Path>>(
    filepath: T,
    coco: &CocoDatasetJson,
) -> Result<(), anyhow::Error> {
    let filepath = filepath.as_ref();
    let parent = match filepath.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("could not create directory {}", parent.display()))?;

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // open(2) applies the umask to this mode
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder
        .tempfile_in(parent)
        .with_context(|| format!("could not create a temporary file in {}", parent.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        coco.serialize(&mut serializer)
            .with_context(|| format!("could not serialize {}", filepath.display()))?;
        writer
            .flush()
            .with_context(|| format!("could not write {}", filepath.display()))?;
    }
    if let Ok(existing) = fs::metadata(filepath) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("could not keep the mode of {}", filepath.display()))?;
    }
    tmp.persist(filepath)
        .with_context(|| format!("could not move annotations into {}", filepath.display()))?;
    Ok(())
}
