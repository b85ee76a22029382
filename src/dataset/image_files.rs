use crate::dataset::common_structs::{CopyPolicy, CopyReport};
use crate::dataset::data_transformers::coco_dataset::Image;
use anyhow::{bail, Context};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

enum CopyOutcome {
    Copied,
    Missing,
    Failed(anyhow::Error),
}

/// Copies `source_dir/<file_name>` to `dest_dir/<file_name>` for every image, creating
/// `dest_dir` and any sub directory a file_name implies.
///
/// Failing to create `dest_dir` is an error. Images whose source file does not exist
/// are skipped and listed in the report. Other copy failures are listed in the report
/// with [`CopyPolicy::Tolerant`] and abort with [`CopyPolicy::Strict`].
/// Files are copied in parallel, keeping the permission bits and modification time
/// of the source. A `dest_dir` that is `source_dir` under another name is an error,
/// since copying a file onto itself truncates it.
pub fn copy_images<S: AsRef<Path>, D: AsRef<Path>>(
    images: &[Image],
    source_dir: S,
    dest_dir: D,
    policy: CopyPolicy,
) -> Result<CopyReport, anyhow::Error> {
    let source_dir = source_dir.as_ref();
    let dest_dir = dest_dir.as_ref();
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("could not create image directory {}", dest_dir.display()))?;
    if source_dir.exists() && is_same_path(source_dir, dest_dir)? {
        bail!(
            "image destination {} is the source directory {}",
            dest_dir.display(),
            source_dir.display()
        );
    }

    let outcomes: Vec<CopyOutcome> = images
        .par_iter()
        .map(|image| copy_image(&image.file_name, source_dir, dest_dir))
        .collect();

    let mut report = CopyReport::default();
    for (image, outcome) in images.iter().zip(outcomes) {
        match outcome {
            CopyOutcome::Copied => report.copied += 1,
            CopyOutcome::Missing => {
                warn!(
                    "image file {} not found in {}, skipping",
                    image.file_name,
                    source_dir.display()
                );
                report.missing.push(image.file_name.clone());
            }
            CopyOutcome::Failed(err) => {
                if policy == CopyPolicy::Strict {
                    return Err(err);
                }
                warn!("{:#}", err);
                report.failed.push(image.file_name.clone());
            }
        }
    }
    debug!(
        "copied {} images into {}",
        report.copied,
        dest_dir.display()
    );
    Ok(report)
}

fn copy_image(file_name: &str, source_dir: &Path, dest_dir: &Path) -> CopyOutcome {
    let src = source_dir.join(file_name);
    if !src.exists() {
        return CopyOutcome::Missing;
    }
    let dst = dest_dir.join(file_name);
    match copy_file(&src, &dst) {
        Ok(()) => CopyOutcome::Copied,
        Err(err) => CopyOutcome::Failed(err),
    }
}

/// Compares what both paths resolve to, following symlinks and `..`
fn is_same_path(a: &Path, b: &Path) -> Result<bool, anyhow::Error> {
    let a = fs::canonicalize(a).with_context(|| format!("could not resolve {}", a.display()))?;
    let b = fs::canonicalize(b).with_context(|| format!("could not resolve {}", b.display()))?;
    Ok(a == b)
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), anyhow::Error> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create directory {}", parent.display()))?;
    }
    if dst.exists() && is_same_path(src, dst)? {
        bail!("refusing to copy {} onto itself", src.display());
    }
    // fs::copy keeps the permission bits of the source
    fs::copy(src, dst).with_context(|| {
        format!("could not copy {} to {}", src.display(), dst.display())
    })?;
    let modified = fs::metadata(src)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("could not read modification time of {}", src.display()))?;
    // The copy may be read only when the source is
    let copied = OpenOptions::new()
        .write(true)
        .open(dst)
        .or_else(|_| File::open(dst))
        .with_context(|| format!("could not open {}", dst.display()))?;
    copied
        .set_modified(modified)
        .with_context(|| format!("could not set modification time of {}", dst.display()))?;
    Ok(())
}
