use crate::dataset::common_structs::{CopyPolicy, FilterSummary};
use crate::dataset::data_transformers::coco_dataset::{check_integrity, read_annotations_file};
use crate::dataset::filter_job::FilterJob;
use anyhow::Context;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Annotation file name of every split in a Roboflow style COCO export
pub const DEFAULT_ANNOTATION_FILE: &str = "_annotations.coco.json";
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "valid", "test"];

/// A dataset root laid out as `<root>/<split>/<annotation_file>` with the images of
/// each split next to its annotation file.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    pub root: PathBuf,
    pub splits: Vec<String>,
    pub annotation_file: String,
}

impl SplitLayout {
    pub fn new<T: AsRef<Path>>(root: T) -> SplitLayout {
        SplitLayout {
            root: root.as_ref().to_path_buf(),
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            annotation_file: DEFAULT_ANNOTATION_FILE.to_string(),
        }
    }

    pub fn split_dir(&self, split: &str) -> PathBuf {
        self.root.join(split)
    }

    pub fn annotations_path(&self, split: &str) -> PathBuf {
        self.split_dir(split).join(&self.annotation_file)
    }
}

/// Filters every split of `input` into the same split of `output_root`.
///
/// Splits without an annotation file are skipped with a warning, any other failure
/// stops the run. Returns the summary of each processed split, in order.
pub fn run_splits<T: AsRef<Path>, S: AsRef<str>>(
    input: &SplitLayout,
    output_root: T,
    target_classes: &[S],
    copy_policy: CopyPolicy,
) -> Result<Vec<(String, FilterSummary)>, anyhow::Error> {
    let output = SplitLayout {
        root: output_root.as_ref().to_path_buf(),
        ..input.clone()
    };
    let target_classes: Vec<String> = target_classes
        .iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    let mut summaries = vec![];
    for split in &input.splits {
        let input_json = input.annotations_path(split);
        if !input_json.exists() {
            warn!("no {} for split {}, skipping", input_json.display(), split);
            continue;
        }
        let job = FilterJob {
            input_json,
            output_json: output.annotations_path(split),
            input_image_dir: input.split_dir(split),
            output_image_dir: output.split_dir(split),
            target_classes: target_classes.clone(),
            copy_policy,
        };
        let summary = job
            .run()
            .with_context(|| format!("filtering split {}", split))?;
        info!(
            "{}: {} classes, {} images, {} annotations",
            split, summary.categories, summary.images, summary.annotations
        );
        summaries.push((split.clone(), summary));
    }
    Ok(summaries)
}

/// State of one split of a filtered dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutReport {
    pub split: String,
    pub categories: usize,
    pub images: usize,
    pub annotations: usize,
    /// Images listed in the annotation file whose file is not in the split directory
    pub missing_files: Vec<String>,
}

/// Checks that `layout` is what a trainer consuming the filtered dataset expects:
/// each present split has a parseable annotation file that passes
/// [`check_integrity`]. Image files absent from disk are reported, not rejected.
/// At least one split must be present.
pub fn verify_layout(layout: &SplitLayout) -> Result<Vec<LayoutReport>, anyhow::Error> {
    let mut reports = vec![];
    for split in &layout.splits {
        let path = layout.annotations_path(split);
        if !path.exists() {
            warn!("split {} has no {}", split, path.display());
            continue;
        }
        let coco = read_annotations_file(&path)?;
        check_integrity(&coco).with_context(|| format!("checking {}", path.display()))?;
        let split_dir = layout.split_dir(split);
        let missing_files = coco
            .images
            .iter()
            .filter(|image| !split_dir.join(&image.file_name).is_file())
            .map(|image| image.file_name.clone())
            .collect();
        reports.push(LayoutReport {
            split: split.clone(),
            categories: coco.categories.len(),
            images: coco.images.len(),
            annotations: coco.annotations.len(),
            missing_files,
        });
    }
    anyhow::ensure!(
        !reports.is_empty(),
        "none of the splits {:?} exist under {}",
        layout.splits,
        layout.root.display()
    );
    Ok(reports)
}
