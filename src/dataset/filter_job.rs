use crate::dataset::common_structs::{CopyPolicy, FilterSummary};
use crate::dataset::data_transformers::coco_dataset::{
    coco_subset, read_annotations_file, write_annotations_file,
};
use crate::dataset::image_files::copy_images;
use anyhow::Context;
use log::info;
use std::path::PathBuf;

/// Everything needed to filter one COCO annotation file and its images
#[derive(Debug, Clone, PartialEq)]
pub struct FilterJob {
    pub input_json: PathBuf,
    pub output_json: PathBuf,
    pub input_image_dir: PathBuf,
    pub output_image_dir: PathBuf,
    pub target_classes: Vec<String>,
    pub copy_policy: CopyPolicy,
}

impl FilterJob {
    /// Reads `input_json`, keeps `target_classes`, copies the surviving images and
    /// writes `output_json`. The output file is only written once the whole
    /// document has been transformed and the images copied.
    pub fn run(&self) -> Result<FilterSummary, anyhow::Error> {
        info!(
            "filtering {} keeping {:?}",
            self.input_json.display(),
            self.target_classes
        );
        let coco = read_annotations_file(&self.input_json)?;
        let subset = coco_subset(&coco, self.target_classes.as_slice());

        let copy = copy_images(
            subset.kept_images(),
            &self.input_image_dir,
            &self.output_image_dir,
            self.copy_policy,
        )
        .with_context(|| format!("copying images for {}", self.input_json.display()))?;

        write_annotations_file(&self.output_json, &subset.coco)?;
        info!("wrote {}", self.output_json.display());

        Ok(FilterSummary {
            categories: subset.coco.categories.len(),
            images: subset.coco.images.len(),
            annotations: subset.coco.annotations.len(),
            copy,
        })
    }
}
