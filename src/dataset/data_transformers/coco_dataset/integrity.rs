use super::coco_dataset_struct::*;
use anyhow::{bail, ensure};
use std::collections::HashSet;

/// Checks that `coco` looks like something [`coco_subset`](super::coco_subset) produced:
/// ids of every table are `0..len` in order, category names are unique, every
/// annotation points at an existing category and image, and every image has at least
/// one annotation. The error names the first record that breaks a rule.
pub fn check_integrity(coco: &CocoDatasetJson) -> Result<(), anyhow::Error> {
    let mut names = HashSet::new();
    for (index, category) in coco.categories.iter().enumerate() {
        ensure!(
            category.id == index as i64,
            "category {:?} has id {}, expected {}",
            category.name,
            category.id,
            index
        );
        ensure!(
            names.insert(category.name.as_str()),
            "category name {:?} appears more than once",
            category.name
        );
    }
    for (index, image) in coco.images.iter().enumerate() {
        ensure!(
            image.id == index as i64,
            "image {} has id {}, expected {}",
            image.file_name,
            image.id,
            index
        );
    }

    let nb_categories = coco.categories.len() as i64;
    let nb_images = coco.images.len() as i64;
    let mut annotated = vec![false; coco.images.len()];
    for (index, annotation) in coco.annotations.iter().enumerate() {
        ensure!(
            annotation.id == index as i64,
            "annotation at position {} has id {}",
            index,
            annotation.id
        );
        if annotation.category_id < 0 || annotation.category_id >= nb_categories {
            bail!(
                "annotation {} references missing category {}",
                annotation.id,
                annotation.category_id
            );
        }
        if annotation.image_id < 0 || annotation.image_id >= nb_images {
            bail!(
                "annotation {} references missing image {}",
                annotation.id,
                annotation.image_id
            );
        }
        annotated[annotation.image_id as usize] = true;
    }
    if let Some(orphan) = annotated.iter().position(|has_annotation| !has_annotation) {
        bail!("image {} has no annotation", coco.images[orphan].file_name);
    }
    Ok(())
}
