use super::coco_dataset_struct::*;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Output of [`coco_subset`]: the re-indexed document. Its `images` are exactly the
/// images whose files have to be carried over to the new dataset directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CocoSubset {
    pub coco: CocoDatasetJson,
}

impl CocoSubset {
    pub fn kept_images(&self) -> &[Image] {
        &self.coco.images
    }
}

/// Restricts `coco` to the categories named in `target_classes`.
///
/// Categories sharing a name collapse onto the first one seen, annotations of other
/// categories are dropped, images left without annotations are dropped, and the
/// category, annotation and image ids are renumbered from 0 in input order.
/// Names in `target_classes` that match no category are ignored.
/// The input is left untouched, every output record is a fresh clone.
pub fn coco_subset<S: AsRef<str>>(coco: &CocoDatasetJson, target_classes: &[S]) -> CocoSubset {
    let targets: HashSet<&str> = target_classes.iter().map(|name| name.as_ref()).collect();
    let mut builder = CocoSubsetBuilder::new();
    for category in &coco.categories {
        builder.add_category(category, &targets);
    }
    for annotation in &coco.annotations {
        builder.add_annotation(annotation);
    }
    for image in &coco.images {
        builder.add_image(image);
    }
    let unknown: Vec<&&str> = targets
        .iter()
        .filter(|name| !builder.new_category_id_by_name.contains_key(**name))
        .collect();
    if !unknown.is_empty() {
        debug!("target classes without a matching category: {:?}", unknown);
    }
    builder.finish(coco)
}

struct CocoSubsetBuilder {
    categories: Vec<Category>,
    new_category_id_by_name: HashMap<String, i64>,
    new_category_id_by_old: HashMap<i64, i64>,
    annotations: Vec<Annotation>,
    referenced_image_ids: HashSet<i64>,
    images: Vec<Image>,
    new_image_id_by_old: HashMap<i64, i64>,
}

impl CocoSubsetBuilder {
    fn new() -> CocoSubsetBuilder {
        CocoSubsetBuilder {
            categories: vec![],
            new_category_id_by_name: HashMap::new(),
            new_category_id_by_old: HashMap::new(),
            annotations: vec![],
            referenced_image_ids: HashSet::new(),
            images: vec![],
            new_image_id_by_old: HashMap::new(),
        }
    }

    fn add_category(&mut self, category: &Category, targets: &HashSet<&str>) {
        if !targets.contains(category.name.as_str()) {
            return;
        }
        let new_id = match self.new_category_id_by_name.get(&category.name) {
            // Same name already kept, reuse its id
            Some(&existing) => existing,
            None => {
                let new_id = self.categories.len() as i64;
                let mut new_category = category.clone();
                new_category.id = new_id;
                self.categories.push(new_category);
                self.new_category_id_by_name
                    .insert(category.name.clone(), new_id);
                new_id
            }
        };
        self.new_category_id_by_old.insert(category.id, new_id);
    }

    fn add_annotation(&mut self, annotation: &Annotation) {
        let new_category_id = match self.new_category_id_by_old.get(&annotation.category_id) {
            None => return,
            Some(&id) => id,
        };
        let mut new_annotation = annotation.clone();
        new_annotation.id = self.annotations.len() as i64;
        new_annotation.category_id = new_category_id;
        // image_id still points to the original image until finish()
        self.referenced_image_ids.insert(annotation.image_id);
        self.annotations.push(new_annotation);
    }

    fn add_image(&mut self, image: &Image) {
        if !self.referenced_image_ids.contains(&image.id) {
            return;
        }
        // A repeated image id keeps the first record
        if self.new_image_id_by_old.contains_key(&image.id) {
            return;
        }
        let new_id = self.images.len() as i64;
        let mut new_image = image.clone();
        new_image.id = new_id;
        self.new_image_id_by_old.insert(image.id, new_id);
        self.images.push(new_image);
    }

    fn finish(mut self, source: &CocoDatasetJson) -> CocoSubset {
        let new_image_id_by_old = &self.new_image_id_by_old;
        // Annotations pointing at an image that is not in the document have nothing to
        // be remapped to, they are dropped and the remaining ids closed up.
        self.annotations
            .retain(|annotation| new_image_id_by_old.contains_key(&annotation.image_id));
        for (index, annotation) in self.annotations.iter_mut().enumerate() {
            annotation.id = index as i64;
            annotation.image_id = new_image_id_by_old[&annotation.image_id];
        }
        CocoSubset {
            coco: CocoDatasetJson {
                info: source.info.clone(),
                licenses: source.licenses.clone(),
                categories: self.categories,
                images: self.images,
                annotations: self.annotations,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_car_person() -> CocoDatasetJson {
        serde_json::from_value(json!({
            "info": {"description": "roboflow export"},
            "licenses": [{"id": 1, "name": "CC BY 4.0"}],
            "categories": [
                {"id": 0, "name": "person", "supercategory": "none"},
                {"id": 1, "name": "car", "supercategory": "none"},
                {"id": 2, "name": "person", "supercategory": "people"}
            ],
            "images": [
                {"id": 5, "file_name": "a.jpg", "width": 640},
                {"id": 6, "file_name": "b.jpg", "width": 320}
            ],
            "annotations": [
                {"id": 10, "image_id": 5, "category_id": 0, "bbox": [1, 2, 3, 4]},
                {"id": 11, "image_id": 6, "category_id": 2, "bbox": [5, 6, 7, 8]},
                {"id": 12, "image_id": 5, "category_id": 1, "bbox": [9, 9, 9, 9]}
            ]
        }))
        .unwrap()
    }

    fn ids<T>(records: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
        records.iter().map(id).collect()
    }

    #[test]
    fn keeps_only_person_and_reindexes() {
        let out = coco_subset(&person_car_person(), &["person"]).coco;

        assert_eq!(out.categories.len(), 1);
        assert_eq!(out.categories[0].id, 0);
        assert_eq!(out.categories[0].name, "person");
        // First occurrence wins, including its extra fields
        assert_eq!(out.categories[0].extra["supercategory"], json!("none"));

        assert_eq!(ids(&out.images, |i| i.id), vec![0, 1]);
        assert_eq!(out.images[0].file_name, "a.jpg");
        assert_eq!(out.images[1].file_name, "b.jpg");

        assert_eq!(ids(&out.annotations, |a| a.id), vec![0, 1]);
        assert_eq!(ids(&out.annotations, |a| a.image_id), vec![0, 1]);
        assert_eq!(ids(&out.annotations, |a| a.category_id), vec![0, 0]);
        assert_eq!(out.annotations[1].extra["bbox"], json!([5, 6, 7, 8]));
    }

    #[test]
    fn info_and_licenses_are_copied() {
        let input = person_car_person();
        let out = coco_subset(&input, &["car"]).coco;
        assert_eq!(out.info, input.info);
        assert_eq!(out.licenses, input.licenses);
    }

    #[test]
    fn input_is_not_modified() {
        let input = person_car_person();
        let before = input.clone();
        let _ = coco_subset(&input, &["person", "car"]);
        assert_eq!(input, before);
    }

    #[test]
    fn category_order_follows_input_not_target_list() {
        let out = coco_subset(&person_car_person(), &["car", "person"]).coco;
        let names: Vec<&str> = out.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["person", "car"]);
        // car annotation (old id 12) is last and points at category 1
        assert_eq!(out.annotations[2].category_id, 1);
        assert_eq!(out.annotations[2].image_id, 0);
        // a.jpg is kept only once even though two annotations reference it
        assert_eq!(out.images.len(), 2);
    }

    #[test]
    fn unknown_and_repeated_targets_are_no_ops() {
        let input = person_car_person();
        let plain = coco_subset(&input, &["person"]);
        let noisy = coco_subset(&input, &["person", "truck", "person", ""]);
        assert_eq!(plain, noisy);
    }

    #[test]
    fn no_match_gives_an_empty_document() {
        let input = person_car_person();
        let out = coco_subset(&input, &["bicycle"]).coco;
        assert!(out.categories.is_empty());
        assert!(out.images.is_empty());
        assert!(out.annotations.is_empty());
        assert_eq!(out.info, input.info);
    }

    #[test]
    fn empty_target_list_gives_an_empty_document() {
        let empty: [&str; 0] = [];
        let out = coco_subset(&person_car_person(), &empty).coco;
        assert!(out.categories.is_empty());
    }

    #[test]
    fn images_without_surviving_annotations_are_dropped() {
        let input: CocoDatasetJson = serde_json::from_value(json!({
            "categories": [{"id": 1, "name": "cat"}, {"id": 2, "name": "dog"}],
            "images": [
                {"id": 100, "file_name": "only_dog.jpg"},
                {"id": 101, "file_name": "cat.jpg"},
                {"id": 102, "file_name": "empty.jpg"},
                {"id": 103, "file_name": "cat_and_dog.jpg"}
            ],
            "annotations": [
                {"id": 1, "image_id": 100, "category_id": 2},
                {"id": 2, "image_id": 103, "category_id": 1},
                {"id": 3, "image_id": 101, "category_id": 1},
                {"id": 4, "image_id": 103, "category_id": 2}
            ]
        }))
        .unwrap();
        let out = coco_subset(&input, &["cat"]).coco;

        let files: Vec<&str> = out.images.iter().map(|i| i.file_name.as_str()).collect();
        // image order follows the images list, not the annotation order
        assert_eq!(files, vec!["cat.jpg", "cat_and_dog.jpg"]);
        // annotation order follows the annotations list
        assert_eq!(ids(&out.annotations, |a| a.image_id), vec![1, 0]);
        assert_eq!(ids(&out.annotations, |a| a.id), vec![0, 1]);
    }

    #[test]
    fn annotation_on_unknown_image_is_dropped() {
        let input: CocoDatasetJson = serde_json::from_value(json!({
            "categories": [{"id": 1, "name": "cat"}],
            "images": [{"id": 7, "file_name": "cat.jpg"}],
            "annotations": [
                {"id": 1, "image_id": 99, "category_id": 1},
                {"id": 2, "image_id": 7, "category_id": 1}
            ]
        }))
        .unwrap();
        let out = coco_subset(&input, &["cat"]).coco;
        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].id, 0);
        assert_eq!(out.annotations[0].image_id, 0);
    }

    #[test]
    fn refiltering_the_output_is_stable() {
        let first = coco_subset(&person_car_person(), &["person", "car"]);
        let second = coco_subset(&first.coco, &["person", "car"]);
        assert_eq!(first, second);
    }

    #[test]
    fn kept_images_are_the_output_images() {
        let subset = coco_subset(&person_car_person(), &["car"]);
        assert_eq!(subset.kept_images().len(), 1);
        assert_eq!(subset.kept_images()[0].file_name, "a.jpg");
    }
}
