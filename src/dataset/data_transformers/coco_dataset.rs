//! COCO object detection annotations: typed records, file I/O and the class subset transform.
mod coco_dataset_struct;
mod coco_io;
mod coco_subset;
mod integrity;

pub use coco_dataset_struct::*;
pub use coco_io::{read_annotations_file, write_annotations_file};
pub use coco_subset::{coco_subset, CocoSubset};
pub use integrity::check_integrity;
