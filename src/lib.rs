//! Reduces a COCO object detection dataset to a subset of its classes: categories are
//! deduplicated by name, images without remaining annotations are dropped, every id
//! is renumbered from 0 and the remaining image files are copied next to the new
//! annotation file.
pub mod config;
pub mod dataset;
pub mod logging;

pub use dataset::common_structs::{CopyPolicy, CopyReport, FilterSummary};
pub use dataset::data_transformers::coco_dataset::{
    check_integrity, coco_subset, read_annotations_file, write_annotations_file, CocoDatasetJson,
    CocoSubset,
};
pub use dataset::filter_job::FilterJob;
pub use dataset::splits::{run_splits, verify_layout, LayoutReport, SplitLayout};
